fn main() -> anyhow::Result<()> {
    focusquest_lib::run()
}
