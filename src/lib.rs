pub mod badges;
pub mod cli;
pub mod db;
pub mod error;
pub mod progression;
pub mod session;
pub mod settings;
pub mod statistics;
pub mod utils;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;

use badges::BadgeCatalog;
use cli::{Cli, Commands};
use db::Database;
use progression::StreakMode;
use session::{commands, SessionController};
use settings::{AppSettings, SettingsStore, DATABASE_FILE, SETTINGS_FILE};

pub use error::{FocusError, FocusResult};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Applies the given changes to the stored settings and returns the result.
fn configure(
    store: &SettingsStore,
    default_minutes: Option<u32>,
    history_limit: Option<usize>,
    daily_days: Option<u32>,
    streak_mode: Option<String>,
) -> Result<AppSettings> {
    let mut updated = store.get();
    let current = updated.clone();

    if let Some(minutes) = default_minutes {
        updated.default_duration_minutes = minutes;
    }
    if let Some(limit) = history_limit {
        updated.history_limit = limit;
    }
    if let Some(days) = daily_days {
        updated.daily_activity_days = days;
    }
    if let Some(raw) = streak_mode {
        updated.streak_mode = StreakMode::parse(raw.trim()).ok_or_else(|| {
            anyhow!("unknown streak mode '{raw}'; expected anyNewDay or consecutiveDays")
        })?;
    }

    if updated != current {
        store.update(updated)?;
        log::info!("Settings saved");
    }
    Ok(store.get())
}

async fn dispatch(
    controller: &SessionController,
    store: &SettingsStore,
    settings: &AppSettings,
    user_id: i64,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Start { minutes } => {
            let minutes = minutes.unwrap_or(settings.default_duration_minutes);
            let session = commands::start_session(controller, user_id, minutes)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&session)
        }
        Commands::Complete { session_id } => {
            let outcome = commands::complete_session(controller, session_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&outcome)
        }
        Commands::History { limit, all } => {
            let limit = if all {
                None
            } else {
                Some(limit.unwrap_or(settings.history_limit))
            };
            let history = commands::get_user_sessions(controller, user_id, limit)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&history)
        }
        Commands::Profile => {
            let profile = commands::get_user_profile(controller, user_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&profile)
        }
        Commands::Badges => {
            let overview = commands::get_user_badges(controller, user_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&overview)
        }
        Commands::CheckBadges => {
            let awarded = commands::check_and_award_badges(controller, user_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&awarded)
        }
        Commands::Stats => {
            let stats = commands::get_user_statistics(controller, user_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&stats)
        }
        Commands::Daily { days } => {
            let days = days.unwrap_or(settings.daily_activity_days);
            let activity = commands::get_daily_activity(controller, user_id, days)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&activity)
        }
        Commands::Weekly => {
            let comparison = commands::get_weekly_comparison(controller, user_id)
                .await
                .map_err(|e| anyhow!(e))?;
            print_json(&comparison)
        }
        Commands::Config {
            default_minutes,
            history_limit,
            daily_days,
            streak_mode,
        } => {
            let stored = configure(store, default_minutes, history_limit, daily_days, streak_mode)?;
            print_json(&stored)
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(if cli.verbose { "debug" } else { "info" });
    log::debug!("FocusQuest starting up...");

    let data_dir = cli.data_dir.unwrap_or_else(settings::data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings_store = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
    let settings = settings_store.get().with_env_overrides();
    log::debug!("Streak mode: {}", settings.streak_mode.as_str());

    let database = Database::new(data_dir.join(DATABASE_FILE))?;
    let controller = SessionController::new(
        database,
        Arc::new(BadgeCatalog::predefined()),
        settings.streak_mode,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(dispatch(
        &controller,
        &settings_store,
        &settings,
        cli.user,
        cli.command,
    ))
}
