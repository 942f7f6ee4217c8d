//! Logger set-up plus switchable logging macros.
//!
//! A module opts in by defining a flag and calling the macros, which are
//! exported at the crate root:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! crate::log_info!("Session {} completed", session_id);
//! ```

use env_logger::Env;

/// Installs `env_logger`, honouring `RUST_LOG` and otherwise using
/// `default_filter`. Safe to call more than once; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}

/// Info-level log gated by the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Debug-level log gated by the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
