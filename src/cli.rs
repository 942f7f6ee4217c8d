//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::db::DEFAULT_USER_ID;

#[derive(Parser)]
#[command(name = "focusquest")]
#[command(about = "Pomodoro focus sessions with XP, streaks and badges")]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $FOCUSQUEST_DATA_DIR or ./.focusquest)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// User id to act on
    #[arg(long, short = 'u', global = true, default_value_t = DEFAULT_USER_ID)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a pending focus session
    Start {
        /// Session length in minutes (defaults to the configured duration)
        #[arg(long, short = 'm')]
        minutes: Option<u32>,
    },

    /// Complete a session and collect XP, streak and badges
    Complete {
        session_id: String,
    },

    /// List recent sessions, newest first
    History {
        /// Limit number of results (defaults to the configured history limit)
        #[arg(long, short = 'n', conflicts_with = "all")]
        limit: Option<usize>,
        /// Return the full history
        #[arg(long)]
        all: bool,
    },

    /// Show XP, level and streak
    Profile,

    /// Show earned and outstanding badges
    Badges,

    /// Award any badges the stored history already qualifies for
    CheckBadges,

    /// Show overall, weekly and monthly statistics
    Stats,

    /// Show per-day activity
    Daily {
        /// Number of days ending today (defaults to the configured window)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Compare this week with last week
    Weekly,

    /// Show the stored settings, applying any given changes first
    Config {
        /// Default session length in minutes
        #[arg(long)]
        default_minutes: Option<u32>,
        /// Default number of sessions listed by `history`
        #[arg(long)]
        history_limit: Option<usize>,
        /// Default window for `daily`
        #[arg(long)]
        daily_days: Option<u32>,
        /// anyNewDay or consecutiveDays
        #[arg(long)]
        streak_mode: Option<String>,
    },
}
