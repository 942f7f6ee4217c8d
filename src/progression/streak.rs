use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::User;

/// How a session on a new date affects the running streak.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StreakMode {
    /// Any date different from the last one extends the streak, even after
    /// a gap of several days. This is the historical behaviour.
    #[default]
    AnyNewDay,
    /// Calendar-aware alternative: only the day right after the last session
    /// extends the streak; a gap restarts it at 1.
    ConsecutiveDays,
}

impl StreakMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakMode::AnyNewDay => "anyNewDay",
            StreakMode::ConsecutiveDays => "consecutiveDays",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "anyNewDay" | "any-new-day" => Some(StreakMode::AnyNewDay),
            "consecutiveDays" | "consecutive-days" => Some(StreakMode::ConsecutiveDays),
            _ => None,
        }
    }
}

/// Records a session on `session_date`. Repeating a date is a no-op for the
/// streak counters; `longest_streak` never drops below `current_streak`.
pub fn update_streak(user: &mut User, session_date: NaiveDate, mode: StreakMode) {
    match user.last_session_date {
        None => user.current_streak = 1,
        Some(last) if last == session_date => {}
        Some(last) => match mode {
            StreakMode::AnyNewDay => user.current_streak += 1,
            StreakMode::ConsecutiveDays => {
                if last.succ_opt() == Some(session_date) {
                    user.current_streak += 1;
                } else {
                    user.current_streak = 1;
                }
            }
        },
    }

    user.longest_streak = user.longest_streak.max(user.current_streak);
    user.last_session_date = Some(session_date);
}
