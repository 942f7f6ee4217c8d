//! Pomodoro session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FocusError, FocusResult};

/// Longest accepted session: one full day.
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Pending,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: String,
    pub user_id: i64,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub xp_earned: u32,
}

impl PomodoroSession {
    pub fn start(user_id: i64, duration_minutes: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            duration_minutes,
            status: SessionStatus::Pending,
            started_at,
            completed_at: None,
            xp_earned: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Pending -> Completed. The transition happens once; a second call is
    /// rejected and leaves the record untouched.
    pub fn complete(&mut self, xp_earned: u32, completed_at: DateTime<Utc>) -> FocusResult<()> {
        if self.is_completed() {
            return Err(FocusError::invalid(format!(
                "session {} is already completed",
                self.id
            )));
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(completed_at);
        self.xp_earned = xp_earned;
        Ok(())
    }
}
