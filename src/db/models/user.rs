//! User record carrying the progression state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Id of the row seeded by the first migration.
pub const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub xp: u32,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_session_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh level-1 user. `id` is assigned on insert.
    pub fn new(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_session_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}
