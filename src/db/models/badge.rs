use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Award record: one row per (user, badge), never removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserBadge {
    pub id: i64,
    pub user_id: i64,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}
