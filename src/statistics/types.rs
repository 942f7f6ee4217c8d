use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub user_id: i64,
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub total_focus_minutes: u32,
    pub average_focus_minutes: f64,
    /// Percent, 0.0 to 100.0.
    pub completion_rate: f64,

    pub weekly_sessions: u32,
    pub weekly_completed: u32,
    pub weekly_focus_minutes: u32,

    pub monthly_sessions: u32,
    pub monthly_completed: u32,
    pub monthly_focus_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub completed: u32,
    pub focus_minutes: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub completed: u32,
    pub focus_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyComparison {
    pub this_week: PeriodSummary,
    /// Always zero until `last_week_available` is true.
    pub last_week: PeriodSummary,
    pub last_week_available: bool,
    pub note: String,
}
