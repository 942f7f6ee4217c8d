//! String-error entry points for the calling layer.

use crate::{
    badges::{Badge, BadgeOverview},
    db::PomodoroSession,
    progression::UserProfile,
    statistics::{DailyActivity, Statistics, WeeklyComparison},
};

use super::{CompletionOutcome, SessionController};

pub async fn start_session(
    controller: &SessionController,
    user_id: i64,
    duration_minutes: u32,
) -> Result<PomodoroSession, String> {
    controller
        .start_session(user_id, duration_minutes)
        .await
        .map_err(|e| e.to_string())
}

pub async fn complete_session(
    controller: &SessionController,
    session_id: String,
) -> Result<CompletionOutcome, String> {
    controller
        .complete_session(&session_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_user_sessions(
    controller: &SessionController,
    user_id: i64,
    limit: Option<usize>,
) -> Result<Vec<PomodoroSession>, String> {
    controller
        .get_user_sessions(user_id, limit)
        .await
        .map_err(|e| e.to_string())
}

/// A missing user is reported as an error here, unlike the controller.
pub async fn get_user_profile(
    controller: &SessionController,
    user_id: i64,
) -> Result<UserProfile, String> {
    controller
        .get_user_profile(user_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("not found: user {user_id}"))
}

pub async fn get_user_badges(
    controller: &SessionController,
    user_id: i64,
) -> Result<BadgeOverview, String> {
    controller
        .get_user_badges(user_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn check_and_award_badges(
    controller: &SessionController,
    user_id: i64,
) -> Result<Vec<Badge>, String> {
    controller
        .check_and_award_badges(user_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_user_statistics(
    controller: &SessionController,
    user_id: i64,
) -> Result<Statistics, String> {
    controller
        .get_user_statistics(user_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_daily_activity(
    controller: &SessionController,
    user_id: i64,
    days: u32,
) -> Result<Vec<DailyActivity>, String> {
    controller
        .get_daily_activity(user_id, days)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_weekly_comparison(
    controller: &SessionController,
    user_id: i64,
) -> Result<WeeklyComparison, String> {
    controller
        .get_weekly_comparison(user_id)
        .await
        .map_err(|e| e.to_string())
}
