use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::{
    badges::{self, Badge, BadgeCatalog, BadgeOverview},
    db::{
        repositories::{sessions, users},
        Database, PomodoroSession, MAX_SESSION_MINUTES,
    },
    error::{FocusError, FocusResult},
    progression::{add_xp, compute_session_xp, update_streak, StreakMode, UserProfile},
    statistics::{
        self, DailyActivity, Statistics, WeeklyComparison, MAX_ACTIVITY_DAYS, WEEK_WINDOW,
    },
};

const ENABLE_LOGS: bool = true;

/// Result of completing a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub session: PomodoroSession,
    pub user: UserProfile,
    pub leveled_up: bool,
    pub xp_earned: u32,
    pub new_badges: Vec<Badge>,
}

/// Drives session start and completion and the read views over a user's
/// history.
///
/// Methods without an `_at` suffix read the local wall clock. The `_at`
/// variants take the instant explicitly; its time zone decides which
/// calendar day a completion counts toward.
#[derive(Clone)]
pub struct SessionController {
    db: Database,
    catalog: Arc<BadgeCatalog>,
    streak_mode: StreakMode,
}

impl SessionController {
    pub fn new(db: Database, catalog: Arc<BadgeCatalog>, streak_mode: StreakMode) -> Self {
        Self {
            db,
            catalog,
            streak_mode,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn start_session(
        &self,
        user_id: i64,
        duration_minutes: u32,
    ) -> FocusResult<PomodoroSession> {
        self.start_session_at(user_id, duration_minutes, Local::now())
            .await
    }

    pub async fn start_session_at<Tz: TimeZone>(
        &self,
        user_id: i64,
        duration_minutes: u32,
        now: DateTime<Tz>,
    ) -> FocusResult<PomodoroSession> {
        if duration_minutes == 0 {
            return Err(FocusError::invalid("duration must be a positive number of minutes"));
        }
        if duration_minutes > MAX_SESSION_MINUTES {
            return Err(FocusError::invalid(format!(
                "duration of {duration_minutes} minutes exceeds the {MAX_SESSION_MINUTES}-minute maximum"
            )));
        }

        let session = PomodoroSession::start(user_id, duration_minutes, now.with_timezone(&Utc));
        let session = self
            .db
            .transaction(move |tx| {
                if users::load_user(tx, user_id)?.is_none() {
                    return Err(FocusError::not_found(format!("user {user_id}")).into());
                }
                sessions::create_session(tx, &session)
            })
            .await?;

        crate::log_debug!(
            "Started {}-minute session {} for user {}",
            session.duration_minutes,
            session.id,
            session.user_id
        );
        Ok(session)
    }

    pub async fn complete_session(&self, session_id: &str) -> FocusResult<CompletionOutcome> {
        self.complete_session_at(session_id, Local::now()).await
    }

    /// Marks the session completed and credits its owner, all in one
    /// transaction: XP, level, streak and any badges that unlock. Nothing is
    /// written if any step fails.
    pub async fn complete_session_at<Tz: TimeZone>(
        &self,
        session_id: &str,
        now: DateTime<Tz>,
    ) -> FocusResult<CompletionOutcome> {
        let session_id = session_id.to_string();
        let today = now.date_naive();
        let now = now.with_timezone(&Utc);
        let catalog = Arc::clone(&self.catalog);
        let streak_mode = self.streak_mode;

        let outcome = self
            .db
            .transaction(move |tx| {
                let mut session = sessions::load_session(tx, &session_id)?
                    .ok_or_else(|| FocusError::not_found(format!("session {session_id}")))?;

                let xp_earned = compute_session_xp(session.duration_minutes);
                session.complete(xp_earned, now)?;
                sessions::save_session(tx, &session)?;

                let mut user = users::load_user(tx, session.user_id)?
                    .ok_or_else(|| FocusError::not_found(format!("user {}", session.user_id)))?;

                let leveled_up = add_xp(&mut user, xp_earned);
                update_streak(&mut user, today, streak_mode);
                user.updated_at = now;
                users::save_user(tx, &user)?;

                let new_badges = badges::award_unlocked(tx, &catalog, &user, now)?;

                Ok(CompletionOutcome {
                    session,
                    user: UserProfile::from(user),
                    leveled_up,
                    xp_earned,
                    new_badges,
                })
            })
            .await?;

        crate::log_info!(
            "Session {} completed: +{} XP for user {}",
            outcome.session.id,
            outcome.xp_earned,
            outcome.session.user_id
        );
        if outcome.leveled_up {
            crate::log_info!(
                "User {} reached level {}",
                outcome.user.user.id,
                outcome.user.user.level
            );
        }

        Ok(outcome)
    }

    /// Newest first. `None` returns the full history.
    pub async fn get_user_sessions(
        &self,
        user_id: i64,
        limit: Option<usize>,
    ) -> FocusResult<Vec<PomodoroSession>> {
        Ok(self.db.list_sessions_by_user(user_id, limit).await?)
    }

    pub async fn get_user_profile(&self, user_id: i64) -> FocusResult<Option<UserProfile>> {
        let user = self.db.load_user(user_id).await?;
        Ok(user.map(UserProfile::from))
    }

    pub async fn check_and_award_badges(&self, user_id: i64) -> FocusResult<Vec<Badge>> {
        self.check_and_award_badges_at(user_id, Utc::now()).await
    }

    /// Awards whatever the user's stored activity already qualifies for.
    /// An unknown user has nothing to award.
    pub async fn check_and_award_badges_at(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> FocusResult<Vec<Badge>> {
        let catalog = Arc::clone(&self.catalog);
        let awarded = self
            .db
            .transaction(move |tx| match users::load_user(tx, user_id)? {
                Some(user) => badges::award_unlocked(tx, &catalog, &user, now),
                None => Ok(Vec::new()),
            })
            .await?;
        Ok(awarded)
    }

    pub async fn get_user_badges(&self, user_id: i64) -> FocusResult<BadgeOverview> {
        let awards = self.db.list_user_badges(user_id).await?;
        Ok(BadgeOverview::build(&self.catalog, &awards))
    }

    pub async fn get_user_statistics(&self, user_id: i64) -> FocusResult<Statistics> {
        self.get_user_statistics_at(user_id, Utc::now()).await
    }

    pub async fn get_user_statistics_at(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> FocusResult<Statistics> {
        let history = self.db.list_sessions_by_user(user_id, None).await?;
        Ok(statistics::aggregate(user_id, &history, now))
    }

    pub async fn get_daily_activity(
        &self,
        user_id: i64,
        days: u32,
    ) -> FocusResult<Vec<DailyActivity>> {
        self.get_daily_activity_at(user_id, days, Local::now()).await
    }

    pub async fn get_daily_activity_at<Tz: TimeZone>(
        &self,
        user_id: i64,
        days: u32,
        now: DateTime<Tz>,
    ) -> FocusResult<Vec<DailyActivity>> {
        if days > MAX_ACTIVITY_DAYS {
            return Err(FocusError::invalid(format!(
                "daily activity covers at most {MAX_ACTIVITY_DAYS} days, got {days}"
            )));
        }

        let completed = self.db.list_completed_by_user(user_id).await?;
        Ok(statistics::daily_activity(&completed, days, now))
    }

    pub async fn get_weekly_comparison(&self, user_id: i64) -> FocusResult<WeeklyComparison> {
        self.get_weekly_comparison_at(user_id, Utc::now()).await
    }

    pub async fn get_weekly_comparison_at(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> FocusResult<WeeklyComparison> {
        let this_week = self
            .db
            .list_sessions_since(user_id, now - WEEK_WINDOW)
            .await?;
        Ok(statistics::weekly_comparison(&this_week))
    }
}
