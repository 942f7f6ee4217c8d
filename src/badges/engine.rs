use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    badges::catalog::{Badge, BadgeCatalog, CriteriaType},
    db::{PomodoroSession, User},
    statistics::{MONTH_WINDOW, WEEK_WINDOW},
};

/// Counters the badge criteria are checked against.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCounts {
    pub total_completed: u32,
    pub weekly_completed: u32,
    pub monthly_completed: u32,
}

impl ActivityCounts {
    /// Tallies completed sessions; the weekly and monthly counters only take
    /// sessions started inside the rolling window ending at `now`.
    pub fn from_sessions(sessions: &[PomodoroSession], now: DateTime<Utc>) -> Self {
        let week_start = now - WEEK_WINDOW;
        let month_start = now - MONTH_WINDOW;

        sessions
            .iter()
            .filter(|session| session.is_completed())
            .fold(Self::default(), |mut counts, session| {
                counts.total_completed += 1;
                if session.started_at >= week_start {
                    counts.weekly_completed += 1;
                }
                if session.started_at >= month_start {
                    counts.monthly_completed += 1;
                }
                counts
            })
    }
}

impl BadgeCatalog {
    /// Badges whose criterion now holds, in catalog order, skipping any id in
    /// `already_earned`.
    pub fn evaluate<'a>(
        &'a self,
        user: &User,
        counts: &ActivityCounts,
        already_earned: &HashSet<String>,
    ) -> Vec<&'a Badge> {
        self.badges()
            .iter()
            .filter(|badge| !already_earned.contains(&badge.id))
            .filter(|badge| criterion_met(badge, user, counts))
            .collect()
    }
}

fn criterion_met(badge: &Badge, user: &User, counts: &ActivityCounts) -> bool {
    let observed = match badge.criteria_type {
        CriteriaType::Streak => user.current_streak,
        CriteriaType::WeeklyCount => counts.weekly_completed,
        CriteriaType::MonthlyCount => counts.monthly_completed,
        CriteriaType::TotalCount => counts.total_completed,
    };
    observed >= badge.criteria_value
}
