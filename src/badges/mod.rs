//! Badge unlocking.
//!
//! [`BadgeCatalog::evaluate`] is the pure rule; [`award_unlocked`] runs it
//! against stored activity and appends award rows on the caller's
//! connection, so it composes with the completion transaction.

pub mod catalog;
pub mod engine;

pub use catalog::{Badge, BadgeCatalog, CriteriaType};
pub use engine::ActivityCounts;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{
    models::{User, UserBadge},
    repositories::{badges, sessions},
};

const ENABLE_LOGS: bool = true;

/// Evaluates every unearned badge for `user` and awards the ones that
/// unlock. Returns only the newly awarded definitions.
pub fn award_unlocked(
    conn: &Connection,
    catalog: &BadgeCatalog,
    user: &User,
    now: DateTime<Utc>,
) -> Result<Vec<Badge>> {
    let completed = sessions::list_completed_by_user(conn, user.id)?;
    let counts = ActivityCounts::from_sessions(&completed, now);
    let earned = badges::earned_badge_ids(conn, user.id)?;

    let mut awarded = Vec::new();
    for badge in catalog.evaluate(user, &counts, &earned) {
        badges::award_badge(conn, user.id, &badge.id, now)?;
        crate::log_info!("User {} unlocked badge {}", user.id, badge.id);
        awarded.push(badge.clone());
    }
    Ok(awarded)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: DateTime<Utc>,
}

/// Earned and outstanding badges, both in catalog order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeOverview {
    pub earned: Vec<EarnedBadge>,
    pub not_earned: Vec<Badge>,
    pub total_earned: usize,
    pub total_available: usize,
}

impl BadgeOverview {
    /// Award rows for ids missing from the catalog are left out.
    pub fn build(catalog: &BadgeCatalog, awards: &[UserBadge]) -> Self {
        let mut earned = Vec::new();
        let mut not_earned = Vec::new();

        for badge in catalog.badges() {
            match awards.iter().find(|award| award.badge_id == badge.id) {
                Some(award) => earned.push(EarnedBadge {
                    badge: badge.clone(),
                    earned_at: award.earned_at,
                }),
                None => not_earned.push(badge.clone()),
            }
        }

        Self {
            total_earned: earned.len(),
            total_available: catalog.len(),
            earned,
            not_earned,
        }
    }
}
