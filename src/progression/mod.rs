//! XP, levels and streaks.
//!
//! Pure rules over a [`User`]: nothing here touches storage or the clock.
//! The level is always derivable from the XP total (`xp / 100 + 1`) and every
//! function keeps the stored `level` equal to that derivation.

mod streak;

pub use streak::{update_streak, StreakMode};

use serde::Serialize;

use crate::db::User;

pub const XP_PER_MINUTE: u32 = 2;
pub const XP_PER_LEVEL: u32 = 100;

/// XP earned for a completed session of `duration_minutes`. Exact for every
/// duration a session can hold (see [`crate::db::MAX_SESSION_MINUTES`]).
pub fn compute_session_xp(duration_minutes: u32) -> u32 {
    duration_minutes.saturating_mul(XP_PER_MINUTE)
}

pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Adds `amount` to the user's total and recomputes the level.
///
/// Returns `true` when the level went up, however many levels were crossed.
pub fn add_xp(user: &mut User, amount: u32) -> bool {
    let old_level = user.level;
    user.xp = user.xp.saturating_add(amount);
    let new_level = level_for_xp(user.xp);
    if new_level > old_level {
        user.level = new_level;
        true
    } else {
        false
    }
}

pub fn xp_for_next_level(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Progress through the current level in percent.
pub fn xp_progress_percentage(xp: u32, level: u32) -> f64 {
    let level_floor = f64::from(level.saturating_sub(1)) * f64::from(XP_PER_LEVEL);
    let into_level = f64::from(xp) - level_floor;
    into_level / f64::from(xp_for_next_level(level)) * 100.0
}

/// A user plus the projections shown on the profile screen.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub xp_for_next_level: u32,
    pub xp_progress_percentage: f64,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            xp_for_next_level: xp_for_next_level(user.level),
            xp_progress_percentage: xp_progress_percentage(user.xp, user.level),
            user,
        }
    }
}
