//! Badge definitions.
//!
//! The catalog is built once at start-up and shared read-only; definition
//! order is the order badges are evaluated and listed in.

use std::collections::HashSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    /// Current daily streak.
    Streak,
    /// Completed sessions started in the trailing 7 days.
    WeeklyCount,
    /// Completed sessions started in the trailing 30 days.
    MonthlyCount,
    /// Completed sessions, all time.
    TotalCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criteria_type: CriteriaType,
    pub criteria_value: u32,
}

impl Badge {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        criteria_type: CriteriaType,
        criteria_value: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            criteria_type,
            criteria_value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    /// Validates a custom catalog: ids must be unique and thresholds positive.
    pub fn new(badges: Vec<Badge>) -> Result<Self> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id.as_str()) {
                bail!("duplicate badge id {}", badge.id);
            }
            if badge.criteria_value == 0 {
                bail!("badge {} has a zero threshold", badge.id);
            }
        }
        Ok(Self { badges })
    }

    /// The badges shipped with the app.
    pub fn predefined() -> Self {
        Self {
            badges: vec![
                Badge::new(
                    "streak_3",
                    "Three-Day Streak",
                    "Completed pomodoros three days in a row",
                    "🔥",
                    CriteriaType::Streak,
                    3,
                ),
                Badge::new(
                    "streak_7",
                    "One-Week Streak",
                    "Completed pomodoros seven days in a row",
                    "⭐",
                    CriteriaType::Streak,
                    7,
                ),
                Badge::new(
                    "weekly_10",
                    "Ten This Week",
                    "Completed ten pomodoros this week",
                    "🎯",
                    CriteriaType::WeeklyCount,
                    10,
                ),
                Badge::new(
                    "weekly_20",
                    "Twenty This Week",
                    "Completed twenty pomodoros this week",
                    "💎",
                    CriteriaType::WeeklyCount,
                    20,
                ),
                Badge::new(
                    "total_50",
                    "Fifty Total",
                    "Completed fifty pomodoros in total",
                    "🏆",
                    CriteriaType::TotalCount,
                    50,
                ),
                Badge::new(
                    "total_100",
                    "One Hundred Total",
                    "Completed one hundred pomodoros in total",
                    "👑",
                    CriteriaType::TotalCount,
                    100,
                ),
            ],
        }
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::predefined()
    }
}
