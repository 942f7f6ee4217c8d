use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::{
    helpers::{format_datetime, parse_datetime},
    models::UserBadge,
    Database,
};

fn row_to_user_badge(row: &Row) -> Result<UserBadge> {
    let earned_at: String = row.get("earned_at")?;

    Ok(UserBadge {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        badge_id: row.get("badge_id")?,
        earned_at: parse_datetime(&earned_at, "earned_at")?,
    })
}

pub fn has_badge(conn: &Connection, user_id: i64, badge_id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM user_badges WHERE user_id = ?1 AND badge_id = ?2",
        params![user_id, badge_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// First writer wins: an existing award is returned unchanged, never
/// duplicated or re-dated.
pub fn award_badge(
    conn: &Connection,
    user_id: i64,
    badge_id: &str,
    earned_at: DateTime<Utc>,
) -> Result<UserBadge> {
    conn.execute(
        "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at)
         VALUES (?1, ?2, ?3)",
        params![user_id, badge_id, format_datetime(&earned_at)],
    )
    .with_context(|| format!("failed to award badge {badge_id} to user {user_id}"))?;

    let mut stmt = conn.prepare(
        "SELECT id, user_id, badge_id, earned_at
         FROM user_badges
         WHERE user_id = ?1 AND badge_id = ?2",
    )?;
    let mut rows = stmt.query(params![user_id, badge_id])?;
    match rows.next()? {
        Some(row) => row_to_user_badge(row),
        None => Err(anyhow!("badge {badge_id} missing after award")),
    }
}

pub fn list_user_badges(conn: &Connection, user_id: i64) -> Result<Vec<UserBadge>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, badge_id, earned_at
         FROM user_badges
         WHERE user_id = ?1
         ORDER BY earned_at DESC, id DESC",
    )?;

    let mut rows = stmt.query(params![user_id])?;
    let mut badges = Vec::new();
    while let Some(row) = rows.next()? {
        badges.push(row_to_user_badge(row)?);
    }
    Ok(badges)
}

pub fn earned_badge_ids(conn: &Connection, user_id: i64) -> Result<HashSet<String>> {
    Ok(list_user_badges(conn, user_id)?
        .into_iter()
        .map(|badge| badge.badge_id)
        .collect())
}

impl Database {
    pub async fn has_badge(&self, user_id: i64, badge_id: &str) -> Result<bool> {
        let badge_id = badge_id.to_string();
        self.execute(move |conn| has_badge(conn, user_id, &badge_id))
            .await
    }

    pub async fn award_badge(&self, user_id: i64, badge_id: &str) -> Result<UserBadge> {
        let badge_id = badge_id.to_string();
        self.execute(move |conn| award_badge(conn, user_id, &badge_id, Utc::now()))
            .await
    }

    pub async fn list_user_badges(&self, user_id: i64) -> Result<Vec<UserBadge>> {
        self.execute(move |conn| list_user_badges(conn, user_id))
            .await
    }
}
