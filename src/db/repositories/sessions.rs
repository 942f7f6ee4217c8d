use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::{
    db::{
        helpers::{format_datetime, parse_datetime, parse_optional_datetime, parse_status, to_u32},
        models::PomodoroSession,
        Database,
    },
    error::FocusError,
};

fn row_to_session(row: &Row) -> Result<PomodoroSession> {
    let duration_minutes: i64 = row.get("duration_minutes")?;
    let status: String = row.get("status")?;
    let started_at: String = row.get("started_at")?;
    let completed_at: Option<String> = row.get("completed_at")?;
    let xp_earned: i64 = row.get("xp_earned")?;

    Ok(PomodoroSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        duration_minutes: to_u32(duration_minutes, "duration_minutes")?,
        status: parse_status(&status)?,
        started_at: parse_datetime(&started_at, "started_at")?,
        completed_at: parse_optional_datetime(completed_at, "completed_at")?,
        xp_earned: to_u32(xp_earned, "xp_earned")?,
    })
}

fn collect_sessions(mut rows: rusqlite::Rows<'_>) -> Result<Vec<PomodoroSession>> {
    let mut sessions = Vec::new();
    while let Some(row) = rows.next()? {
        sessions.push(row_to_session(row)?);
    }
    Ok(sessions)
}

pub fn create_session(conn: &Connection, session: &PomodoroSession) -> Result<PomodoroSession> {
    conn.execute(
        "INSERT INTO sessions (id, user_id, duration_minutes, status, started_at, completed_at, xp_earned)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            session.id,
            session.user_id,
            session.duration_minutes,
            session.status.as_str(),
            format_datetime(&session.started_at),
            session.completed_at.as_ref().map(format_datetime),
            session.xp_earned,
        ],
    )
    .with_context(|| format!("failed to insert session {}", session.id))?;
    Ok(session.clone())
}

/// Persists the completion fields; the rest of the row is immutable.
pub fn save_session(conn: &Connection, session: &PomodoroSession) -> Result<()> {
    let rows_affected = conn
        .execute(
            "UPDATE sessions
             SET status = ?1,
                 completed_at = ?2,
                 xp_earned = ?3
             WHERE id = ?4",
            params![
                session.status.as_str(),
                session.completed_at.as_ref().map(format_datetime),
                session.xp_earned,
                session.id,
            ],
        )
        .with_context(|| format!("failed to update session {}", session.id))?;

    if rows_affected == 0 {
        return Err(FocusError::not_found(format!("session {}", session.id)).into());
    }
    Ok(())
}

pub fn load_session(conn: &Connection, session_id: &str) -> Result<Option<PomodoroSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, duration_minutes, status, started_at, completed_at, xp_earned
         FROM sessions
         WHERE id = ?1",
    )?;

    let mut rows = stmt.query(params![session_id])?;
    let session = match rows.next()? {
        Some(row) => Some(row_to_session(row)?),
        None => None,
    };
    Ok(session)
}

/// Newest first. `None` returns the full history.
pub fn list_sessions_by_user(
    conn: &Connection,
    user_id: i64,
    limit: Option<usize>,
) -> Result<Vec<PomodoroSession>> {
    // SQLite treats a negative LIMIT as "no limit"; so is anything past i64.
    let limit = limit
        .and_then(|value| i64::try_from(value).ok())
        .unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT id, user_id, duration_minutes, status, started_at, completed_at, xp_earned
         FROM sessions
         WHERE user_id = ?1
         ORDER BY started_at DESC, rowid DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query(params![user_id, limit])?;
    collect_sessions(rows)
}

pub fn list_completed_by_user(conn: &Connection, user_id: i64) -> Result<Vec<PomodoroSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, duration_minutes, status, started_at, completed_at, xp_earned
         FROM sessions
         WHERE user_id = ?1 AND status = 'Completed'
         ORDER BY completed_at DESC, rowid DESC",
    )?;

    let rows = stmt.query(params![user_id])?;
    collect_sessions(rows)
}

/// Sessions of any status whose `started_at` is at or after `since`.
pub fn list_sessions_since(
    conn: &Connection,
    user_id: i64,
    since: DateTime<Utc>,
) -> Result<Vec<PomodoroSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, duration_minutes, status, started_at, completed_at, xp_earned
         FROM sessions
         WHERE user_id = ?1 AND started_at >= ?2
         ORDER BY started_at DESC, rowid DESC",
    )?;

    let rows = stmt.query(params![user_id, format_datetime(&since)])?;
    collect_sessions(rows)
}

impl Database {
    pub async fn create_session(&self, session: &PomodoroSession) -> Result<PomodoroSession> {
        let record = session.clone();
        self.execute(move |conn| create_session(conn, &record)).await
    }

    pub async fn save_session(&self, session: &PomodoroSession) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| save_session(conn, &record)).await
    }

    pub async fn load_session(&self, session_id: &str) -> Result<Option<PomodoroSession>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| load_session(conn, &session_id))
            .await
    }

    pub async fn list_sessions_by_user(
        &self,
        user_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<PomodoroSession>> {
        self.execute(move |conn| list_sessions_by_user(conn, user_id, limit))
            .await
    }

    pub async fn list_completed_by_user(&self, user_id: i64) -> Result<Vec<PomodoroSession>> {
        self.execute(move |conn| list_completed_by_user(conn, user_id))
            .await
    }

    pub async fn list_sessions_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<PomodoroSession>> {
        self.execute(move |conn| list_sessions_since(conn, user_id, since))
            .await
    }
}
