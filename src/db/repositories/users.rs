use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::{
    db::{
        helpers::{
            format_date, format_datetime, parse_datetime, parse_optional_date, to_u32,
        },
        models::User,
        Database,
    },
    error::FocusError,
};

fn row_to_user(row: &Row) -> Result<User> {
    let xp: i64 = row.get("xp")?;
    let level: i64 = row.get("level")?;
    let current_streak: i64 = row.get("current_streak")?;
    let longest_streak: i64 = row.get("longest_streak")?;
    let last_session_date: Option<String> = row.get("last_session_date")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        xp: to_u32(xp, "xp")?,
        level: to_u32(level, "level")?,
        current_streak: to_u32(current_streak, "current_streak")?,
        longest_streak: to_u32(longest_streak, "longest_streak")?,
        last_session_date: parse_optional_date(last_session_date, "last_session_date")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

pub fn load_user(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, xp, level, current_streak, longest_streak, last_session_date, created_at, updated_at
         FROM users
         WHERE id = ?1",
    )?;

    let mut rows = stmt.query(params![user_id])?;
    let user = match rows.next()? {
        Some(row) => Some(row_to_user(row)?),
        None => None,
    };
    Ok(user)
}

pub fn load_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, xp, level, current_streak, longest_streak, last_session_date, created_at, updated_at
         FROM users
         WHERE username = ?1",
    )?;

    let mut rows = stmt.query(params![username])?;
    let user = match rows.next()? {
        Some(row) => Some(row_to_user(row)?),
        None => None,
    };
    Ok(user)
}

pub fn create_user(conn: &Connection, user: &User) -> Result<User> {
    conn.execute(
        "INSERT INTO users (username, xp, level, current_streak, longest_streak, last_session_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.username,
            user.xp,
            user.level,
            user.current_streak,
            user.longest_streak,
            user.last_session_date.as_ref().map(format_date),
            format_datetime(&user.created_at),
            format_datetime(&user.updated_at),
        ],
    )
    .with_context(|| format!("failed to insert user {}", user.username))?;

    let mut created = user.clone();
    created.id = conn.last_insert_rowid();
    Ok(created)
}

pub fn save_user(conn: &Connection, user: &User) -> Result<()> {
    let rows_affected = conn
        .execute(
            "UPDATE users
             SET xp = ?1,
                 level = ?2,
                 current_streak = ?3,
                 longest_streak = ?4,
                 last_session_date = ?5,
                 updated_at = ?6
             WHERE id = ?7",
            params![
                user.xp,
                user.level,
                user.current_streak,
                user.longest_streak,
                user.last_session_date.as_ref().map(format_date),
                format_datetime(&user.updated_at),
                user.id,
            ],
        )
        .with_context(|| format!("failed to update user {}", user.id))?;

    if rows_affected == 0 {
        return Err(FocusError::not_found(format!("user {}", user.id)).into());
    }
    Ok(())
}

impl Database {
    pub async fn load_user(&self, user_id: i64) -> Result<Option<User>> {
        self.execute(move |conn| load_user(conn, user_id)).await
    }

    pub async fn load_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.execute(move |conn| load_user_by_username(conn, &username))
            .await
    }

    pub async fn create_user(&self, user: User) -> Result<User> {
        self.execute(move |conn| create_user(conn, &user)).await
    }

    pub async fn save_user(&self, user: &User) -> Result<()> {
        let record = user.clone();
        self.execute(move |conn| save_user(conn, &record)).await
    }
}
