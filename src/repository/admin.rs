//! Admin users and their bearer sessions

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::aggregates::{AdminSession, AdminUser};

pub async fn find_active_by_username<'e, E: SqliteExecutor<'e>>(ex: E, username: &str) -> sqlx::Result<Option<AdminUser>> {
    sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = ? AND is_active = 1").bind(username).fetch_optional(ex).await
}

pub async fn count<'e, E: SqliteExecutor<'e>>(ex: E) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM admin_users").fetch_one(ex).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(ex: E, username: &str, password_hash: &str, now: DateTime<Utc>) -> sqlx::Result<AdminUser> {
    sqlx::query_as::<_, AdminUser>("INSERT INTO admin_users (username, password_hash, is_active, created_at) VALUES (?, ?, 1, ?) RETURNING *")
        .bind(username).bind(password_hash).bind(now).fetch_one(ex).await
}

pub async fn touch_last_login<'e, E: SqliteExecutor<'e>>(ex: E, id: i64, now: DateTime<Utc>) -> sqlx::Result<()> {
    sqlx::query("UPDATE admin_users SET last_login = ? WHERE id = ?").bind(now).bind(id).execute(ex).await?;
    Ok(())
}

pub async fn insert_session<'e, E: SqliteExecutor<'e>>(ex: E, session: &AdminSession) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO admin_sessions (token, admin_user_id, username, created_at, expires_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&session.token).bind(session.admin_user_id).bind(&session.username).bind(session.created_at).bind(session.expires_at)
        .execute(ex).await?;
    Ok(())
}

pub async fn find_session<'e, E: SqliteExecutor<'e>>(ex: E, token: &str) -> sqlx::Result<Option<AdminSession>> {
    sqlx::query_as::<_, AdminSession>("SELECT * FROM admin_sessions WHERE token = ?").bind(token).fetch_optional(ex).await
}

pub async fn delete_session<'e, E: SqliteExecutor<'e>>(ex: E, token: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE token = ?").bind(token).execute(ex).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn purge_expired_sessions<'e, E: SqliteExecutor<'e>>(ex: E, now: DateTime<Utc>) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?").bind(now).execute(ex).await?;
    Ok(result.rows_affected())
}
