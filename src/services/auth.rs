//! Back-office login with server-side bearer sessions.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::aggregates::admin_user::{hash_password, verify_against_dummy};
use crate::domain::aggregates::AdminSession;
use crate::error::{Result, StoreError};
use crate::repository::admin as admin_repo;

pub async fn login(pool: &SqlitePool, username: &str, password: &str, ttl_hours: i64) -> Result<AdminSession> {
    let user = admin_repo::find_active_by_username(pool, username).await?;
    let candidate = password.to_owned();
    // unknown users still pay for one argon2 verification
    let verified = tokio::task::spawn_blocking(move || {
        let ok = match &user {
            Some(user) => user.check_password(&candidate),
            None => verify_against_dummy(&candidate),
        };
        (user, ok)
    })
    .await
    .map_err(|e| StoreError::Internal(e.to_string()))?;
    let user = match verified {
        (Some(user), true) => user,
        (Some(_), false) => {
            tracing::warn!(username, "login attempt with wrong password");
            return Err(StoreError::InvalidCredentials);
        }
        (None, _) => {
            tracing::warn!(username, "login attempt for unknown or inactive user");
            return Err(StoreError::InvalidCredentials);
        }
    };

    let now = Utc::now();
    admin_repo::touch_last_login(pool, user.id, now).await?;
    admin_repo::purge_expired_sessions(pool, now).await?;
    let session = AdminSession {
        token: Uuid::new_v4().simple().to_string(),
        admin_user_id: user.id,
        username: user.username,
        created_at: now,
        expires_at: now + Duration::hours(ttl_hours),
    };
    admin_repo::insert_session(pool, &session).await?;
    tracing::info!(username = %session.username, "admin logged in");
    Ok(session)
}

pub async fn logout(pool: &SqlitePool, token: &str) -> Result<()> {
    admin_repo::delete_session(pool, token).await?;
    Ok(())
}

pub async fn authenticate(pool: &SqlitePool, token: &str) -> Result<AdminSession> {
    let session = admin_repo::find_session(pool, token).await?.ok_or(StoreError::Unauthorized)?;
    if session.is_expired(Utc::now()) {
        admin_repo::delete_session(pool, token).await?;
        return Err(StoreError::Unauthorized);
    }
    Ok(session)
}

/// Creates the first admin account when none exists and a password is
/// configured. Returns whether an account was created.
pub async fn ensure_admin(pool: &SqlitePool, username: &str, password: Option<&str>) -> Result<bool> {
    if admin_repo::count(pool).await? > 0 { return Ok(false); }
    let Some(password) = password else {
        tracing::warn!("no admin account exists and ADMIN_PASSWORD is not set; back-office login is disabled");
        return Ok(false);
    };
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))??;
    admin_repo::insert(pool, username, &hash, Utc::now()).await?;
    tracing::info!(username, "bootstrap admin account created");
    Ok(true)
}
