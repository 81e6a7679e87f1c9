//! Back-office login, logout and the bearer-token guard.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::domain::aggregates::AdminSession;
use crate::error::{Result, StoreError};
use crate::services::auth;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(length(min = 4, max = 100, message = "must be between 4 and 100 characters"))]
    pub password: String,
}

pub async fn login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> Result<Json<AdminSession>> {
    r.validate()?;
    let session = auth::login(&s.db, r.username.trim(), &r.password, s.config.admin_session_ttl_hours).await?;
    Ok(Json(session))
}

pub async fn logout(State(s): State<AppState>, Extension(session): Extension<AdminSession>) -> Result<StatusCode> {
    auth::logout(&s.db, &session.token).await?;
    tracing::info!(username = %session.username, "admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolves the bearer token to a live session and hands it to the handler
/// as an `Extension<AdminSession>`.
pub async fn require_admin(State(s): State<AppState>, mut req: Request, next: Next) -> Result<Response> {
    let token = bearer_token(req.headers()).ok_or(StoreError::Unauthorized)?;
    let session = auth::authenticate(&s.db, &token).await?;
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
