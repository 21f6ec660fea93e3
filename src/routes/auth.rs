// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token endpoints of the HTTP backend.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{AuthResponse, LoginRequest, User};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Public token routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login/", post(login))
        .route("/api/auth/refresh/", post(refresh))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn issue(state: &AppState, user: User) -> Result<AuthResponse> {
    let now = state.clock.unix_now();
    let (access_token, refresh_token) = state.signer.issue_pair(&user, now)?;
    Ok(AuthResponse {
        user,
        access_token,
        refresh_token,
        expires_at: now + state.signer.access_ttl_secs(),
    })
}

/// Exchange credentials for a token pair.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .db
        .find_user_by_username(&request.username)
        .filter(|u| state.db.check_password(&u.id, &request.password))
        .ok_or_else(AppError::invalid_credentials)?;

    let now = format_utc_rfc3339(state.clock.now());
    let user = state.db.touch_last_login(&user.id, &now).unwrap_or(user);
    tracing::info!(user_id = %user.id, "Issued tokens");
    Ok(Json(issue(&state, user)?))
}

/// Exchange an unexpired refresh token for a new pair.
async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>> {
    let claims = state.signer.decode(&request.refresh_token)?;
    if claims.exp <= state.clock.unix_now() {
        return Err(AppError::invalid_token());
    }
    let user = state
        .db
        .get_user(&claims.user_id)
        .ok_or_else(AppError::invalid_token)?;
    Ok(Json(issue(&state, user)?))
}

/// The user owning the bearer token.
pub(crate) async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    state
        .db
        .get_user(&user.user_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
