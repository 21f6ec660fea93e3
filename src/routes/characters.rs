// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Character directory routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Character, CharacterCreateRequest, CharacterSearchResponse, CharacterSummary,
    CharacterUpdateRequest,
};
use crate::services::auth::first_error;
use crate::services::characters::build_character;
use crate::services::search::{search_characters, SearchQuery};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

const VALIDATION_ORDER: [&str; 4] = ["name", "species", "gender", "personality"];

/// Character routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/characters/", get(search))
        .route("/api/characters/create/", post(create_character))
        .route("/api/characters/{id}/", get(get_character))
        .route("/api/characters/{id}/update/", put(update_character))
        .route("/api/characters/{id}/delete/", delete(delete_character))
        .route("/api/users/{user_id}/characters/", get(user_characters))
}

/// Load a character the caller may modify.
pub(crate) fn owned_character(state: &AppState, id: &str, user: &AuthUser) -> Result<Character> {
    let character = state
        .db
        .get_character(id)
        .ok_or_else(|| AppError::NotFound("Character not found".to_string()))?;
    if character.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "You do not own this character".to_string(),
        ));
    }
    Ok(character)
}

// ─── Directory ───────────────────────────────────────────────

async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<CharacterSearchResponse> {
    Json(search_characters(&state.db, &query.into_filters()))
}

/// A user's characters. Private characters are listed only for their owner.
async fn user_characters(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Json<Vec<CharacterSummary>> {
    let own = user.user_id == user_id;
    let characters = state
        .db
        .characters_for_user(&user_id)
        .iter()
        .filter(|c| own || c.public)
        .map(|c| state.db.summarize(c))
        .collect();
    Json(characters)
}

/// Fetch a character and count the view.
async fn get_character(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Character>> {
    let not_found = || AppError::NotFound("Character not found".to_string());
    let character = state.db.get_character(&id).ok_or_else(not_found)?;
    if !character.public && character.user_id != user.user_id {
        return Err(not_found());
    }

    let character = state.db.record_view(&id).ok_or_else(not_found)?;
    Ok(Json(character))
}

// ─── Mutations ───────────────────────────────────────────────

async fn create_character(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CharacterCreateRequest>,
) -> Result<(StatusCode, Json<Character>)> {
    request
        .validate()
        .map_err(|errors| first_error(&errors, &VALIDATION_ORDER))?;

    let now = format_utc_rfc3339(state.clock.now());
    let character = build_character(&request, &user.user_id, &now);
    state.db.insert_character(character.clone());
    tracing::info!(character_id = %character.id, user_id = %user.user_id, "Character created");

    Ok((StatusCode::CREATED, Json(character)))
}

async fn update_character(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(mut request): Json<CharacterUpdateRequest>,
) -> Result<Json<Character>> {
    request.id = id;
    request
        .validate()
        .map_err(|errors| first_error(&errors, &VALIDATION_ORDER))?;
    owned_character(&state, &request.id, &user)?;

    let now = format_utc_rfc3339(state.clock.now());
    let character = state.db.update_character(&request, &now)?;
    Ok(Json(character))
}

async fn delete_character(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    owned_character(&state, &id, &user)?;
    state.db.remove_character(&id)?;
    tracing::info!(character_id = %id, user_id = %user.user_id, "Character deleted");
    Ok(StatusCode::NO_CONTENT)
}
