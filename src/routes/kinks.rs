//! Kink preference routes.

use crate::db::new_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CharacterKink, CustomKink, KinkRating, KinkSelection};
use crate::routes::characters::owned_character;
use crate::services::auth::first_error;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/characters/{id}/kinks/", get(list_kinks).put(replace_kinks))
        .route("/api/characters/{id}/kinks/{kink_id}/", put(set_rating))
        .route(
            "/api/characters/{id}/kinks/{kink_id}/delete/",
            delete(remove_rating),
        )
        .route(
            "/api/characters/{id}/kinks/custom/",
            get(list_custom).post(add_custom),
        )
        .route(
            "/api/characters/{id}/kinks/custom/{kink_id}/update/",
            put(update_custom),
        )
        .route(
            "/api/characters/{id}/kinks/custom/{kink_id}/delete/",
            delete(delete_custom),
        )
}

#[derive(Deserialize)]
pub struct RatingBody {
    pub rating: KinkRating,
}

fn require_character(state: &AppState, id: &str) -> Result<()> {
    state
        .db
        .get_character(id)
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Character not found".to_string()))
}

// ─── Catalog Ratings ─────────────────────────────────────────

async fn list_kinks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CharacterKink>>> {
    require_character(&state, &id)?;
    Ok(Json(state.db.kinks_for(&id)))
}

async fn replace_kinks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(selections): Json<Vec<KinkSelection>>,
) -> Result<Json<Vec<CharacterKink>>> {
    owned_character(&state, &id, &user)?;
    let ratings: Vec<(String, KinkRating)> = selections
        .into_iter()
        .map(|s| (s.kink_id, s.rating))
        .collect();
    Ok(Json(state.db.replace_kinks(&id, &ratings)))
}

async fn set_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, kink_id)): Path<(String, String)>,
    Json(body): Json<RatingBody>,
) -> Result<Json<CharacterKink>> {
    owned_character(&state, &id, &user)?;
    Ok(Json(state.db.upsert_kink(&id, &kink_id, body.rating)))
}

async fn remove_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, kink_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    owned_character(&state, &id, &user)?;
    state.db.remove_kink(&id, &kink_id);
    Ok(StatusCode::NO_CONTENT)
}

// ─── Custom Kinks ────────────────────────────────────────────

async fn list_custom(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CustomKink>>> {
    require_character(&state, &id)?;
    Ok(Json(state.db.custom_kinks_for(&id)))
}

async fn add_custom(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(data): Json<CustomKink>,
) -> Result<(StatusCode, Json<CustomKink>)> {
    data.validate().map_err(|errors| first_error(&errors, &["name"]))?;
    owned_character(&state, &id, &user)?;

    let kink = state.db.insert_custom_kink(CustomKink {
        id: new_id("custom_kink"),
        character_id: id,
        ..data
    });
    Ok((StatusCode::CREATED, Json(kink)))
}

async fn update_custom(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, kink_id)): Path<(String, String)>,
    Json(data): Json<CustomKink>,
) -> Result<Json<CustomKink>> {
    data.validate().map_err(|errors| first_error(&errors, &["name"]))?;
    owned_character(&state, &id, &user)?;
    Ok(Json(state.db.update_custom_kink(&id, &kink_id, &data)?))
}

async fn delete_custom(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, kink_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    owned_character(&state, &id, &user)?;
    state.db.remove_custom_kink(&id, &kink_id)?;
    Ok(StatusCode::NO_CONTENT)
}
