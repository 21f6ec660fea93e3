//! Character image routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CharacterImage, ImageUpdateRequest, ImageUploadRequest, ReorderImagesRequest};
use crate::routes::characters::owned_character;
use crate::services::images::build_image;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/characters/{id}/images/", get(list_images))
        .route("/api/characters/{id}/images/add/", post(add_image))
        .route(
            "/api/characters/{id}/images/{image_id}/update/",
            put(update_image),
        )
        .route(
            "/api/characters/{id}/images/{image_id}/delete/",
            delete(delete_image),
        )
        .route("/api/characters/{id}/images/reorder/", post(reorder_images))
}

async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CharacterImage>>> {
    if state.db.get_character(&id).is_none() {
        return Err(AppError::NotFound("Character not found".to_string()));
    }
    Ok(Json(state.db.images_for(&id)))
}

async fn add_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(mut request): Json<ImageUploadRequest>,
) -> Result<(StatusCode, Json<CharacterImage>)> {
    owned_character(&state, &id, &user)?;
    request.character_id = id;

    let bytes = BASE64
        .decode(request.data.as_bytes())
        .map_err(|_| AppError::validation("data", "Image data must be base64 encoded."))?;

    let now = format_utc_rfc3339(state.clock.now());
    let image = build_image(&request, bytes.len() as u64, &now);
    let image = state.db.add_image(image, request.is_primary);
    tracing::info!(image_id = %image.id, character_id = %image.character_id, primary = image.is_primary, "Image added");

    Ok((StatusCode::CREATED, Json(image)))
}

async fn update_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, image_id)): Path<(String, String)>,
    Json(mut request): Json<ImageUpdateRequest>,
) -> Result<Json<CharacterImage>> {
    owned_character(&state, &id, &user)?;
    request.id = image_id;
    request.character_id = id;
    Ok(Json(state.db.update_image(&request)?))
}

async fn delete_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, image_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    owned_character(&state, &id, &user)?;
    if state.db.image_owner(&image_id).as_deref() != Some(id.as_str()) {
        return Err(AppError::NotFound("Image not found".to_string()));
    }
    state.db.remove_image(&image_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_images(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(request): Json<ReorderImagesRequest>,
) -> Result<Json<Vec<CharacterImage>>> {
    owned_character(&state, &id, &user)?;
    Ok(Json(state.db.reorder_images(&id, &request.image_ids)?))
}
