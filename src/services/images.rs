// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image set façade.
//!
//! Each character owns an ordered gallery with at most one primary image.
//! The mock store enforces the primary invariant; this façade only routes
//! calls and publishes the gallery currently being viewed.

use crate::client::ApiClient;
use crate::config::FallbackMode;
use crate::db::{new_id, MockDb};
use crate::error::{AppError, Result};
use crate::models::{CharacterImage, ImageUpdateRequest, ImageUploadRequest, ReorderImagesRequest};
use crate::services::settle;
use crate::storage::TokenStorage;
use crate::time_utils::{format_utc_rfc3339, Clock};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable gallery state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSetState {
    pub character_id: Option<String>,
    pub images: Vec<CharacterImage>,
    pub last_error: Option<String>,
}

pub struct ImageService {
    api: ApiClient,
    db: MockDb,
    tokens: TokenStorage,
    clock: Arc<dyn Clock>,
    fallback: FallbackMode,
    state: watch::Sender<ImageSetState>,
}

impl ImageService {
    pub fn new(
        api: ApiClient,
        db: MockDb,
        tokens: TokenStorage,
        clock: Arc<dyn Clock>,
        fallback: FallbackMode,
    ) -> Self {
        let (state, _) = watch::channel(ImageSetState::default());
        Self {
            api,
            db,
            tokens,
            clock,
            fallback,
            state,
        }
    }

    /// Images of a character, primary first, then by order.
    pub async fn list(&self, character_id: &str) -> Result<Vec<CharacterImage>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/images/", character_id);

        let result = match self
            .api
            .get_json::<Vec<CharacterImage>>(&path, &[], token.as_deref())
            .await
        {
            Ok(images) => Ok(images),
            Err(e) => {
                let images = self.db.images_for(character_id);
                settle(self.fallback, &e, images, "Failed to load character images")
            }
        };

        self.track(result, |state, images| {
            state.character_id = Some(character_id.to_string());
            state.images = images.clone();
        })
    }

    /// One image of a character's gallery.
    pub async fn get(&self, id: &str, character_id: &str) -> Result<Option<CharacterImage>> {
        let images = self.list(character_id).await?;
        Ok(images.into_iter().find(|img| img.id == id))
    }

    /// Upload an image. The first image of a gallery becomes primary unless
    /// the request says otherwise.
    pub async fn upload(&self, request: &ImageUploadRequest) -> Result<CharacterImage> {
        let bytes = match BASE64.decode(request.data.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => {
                return self.fail(AppError::validation("data", "Image data must be base64 encoded."))
            }
        };

        let token = self.tokens.access_token();
        let path = format!("/characters/{}/images/add/", request.character_id);
        let result = match self
            .api
            .send_json::<_, CharacterImage>(Method::POST, &path, request, token.as_deref())
            .await
        {
            Ok(image) => Ok(image),
            Err(e) => {
                let image = build_image(request, bytes.len() as u64, &self.now());
                let image = self.db.add_image(image, request.is_primary);
                tracing::info!(image_id = %image.id, character_id = %image.character_id, "Stored mock image");
                settle(self.fallback, &e, image, "Failed to upload image")
            }
        };

        self.track(result, |state, image| {
            if state.character_id.as_deref() == Some(image.character_id.as_str()) {
                if image.is_primary {
                    state.images.iter_mut().for_each(|img| img.is_primary = false);
                }
                state.images.push(image.clone());
            }
        })
    }

    /// Update title, description, order or primary flag.
    pub async fn update(&self, request: &ImageUpdateRequest) -> Result<CharacterImage> {
        let token = self.tokens.access_token();
        let path = format!(
            "/characters/{}/images/{}/update/",
            request.character_id, request.id
        );
        let result = match self
            .api
            .send_json::<_, CharacterImage>(Method::PUT, &path, request, token.as_deref())
            .await
        {
            Ok(image) => Ok(image),
            Err(e) => match self.db.update_image(request) {
                Ok(image) => settle(self.fallback, &e, image, "Failed to update image"),
                Err(not_found) => Err(not_found),
            },
        };

        self.track(result, |state, image| {
            if state.character_id.as_deref() != Some(image.character_id.as_str()) {
                return;
            }
            if image.is_primary {
                state.images.iter_mut().for_each(|img| img.is_primary = false);
            }
            if let Some(slot) = state.images.iter_mut().find(|img| img.id == image.id) {
                *slot = image.clone();
            }
        })
    }

    /// Delete an image. Succeeds whenever the image exists, even if the API
    /// call failed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let Some(character_id) = self.owner_of(id) else {
            return self.fail(AppError::NotFound("Image not found".to_string()));
        };

        let token = self.tokens.access_token();
        let path = format!("/characters/{}/images/{}/delete/", character_id, id);
        let result = match self.api.delete(&path, token.as_deref()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, image_id = id, "Remote image delete failed, removing mock image");
                self.db.remove_image(id).map(|_| ())
            }
        };

        self.track(result, |state, _| {
            if state.character_id.as_deref() == Some(character_id.as_str()) {
                let was_primary = state.images.iter().any(|img| img.id == id && img.is_primary);
                state.images.retain(|img| img.id != id);
                if was_primary {
                    if let Some(next) = state.images.iter_mut().min_by_key(|img| img.order) {
                        next.is_primary = true;
                    }
                }
            }
        })
    }

    /// Assign order = position in `image_ids`.
    ///
    /// `image_ids` must name exactly the character's images; otherwise the
    /// stored order is left unchanged and `InvalidImageSet` is returned.
    pub async fn reorder(&self, character_id: &str, image_ids: &[String]) -> Result<Vec<CharacterImage>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/images/reorder/", character_id);
        let request = ReorderImagesRequest {
            character_id: character_id.to_string(),
            image_ids: image_ids.to_vec(),
        };

        let result = match self
            .api
            .send_json::<_, Vec<CharacterImage>>(Method::POST, &path, &request, token.as_deref())
            .await
        {
            Ok(images) => Ok(images),
            Err(e) => match self.db.reorder_images(character_id, image_ids) {
                Ok(images) => settle(self.fallback, &e, images, "Failed to reorder images"),
                Err(invalid) => Err(invalid),
            },
        };

        self.track(result, |state, images| {
            state.character_id = Some(character_id.to_string());
            state.images = images.clone();
        })
    }

    /// Current gallery snapshot.
    pub fn state(&self) -> ImageSetState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ImageSetState> {
        self.state.subscribe()
    }

    fn owner_of(&self, image_id: &str) -> Option<String> {
        let cached = self
            .state
            .borrow()
            .images
            .iter()
            .find(|img| img.id == image_id)
            .map(|img| img.character_id.clone());
        cached.or_else(|| self.db.image_owner(image_id))
    }

    fn now(&self) -> String {
        format_utc_rfc3339(self.clock.now())
    }

    fn fail<T>(&self, error: AppError) -> Result<T> {
        let message = error.to_string();
        self.state.send_modify(|s| s.last_error = Some(message));
        Err(error)
    }

    fn track<T>(&self, result: Result<T>, on_ok: impl FnOnce(&mut ImageSetState, &T)) -> Result<T> {
        match &result {
            Ok(value) => self.state.send_modify(|s| {
                s.last_error = None;
                on_ok(s, value);
            }),
            Err(e) => {
                let message = e.to_string();
                self.state.send_modify(|s| s.last_error = Some(message));
            }
        }
        result
    }
}

/// Image record for an upload. The URL embeds the uploaded bytes.
pub fn build_image(request: &ImageUploadRequest, file_size: u64, now: &str) -> CharacterImage {
    let url = format!("data:{};base64,{}", request.file_type, request.data);
    CharacterImage {
        id: new_id("img"),
        character_id: request.character_id.clone(),
        thumbnail_url: Some(url.clone()),
        url,
        title: request.title.clone().filter(|t| !t.is_empty()),
        description: request.description.clone().filter(|d| !d.is_empty()),
        is_primary: false,
        order: 0,
        uploaded_at: now.to_string(),
        file_type: Some(request.file_type.clone()),
        file_size: Some(file_size),
    }
}
