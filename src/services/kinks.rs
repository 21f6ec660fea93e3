//! Kink preference façade: catalog ratings and custom kinks per character.

use crate::client::ApiClient;
use crate::config::FallbackMode;
use crate::db::{new_id, MockDb};
use crate::error::{AppError, Result};
use crate::models::{CharacterKink, CustomKink, KinkRating, KinkSelection};
use crate::services::auth::first_error;
use crate::services::settle;
use crate::storage::TokenStorage;
use reqwest::Method;
use serde::Serialize;
use validator::Validate;

#[derive(Serialize)]
struct RatingBody {
    rating: KinkRating,
}

pub struct KinkService {
    api: ApiClient,
    db: MockDb,
    tokens: TokenStorage,
    fallback: FallbackMode,
}

impl KinkService {
    pub fn new(api: ApiClient, db: MockDb, tokens: TokenStorage, fallback: FallbackMode) -> Self {
        Self {
            api,
            db,
            tokens,
            fallback,
        }
    }

    pub async fn list(&self, character_id: &str) -> Result<Vec<CharacterKink>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/", character_id);
        match self.api.get_json(&path, &[], token.as_deref()).await {
            Ok(kinks) => Ok(kinks),
            Err(e) => settle(
                self.fallback,
                &e,
                self.db.kinks_for(character_id),
                "Failed to load character kinks",
            ),
        }
    }

    /// Rate one catalog kink. A character has at most one rating per kink.
    pub async fn set_rating(
        &self,
        character_id: &str,
        kink_id: &str,
        rating: KinkRating,
    ) -> Result<CharacterKink> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/{}/", character_id, kink_id);
        match self
            .api
            .send_json(Method::PUT, &path, &RatingBody { rating }, token.as_deref())
            .await
        {
            Ok(kink) => Ok(kink),
            Err(e) => {
                self.require_character(character_id)?;
                let kink = self.db.upsert_kink(character_id, kink_id, rating);
                settle(self.fallback, &e, kink, "Failed to update character kinks")
            }
        }
    }

    pub async fn remove(&self, character_id: &str, kink_id: &str) -> Result<()> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/{}/delete/", character_id, kink_id);
        match self.api.delete(&path, token.as_deref()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.db.remove_kink(character_id, kink_id);
                settle(self.fallback, &e, (), "Failed to update character kinks")
            }
        }
    }

    /// Replace every rating of a character. Later duplicates of a kink win.
    pub async fn replace_all(
        &self,
        character_id: &str,
        selections: &[KinkSelection],
    ) -> Result<Vec<CharacterKink>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/", character_id);
        match self
            .api
            .send_json(Method::PUT, &path, selections, token.as_deref())
            .await
        {
            Ok(kinks) => Ok(kinks),
            Err(e) => {
                self.require_character(character_id)?;
                let ratings: Vec<(String, KinkRating)> = selections
                    .iter()
                    .map(|s| (s.kink_id.clone(), s.rating))
                    .collect();
                let kinks = self.db.replace_kinks(character_id, &ratings);
                settle(self.fallback, &e, kinks, "Failed to update character kinks")
            }
        }
    }

    pub async fn list_custom(&self, character_id: &str) -> Result<Vec<CustomKink>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/custom/", character_id);
        match self.api.get_json(&path, &[], token.as_deref()).await {
            Ok(kinks) => Ok(kinks),
            Err(e) => settle(
                self.fallback,
                &e,
                self.db.custom_kinks_for(character_id),
                "Failed to load custom kinks",
            ),
        }
    }

    pub async fn add_custom(&self, character_id: &str, data: &CustomKink) -> Result<CustomKink> {
        if let Err(errors) = data.validate() {
            return Err(first_error(&errors, &["name"]));
        }

        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/custom/", character_id);
        match self
            .api
            .send_json(Method::POST, &path, data, token.as_deref())
            .await
        {
            Ok(kink) => Ok(kink),
            Err(e) => {
                self.require_character(character_id)?;
                let kink = self.db.insert_custom_kink(CustomKink {
                    id: new_id("custom_kink"),
                    character_id: character_id.to_string(),
                    ..data.clone()
                });
                tracing::info!(kink_id = %kink.id, character_id, "Stored mock custom kink");
                settle(self.fallback, &e, kink, "Failed to add custom kink")
            }
        }
    }

    pub async fn update_custom(
        &self,
        character_id: &str,
        kink_id: &str,
        data: &CustomKink,
    ) -> Result<CustomKink> {
        if let Err(errors) = data.validate() {
            return Err(first_error(&errors, &["name"]));
        }

        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/custom/{}/update/", character_id, kink_id);
        match self
            .api
            .send_json(Method::PUT, &path, data, token.as_deref())
            .await
        {
            Ok(kink) => Ok(kink),
            Err(e) => {
                let kink = self.db.update_custom_kink(character_id, kink_id, data)?;
                settle(self.fallback, &e, kink, "Failed to update custom kink")
            }
        }
    }

    pub async fn delete_custom(&self, character_id: &str, kink_id: &str) -> Result<()> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/kinks/custom/{}/delete/", character_id, kink_id);
        match self.api.delete(&path, token.as_deref()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.db.remove_custom_kink(character_id, kink_id)?;
                settle(self.fallback, &e, (), "Failed to delete custom kink")
            }
        }
    }

    fn require_character(&self, character_id: &str) -> Result<()> {
        self.db
            .get_character(character_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Character not found".to_string()))
    }
}
