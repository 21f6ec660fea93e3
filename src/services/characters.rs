// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Character directory façade.
//!
//! Handles the character workflow:
//! 1. Validate the request (no I/O on failure)
//! 2. Call the character API with the session's bearer token
//! 3. On API failure, apply the change to the mock store
//! 4. Settle per the fallback mode and publish the new directory state

use crate::client::ApiClient;
use crate::config::FallbackMode;
use crate::db::{new_id, MockDb};
use crate::error::{AppError, Result};
use crate::models::{
    Character, CharacterCreateRequest, CharacterSearchFilters, CharacterSearchResponse,
    CharacterSummary, CharacterUpdateRequest,
};
use crate::services::auth::first_error;
use crate::services::{search, settle};
use crate::storage::TokenStorage;
use crate::time_utils::{format_utc_rfc3339, Clock};
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

/// Fields checked in this order; the first failure is reported.
const VALIDATION_ORDER: [&str; 4] = ["name", "species", "gender", "personality"];

/// Observable directory state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryState {
    pub user_characters: Vec<CharacterSummary>,
    pub current_character: Option<Character>,
    pub last_error: Option<String>,
}

/// Character directory façade.
pub struct CharacterService {
    api: ApiClient,
    db: MockDb,
    tokens: TokenStorage,
    clock: Arc<dyn Clock>,
    fallback: FallbackMode,
    state: watch::Sender<DirectoryState>,
}

impl CharacterService {
    pub fn new(
        api: ApiClient,
        db: MockDb,
        tokens: TokenStorage,
        clock: Arc<dyn Clock>,
        fallback: FallbackMode,
    ) -> Self {
        let (state, _) = watch::channel(DirectoryState::default());
        Self {
            api,
            db,
            tokens,
            clock,
            fallback,
            state,
        }
    }

    /// Summaries of a user's characters.
    pub async fn list(&self, user_id: &str) -> Result<Vec<CharacterSummary>> {
        let token = self.tokens.access_token();
        let path = format!("/users/{}/characters/", user_id);

        let result = match self
            .api
            .get_json::<Vec<CharacterSummary>>(&path, &[], token.as_deref())
            .await
        {
            Ok(characters) => Ok(characters),
            Err(e) => {
                let characters = self
                    .db
                    .characters_for_user(user_id)
                    .iter()
                    .map(|c| self.db.summarize(c))
                    .collect();
                settle(self.fallback, &e, characters, "Failed to load user characters")
            }
        };

        self.track(result, |state, characters| {
            state.user_characters = characters.clone();
        })
    }

    /// A character by id.
    pub async fn get(&self, id: &str) -> Result<Option<Character>> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/", id);

        let result = match self
            .api
            .get_json::<Character>(&path, &[], token.as_deref())
            .await
        {
            Ok(character) => Ok(Some(character)),
            Err(e) => {
                let character = self.db.get_character(id);
                settle(self.fallback, &e, character, "Failed to load character")
            }
        };

        self.track(result, |state, character| {
            state.current_character = character.clone();
        })
    }

    /// Create a character owned by `user_id`.
    pub async fn create(
        &self,
        request: &CharacterCreateRequest,
        user_id: &str,
    ) -> Result<Character> {
        if let Err(errors) = request.validate() {
            return self.fail(first_error(&errors, &VALIDATION_ORDER));
        }

        let token = self.tokens.access_token();
        let result = match self
            .api
            .send_json::<_, Character>(Method::POST, "/characters/create/", request, token.as_deref())
            .await
        {
            Ok(character) => Ok(character),
            Err(e) => {
                let character = build_character(request, user_id, &self.now());
                self.db.insert_character(character.clone());
                tracing::info!(character_id = %character.id, user_id, "Created mock character");
                settle(self.fallback, &e, character, "Failed to create character")
            }
        };

        self.track(result, |state, character| {
            state.user_characters.push(self.db.summarize(character));
            state.current_character = Some(character.clone());
        })
    }

    /// Merge the present fields of `request` into the character.
    pub async fn update(&self, request: &CharacterUpdateRequest) -> Result<Character> {
        if request.id.trim().is_empty() {
            return self.fail(AppError::validation("id", "Character ID is required."));
        }
        if let Err(errors) = request.validate() {
            return self.fail(first_error(&errors, &VALIDATION_ORDER));
        }

        let token = self.tokens.access_token();
        let path = format!("/characters/{}/update/", request.id);
        let result = match self
            .api
            .send_json::<_, Character>(Method::PUT, &path, request, token.as_deref())
            .await
        {
            Ok(character) => Ok(character),
            Err(e) => match self.db.update_character(request, &self.now()) {
                Ok(character) => {
                    settle(self.fallback, &e, character, "Failed to update character")
                }
                Err(not_found) => Err(not_found),
            },
        };

        self.track(result, |state, character| {
            let summary = self.db.summarize(character);
            if let Some(slot) = state
                .user_characters
                .iter_mut()
                .find(|c| c.id == character.id)
            {
                *slot = summary;
            }
            if state
                .current_character
                .as_ref()
                .is_some_and(|c| c.id == character.id)
            {
                state.current_character = Some(character.clone());
            }
        })
    }

    /// Delete a character.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let token = self.tokens.access_token();
        let path = format!("/characters/{}/delete/", id);
        let result = match self.api.delete(&path, token.as_deref()).await {
            Ok(()) => Ok(()),
            Err(e) => match self.db.remove_character(id) {
                Ok(_) => settle(self.fallback, &e, (), "Failed to delete character"),
                Err(not_found) => Err(not_found),
            },
        };

        self.track(result, |state, _| {
            state.user_characters.retain(|c| c.id != id);
            if state.current_character.as_ref().is_some_and(|c| c.id == id) {
                state.current_character = None;
            }
        })
    }

    /// Search public characters.
    pub async fn search(&self, filters: &CharacterSearchFilters) -> Result<CharacterSearchResponse> {
        let token = self.tokens.access_token();
        let params = search::query_params(filters);
        let result = match self
            .api
            .get_json::<CharacterSearchResponse>("/characters/", &params, token.as_deref())
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                let response = search::search_characters(&self.db, filters);
                settle(
                    self.fallback,
                    &e,
                    response,
                    "An unexpected error occurred during search",
                )
            }
        };

        self.track(result, |_, _| {})
    }

    /// Current directory snapshot.
    pub fn state(&self) -> DirectoryState {
        self.state.borrow().clone()
    }

    /// Observe directory changes.
    pub fn subscribe(&self) -> watch::Receiver<DirectoryState> {
        self.state.subscribe()
    }

    fn now(&self) -> String {
        format_utc_rfc3339(self.clock.now())
    }

    fn fail<T>(&self, error: AppError) -> Result<T> {
        let message = error.to_string();
        self.state.send_modify(|s| s.last_error = Some(message));
        Err(error)
    }

    /// Publish the outcome: apply `on_ok` or record the error message.
    fn track<T>(&self, result: Result<T>, on_ok: impl FnOnce(&mut DirectoryState, &T)) -> Result<T> {
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

/// Record for a new character with defaults for absent fields.
pub fn build_character(request: &CharacterCreateRequest, user_id: &str, now: &str) -> Character {
    Character {
        id: new_id("char"),
        user_id: user_id.to_string(),
        name: request.name.clone(),
        age: request.age.clone(),
        gender: request.gender.clone(),
        species: request.species.clone(),
        height: request.height.clone(),
        body_type: request.body_type.clone(),
        personality: request.personality.clone(),
        background: request.background.clone(),
        appearance: request.appearance.clone(),
        public: request.public.unwrap_or(true),
        views: 0,
        created_at: now.to_string(),
        updated_at: now.to_string(),
        current_status: request.current_status.unwrap_or_default(),
        current_mood: request.current_mood,
        custom_status: request.custom_status.clone(),
        allow_random_rp: request.allow_random_rp.unwrap_or(true),
        private_details: request.private_details.clone(),
        content_preferences: request.content_preferences.clone().unwrap_or_default(),
    }
}
