// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Roleplay Hub: character directory, image galleries and session handling
//! for a character-driven roleplay chat platform.
//!
//! The crate has two halves:
//! - [`Services`]: the client-side façades (auth, characters, images, kinks,
//!   chat) that call the character API and fall back to the mock store.
//! - [`routes::create_router`]: an HTTP backend serving the same API from
//!   the mock store, plus the chat socket stub.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use client::ApiClient;
use config::Config;
use db::MockDb;
use services::{AuthService, CharacterService, ChatService, ImageService, KinkService, TokenSigner};
use std::sync::Arc;
use storage::{FileStore, MemoryStore, TokenStorage};
use time_utils::{Clock, SystemClock};

/// Shared state of the HTTP backend.
pub struct AppState {
    pub config: Config,
    pub db: MockDb,
    pub signer: TokenSigner,
    pub clock: Arc<dyn Clock>,
    pub chat: ChatService,
}

impl AppState {
    pub fn new(config: Config, db: MockDb, clock: Arc<dyn Clock>) -> Self {
        Self {
            signer: TokenSigner::from_config(&config),
            chat: ChatService::new(db.clone(), clock.clone()),
            config,
            db,
            clock,
        }
    }
}

/// The client-side façades, sharing one mock store, one token storage and
/// one clock.
pub struct Services {
    pub auth: AuthService,
    pub characters: CharacterService,
    pub images: ImageService,
    pub kinks: KinkService,
    pub chat: ChatService,
}

impl Services {
    /// Build the façades from configuration with a seeded mock store.
    pub fn new(config: &Config) -> Self {
        let durable: Arc<dyn storage::KeyValueStore> = match &config.token_store_path {
            Some(path) => Arc::new(FileStore::open(path)),
            None => Arc::new(MemoryStore::default()),
        };
        let tokens = TokenStorage::new(durable, Arc::new(MemoryStore::default()));

        Self::with_parts(
            config,
            ApiClient::new(&config.api_base_url),
            MockDb::seeded(),
            tokens,
            Arc::new(SystemClock),
        )
    }

    /// Build the façades from explicit parts.
    pub fn with_parts(
        config: &Config,
        api: ApiClient,
        db: MockDb,
        tokens: TokenStorage,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fallback = config.fallback_mode;
        Self {
            auth: AuthService::new(config, db.clone(), tokens.clone(), clock.clone()),
            characters: CharacterService::new(
                api.clone(),
                db.clone(),
                tokens.clone(),
                clock.clone(),
                fallback,
            ),
            images: ImageService::new(api.clone(), db.clone(), tokens.clone(), clock.clone(), fallback),
            kinks: KinkService::new(api, db.clone(), tokens, fallback),
            chat: ChatService::new(db, clock),
        }
    }
}
