// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Façades talking to a live backend over HTTP.

use roleplay_hub::client::ApiClient;
use roleplay_hub::config::{Config, FallbackMode};
use roleplay_hub::db::MockDb;
use roleplay_hub::models::{CharacterCreateRequest, CharacterSearchFilters, ImageUploadRequest};
use roleplay_hub::routes::create_router;
use roleplay_hub::storage::TokenStorage;
use roleplay_hub::time_utils::SystemClock;
use roleplay_hub::{AppState, Services};
use std::sync::Arc;

/// Serve a seeded backend on an ephemeral port. Returns its API base URL
/// and the backend's store.
async fn spawn_backend() -> (String, MockDb) {
    let db = MockDb::seeded();
    let state = Arc::new(AppState::new(
        Config::test_default(),
        db.clone(),
        Arc::new(SystemClock),
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    (format!("http://{}/api", addr), db)
}

/// Façades in reject mode pointed at `base_url`, plus their local store.
fn services(base_url: &str) -> (Services, MockDb) {
    let local = MockDb::seeded();
    let services = Services::with_parts(
        &Config::test_default().with_fallback(FallbackMode::Reject),
        ApiClient::new(base_url),
        local.clone(),
        TokenStorage::in_memory(),
        Arc::new(SystemClock),
    );
    (services, local)
}

#[tokio::test]
async fn test_remote_success_skips_mock_store() {
    let (base_url, remote) = spawn_backend().await;
    let (services, local) = services(&base_url);
    services.auth.login("admin", "password", false).await.unwrap();

    let character = services
        .characters
        .create(
            &CharacterCreateRequest {
                name: "Mira".to_string(),
                species: "Human".to_string(),
                gender: "female".to_string(),
                personality: "Bold, witty and fiercely loyal".to_string(),
                ..Default::default()
            },
            "user_1",
        )
        .await
        .unwrap();

    assert!(remote.get_character(&character.id).is_some());
    assert!(local.get_character(&character.id).is_none());

    let mine = services.characters.list("user_1").await.unwrap();
    assert_eq!(mine.len(), 3);
}

#[tokio::test]
async fn test_remote_error_message_reaches_caller() {
    let (base_url, _) = spawn_backend().await;
    let (services, _) = services(&base_url);

    // No session: the backend answers 401 and reject mode surfaces the
    // operation's message.
    let err = services
        .characters
        .search(&CharacterSearchFilters::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "An unexpected error occurred during search");
}

#[tokio::test]
async fn test_remote_image_upload_and_delete() {
    let (base_url, remote) = spawn_backend().await;
    let (services, _) = services(&base_url);
    services.auth.login("admin", "password", true).await.unwrap();

    let image = services
        .images
        .upload(&ImageUploadRequest {
            character_id: "char_2".to_string(),
            file_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
            title: None,
            description: None,
            is_primary: None,
        })
        .await
        .unwrap();
    assert!(image.is_primary);
    assert_eq!(remote.images_for("char_2").len(), 1);

    services.images.list("char_2").await.unwrap();
    services.images.delete(&image.id).await.unwrap();
    assert!(remote.images_for("char_2").is_empty());
}
