// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use roleplay_hub::client::ApiClient;
use roleplay_hub::config::{Config, FallbackMode};
use roleplay_hub::db::MockDb;
use roleplay_hub::models::TokenData;
use roleplay_hub::routes::create_router;
use roleplay_hub::storage::TokenStorage;
use roleplay_hub::time_utils::{ManualClock, SystemClock};
use roleplay_hub::{AppState, Services};
use std::sync::Arc;

/// Create a test app backed by a freshly seeded mock store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        MockDb::seeded(),
        Arc::new(SystemClock),
    ));
    (create_router(state.clone()), state)
}

/// Create an access token for `user_id` signed with the app's key.
#[allow(dead_code)]
pub fn create_test_jwt(state: &AppState, user_id: &str) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let now = state.clock.unix_now();
    let claims = TokenData {
        user_id: user_id.to_string(),
        username: user_id.to_string(),
        iat: now,
        exp: now + 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&state.config.jwt_signing_key),
    )
    .expect("Failed to create JWT")
}

/// Façades that never reach the network, over a seeded store.
#[allow(dead_code)]
pub fn offline_services(mode: FallbackMode) -> (Services, MockDb, Arc<ManualClock>) {
    let config = Config::test_default().with_fallback(mode);
    let db = MockDb::seeded();
    let clock = Arc::new(ManualClock::default());
    let services = Services::with_parts(
        &config,
        ApiClient::new_offline(),
        db.clone(),
        TokenStorage::in_memory(),
        clock.clone(),
    );
    (services, db, clock)
}

/// Build a request, optionally authenticated and with a JSON body.
#[allow(dead_code)]
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
