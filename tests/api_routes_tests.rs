// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP backend tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Character, image and kink routes enforce ownership and validation
//! 3. CORS preflight requests return correct headers

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(common::request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(common::request("GET", "/api/characters/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(common::request(
            "GET",
            "/api/characters/",
            Some("invalid.token.here"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_then_me() {
    let (app, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::request(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({"username": "admin", "password": "password"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(common::request("GET", "/api/auth/me/", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["id"], "user_1");
}

#[tokio::test]
async fn test_login_bad_password_is_unauthorized() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(common::request(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({"username": "admin", "password": "nope"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        common::json_body(response).await["details"],
        "Invalid credentials"
    );
}

#[tokio::test]
async fn test_search_filters_and_paginates() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_2");

    let response = app
        .oneshot(common::request(
            "GET",
            "/api/characters/?species=elf&page_size=10",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    // char_6 is an elf too, but private
    assert_eq!(body["total"], 1);
    assert_eq!(body["characters"][0]["id"], "char_1");
    assert_eq!(body["characters"][0]["image"], "https://ext.same-assets.com/2421641290/lyra1.jpg");
}

#[tokio::test]
async fn test_create_validation_message() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_2");
    let before = state.db.characters_for_user("user_2").len();

    let response = app
        .oneshot(common::request(
            "POST",
            "/api/characters/create/",
            Some(&token),
            Some(json!({
                "name": "Mira",
                "species": "Human",
                "gender": "female",
                "personality": "Brave"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        common::json_body(response).await["details"],
        "Personality must be between 10 and 200 characters."
    );
    assert_eq!(state.db.characters_for_user("user_2").len(), before);
}

#[tokio::test]
async fn test_create_then_get_counts_views() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_2");

    let response = app
        .clone()
        .oneshot(common::request(
            "POST",
            "/api/characters/create/",
            Some(&token),
            Some(json!({
                "name": "Mira",
                "species": "Human",
                "gender": "female",
                "personality": "Bold, witty and fiercely loyal"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["userId"], "user_2");
    assert_eq!(created["currentStatus"], "available");

    let response = app
        .oneshot(common::request(
            "GET",
            &format!("/api/characters/{}/", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(common::json_body(response).await["views"], 1);
}

#[tokio::test]
async fn test_private_character_hidden_from_others() {
    let (app, state) = common::create_test_app();
    let stranger = common::create_test_jwt(&state, "user_1");
    let owner = common::create_test_jwt(&state, "user_5");

    let response = app
        .clone()
        .oneshot(common::request("GET", "/api/characters/char_6/", Some(&stranger), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(common::request("GET", "/api/characters/char_6/", Some(&owner), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_and_delete_require_ownership() {
    let (app, state) = common::create_test_app();
    let stranger = common::create_test_jwt(&state, "user_2");
    let owner = common::create_test_jwt(&state, "user_1");

    let response = app
        .clone()
        .oneshot(common::request(
            "PUT",
            "/api/characters/char_1/update/",
            Some(&stranger),
            Some(json!({"id": "", "name": "Stolen"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(common::request(
            "PUT",
            "/api/characters/char_1/update/",
            Some(&owner),
            Some(json!({"id": "", "customStatus": "Resting"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["customStatus"], "Resting");

    let response = app
        .oneshot(common::request(
            "DELETE",
            "/api/characters/char_1/delete/",
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.db.get_character("char_1").is_none());
    assert!(state.db.images_for("char_1").is_empty());
}

#[tokio::test]
async fn test_user_characters_hide_private_from_others() {
    let (app, state) = common::create_test_app();
    let stranger = common::create_test_jwt(&state, "user_1");

    let response = app
        .oneshot(common::request(
            "GET",
            "/api/users/user_5/characters/",
            Some(&stranger),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(common::json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_image_routes_keep_single_primary() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_1");

    let response = app
        .clone()
        .oneshot(common::request(
            "POST",
            "/api/characters/char_1/images/add/",
            Some(&token),
            Some(json!({
                "characterId": "char_1",
                "fileType": "image/png",
                "data": "aGVsbG8=",
                "isPrimary": true
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let added = common::json_body(response).await;
    assert_eq!(added["order"], 2);

    let response = app
        .oneshot(common::request(
            "GET",
            "/api/characters/char_1/images/",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let images = common::json_body(response).await;
    let images = images.as_array().unwrap();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0]["id"], added["id"]);
    assert_eq!(images.iter().filter(|i| i["isPrimary"] == true).count(), 1);
}

#[tokio::test]
async fn test_reorder_mismatch_is_bad_request() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_1");

    let response = app
        .oneshot(common::request(
            "POST",
            "/api/characters/char_1/images/reorder/",
            Some(&token),
            Some(json!({"characterId": "char_1", "imageIds": ["img_1"]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        common::json_body(response).await["details"],
        "Invalid image IDs provided for reordering"
    );
}

#[tokio::test]
async fn test_kink_rating_routes() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_1");

    let response = app
        .clone()
        .oneshot(common::request(
            "PUT",
            "/api/characters/char_1/kinks/romance/",
            Some(&token),
            Some(json!({"rating": "maybe"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(common::request(
            "GET",
            "/api/characters/char_1/kinks/",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let kinks = common::json_body(response).await;
    let romance: Vec<_> = kinks
        .as_array()
        .unwrap()
        .iter()
        .filter(|k| k["kinkId"] == "romance")
        .collect();
    assert_eq!(romance.len(), 1);
    assert_eq!(romance[0]["rating"], "maybe");
}

#[tokio::test]
async fn test_chat_rooms_listed() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state, "user_1");

    let response = app
        .oneshot(common::request("GET", "/api/chat/rooms/", Some(&token), None))
        .await
        .unwrap();
    let rooms = common::json_body(response).await;
    assert_eq!(rooms.as_array().unwrap().len(), state.db.rooms().len());
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend() {
    let (app, state) = common::create_test_app();
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/characters/")
        .header(header::ORIGIN, state.config.frontend_url.as_str())
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        state.config.frontend_url.as_str()
    );
}
