// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session façade tests: login scopes, expiry, refresh and registration.

use chrono::Duration;
use roleplay_hub::config::FallbackMode;
use roleplay_hub::error::AppError;
use roleplay_hub::storage::{StorageScope, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY};

mod common;

#[tokio::test]
async fn test_login_without_remember_me_uses_session_storage() {
    let (services, _, _) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;

    let response = auth.login("admin", "password", false).await.unwrap();

    assert_eq!(response.user.id, "user_1");
    let session = auth.storage().namespace(StorageScope::Session);
    let durable = auth.storage().namespace(StorageScope::Durable);
    assert_eq!(
        session.get(ACCESS_TOKEN_KEY).as_deref(),
        Some(response.access_token.as_str())
    );
    assert_eq!(
        session.get(TOKEN_EXPIRY_KEY),
        Some(response.expires_at.to_string())
    );
    assert!(durable.get(ACCESS_TOKEN_KEY).is_none());
    assert!(durable.get(REFRESH_TOKEN_KEY).is_none());
    assert_eq!(auth.current_user().await.unwrap().id, "user_1");
}

#[tokio::test]
async fn test_login_with_remember_me_uses_durable_storage() {
    let (services, _, _) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;

    auth.login("ADMIN", "password", true).await.unwrap();

    assert!(auth
        .storage()
        .namespace(StorageScope::Durable)
        .get(ACCESS_TOKEN_KEY)
        .is_some());
    assert!(auth
        .storage()
        .namespace(StorageScope::Session)
        .get(ACCESS_TOKEN_KEY)
        .is_none());
    assert!(auth.is_authenticated().await);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let (services, _, _) = common::offline_services(FallbackMode::Reject);

    let err = services
        .auth
        .login("admin", "wrong", false)
        .await
        .unwrap_err();

    assert_eq!(err.auth_code(), Some(AppError::INVALID_CREDENTIALS));
    assert!(!services.auth.is_authenticated().await);
    assert!(services.auth.session().user.is_none());
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_is_unauthenticated() {
    let (services, _, clock) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;
    auth.login("admin", "password", false).await.unwrap();
    auth.storage()
        .namespace(StorageScope::Session)
        .remove(REFRESH_TOKEN_KEY);

    clock.advance(Duration::hours(2));

    assert!(!auth.is_authenticated().await);
    assert!(auth.access_token().is_none());
    assert!(auth.session().user.is_none());
}

#[tokio::test]
async fn test_expired_token_refreshes_silently_in_same_scope() {
    let (services, _, clock) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;
    let first = auth.login("admin", "password", false).await.unwrap();

    clock.advance(Duration::hours(2));

    assert!(auth.is_authenticated().await);
    let session = auth.storage().namespace(StorageScope::Session);
    let refreshed = session.get(ACCESS_TOKEN_KEY).unwrap();
    assert_ne!(refreshed, first.access_token);
    assert!(auth
        .storage()
        .namespace(StorageScope::Durable)
        .get(ACCESS_TOKEN_KEY)
        .is_none());
}

#[tokio::test]
async fn test_expired_refresh_token_logs_out() {
    let (services, _, clock) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;
    auth.login("admin", "password", true).await.unwrap();

    clock.advance(Duration::days(8));

    let err = auth.refresh_token().await.unwrap_err();
    assert_eq!(err.auth_code(), Some(AppError::INVALID_TOKEN));
    assert!(auth.storage().refresh_token().is_none());
    assert!(auth.session().user.is_none());
}

#[tokio::test]
async fn test_register_rejects_taken_username_then_email() {
    let (services, _, _) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;

    let err = auth
        .register("Admin", "fresh@example.com", "longpassword", None)
        .await
        .unwrap_err();
    assert_eq!(err.auth_code(), Some(AppError::USERNAME_EXISTS));

    let err = auth
        .register("newcomer", "ADMIN@roleplayhub.com", "longpassword", None)
        .await
        .unwrap_err();
    assert_eq!(err.auth_code(), Some(AppError::EMAIL_EXISTS));
}

#[tokio::test]
async fn test_register_logs_in_with_durable_tokens() {
    let (services, db, _) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;

    let response = auth
        .register("newcomer", "newcomer@example.com", "longpassword", None)
        .await
        .unwrap();

    assert_eq!(response.user.timezone, "UTC");
    assert!(response.user.id.starts_with("user_"));
    assert!(db.find_user_by_username("newcomer").is_some());
    assert!(auth
        .storage()
        .namespace(StorageScope::Durable)
        .get(ACCESS_TOKEN_KEY)
        .is_some());

    // The new account can log in again
    auth.logout();
    assert!(auth.login("newcomer", "longpassword", false).await.is_ok());
}

#[tokio::test]
async fn test_logout_notifies_subscribers() {
    let (services, _, _) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;
    let mut rx = auth.subscribe();

    auth.login("admin", "password", false).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(
        rx.borrow_and_update().user.as_ref().map(|u| u.id.clone()),
        Some("user_1".to_string())
    );

    auth.logout();
    rx.changed().await.unwrap();
    assert!(rx.borrow().user.is_none());
    assert!(!auth.is_authenticated().await);
}

#[tokio::test]
async fn test_second_login_replaces_tokens_from_other_scope() {
    let (services, _, clock) = common::offline_services(FallbackMode::Reject);
    let auth = &services.auth;

    auth.login("admin", "password", true).await.unwrap();
    let second = auth.login("elvish_bard", "password", false).await.unwrap();

    let durable = auth.storage().namespace(StorageScope::Durable);
    assert!(durable.get(ACCESS_TOKEN_KEY).is_none());
    assert!(durable.get(REFRESH_TOKEN_KEY).is_none());
    assert!(durable.get(TOKEN_EXPIRY_KEY).is_none());

    let bearer = auth.access_token().unwrap();
    assert_eq!(bearer, second.access_token);
    assert_eq!(auth.decode(&bearer).unwrap().user_id, "user_5");

    // The silent refresh keeps the second user
    clock.advance(Duration::hours(2));
    assert!(auth.is_authenticated().await);
    assert_eq!(
        auth.session().user.map(|u| u.id),
        Some("user_5".to_string())
    );
    assert_eq!(
        auth.storage().refresh_token().map(|(_, scope)| scope),
        Some(StorageScope::Session)
    );
}
