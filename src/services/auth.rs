// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session/auth façade.
//!
//! Issues HS256 access/refresh token pairs, keeps them in the durable or
//! session namespace, and tracks the one logged-in user. Credentials are
//! checked against the mock user directory.

use crate::config::Config;
use crate::db::{new_id, MockDb};
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, RegisterRequest, TokenData, User};
use crate::storage::{StorageScope, StoredTokens, TokenStorage};
use crate::time_utils::{format_utc_rfc3339, Clock};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
}

/// HS256 signer for access/refresh token pairs. Shared by the auth façade
/// and the HTTP backend's bearer check.
#[derive(Clone)]
pub struct TokenSigner {
    signing_key: Vec<u8>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenSigner {
    pub fn from_config(config: &Config) -> Self {
        Self {
            signing_key: config.jwt_signing_key.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Issue an (access, refresh) pair for `user` at Unix time `now`.
    pub fn issue_pair(&self, user: &User, now: i64) -> Result<(String, String)> {
        Ok((
            self.issue(user, TokenKind::Access, now)?,
            self.issue(user, TokenKind::Refresh, now)?,
        ))
    }

    /// Decode and verify a token's signature. Expiry is checked by callers
    /// against their clock.
    pub fn decode(&self, token: &str) -> Result<TokenData> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<TokenData>(token, &DecodingKey::from_secret(&self.signing_key), &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::invalid_token())
    }

    fn issue(&self, user: &User, kind: TokenKind, now: i64) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let claims = TokenData {
            user_id: user.id.clone(),
            username: user.username.clone(),
            iat: now,
            exp: now + ttl,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(e.into()))
    }
}

/// Auth façade. Construct once and share by reference.
pub struct AuthService {
    db: MockDb,
    storage: TokenStorage,
    clock: Arc<dyn Clock>,
    signer: TokenSigner,
    state: watch::Sender<SessionState>,
}

impl AuthService {
    pub fn new(config: &Config, db: MockDb, storage: TokenStorage, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            db,
            storage,
            clock,
            signer: TokenSigner::from_config(config),
            state,
        }
    }

    /// Log in with username (case-insensitive) and password.
    ///
    /// Tokens go to the durable namespace when `remember_me` is set, else to
    /// the session namespace.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<AuthResponse> {
        let user = self
            .db
            .find_user_by_username(username)
            .filter(|u| self.db.check_password(&u.id, password))
            .ok_or_else(|| {
                tracing::info!(username, "Login rejected");
                AppError::invalid_credentials()
            })?;

        let now = format_utc_rfc3339(self.clock.now());
        let user = self.db.touch_last_login(&user.id, &now).unwrap_or(user);

        let scope = if remember_me {
            StorageScope::Durable
        } else {
            StorageScope::Session
        };
        let response = self.start_session(user, scope)?;
        tracing::info!(user_id = %response.user.id, remember_me, "User logged in");
        Ok(response)
    }

    /// Register a new user and log them in. Tokens always go to durable storage.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        timezone_offset: Option<&str>,
    ) -> Result<AuthResponse> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            timezone_offset: timezone_offset.map(str::to_string),
        };
        if let Err(errors) = request.validate() {
            return Err(first_error(&errors, &["username", "email", "password"]));
        }

        if self.db.find_user_by_username(username).is_some() {
            return Err(AppError::username_taken());
        }
        if self.db.find_user_by_email(email).is_some() {
            return Err(AppError::email_in_use());
        }

        let now = format_utc_rfc3339(self.clock.now());
        let user = User {
            id: new_id("user"),
            username: request.username,
            email: request.email,
            avatar: None,
            created_at: now.clone(),
            updated_at: now.clone(),
            is_verified: false,
            is_admin: false,
            timezone: request
                .timezone_offset
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| "UTC".to_string()),
            last_login: Some(now),
        };
        self.db.insert_user(user.clone(), password);

        let response = self.start_session(user, StorageScope::Durable)?;
        tracing::info!(user_id = %response.user.id, "User registered");
        Ok(response)
    }

    /// True iff a valid, unexpired access token is stored.
    ///
    /// An expired access token triggers one silent refresh.
    pub async fn is_authenticated(&self) -> bool {
        let Some(token) = self.storage.access_token() else {
            return false;
        };

        match self.decode(&token) {
            Ok(claims) if claims.exp > self.clock.unix_now() => true,
            Ok(claims) => {
                tracing::debug!(user_id = %claims.user_id, "Access token expired, refreshing");
                self.refresh_token().await.is_ok()
            }
            Err(_) => false,
        }
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// The new pair is written to the namespace that held the refresh token.
    /// Any failure logs the session out.
    pub async fn refresh_token(&self) -> Result<AuthResponse> {
        let result = self.try_refresh();
        if let Err(e) = &result {
            tracing::info!(error = %e, "Token refresh failed, logging out");
            self.logout();
        }
        result
    }

    fn try_refresh(&self) -> Result<AuthResponse> {
        let (token, scope) = self
            .storage
            .refresh_token()
            .ok_or_else(AppError::invalid_token)?;

        let claims = self
            .decode(&token)
            .map_err(|_| AppError::invalid_token())?;
        if claims.exp <= self.clock.unix_now() {
            return Err(AppError::invalid_token());
        }

        let user = self
            .db
            .get_user(&claims.user_id)
            .ok_or_else(AppError::invalid_token)?;

        let response = self.start_session(user, scope)?;
        tracing::debug!(user_id = %response.user.id, "Session refreshed");
        Ok(response)
    }

    /// Clear all stored tokens and the current user. No server-side invalidation.
    pub fn logout(&self) {
        self.storage.clear();
        self.state.send_modify(|s| s.user = None);
    }

    /// The logged-in user, resolved from the access token when not cached.
    pub async fn current_user(&self) -> Option<User> {
        if let Some(user) = self.state.borrow().user.clone() {
            return Some(user);
        }

        let token = self.storage.access_token()?;
        let claims = self.decode(&token).ok()?;
        let user = self.db.get_user(&claims.user_id)?;
        self.state.send_modify(|s| s.user = Some(user.clone()));
        Some(user)
    }

    /// Stored access token, durable namespace first.
    pub fn access_token(&self) -> Option<String> {
        self.storage.access_token()
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    /// Current session snapshot.
    pub fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Decode and verify a token's signature. Expiry is checked against
    /// the injected clock.
    pub fn decode(&self, token: &str) -> Result<TokenData> {
        self.signer.decode(token)
    }

    fn start_session(&self, user: User, scope: StorageScope) -> Result<AuthResponse> {
        let now = self.clock.unix_now();
        let (access_token, refresh_token) = self.signer.issue_pair(&user, now)?;
        let expires_at = now + self.signer.access_ttl_secs();

        self.storage.store(
            scope,
            &StoredTokens {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
                expires_at,
            },
        );
        self.state.send_modify(|s| s.user = Some(user.clone()));

        Ok(AuthResponse {
            user,
            access_token,
            refresh_token,
            expires_at,
        })
    }
}

/// First failing field, in `order`, as an `AppError::Validation`.
pub(crate) fn first_error(errors: &validator::ValidationErrors, order: &[&'static str]) -> AppError {
    let fields = errors.field_errors();
    order
        .iter()
        .find_map(|field| {
            let message = fields.get(*field)?.first()?.message.clone()?;
            Some(AppError::validation(*field, message))
        })
        .unwrap_or_else(|| AppError::validation("request", "Invalid request"))
}
