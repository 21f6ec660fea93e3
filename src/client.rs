// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the character API.
//!
//! Every call carries the session's bearer token when one is present.
//! Any transport failure or non-success status becomes `AppError::Network`
//! so that façades can apply their mock fallback uniformly.

use crate::error::AppError;
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error body returned by the API.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// Character API client.
#[derive(Clone)]
pub struct ApiClient {
    http: Option<reqwest::Client>,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://host/api`).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client that never reaches the network.
    ///
    /// All calls fail with `AppError::Network`, which drives façades into
    /// their mock fallback.
    pub fn new_offline() -> Self {
        Self {
            http: None,
            base_url: String::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_http(&self) -> Result<&reqwest::Client, AppError> {
        self.http
            .as_ref()
            .ok_or_else(|| AppError::Network("API not reachable (offline mode)".to_string()))
    }

    /// GET `path` and parse the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let request = self.request(Method::GET, path, token)?.query(query);
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Self::check_response_json(response).await
    }

    /// Send a JSON body with `method` and parse the JSON response.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let response = self
            .request(method, path, token)?
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Self::check_response_json(response).await
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), AppError> {
        let response = self
            .request(Method::DELETE, path, token)?
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Self::check_response(response).await
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.get_http()?.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Check response status and return error if not successful.
    async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Network(format!("Invalid API response: {}", e)))
    }

    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.details.or(b.error))
            .unwrap_or_else(|| "An unexpected error occurred".to_string());

        tracing::debug!(status = status.as_u16(), message = %message, "API call failed");
        AppError::Network(message)
    }
}
