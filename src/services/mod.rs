// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the façades between callers and the (remote or mock) backend.
//!
//! Every remote-backed operation tries the API first. On failure it mutates
//! the mock store and then settles according to the configured
//! [`FallbackMode`].

pub mod auth;
pub mod characters;
pub mod chat;
pub mod images;
pub mod kinks;
pub mod search;

pub use auth::{AuthService, SessionState, TokenSigner};
pub use characters::{CharacterService, DirectoryState};
pub use chat::ChatService;
pub use images::{ImageService, ImageSetState};
pub use kinks::KinkService;

use crate::config::FallbackMode;
use crate::error::{AppError, Result};

/// Settle a mock fallback after the remote call failed with `remote`.
///
/// `Synthesize` returns the mock value; `Reject` surfaces `message` as a
/// network error. The mock store has already been mutated either way.
pub(crate) fn settle<T>(mode: FallbackMode, remote: &AppError, value: T, message: &str) -> Result<T> {
    tracing::warn!(error = %remote, fallback = ?mode, "Remote call failed, using mock data");
    match mode {
        FallbackMode::Synthesize => Ok(value),
        FallbackMode::Reject => Err(AppError::Network(message.to_string())),
    }
}
