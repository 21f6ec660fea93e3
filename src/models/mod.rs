// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod character;
pub mod chat;
pub mod image;
pub mod kink;
pub mod user;

pub use character::{
    Character, CharacterCreateRequest, CharacterMood, CharacterSearchFilters,
    CharacterSearchResponse, CharacterStatus, CharacterSummary, CharacterUpdateRequest, SortOrder,
};
pub use chat::{ChatMessage, ChatRoom, WireMessage};
pub use image::{CharacterImage, ImageUpdateRequest, ImageUploadRequest, ReorderImagesRequest};
pub use kink::{CharacterKink, CustomKink, KinkFilter, KinkRating, KinkSelection};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, TokenData, User};
