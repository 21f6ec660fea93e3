// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory mock store with typed operations.
//!
//! Holds, for the life of the process:
//! - Users (the credential directory)
//! - Characters
//! - Image sets (one ordered list per character)
//! - Kink ratings and custom kinks
//! - Chat rooms and their messages
//!
//! Image sets are stored as one entry per character so that the
//! single-primary invariant is maintained under one shard lock.

use crate::db::seed;
use crate::error::{AppError, Result};
use crate::models::{
    Character, CharacterImage, CharacterKink, CharacterSummary, CharacterUpdateRequest,
    ChatMessage, ChatRoom, CustomKink, ImageUpdateRequest, KinkRating, User,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generate a prefixed record id (`char_…`, `img_…`).
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

#[derive(Default)]
struct Inner {
    users: DashMap<String, User>,
    /// Plaintext passwords keyed by user id. Mock only.
    passwords: DashMap<String, String>,
    characters: DashMap<String, Character>,
    image_sets: DashMap<String, Vec<CharacterImage>>,
    /// Keyed by (character_id, kink_id)
    kinks: DashMap<(String, String), CharacterKink>,
    custom_kinks: DashMap<String, CustomKink>,
    rooms: Vec<ChatRoom>,
    messages: DashMap<String, Vec<ChatMessage>>,
    message_seq: AtomicU64,
}

/// Shared mock store. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct MockDb {
    inner: Arc<Inner>,
}

impl MockDb {
    /// Create a store seeded with the built-in mock records.
    pub fn seeded() -> Self {
        let inner = Inner {
            rooms: seed::rooms(),
            ..Inner::default()
        };
        let db = Self {
            inner: Arc::new(inner),
        };

        for user in seed::users() {
            db.insert_user(user, seed::MOCK_PASSWORD);
        }
        for character in seed::characters() {
            db.insert_character(character);
        }
        for image in seed::images() {
            db.inner
                .image_sets
                .entry(image.character_id.clone())
                .or_default()
                .push(image);
        }
        for kink in seed::kinks() {
            db.inner
                .kinks
                .insert((kink.character_id.clone(), kink.kink_id.clone()), kink);
        }

        db
    }

    /// Create an empty store (no users, characters or rooms).
    pub fn empty() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.inner.users.get(id).map(|u| u.clone())
    }

    /// Case-insensitive username lookup (full Unicode lowercasing).
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        let wanted = username.to_lowercase();
        self.inner
            .users
            .iter()
            .find(|u| u.username.to_lowercase() == wanted)
            .map(|u| u.clone())
    }

    /// Case-insensitive email lookup.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let wanted = email.to_lowercase();
        self.inner
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == wanted)
            .map(|u| u.clone())
    }

    pub fn insert_user(&self, user: User, password: &str) {
        self.inner
            .passwords
            .insert(user.id.clone(), password.to_string());
        self.inner.users.insert(user.id.clone(), user);
    }

    /// Plaintext comparison against the stored password.
    pub fn check_password(&self, user_id: &str, password: &str) -> bool {
        self.inner
            .passwords
            .get(user_id)
            .is_some_and(|stored| stored.as_str() == password)
    }

    pub fn touch_last_login(&self, id: &str, at: &str) -> Option<User> {
        let mut user = self.inner.users.get_mut(id)?;
        user.last_login = Some(at.to_string());
        Some(user.clone())
    }

    // ─── Character Operations ────────────────────────────────────

    pub fn get_character(&self, id: &str) -> Option<Character> {
        self.inner.characters.get(id).map(|c| c.clone())
    }

    /// Characters owned by a user, oldest first.
    pub fn characters_for_user(&self, user_id: &str) -> Vec<Character> {
        let mut characters: Vec<Character> = self
            .inner
            .characters
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.clone())
            .collect();
        characters.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        characters
    }

    pub fn all_characters(&self) -> Vec<Character> {
        self.inner.characters.iter().map(|c| c.clone()).collect()
    }

    pub fn insert_character(&self, character: Character) {
        self.inner
            .characters
            .insert(character.id.clone(), character);
    }

    /// Merge an update into the stored character. Last write wins.
    pub fn update_character(
        &self,
        request: &CharacterUpdateRequest,
        updated_at: &str,
    ) -> Result<Character> {
        let mut character = self
            .inner
            .characters
            .get_mut(&request.id)
            .ok_or_else(|| AppError::NotFound("Character not found".to_string()))?;
        request.apply_to(&mut character);
        character.updated_at = updated_at.to_string();
        Ok(character.clone())
    }

    /// Remove a character along with its images and kinks.
    pub fn remove_character(&self, id: &str) -> Result<Character> {
        let (_, character) = self
            .inner
            .characters
            .remove(id)
            .ok_or_else(|| AppError::NotFound("Character not found".to_string()))?;
        self.inner.image_sets.remove(id);
        self.inner.kinks.retain(|(character_id, _), _| character_id != id);
        self.inner
            .custom_kinks
            .retain(|_, kink| kink.character_id != id);
        Ok(character)
    }

    /// Bump the view counter.
    pub fn record_view(&self, id: &str) -> Option<Character> {
        let mut character = self.inner.characters.get_mut(id)?;
        character.views += 1;
        Some(character.clone())
    }

    pub fn summarize(&self, character: &Character) -> CharacterSummary {
        character.to_summary(self.primary_image_url(&character.id))
    }

    // ─── Image Operations ────────────────────────────────────────

    /// Images for a character, primary first, then by order.
    pub fn images_for(&self, character_id: &str) -> Vec<CharacterImage> {
        let mut images = self
            .inner
            .image_sets
            .get(character_id)
            .map(|set| set.clone())
            .unwrap_or_default();
        images.sort_by(|a, b| b.is_primary.cmp(&a.is_primary).then(a.order.cmp(&b.order)));
        images
    }

    pub fn primary_image_url(&self, character_id: &str) -> Option<String> {
        self.inner
            .image_sets
            .get(character_id)?
            .iter()
            .find(|img| img.is_primary)
            .map(|img| img.url.clone())
    }

    /// Append an image to its character's set.
    ///
    /// The image goes after the current highest order. It becomes primary
    /// when `requested_primary` says so, or by default when the set was empty.
    pub fn add_image(
        &self,
        mut image: CharacterImage,
        requested_primary: Option<bool>,
    ) -> CharacterImage {
        let mut set = self
            .inner
            .image_sets
            .entry(image.character_id.clone())
            .or_default();

        image.order = set.iter().map(|img| img.order + 1).max().unwrap_or(0);
        image.is_primary = requested_primary.unwrap_or(set.is_empty());
        if image.is_primary {
            set.iter_mut().for_each(|img| img.is_primary = false);
        }
        set.push(image.clone());
        image
    }

    pub fn update_image(&self, request: &ImageUpdateRequest) -> Result<CharacterImage> {
        let not_found = || AppError::NotFound("Image not found".to_string());
        let character_id = if request.character_id.is_empty() {
            self.image_owner(&request.id).ok_or_else(not_found)?
        } else {
            request.character_id.clone()
        };

        let mut set = self
            .inner
            .image_sets
            .get_mut(&character_id)
            .ok_or_else(not_found)?;
        let index = set
            .iter()
            .position(|img| img.id == request.id)
            .ok_or_else(not_found)?;

        if request.is_primary == Some(true) {
            set.iter_mut().for_each(|img| img.is_primary = false);
        }

        let image = &mut set[index];
        if let Some(title) = &request.title {
            image.title = Some(title.clone());
        }
        if let Some(description) = &request.description {
            image.description = Some(description.clone());
        }
        if let Some(is_primary) = request.is_primary {
            image.is_primary = is_primary;
        }
        if let Some(order) = request.order {
            image.order = order;
        }
        Ok(image.clone())
    }

    /// Remove an image. Removing the primary promotes the lowest-order survivor.
    pub fn remove_image(&self, id: &str) -> Result<CharacterImage> {
        let character_id = self
            .image_owner(id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
        let mut set = self
            .inner
            .image_sets
            .get_mut(&character_id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
        let index = set
            .iter()
            .position(|img| img.id == id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        let removed = set.remove(index);
        if removed.is_primary {
            if let Some(next) = set.iter_mut().min_by_key(|img| img.order) {
                next.is_primary = true;
            }
        }
        Ok(removed)
    }

    /// Apply a new order. `image_ids` must name exactly the character's images.
    pub fn reorder_images(
        &self,
        character_id: &str,
        image_ids: &[String],
    ) -> Result<Vec<CharacterImage>> {
        let mut set = self.inner.image_sets.entry(character_id.to_string()).or_default();

        if set.len() != image_ids.len()
            || !set.iter().all(|img| image_ids.contains(&img.id))
        {
            return Err(AppError::InvalidImageSet);
        }

        for image in set.iter_mut() {
            if let Some(position) = image_ids.iter().position(|id| *id == image.id) {
                image.order = position as u32;
            }
        }
        set.sort_by_key(|img| img.order);
        Ok(set.clone())
    }

    /// Character owning an image.
    pub fn image_owner(&self, image_id: &str) -> Option<String> {
        self.inner
            .image_sets
            .iter()
            .find(|set| set.iter().any(|img| img.id == image_id))
            .map(|set| set.key().clone())
    }

    // ─── Kink Operations ─────────────────────────────────────────

    pub fn kinks_for(&self, character_id: &str) -> Vec<CharacterKink> {
        let mut kinks: Vec<CharacterKink> = self
            .inner
            .kinks
            .iter()
            .filter(|k| k.character_id == character_id)
            .map(|k| k.clone())
            .collect();
        kinks.sort_by(|a, b| a.kink_id.cmp(&b.kink_id));
        kinks
    }

    pub fn kink_rating(&self, character_id: &str, kink_id: &str) -> Option<KinkRating> {
        self.inner
            .kinks
            .get(&(character_id.to_string(), kink_id.to_string()))
            .map(|k| k.rating)
    }

    /// Insert or replace the rating for (character, kink).
    pub fn upsert_kink(&self, character_id: &str, kink_id: &str, rating: KinkRating) -> CharacterKink {
        let mut entry = self
            .inner
            .kinks
            .entry((character_id.to_string(), kink_id.to_string()))
            .or_insert_with(|| CharacterKink {
                id: new_id("kink"),
                character_id: character_id.to_string(),
                kink_id: kink_id.to_string(),
                rating,
            });
        entry.rating = rating;
        entry.clone()
    }

    pub fn remove_kink(&self, character_id: &str, kink_id: &str) -> Option<CharacterKink> {
        self.inner
            .kinks
            .remove(&(character_id.to_string(), kink_id.to_string()))
            .map(|(_, kink)| kink)
    }

    /// Replace all ratings of a character. Later duplicates of a kink win.
    pub fn replace_kinks(
        &self,
        character_id: &str,
        ratings: &[(String, KinkRating)],
    ) -> Vec<CharacterKink> {
        self.inner
            .kinks
            .retain(|(owner, _), _| owner != character_id);
        for (kink_id, rating) in ratings {
            self.upsert_kink(character_id, kink_id, *rating);
        }
        self.kinks_for(character_id)
    }

    pub fn custom_kinks_for(&self, character_id: &str) -> Vec<CustomKink> {
        let mut kinks: Vec<CustomKink> = self
            .inner
            .custom_kinks
            .iter()
            .filter(|k| k.character_id == character_id)
            .map(|k| k.clone())
            .collect();
        kinks.sort_by(|a, b| a.name.cmp(&b.name));
        kinks
    }

    pub fn insert_custom_kink(&self, kink: CustomKink) -> CustomKink {
        self.inner.custom_kinks.insert(kink.id.clone(), kink.clone());
        kink
    }

    pub fn update_custom_kink(
        &self,
        character_id: &str,
        kink_id: &str,
        data: &CustomKink,
    ) -> Result<CustomKink> {
        let mut kink = self
            .inner
            .custom_kinks
            .get_mut(kink_id)
            .filter(|k| k.character_id == character_id)
            .ok_or_else(|| AppError::NotFound("Custom kink not found".to_string()))?;
        kink.name = data.name.clone();
        kink.category = data.category.clone();
        kink.description = data.description.clone();
        kink.rating = data.rating;
        Ok(kink.clone())
    }

    pub fn remove_custom_kink(&self, character_id: &str, kink_id: &str) -> Result<CustomKink> {
        self.inner
            .custom_kinks
            .remove_if(kink_id, |_, k| k.character_id == character_id)
            .map(|(_, kink)| kink)
            .ok_or_else(|| AppError::NotFound("Custom kink not found".to_string()))
    }

    // ─── Chat Operations ─────────────────────────────────────────

    pub fn rooms(&self) -> &[ChatRoom] {
        &self.inner.rooms
    }

    pub fn room(&self, id: &str) -> Option<&ChatRoom> {
        self.inner.rooms.iter().find(|r| r.id == id)
    }

    /// Append a message to a room's log and return it with its id assigned.
    pub fn append_message(&self, mut message: ChatMessage) -> ChatMessage {
        message.id = self.inner.message_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .messages
            .entry(message.room_id.clone())
            .or_default()
            .push(message.clone());
        message
    }

    /// Messages of a room in insertion order.
    pub fn messages(&self, room_id: &str) -> Vec<ChatMessage> {
        self.inner
            .messages
            .get(room_id)
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}
