//! Chat room view: seeded rooms and an append-only message log per room.

use crate::db::MockDb;
use crate::error::{AppError, Result};
use crate::models::{ChatMessage, ChatRoom};
use crate::time_utils::{format_utc_rfc3339, Clock};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Buffered messages per subscriber before it starts lagging.
const CHANNEL_CAPACITY: usize = 64;

pub struct ChatService {
    db: MockDb,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<ChatMessage>,
}

impl ChatService {
    pub fn new(db: MockDb, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { db, clock, events }
    }

    pub fn rooms(&self) -> Vec<ChatRoom> {
        self.db.rooms().to_vec()
    }

    /// Append a message to a room and notify subscribers.
    pub fn post(
        &self,
        room_id: &str,
        character_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        if self.db.room(room_id).is_none() {
            return Err(AppError::NotFound("Chat room not found".to_string()));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("content", "Message cannot be empty."));
        }

        let message = self.db.append_message(ChatMessage {
            id: 0,
            room_id: room_id.to_string(),
            character_id: character_id.to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp: format_utc_rfc3339(self.clock.now()),
        });
        tracing::debug!(room_id, message_id = message.id, "Chat message posted");

        // No subscribers is fine.
        let _ = self.events.send(message.clone());
        Ok(message)
    }

    /// Messages of a room in the order they were posted.
    pub fn messages(&self, room_id: &str) -> Result<Vec<ChatMessage>> {
        if self.db.room(room_id).is_none() {
            return Err(AppError::NotFound("Chat room not found".to_string()));
        }
        Ok(self.db.messages(room_id))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }
}
