//! Chat room models and the socket wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub room_id: String,
    pub character_id: String,
    pub sender: String,
    pub content: String,
    pub timestamp: String,
}

/// JSON frame exchanged over the chat socket. No framing, acks or ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub sender: String,
    pub content: String,
}

impl ChatMessage {
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            sender: self.sender.clone(),
            content: self.content.clone(),
        }
    }
}
