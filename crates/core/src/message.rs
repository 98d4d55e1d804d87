//! Chat history types
//!
//! History entries are append-only. The only fields that may change after an
//! entry is appended are the node-association marker (used to deduplicate
//! re-renders of the same node) and the spoken flag (used by voice-output
//! adapters to record playback).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// The kiosk itself
    Bot,
    /// The customer
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Bot => "bot",
            MessageRole::User => "user",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id
    pub id: Uuid,
    /// Speaker role
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// When the entry was appended
    pub timestamp: DateTime<Utc>,
    /// Id of the node that produced this entry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Whether a voice-output adapter has already played this entry
    #[serde(default)]
    pub has_been_spoken: bool,
}

impl ChatMessage {
    /// Create a new entry
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            node_id: None,
            has_been_spoken: false,
        }
    }

    /// Create a bot entry
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, content)
    }

    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Associate the entry with the node that produced it
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        let msg = ChatMessage::user("deposit please");
        assert_eq!(msg.role, MessageRole::User);
        assert!(!msg.has_been_spoken);

        let msg = ChatMessage::bot("Welcome").with_node_id("start");
        assert_eq!(msg.role, MessageRole::Bot);
        assert_eq!(msg.node_id.as_deref(), Some("start"));
    }

    #[test]
    fn ids_are_unique() {
        let a = ChatMessage::bot("a");
        let b = ChatMessage::bot("a");
        assert_ne!(a.id, b.id);
    }
}
