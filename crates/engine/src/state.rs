//! Dialog state snapshots
//!
//! The engine never mutates state in place: every operation clones the
//! current `DialogState`, applies its changes, and swaps the `Arc`. Stale
//! timer callbacks compare the node id they were scheduled for against the
//! current snapshot and no-op on mismatch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use kiosk_dialog_core::ChatMessage;
use kiosk_dialog_flow::{Choice, Node, NodeId};
use kiosk_dialog_matcher::MatchResult;

/// A free-text match awaiting the user's yes/no
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// Choice that will be selected on an affirmative answer
    pub choice: Choice,
    /// The match that put it forward
    pub match_result: MatchResult,
}

/// Whether the engine has a node to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineCondition {
    /// Current node exists in the catalog
    Ready,
    /// Current node id resolves to nothing; the engine stops advancing
    /// until a reset or a catalog swap brings the id back
    Idle { missing: NodeId },
}

/// Full conversation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogState {
    /// Id of the node the dialog is on
    pub current_node_id: NodeId,
    /// Append-only conversation history
    pub history: Vec<ChatMessage>,
    /// Collected field values; later writes to a field overwrite earlier ones
    pub field_values: HashMap<String, String>,
    /// Overlay that intercepts free text until resolved
    pub pending_confirmation: Option<PendingConfirmation>,
    /// Render condition
    pub condition: EngineCondition,
}

impl DialogState {
    /// Fresh state positioned on the start node
    pub fn new(start_node: &str) -> Self {
        Self {
            current_node_id: start_node.to_string(),
            history: Vec::new(),
            field_values: HashMap::new(),
            pending_confirmation: None,
            condition: EngineCondition::Ready,
        }
    }
}

/// Immutable view handed to the presentation layer after every operation
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    /// The current node, if the catalog resolves it
    pub node: Option<Node>,
    /// Choices exposed by the current node
    pub choices: Vec<Choice>,
    /// Conversation history
    pub history: Vec<ChatMessage>,
    /// Collected field values
    pub field_values: HashMap<String, String>,
    /// Pending free-text confirmation, if any
    pub pending_confirmation: Option<PendingConfirmation>,
    /// Render condition
    pub condition: EngineCondition,
    /// Stored value under review when the current node is a confirmation
    pub review_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_ready_on_start() {
        let state = DialogState::new("start");
        assert_eq!(state.current_node_id, "start");
        assert!(state.history.is_empty());
        assert!(state.field_values.is_empty());
        assert!(state.pending_confirmation.is_none());
        assert_eq!(state.condition, EngineCondition::Ready);
    }
}
