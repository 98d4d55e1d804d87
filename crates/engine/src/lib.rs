//! Dialog engine for guided kiosk conversations
//!
//! Walks a directed graph of dialog nodes under the guidance of the intent
//! matcher: messages auto-advance after a dwell interval, choice prompts
//! accept taps or free-text utterances, inputs are validated before they are
//! stored, and confirmations can backtrack to the transaction menu.
//!
//! All state lives in an atomically replaced snapshot; the only asynchrony
//! is the dwell timer and the conversational response delay, both keyed to
//! the identity of the node that scheduled them.

pub mod config;
pub mod engine;
pub mod prompts;
pub mod state;

pub use config::{EngineConfig, EngineSettings};
pub use engine::{DialogEngine, EngineEvent};
pub use state::{DialogState, EngineCondition, EngineSnapshot, PendingConfirmation};

use thiserror::Error;

/// Engine errors
///
/// Validation failures block the transition and never mutate history or
/// field values. Amounts above the ceiling are not errors; they route to the
/// staff-assistance node. A dangling node reference is not an error either;
/// it surfaces as [`EngineCondition::Idle`] on the snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{field} must not be empty")]
    EmptyInput { field: String },

    #[error("{field} must be a positive whole amount")]
    InvalidAmount { field: String },

    #[error("unknown choice: {0}")]
    UnknownChoice(String),

    #[error("no pending confirmation to resolve")]
    NoPendingConfirmation,

    #[error("settings error: {0}")]
    Settings(String),
}
