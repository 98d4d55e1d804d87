//! Node catalog for the kiosk dialog system
//!
//! A flow file describes, per language, a directed graph of dialog nodes:
//! messages, choice prompts, validated inputs, confirmations and QR panels.
//! Nodes reference each other by string id only; edges are resolved by table
//! lookup at transition time, so cycles need no special handling.
//!
//! The catalog is data. Interpreting it is the engine crate's job.

pub mod flow;
pub mod node;
pub mod provider;
pub mod sample;

pub use flow::{ChatFlow, FlowSettings, LanguageFlow};
pub use node::{Choice, Node, NodeId, NodeKind};
pub use provider::{FlowProvider, SharedFlow};

use thiserror::Error;

/// Errors when loading or validating a flow file
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Flow file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse flow file: {0}")]
    Parse(String),

    #[error("Node {id}: {message}")]
    InvalidNode { id: String, message: String },

    #[error("Flow has no catalog for language: {0}")]
    MissingLanguage(String),
}
