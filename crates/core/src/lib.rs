//! Core types for the kiosk dialog system
//!
//! This crate provides the foundational types shared by the other crates:
//! - Language definitions
//! - Chat history types
//! - Error types
//! - Adapter traits for pluggable speech backends (STT, voice output)

pub mod error;
pub mod language;
pub mod message;
pub mod traits;

pub use error::{Error, Result};
pub use language::Language;
pub use message::{ChatMessage, MessageRole};
pub use traits::{SpeechToText, UtteranceStream, VoiceOutput};
