//! Error types shared across the workspace

use thiserror::Error;

/// Core errors surfaced by adapter implementations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Voice output error: {0}")]
    VoiceOutput(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Adapter unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
