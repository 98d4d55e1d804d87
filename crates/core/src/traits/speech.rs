//! Speech adapter traits
//!
//! The dialog engine never touches audio. Recognition and playback live
//! behind these interfaces; the host process wires concrete backends in.

use crate::{Language, Result};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of recognized utterances
pub type UtteranceStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// Speech-to-text interface
///
/// Implementations capture audio however they like and yield recognized
/// utterance strings; the engine is agnostic to how they were produced.
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Recognize a single utterance (one listen window)
    async fn recognize(&self, language: Language) -> Result<String>;

    /// Stream utterances continuously until the stream is dropped
    fn recognize_stream<'a>(&'a self, language: Language) -> UtteranceStream<'a>;

    /// Get supported languages
    fn supported_languages(&self) -> &[Language];

    /// Check if a specific language is supported
    fn supports_language(&self, lang: Language) -> bool {
        self.supported_languages().contains(&lang)
    }
}

/// Voice output interface
///
/// For each new bot history entry the engine exposes the text and an
/// optional opaque voice asset key; resolving the key to an audio asset and
/// playing it is entirely the adapter's responsibility.
#[async_trait]
pub trait VoiceOutput: Send + Sync + 'static {
    /// Speak the given text, preferring the pre-generated asset when a key
    /// is provided
    async fn speak(&self, text: &str, language: Language, voice_key: Option<&str>) -> Result<()>;

    /// Stop any in-progress playback
    fn stop(&self);

    /// Whether playback is currently in progress
    fn is_speaking(&self) -> bool;
}
