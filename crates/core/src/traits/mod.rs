//! Adapter traits for external collaborators

mod speech;

pub use speech::{SpeechToText, UtteranceStream, VoiceOutput};
