//! Free-text intent matching
//!
//! Resolves an arbitrary utterance into one of a node's predefined choices
//! with a calibrated confidence score. Scoring is pure and deterministic:
//! every code path yields a confidence in [0, 1], and total non-matches
//! default toward 0 rather than erroring.
//!
//! Signals, strongest first:
//! 1. exact equality after normalization
//! 2. bidirectional substring containment against the display text
//! 3. keyword containment (numeral keywords weighted up, voice
//!    misrecognition variants weighted down)
//! 4. exclude-keyword suppression
//! 5. edit-distance similarity (below 0.7 only)
//! 6. grapheme-set similarity (below 0.5 only)

pub mod matcher;
pub mod normalize;
pub mod strategy;
pub mod variants;

pub use matcher::{IntentMatcher, MatchResult, MatchType, MatcherConfig};
pub use normalize::normalize;
pub use strategy::{ConfidenceTier, ResponseAction, ResponseStrategy};
