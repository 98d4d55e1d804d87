//! Confidence-tier response strategy
//!
//! Maps the best match's confidence onto the action the engine should take:
//! act immediately, ask for confirmation, offer alternatives, or give up.

use serde::{Deserialize, Serialize};

use crate::matcher::{MatchResult, MatcherConfig};

/// Coarse confidence banding against the configured thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl MatcherConfig {
    /// Band a confidence score against the thresholds
    pub fn confidence_tier(&self, confidence: f32) -> ConfidenceTier {
        if confidence >= self.high_confidence_threshold {
            ConfidenceTier::High
        } else if confidence >= self.medium_confidence_threshold {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// What the engine should do with a free-text utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    /// Transition immediately on the best match
    Direct,
    /// Ask the user to confirm the best match
    Confirmation,
    /// Offer the top ranked alternatives
    Choices,
    /// Generic reprompt
    Fallback,
}

/// Strategy mapping a match result to a response action
pub struct ResponseStrategy;

impl ResponseStrategy {
    pub fn determine(best: Option<&MatchResult>, config: &MatcherConfig) -> ResponseAction {
        let Some(best) = best else {
            return ResponseAction::Fallback;
        };

        if best.confidence <= 0.0 {
            return ResponseAction::Fallback;
        }

        match config.confidence_tier(best.confidence) {
            ConfidenceTier::High => ResponseAction::Direct,
            ConfidenceTier::Medium => ResponseAction::Confirmation,
            ConfidenceTier::Low => ResponseAction::Choices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchType;
    use kiosk_dialog_flow::Choice;

    fn result_with(confidence: f32) -> MatchResult {
        MatchResult {
            choice: Choice::new("a", "Deposit", "next"),
            confidence,
            matched_keywords: vec![],
            match_type: MatchType::Keyword,
        }
    }

    #[test]
    fn default_threshold_bands() {
        let config = MatcherConfig::default();
        assert_eq!(
            ResponseStrategy::determine(Some(&result_with(0.85)), &config),
            ResponseAction::Direct
        );
        assert_eq!(
            ResponseStrategy::determine(Some(&result_with(0.6)), &config),
            ResponseAction::Confirmation
        );
        assert_eq!(
            ResponseStrategy::determine(Some(&result_with(0.3)), &config),
            ResponseAction::Choices
        );
        assert_eq!(
            ResponseStrategy::determine(Some(&result_with(0.0)), &config),
            ResponseAction::Fallback
        );
        assert_eq!(
            ResponseStrategy::determine(None, &config),
            ResponseAction::Fallback
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        let config = MatcherConfig::default();
        assert_eq!(config.confidence_tier(0.8), ConfidenceTier::High);
        assert_eq!(config.confidence_tier(0.5), ConfidenceTier::Medium);
        assert_eq!(config.confidence_tier(0.49), ConfidenceTier::Low);
    }

    #[test]
    fn custom_thresholds_shift_bands() {
        let config = MatcherConfig {
            high_confidence_threshold: 0.9,
            medium_confidence_threshold: 0.7,
            ..MatcherConfig::default()
        };
        assert_eq!(
            ResponseStrategy::determine(Some(&result_with(0.85)), &config),
            ResponseAction::Confirmation
        );
    }
}
