//! Engine configuration
//!
//! `EngineConfig` carries the graph anchors and timing knobs with defaults
//! matching the deployed banking flow. `EngineSettings` layers an optional
//! settings file under `KIOSK_*` environment overrides for hosts that want
//! file-driven configuration.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use kiosk_dialog_core::Language;
use kiosk_dialog_matcher::MatcherConfig;

use crate::EngineError;

/// Dialog engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Node the session starts on (and returns to on reset)
    #[serde(default = "default_start_node")]
    pub start_node: String,

    /// Fallback successor for input/confirmation nodes with no `next`
    #[serde(default = "default_end_node")]
    pub end_node: String,

    /// Node a declined confirmation backtracks to
    #[serde(default = "default_restart_node")]
    pub restart_node: String,

    /// Node an over-ceiling amount routes to
    #[serde(default = "default_staff_assistance_node")]
    pub staff_assistance_node: String,

    /// Maximum permitted amount before staff assistance takes over
    #[serde(default = "default_amount_ceiling")]
    pub amount_ceiling: u64,

    /// Dwell before a message node advances to its successor (ms)
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,

    /// Pause before reacting to a free-text utterance (ms); 0 disables
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,

    /// Matcher thresholds and toggles
    #[serde(default)]
    pub matcher: MatcherConfig,
}

fn default_start_node() -> String {
    "start".to_string()
}

fn default_end_node() -> String {
    "end".to_string()
}

fn default_restart_node() -> String {
    "transaction_type".to_string()
}

fn default_staff_assistance_node() -> String {
    "staff_assistance_amount".to_string()
}

fn default_amount_ceiling() -> u64 {
    200_000
}

fn default_auto_advance_ms() -> u64 {
    2_000
}

fn default_response_delay_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_node: default_start_node(),
            end_node: default_end_node(),
            restart_node: default_restart_node(),
            staff_assistance_node: default_staff_assistance_node(),
            amount_ceiling: default_amount_ceiling(),
            auto_advance_ms: default_auto_advance_ms(),
            response_delay_ms: default_response_delay_ms(),
            matcher: MatcherConfig::default(),
        }
    }
}

/// Host-level settings file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineSettings {
    /// Active catalog language
    #[serde(default)]
    pub language: Language,

    /// Path to the flow file to load, if any
    #[serde(default)]
    pub flow_path: Option<String>,

    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

impl EngineSettings {
    /// Load settings from an optional file plus `KIOSK_*` environment
    /// variables (e.g. `KIOSK_ENGINE__AMOUNT_CEILING=100000`)
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config/kiosk").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("KIOSK").separator("__"))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| EngineError::Settings(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_flow() {
        let config = EngineConfig::default();
        assert_eq!(config.start_node, "start");
        assert_eq!(config.restart_node, "transaction_type");
        assert_eq!(config.staff_assistance_node, "staff_assistance_amount");
        assert_eq!(config.amount_ceiling, 200_000);
        assert_eq!(config.auto_advance_ms, 2_000);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"amount_ceiling": 100000}"#).unwrap();
        assert_eq!(config.amount_ceiling, 100_000);
        assert_eq!(config.start_node, "start");
        assert_eq!(config.matcher.high_confidence_threshold, 0.8);
    }

    #[test]
    fn settings_load_without_file() {
        let settings = EngineSettings::load(None).unwrap();
        assert_eq!(settings.engine.amount_ceiling, 200_000);
    }
}
