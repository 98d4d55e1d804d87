//! Language definitions for the kiosk catalogs

use serde::{Deserialize, Serialize};

/// Languages a node catalog can be authored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Japanese
    #[default]
    Ja,
    /// English
    En,
}

impl Language {
    /// ISO 639-1 code
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    /// Parse from a language code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Some(Language::Ja),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
