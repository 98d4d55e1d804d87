//! Flow file parsing and the per-language node table

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use kiosk_dialog_core::Language;

use crate::node::{Node, NodeId};
use crate::FlowError;

/// Per-language presentation settings carried alongside the nodes
///
/// The engine does not interpret these; they are preserved for the host
/// (idle auto-stop, playback speed, QR ticket parameters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSettings {
    #[serde(default = "default_auto_stop_seconds")]
    pub auto_stop_seconds: u32,
    #[serde(default = "default_voice_speed")]
    pub voice_speed: f32,
    #[serde(default)]
    pub qr_password: String,
    #[serde(default = "default_qr_expiry_minutes")]
    pub qr_expiry_minutes: u32,
}

fn default_auto_stop_seconds() -> u32 {
    3
}

fn default_voice_speed() -> f32 {
    1.0
}

fn default_qr_expiry_minutes() -> u32 {
    30
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            auto_stop_seconds: default_auto_stop_seconds(),
            voice_speed: default_voice_speed(),
            qr_password: String::new(),
            qr_expiry_minutes: default_qr_expiry_minutes(),
        }
    }
}

/// One language's node catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageFlow {
    /// Whether the start screen offers a language switch
    #[serde(default)]
    pub language_selection: bool,
    /// Presentation settings
    #[serde(default)]
    pub settings: FlowSettings,
    /// Nodes indexed by id
    pub nodes: HashMap<NodeId, Node>,
}

impl LanguageFlow {
    /// Build directly from nodes (settings default)
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            language_selection: false,
            settings: FlowSettings::default(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node id exists in this catalog
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges whose target id is absent from the catalog
    ///
    /// Dangling references are not load errors: a reference is only a
    /// problem when it is actually reached. This report exists so hosts can
    /// log suspect catalogs up front.
    pub fn dangling_references(&self) -> Vec<(NodeId, NodeId)> {
        let mut dangling = Vec::new();
        for node in self.nodes.values() {
            if let Some(next) = node.next() {
                if !self.contains(next) {
                    dangling.push((node.id.clone(), next.to_string()));
                }
            }
            for choice in node.choices() {
                if !self.contains(&choice.next) {
                    dangling.push((node.id.clone(), choice.next.clone()));
                }
            }
        }
        dangling
    }
}

/// A complete multi-language flow file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFlow {
    /// Flow format version
    #[serde(default)]
    pub version: String,
    /// Site name shown by the host
    #[serde(default)]
    pub store_name: String,
    /// Catalogs keyed by language
    pub languages: HashMap<Language, LanguageFlow>,
}

impl ChatFlow {
    /// Parse a flow from JSON text
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let flow: ChatFlow =
            serde_json::from_str(json).map_err(|e| FlowError::Parse(e.to_string()))?;

        for (language, catalog) in &flow.languages {
            for (from, to) in catalog.dangling_references() {
                tracing::warn!(%language, %from, %to, "flow contains dangling node reference");
            }
        }

        Ok(flow)
    }

    /// Load a flow from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            FlowError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Get the catalog for a language
    pub fn language(&self, language: Language) -> Option<&LanguageFlow> {
        self.languages.get(&language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW_JSON: &str = r#"{
        "version": "1.0",
        "storeName": "Test Branch",
        "languages": {
            "en": {
                "languageSelection": true,
                "settings": {"autoStopSeconds": 5, "voiceSpeed": 1.2},
                "nodes": {
                    "start": {"id": "start", "type": "message", "content": "Welcome", "next": "menu"},
                    "menu": {"id": "menu", "type": "choice", "content": "Pick one",
                             "choices": [{"id": "a", "text": "Deposit", "next": "missing_node"}]}
                }
            }
        }
    }"#;

    #[test]
    fn parses_flow_file() {
        let flow = ChatFlow::from_json(FLOW_JSON).unwrap();
        assert_eq!(flow.store_name, "Test Branch");

        let en = flow.language(Language::En).unwrap();
        assert!(en.language_selection);
        assert_eq!(en.settings.auto_stop_seconds, 5);
        assert_eq!(en.len(), 2);
        assert!(en.contains("start"));
        assert!(flow.language(Language::Ja).is_none());
    }

    #[test]
    fn reports_dangling_references_without_failing() {
        let flow = ChatFlow::from_json(FLOW_JSON).unwrap();
        let en = flow.language(Language::En).unwrap();
        let dangling = en.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0], ("menu".to_string(), "missing_node".to_string()));
    }

    #[test]
    fn settings_default_when_absent() {
        let flow = ChatFlow::from_json(
            r#"{"languages": {"en": {"nodes": {
                "start": {"id": "start", "type": "message", "content": "Hi"}
            }}}}"#,
        )
        .unwrap();
        let settings = &flow.language(Language::En).unwrap().settings;
        assert_eq!(settings.auto_stop_seconds, 3);
        assert_eq!(settings.qr_expiry_minutes, 30);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ChatFlow::from_json("{not json"),
            Err(FlowError::Parse(_))
        ));
    }
}
