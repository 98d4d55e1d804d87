//! Dialog node and choice types
//!
//! On disk a node is a flat object (`type` plus optional `next`/`choices`/
//! `field`/`label`), matching the flow asset format. In memory the kind is a
//! tagged union so that illegal field combinations cannot be represented:
//! only choice nodes carry choices, only input/confirmation nodes carry a
//! field.

use serde::{Deserialize, Serialize};

use crate::FlowError;

/// Nodes reference each other by id only
pub type NodeId = String;

/// One selectable option attached to a choice node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Choice id, unique within the node
    pub id: String,
    /// Display text, also used for exact/partial matching
    pub text: String,
    /// Keywords for free-text matching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Keywords that suppress this choice when present in the utterance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_keywords: Vec<String>,
    /// Node to transition to when selected
    pub next: NodeId,
}

impl Choice {
    /// Create a plain choice without keywords
    pub fn new(id: impl Into<String>, text: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            next: next.into(),
        }
    }

    /// Attach free-text keywords
    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Attach exclude keywords
    pub fn with_exclude_keywords<S: Into<String>>(
        mut self,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.exclude_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Kind-specific node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Bot message; auto-advances to `next` after the dwell interval
    Message { next: Option<NodeId> },
    /// Choice prompt; waits for a selection or a free-text utterance
    Choice { choices: Vec<Choice> },
    /// Validated input field
    Input {
        field: Option<String>,
        label: Option<String>,
        next: Option<NodeId>,
    },
    /// Review of a previously collected field value
    Confirmation {
        field: Option<String>,
        label: Option<String>,
        next: Option<NodeId>,
    },
    /// QR panel rendered by the host; presentation only
    QrDisplay { next: Option<NodeId> },
}

impl NodeKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Message { .. } => "message",
            NodeKind::Choice { .. } => "choice",
            NodeKind::Input { .. } => "input",
            NodeKind::Confirmation { .. } => "confirmation",
            NodeKind::QrDisplay { .. } => "qr_display",
        }
    }
}

/// One step of the dialog graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    /// Unique id within the language's catalog
    pub id: NodeId,
    /// Display/spoken text for this step
    pub content: String,
    /// Optional kana reading for speech synthesis
    pub reading: Option<String>,
    /// Opaque voice asset key for pre-generated audio
    pub voice_file: Option<String>,
    /// Kind-specific payload
    pub kind: NodeKind,
}

impl Node {
    /// The graph-declared successor, if this kind has one
    pub fn next(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Message { next }
            | NodeKind::Input { next, .. }
            | NodeKind::Confirmation { next, .. }
            | NodeKind::QrDisplay { next } => next.as_deref(),
            NodeKind::Choice { .. } => None,
        }
    }

    /// Choices exposed by this node (empty for non-choice kinds)
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            NodeKind::Choice { choices } => choices,
            _ => &[],
        }
    }

    /// Field name for input/confirmation kinds, falling back to the node id
    pub fn field_or_id(&self) -> &str {
        match &self.kind {
            NodeKind::Input { field, .. } | NodeKind::Confirmation { field, .. } => {
                field.as_deref().unwrap_or(&self.id)
            },
            _ => &self.id,
        }
    }

    /// Find a choice by id
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices().iter().find(|c| c.id == choice_id)
    }
}

/// Flat on-disk representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    voice_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<Choice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl TryFrom<RawNode> for Node {
    type Error = FlowError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let invalid = |message: &str| FlowError::InvalidNode {
            id: raw.id.clone(),
            message: message.to_string(),
        };

        let kind = match raw.node_type.as_str() {
            "message" => {
                if raw.choices.is_some() {
                    return Err(invalid("message nodes cannot carry choices"));
                }
                NodeKind::Message {
                    next: raw.next.clone(),
                }
            },
            "choice" => {
                let choices = raw
                    .choices
                    .clone()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| invalid("choice nodes require a non-empty choices list"))?;
                NodeKind::Choice { choices }
            },
            "input" => {
                if raw.choices.is_some() {
                    return Err(invalid("input nodes cannot carry choices"));
                }
                NodeKind::Input {
                    field: raw.field.clone(),
                    label: raw.label.clone(),
                    next: raw.next.clone(),
                }
            },
            "confirmation" => {
                if raw.choices.is_some() {
                    return Err(invalid("confirmation nodes cannot carry choices"));
                }
                NodeKind::Confirmation {
                    field: raw.field.clone(),
                    label: raw.label.clone(),
                    next: raw.next.clone(),
                }
            },
            "qr_display" => NodeKind::QrDisplay {
                next: raw.next.clone(),
            },
            other => {
                return Err(FlowError::InvalidNode {
                    id: raw.id,
                    message: format!("unknown node type: {other}"),
                });
            },
        };

        Ok(Node {
            id: raw.id,
            content: raw.content,
            reading: raw.reading,
            voice_file: raw.voice_file,
            kind,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let node_type = node.kind.as_str().to_string();
        let (next, choices, field, label) = match node.kind {
            NodeKind::Message { next } => (next, None, None, None),
            NodeKind::Choice { choices } => (None, Some(choices), None, None),
            NodeKind::Input { field, label, next } => (next, None, field, label),
            NodeKind::Confirmation { field, label, next } => (next, None, field, label),
            NodeKind::QrDisplay { next } => (next, None, None, None),
        };

        RawNode {
            id: node.id,
            node_type,
            content: node.content,
            reading: node.reading,
            voice_file: node.voice_file,
            next,
            choices,
            field,
            label,
        }
    }
}
