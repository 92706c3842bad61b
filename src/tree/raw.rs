use serde::{Deserialize, Serialize};

/// Owned, serializable tree node as produced by an external parser dump or
/// written out by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Creates a leaf carrying `token`.
    pub fn leaf(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: Some(token.into()),
            children: Vec::new(),
        }
    }

    /// Creates an inner node with the given children.
    pub fn inner(label: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            label: label.into(),
            token: None,
            children,
        }
    }
}
