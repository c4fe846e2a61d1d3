//! Structural tree records.
//!
//! Nodes never hold each other: children and parent are ids resolved through
//! the [`crate::NodeStore`], so the store is the only owner.

use serde::{Deserialize, Deserializer, Serialize};

/// A node in the structural tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    /// Child ids, in order
    #[serde(default)]
    pub children: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Partial node: the fields to overwrite in an update.
///
/// `None` leaves a field untouched. For `parent`, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub parent: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from a missing field
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_none() && self.parent.is_none()
    }

    /// Prior values of exactly the fields this update sets
    pub(crate) fn capture(&self, node: &Node) -> NodeUpdate {
        NodeUpdate {
            children: self.children.as_ref().map(|_| node.children.clone()),
            parent: self.parent.as_ref().map(|_| node.parent.clone()),
        }
    }

    pub(crate) fn apply_to(&self, node: &mut Node) {
        if let Some(children) = &self.children {
            node.children = children.clone();
        }
        if let Some(parent) = &self.parent {
            node.parent = parent.clone();
        }
    }
}
