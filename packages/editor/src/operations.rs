//! # Operations
//!
//! An [`Operation`] records one atomic store mutation together with the
//! pre-image needed to invert it exactly.
//!
//! ## Inversion
//!
//! | Payload       | Forward                        | Inverse                                      |
//! |---------------|--------------------------------|----------------------------------------------|
//! | `AddNode`     | add `node` under `node.parent` | delete `node.id`                             |
//! | `DeleteNode`  | delete `deleted_node.id`       | add `deleted_node` under its parent          |
//! | `UpdateNode`  | apply `updates`                | apply `old_node`                             |
//! | `ReplaceNode` | replace old with new           | replace new with old, re-add `displaced`     |
//! | `PasteNode`   | paste under `parent_node_id`   | delete pasted root, restore parent children  |
//! | `AddMeta`     | add `meta`                     | delete `meta.id`, re-add `previous`          |
//! | `DeleteMeta`  | delete `deleted_meta.id`       | add `deleted_meta`                           |
//! | `UpdateMeta`  | apply `updates`                | apply `old_meta`                             |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Meta, MetaUpdate, Node, NodeUpdate};

/// Store an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationSource {
    Tree,
    Meta,
}

/// Operation type, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    AddNode,
    DeleteNode,
    UpdateNode,
    ReplaceNode,
    PasteNode,
    AddMeta,
    DeleteMeta,
    UpdateMeta,
}

/// Forward data plus inversion pre-image, one shape per operation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperationPayload {
    AddNode {
        node: Node,
    },

    DeleteNode {
        deleted_node: Node,
    },

    UpdateNode {
        id: String,
        updates: NodeUpdate,
        /// Prior values of the updated fields only
        old_node: NodeUpdate,
    },

    ReplaceNode {
        old_node: Node,
        new_node: Node,
        /// Descendants of `old_node` removed by the replacement, breadth-first
        displaced: Vec<Node>,
    },

    PasteNode {
        /// Descendants before ancestors; the pasted root is last
        pasted_nodes: Vec<Node>,
        parent_node_id: String,
        old_parent_children: Vec<String>,
    },

    AddMeta {
        meta: Meta,
        /// Record overwritten by this add, if the id was taken
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<Meta>,
    },

    DeleteMeta {
        deleted_meta: Meta,
    },

    UpdateMeta {
        id: String,
        updates: MetaUpdate,
        old_meta: MetaUpdate,
    },
}

/// One atomic, invertible store mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub timestamp: DateTime<Utc>,
    pub payload: OperationPayload,
}

impl Operation {
    pub fn new(payload: OperationPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn source(&self) -> OperationSource {
        match self.payload {
            OperationPayload::AddNode { .. }
            | OperationPayload::DeleteNode { .. }
            | OperationPayload::UpdateNode { .. }
            | OperationPayload::ReplaceNode { .. }
            | OperationPayload::PasteNode { .. } => OperationSource::Tree,

            OperationPayload::AddMeta { .. }
            | OperationPayload::DeleteMeta { .. }
            | OperationPayload::UpdateMeta { .. } => OperationSource::Meta,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self.payload {
            OperationPayload::AddNode { .. } => OperationKind::AddNode,
            OperationPayload::DeleteNode { .. } => OperationKind::DeleteNode,
            OperationPayload::UpdateNode { .. } => OperationKind::UpdateNode,
            OperationPayload::ReplaceNode { .. } => OperationKind::ReplaceNode,
            OperationPayload::PasteNode { .. } => OperationKind::PasteNode,
            OperationPayload::AddMeta { .. } => OperationKind::AddMeta,
            OperationPayload::DeleteMeta { .. } => OperationKind::DeleteMeta,
            OperationPayload::UpdateMeta { .. } => OperationKind::UpdateMeta,
        }
    }

    /// Id of the record this operation changes
    pub fn target_id(&self) -> &str {
        match &self.payload {
            OperationPayload::AddNode { node } => &node.id,
            OperationPayload::DeleteNode { deleted_node } => &deleted_node.id,
            OperationPayload::UpdateNode { id, .. } => id,
            OperationPayload::ReplaceNode { old_node, .. } => &old_node.id,
            OperationPayload::PasteNode { parent_node_id, .. } => parent_node_id,
            OperationPayload::AddMeta { meta, .. } => &meta.id,
            OperationPayload::DeleteMeta { deleted_meta } => &deleted_meta.id,
            OperationPayload::UpdateMeta { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_serializer::Handler;

    #[test]
    fn test_source_and_kind_follow_payload() {
        let op = Operation::new(OperationPayload::DeleteNode {
            deleted_node: Node::new("a"),
        });
        assert_eq!(op.source(), OperationSource::Tree);
        assert_eq!(op.kind(), OperationKind::DeleteNode);
        assert_eq!(op.target_id(), "a");

        let op = Operation::new(OperationPayload::AddMeta {
            meta: Meta::new("m"),
            previous: None,
        });
        assert_eq!(op.source(), OperationSource::Meta);
        assert_eq!(op.kind(), OperationKind::AddMeta);
    }

    #[test]
    fn test_operation_serialization() {
        let op = Operation::new(OperationPayload::UpdateMeta {
            id: "m".to_string(),
            updates: MetaUpdate::new().with_function_fields(None),
            old_meta: MetaUpdate::new().with_function_fields(Some(vec!["onClick".to_string()])),
        });

        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""type":"UpdateMeta""#));

        let deserialized: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, deserialized);
    }

    #[test]
    fn test_handlers_serialize_as_source() {
        let op = Operation::new(OperationPayload::AddMeta {
            meta: Meta::new("m").with_event("click", Handler::new("() => go()")),
            previous: None,
        });

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["payload"]["meta"]["events"]["click"], "() => go()");
    }
}
