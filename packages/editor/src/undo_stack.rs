//! # Undo/Redo Stack
//!
//! Tracks transaction history and replays it in either direction.
//!
//! ## Design
//!
//! - Each edit produces a [`Transaction`]: the operations one orchestrator
//!   call recorded, in the order they happened
//! - Undo applies each operation's inverse, last operation first, and moves
//!   the transaction to the redo stack
//! - Redo reapplies the operations in their original order
//! - New transactions clear the redo stack
//! - Replay calls the stores with `record = false`, so history never records
//!   itself
//! - Supports batched edits (several orchestrator calls as one undo step)

use crate::{MetaStore, NodeStore, NodeUpdate, Operation, OperationPayload};

/// The operations recorded for one logical edit
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The operations in this transaction (in application order)
    pub operations: Vec<Operation>,

    /// Optional description of this transaction
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Undo/redo stacks for the node and meta stores
#[derive(Debug)]
pub struct UndoManager {
    /// Stack of applied transactions (most recent last)
    undo_stack: Vec<Transaction>,

    /// Stack of undone transactions (most recent last)
    redo_stack: Vec<Transaction>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<Transaction>,
}

impl UndoManager {
    /// Create an undo manager with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo manager with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the operations of one edit. Empty edits are ignored.
    pub(crate) fn add_transaction(&mut self, operations: Vec<Operation>) {
        if operations.is_empty() {
            return;
        }

        if let Some(batch) = &mut self.current_batch {
            batch.operations.extend(operations);
        } else {
            self.push_transaction(Transaction::new(operations));
        }
    }

    /// Start a batch of edits (will be undone/redone together)
    pub(crate) fn begin_batch(&mut self) {
        self.end_batch();
        self.current_batch = Some(Transaction::new(Vec::new()));
    }

    /// End the current batch and push it to the undo stack
    pub(crate) fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.is_empty() {
                self.push_transaction(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub(crate) fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_transaction(&mut self, transaction: Transaction) {
        tracing::trace!(operations = transaction.len(), "transaction recorded");
        self.undo_stack.push(transaction);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent transaction. Returns false if there was none.
    pub(crate) fn undo(&mut self, tree: &mut NodeStore, meta: &mut MetaStore) -> bool {
        let Some(transaction) = self.undo_stack.pop() else {
            return false;
        };

        for operation in transaction.operations.iter().rev() {
            Self::apply(operation, Direction::Inverse, tree, meta);
        }

        tracing::debug!(operations = transaction.len(), "transaction undone");
        self.redo_stack.push(transaction);
        true
    }

    /// Redo the most recently undone transaction. Returns false if there
    /// was none.
    pub(crate) fn redo(&mut self, tree: &mut NodeStore, meta: &mut MetaStore) -> bool {
        let Some(transaction) = self.redo_stack.pop() else {
            return false;
        };

        for operation in &transaction.operations {
            Self::apply(operation, Direction::Forward, tree, meta);
        }

        tracing::debug!(operations = transaction.len(), "transaction redone");
        self.undo_stack.push(transaction);
        true
    }

    fn apply(operation: &Operation, direction: Direction, tree: &mut NodeStore, meta: &mut MetaStore) {
        use Direction::{Forward, Inverse};

        match (&operation.payload, direction) {
            (OperationPayload::AddNode { node }, Forward) => {
                tree.add_node(node.clone(), node.parent.as_deref(), false);
            }
            (OperationPayload::AddNode { node }, Inverse) => {
                tree.delete_node(&node.id, false);
            }

            (OperationPayload::DeleteNode { deleted_node }, Forward) => {
                tree.delete_node(&deleted_node.id, false);
            }
            (OperationPayload::DeleteNode { deleted_node }, Inverse) => {
                tree.add_node(deleted_node.clone(), deleted_node.parent.as_deref(), false);
            }

            (OperationPayload::UpdateNode { id, updates, .. }, Forward) => {
                tree.update_node(id, updates.clone(), false);
            }
            (OperationPayload::UpdateNode { id, old_node, .. }, Inverse) => {
                tree.update_node(id, old_node.clone(), false);
            }

            (OperationPayload::ReplaceNode { old_node, new_node, .. }, Forward) => {
                tree.replace_node(&old_node.id, new_node.clone(), false);
            }
            (OperationPayload::ReplaceNode { old_node, new_node, displaced }, Inverse) => {
                tree.replace_node(&new_node.id, old_node.clone(), false);
                for node in displaced {
                    tree.add_node(node.clone(), node.parent.as_deref(), false);
                }
            }

            (OperationPayload::PasteNode { pasted_nodes, parent_node_id, .. }, Forward) => {
                tree.paste_node(parent_node_id, pasted_nodes, false);
            }
            (
                OperationPayload::PasteNode {
                    pasted_nodes,
                    parent_node_id,
                    old_parent_children,
                },
                Inverse,
            ) => {
                if let Some(root) = pasted_nodes.last() {
                    tree.delete_node(&root.id, false);
                }
                tree.update_node(
                    parent_node_id,
                    NodeUpdate::new().with_children(old_parent_children.iter().cloned()),
                    false,
                );
            }

            (OperationPayload::AddMeta { meta: added, .. }, Forward) => {
                meta.add_meta(added.clone(), false);
            }
            (OperationPayload::AddMeta { meta: added, previous }, Inverse) => {
                meta.delete_meta(&added.id, false);
                if let Some(previous) = previous {
                    meta.add_meta(previous.clone(), false);
                }
            }

            (OperationPayload::DeleteMeta { deleted_meta }, Forward) => {
                meta.delete_meta(&deleted_meta.id, false);
            }
            (OperationPayload::DeleteMeta { deleted_meta }, Inverse) => {
                meta.add_meta(deleted_meta.clone(), false);
            }

            (OperationPayload::UpdateMeta { id, updates, .. }, Forward) => {
                meta.update_meta(id, updates.clone(), false);
            }
            (OperationPayload::UpdateMeta { id, old_meta, .. }, Inverse) => {
                meta.update_meta(id, old_meta.clone(), false);
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Transactions that can be undone, oldest first
    pub fn undo_transactions(&self) -> &[Transaction] {
        &self.undo_stack
    }

    /// Transactions that can be redone, next redo last
    pub fn redo_transactions(&self) -> &[Transaction] {
        &self.redo_stack
    }

    /// Clear all undo/redo history
    pub(crate) fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo transaction
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|transaction| transaction.description.as_deref())
    }

    /// Get description of the next redo transaction
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|transaction| transaction.description.as_deref())
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Meta, Node};

    struct Fixture {
        tree: NodeStore,
        meta: MetaStore,
        history: UndoManager,
    }

    impl Fixture {
        fn new(max_levels: usize) -> Self {
            Self {
                tree: NodeStore::new(),
                meta: MetaStore::new(),
                history: UndoManager::with_max_levels(max_levels),
            }
        }

        fn add(&mut self, id: &str, parent: Option<&str>) {
            let ops = self.tree.add_node(Node::new(id), parent, true);
            self.history.add_transaction(ops);
        }

        fn undo(&mut self) -> bool {
            self.history.undo(&mut self.tree, &mut self.meta)
        }

        fn redo(&mut self) -> bool {
            self.history.redo(&mut self.tree, &mut self.meta)
        }
    }

    #[test]
    fn test_undo_manager_creation() {
        let history = UndoManager::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_transaction_is_ignored() {
        let mut history = UndoManager::new();
        history.add_transaction(Vec::new());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_and_redo_on_empty_stacks() {
        let mut fixture = Fixture::new(0);
        assert!(!fixture.undo());
        assert!(!fixture.redo());
    }

    #[test]
    fn test_apply_and_undo_add() {
        let mut fixture = Fixture::new(0);
        fixture.add("root", None);
        fixture.add("child", Some("root"));

        assert!(fixture.undo());
        assert!(!fixture.tree.contains("child"));
        assert!(fixture.tree.get("root").unwrap().children.is_empty());
        assert_eq!(fixture.history.redo_levels(), 1);

        assert!(fixture.redo());
        assert_eq!(fixture.tree.get("root").unwrap().children, vec!["child"]);
        assert_eq!(fixture.history.undo_levels(), 2);
        assert_eq!(fixture.history.redo_levels(), 0);
    }

    #[test]
    fn test_replay_does_not_record() {
        let mut fixture = Fixture::new(0);
        fixture.add("root", None);

        fixture.undo();
        fixture.redo();
        fixture.undo();

        assert_eq!(fixture.history.undo_levels(), 0);
        assert_eq!(fixture.history.redo_levels(), 1);
    }

    #[test]
    fn test_new_transaction_clears_redo() {
        let mut fixture = Fixture::new(0);
        fixture.add("a", None);
        fixture.undo();
        assert_eq!(fixture.history.redo_levels(), 1);

        fixture.add("b", None);
        assert_eq!(fixture.history.redo_levels(), 0);
        assert!(!fixture.redo());
        assert!(!fixture.tree.contains("a"));
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut fixture = Fixture::new(2);
        for id in ["a", "b", "c"] {
            fixture.add(id, None);
        }

        // Should only keep 2 (max levels)
        assert_eq!(fixture.history.undo_levels(), 2);
        fixture.undo();
        fixture.undo();
        assert!(!fixture.undo());
        assert!(fixture.tree.contains("a"));
    }

    #[test]
    fn test_batched_transactions() {
        let mut fixture = Fixture::new(0);
        fixture.history.begin_batch();
        fixture.history.set_batch_description("Build header");
        fixture.add("header", None);
        fixture.add("logo", Some("header"));
        fixture.history.end_batch();

        assert_eq!(fixture.history.undo_levels(), 1);
        assert_eq!(fixture.history.undo_description(), Some("Build header"));

        fixture.undo();
        assert!(fixture.tree.is_empty());
        assert_eq!(fixture.history.redo_description(), Some("Build header"));
    }

    #[test]
    fn test_empty_batch_is_discarded() {
        let mut history = UndoManager::new();
        history.begin_batch();
        history.end_batch();

        assert!(!history.is_batching());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_meta_replay() {
        let mut fixture = Fixture::new(0);
        let ops = fixture.meta.add_meta(Meta::new("m").with_property("text", "hi"), true);
        fixture.history.add_transaction(ops);

        fixture.undo();
        assert!(!fixture.meta.contains("m"));

        fixture.redo();
        assert_eq!(
            fixture.meta.get("m").unwrap().property("text"),
            Some(&trellis_serializer::Value::from("hi"))
        );
    }

    #[test]
    fn test_clear() {
        let mut fixture = Fixture::new(0);
        fixture.add("a", None);
        fixture.add("b", None);
        fixture.undo();

        fixture.history.clear();
        assert!(!fixture.history.can_undo());
        assert!(!fixture.history.can_redo());
    }
}
