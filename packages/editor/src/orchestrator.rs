//! # Orchestrator
//!
//! The sanctioned write path for an editing session.
//!
//! Every transactional method runs one store mutation with recording
//! enabled and hands the returned operations to the [`UndoManager`] as a
//! single transaction. Edits that change nothing (unknown ids, empty
//! pastes) leave history untouched.
//!
//! ## Lifecycle
//!
//! ```text
//! edit → store (record = true) → Vec<Operation> → UndoManager
//! undo/redo → UndoManager → store (record = false)
//! ```

use std::sync::Arc;

use trellis_serializer::Serializer;

use crate::{
    EditorConfig, IdGenerator, Meta, MetaStore, MetaUpdate, Node, NodeStore, NodeUpdate, Operation,
    SerializedMeta, UndoManager,
};

/// Editing session over one node tree and its metadata
#[derive(Debug)]
pub struct Orchestrator {
    /// Increments on every recorded edit, undo and redo
    pub version: u64,

    tree: NodeStore,
    meta: MetaStore,
    history: UndoManager,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_serializer(config, Arc::new(Serializer::new()))
    }

    /// Create an orchestrator whose meta store converts values with
    /// `serializer`
    pub fn with_serializer(config: EditorConfig, serializer: Arc<Serializer>) -> Self {
        Self {
            version: 0,
            tree: NodeStore::with_id_generator(IdGenerator::new(config.copy_id_prefix)),
            meta: MetaStore::with_serializer(serializer),
            history: UndoManager::with_max_levels(config.max_undo_levels),
        }
    }

    pub fn tree(&self) -> &NodeStore {
        &self.tree
    }

    pub fn meta_store(&self) -> &MetaStore {
        &self.meta
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    /// Run a recording store call and push what it recorded.
    /// Returns whether anything changed.
    fn execute<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut NodeStore, &mut MetaStore) -> Vec<Operation>,
    {
        let operations = edit(&mut self.tree, &mut self.meta);
        if operations.is_empty() {
            return false;
        }

        self.history.add_transaction(operations);
        self.version += 1;
        true
    }

    /// Insert `node` under `parent_id` (or under `node.parent` when `None`)
    pub fn add_node(&mut self, node: Node, parent_id: Option<&str>) -> bool {
        self.execute(|tree, _| tree.add_node(node, parent_id, true))
    }

    /// Delete `id` and its subtree
    pub fn delete_node(&mut self, id: &str) -> bool {
        self.execute(|tree, _| tree.delete_node(id, true))
    }

    pub fn update_node(&mut self, id: &str, updates: NodeUpdate) -> bool {
        self.execute(|tree, _| tree.update_node(id, updates, true))
    }

    pub fn replace_node(&mut self, id: &str, new_node: Node) -> bool {
        self.execute(|tree, _| tree.replace_node(id, new_node, true))
    }

    /// Clone the subtree at `id` under fresh ids. Mutates nothing.
    pub fn copy_node(&self, id: &str) -> Vec<Node> {
        self.tree.copy_node(id)
    }

    /// Attach nodes produced by [`Orchestrator::copy_node`] under `parent_id`
    pub fn paste_node(&mut self, parent_id: &str, nodes: &[Node]) -> bool {
        self.execute(|tree, _| tree.paste_node(parent_id, nodes, true))
    }

    pub fn add_meta(&mut self, meta: Meta) -> bool {
        self.execute(|_, metas| metas.add_meta(meta, true))
    }

    /// Decode `serialized` with the meta store's serializer and add it
    pub fn add_serialized_meta(&mut self, serialized: &SerializedMeta) -> bool {
        let meta = self.meta.deserialize(serialized);
        self.add_meta(meta)
    }

    pub fn delete_meta(&mut self, id: &str) -> bool {
        self.execute(|_, metas| metas.delete_meta(id, true))
    }

    pub fn update_meta(&mut self, id: &str, updates: MetaUpdate) -> bool {
        self.execute(|_, metas| metas.update_meta(id, updates, true))
    }

    /// Serialized form of the meta stored under `id`
    pub fn serialize_meta(&self, id: &str) -> Option<SerializedMeta> {
        self.meta.get(id).map(|meta| self.meta.serialize(meta))
    }

    /// Undo the last transaction. An open batch is closed first.
    pub fn undo(&mut self) -> bool {
        self.history.end_batch();
        let undone = self.history.undo(&mut self.tree, &mut self.meta);
        if undone {
            self.version += 1;
        }
        undone
    }

    /// Redo the last undone transaction. An open batch is closed first.
    pub fn redo(&mut self) -> bool {
        self.history.end_batch();
        let redone = self.history.redo(&mut self.tree, &mut self.meta);
        if redone {
            self.version += 1;
        }
        redone
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        self.history.set_batch_description(description);
    }

    /// Forget all undo/redo history. Store contents are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperationKind;

    #[test]
    fn test_noop_edits_record_nothing() {
        let mut editor = Orchestrator::new();

        assert!(!editor.delete_node("missing"));
        assert!(!editor.update_node("missing", NodeUpdate::new().with_children(["x"])));
        assert!(!editor.replace_node("missing", Node::new("x")));
        assert!(!editor.paste_node("missing", &[Node::new("x")]));
        assert!(!editor.update_meta("missing", MetaUpdate::new()));
        assert!(!editor.delete_meta("missing"));

        assert!(!editor.history().can_undo());
        assert_eq!(editor.version, 0);
    }

    #[test]
    fn test_one_transaction_per_edit() {
        let mut editor = Orchestrator::new();
        editor.add_node(Node::new("root"), None);
        editor.add_node(Node::new("child"), Some("root"));

        let history = editor.history().undo_transactions();
        assert_eq!(history.len(), 2);

        let kinds: Vec<_> = history[1].operations.iter().map(Operation::kind).collect();
        assert_eq!(kinds, vec![OperationKind::UpdateNode, OperationKind::AddNode]);
        assert_eq!(editor.version, 2);
    }

    #[test]
    fn test_copy_does_not_record() {
        let mut editor = Orchestrator::new();
        editor.add_node(Node::new("root"), None);

        let copied = editor.copy_node("root");
        assert_eq!(copied.len(), 1);
        assert_eq!(editor.history().undo_levels(), 1);
        assert_eq!(editor.tree().len(), 1);
    }

    #[test]
    fn test_copy_ids_use_configured_prefix() {
        let config = EditorConfig {
            copy_id_prefix: "dup".to_string(),
            ..EditorConfig::default()
        };
        let mut editor = Orchestrator::with_config(config);
        editor.add_node(Node::new("root"), None);

        let copied = editor.copy_node("root");
        assert!(copied[0].id.starts_with("dup-"));
    }

    #[test]
    fn test_undo_closes_open_batch() {
        let mut editor = Orchestrator::new();
        editor.begin_batch();
        editor.add_node(Node::new("a"), None);
        editor.add_node(Node::new("b"), None);

        assert!(editor.undo());
        assert!(editor.tree().is_empty());
        assert!(!editor.history().is_batching());
    }

    #[test]
    fn test_clear_history_keeps_contents() {
        let mut editor = Orchestrator::new();
        editor.add_node(Node::new("a"), None);
        editor.clear_history();

        assert!(!editor.undo());
        assert!(editor.tree().contains("a"));
    }
}
