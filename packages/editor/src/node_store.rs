//! # Node Store
//!
//! Owns the structural tree as an arena: every [`Node`] lives in one
//! id-keyed map and refers to its parent and children by id only.
//!
//! ## Recording
//!
//! Each mutator takes a `record` flag. With `record = true` it returns the
//! [`Operation`]s describing the change; with `record = false` it performs
//! the same change silently. The undo manager replays history with
//! `record = false`, which is how undo/redo avoids writing new history.
//!
//! Mutators are crate-private: outside this crate, writes go through the
//! [`crate::Orchestrator`].
//!
//! ## Unknown ids
//!
//! Deleting, updating, replacing or pasting against an unknown id is a
//! silent no-op that returns no operations. So is pasting a clone set whose
//! ids are already present.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{IdGenerator, Node, NodeUpdate, Operation, OperationPayload};

/// Arena of structural nodes
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: HashMap<String, Node>,
    ids: IdGenerator,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose copies draw ids from `ids`
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            nodes: HashMap::new(),
            ids,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// `id` and every descendant present in the store, breadth-first.
    /// Ids reached twice are visited once.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut collected = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                queue.extend(node.children.iter().cloned());
                collected.push(current);
            }
        }

        collected
    }

    /// Insert `node`, attaching it to `parent_id` (or `node.parent`) when
    /// that parent exists. An unknown parent leaves the node unparented.
    pub(crate) fn add_node(&mut self, mut node: Node, parent_id: Option<&str>, record: bool) -> Vec<Operation> {
        let mut operations = Vec::new();
        let effective_parent = parent_id.map(str::to_string).or_else(|| node.parent.clone());

        match effective_parent.as_deref().and_then(|pid| self.nodes.get_mut(pid)) {
            Some(parent) => {
                if !parent.children.contains(&node.id) {
                    let old_children = parent.children.clone();
                    parent.children.push(node.id.clone());

                    if record {
                        operations.push(Operation::new(OperationPayload::UpdateNode {
                            id: parent.id.clone(),
                            updates: NodeUpdate::new().with_children(parent.children.clone()),
                            old_node: NodeUpdate::new().with_children(old_children),
                        }));
                    }
                }
                node.parent = Some(parent.id.clone());
            }
            None => {
                if let Some(pid) = &effective_parent {
                    tracing::debug!(node_id = %node.id, parent_id = %pid, "add_node: parent not found, inserting unparented");
                }
                node.parent = None;
            }
        }

        if record {
            operations.push(Operation::new(OperationPayload::AddNode { node: node.clone() }));
        }
        tracing::trace!(node_id = %node.id, record, "node added");
        self.nodes.insert(node.id.clone(), node);

        operations
    }

    /// Remove `id` and its whole subtree, and detach `id` from its parent.
    ///
    /// Operations come back reversed: the parent's children fix-up first,
    /// then the deletions deepest-first. Undo walks a transaction backwards,
    /// so it re-adds the subtree top-down before restoring the parent's
    /// exact children order.
    pub(crate) fn delete_node(&mut self, id: &str, record: bool) -> Vec<Operation> {
        let Some(parent_id) = self.nodes.get(id).map(|node| node.parent.clone()) else {
            tracing::debug!(node_id = id, "delete_node: node not found");
            return Vec::new();
        };

        let mut operations = Vec::new();
        let doomed = self.subtree_ids(id);

        for node_id in &doomed {
            if let Some(node) = self.nodes.remove(node_id) {
                if record {
                    operations.push(Operation::new(OperationPayload::DeleteNode { deleted_node: node }));
                }
            }
        }

        if let Some(parent) = parent_id.as_deref().and_then(|pid| self.nodes.get_mut(pid)) {
            let old_children = parent.children.clone();
            parent.children.retain(|child| child != id);

            if record {
                operations.push(Operation::new(OperationPayload::UpdateNode {
                    id: parent.id.clone(),
                    updates: NodeUpdate::new().with_children(parent.children.clone()),
                    old_node: NodeUpdate::new().with_children(old_children),
                }));
            }
        }

        tracing::trace!(node_id = id, removed = doomed.len(), record, "subtree deleted");
        operations.reverse();
        operations
    }

    /// Shallow-merge `updates` into the node
    pub(crate) fn update_node(&mut self, id: &str, updates: NodeUpdate, record: bool) -> Vec<Operation> {
        let Some(node) = self.nodes.get_mut(id) else {
            tracing::debug!(node_id = id, "update_node: node not found");
            return Vec::new();
        };

        let old_node = updates.capture(node);
        updates.apply_to(node);

        if record {
            vec![Operation::new(OperationPayload::UpdateNode {
                id: id.to_string(),
                updates,
                old_node,
            })]
        } else {
            Vec::new()
        }
    }

    /// Swap the node `id` (and its subtree) for `new_node`.
    ///
    /// The new node takes the old node's parent and its position among the
    /// parent's children.
    pub(crate) fn replace_node(&mut self, id: &str, mut new_node: Node, record: bool) -> Vec<Operation> {
        let Some(old_node) = self.nodes.get(id).cloned() else {
            tracing::debug!(node_id = id, "replace_node: node not found");
            return Vec::new();
        };

        let displaced: Vec<Node> = self
            .subtree_ids(id)
            .iter()
            .skip(1)
            .filter_map(|descendant| self.nodes.get(descendant).cloned())
            .collect();

        let parent_id = old_node.parent.as_deref();
        let slot = parent_id
            .and_then(|pid| self.nodes.get(pid))
            .and_then(|parent| parent.children.iter().position(|child| child == id));

        self.delete_node(id, false);

        let new_id = new_node.id.clone();
        new_node.parent = None;
        self.add_node(new_node, parent_id, false);

        if let (Some(pid), Some(index)) = (parent_id, slot) {
            if let Some(parent) = self.nodes.get_mut(pid) {
                if let Some(position) = parent.children.iter().rposition(|child| *child == new_id) {
                    let moved = parent.children.remove(position);
                    let index = index.min(parent.children.len());
                    parent.children.insert(index, moved);
                }
            }
        }

        tracing::trace!(old_id = id, new_id = %new_id, record, "node replaced");

        match (record, self.nodes.get(&new_id)) {
            (true, Some(inserted)) => vec![Operation::new(OperationPayload::ReplaceNode {
                old_node,
                new_node: inserted.clone(),
                displaced,
            })],
            _ => Vec::new(),
        }
    }

    /// Clone the subtree rooted at `id` under freshly generated ids.
    ///
    /// Links inside the clone set point at the new ids; the clone of `id`
    /// has no parent. Descendants come before ancestors, so the clone of `id`
    /// is the last element. Returns an empty list for an unknown id.
    pub fn copy_node(&self, id: &str) -> Vec<Node> {
        let mut copies = Vec::new();
        let mut visited = HashSet::new();
        self.copy_recursive(id, None, &mut visited, &mut copies);
        copies
    }

    fn copy_recursive(
        &self,
        id: &str,
        new_parent: Option<&str>,
        visited: &mut HashSet<String>,
        copies: &mut Vec<Node>,
    ) -> Option<String> {
        if !visited.insert(id.to_string()) {
            return None;
        }
        let original = self.nodes.get(id)?;

        let new_id = self.ids.new_id();
        let children = original
            .children
            .iter()
            .filter_map(|child| self.copy_recursive(child, Some(new_id.as_str()), visited, copies))
            .collect();

        copies.push(Node {
            id: new_id.clone(),
            children,
            parent: new_parent.map(str::to_string),
        });
        Some(new_id)
    }

    /// Attach a clone set (root last, as produced by [`NodeStore::copy_node`])
    /// under `parent_id`.
    ///
    /// A clone set whose ids are already in the store (a clipboard pasted
    /// twice) is rejected; copy again to paste another instance.
    pub(crate) fn paste_node(&mut self, parent_id: &str, copied: &[Node], record: bool) -> Vec<Operation> {
        if copied.is_empty() || !self.nodes.contains_key(parent_id) {
            tracing::debug!(parent_id, count = copied.len(), "paste_node: nothing to paste");
            return Vec::new();
        }
        if let Some(existing) = copied.iter().find(|node| self.nodes.contains_key(&node.id)) {
            tracing::debug!(parent_id, node_id = %existing.id, "paste_node: node already in store");
            return Vec::new();
        }

        let mut pasted = copied.to_vec();

        // Internal parent links
        let positions: HashMap<String, usize> = pasted
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        for i in 0..pasted.len() {
            let owner = pasted[i].id.clone();
            let children = pasted[i].children.clone();
            for child in children {
                if let Some(&j) = positions.get(&child) {
                    pasted[j].parent = Some(owner.clone());
                }
            }
        }

        let Some(root) = pasted.last_mut() else {
            return Vec::new();
        };
        root.parent = Some(parent_id.to_string());
        let root_id = root.id.clone();

        let Some(parent) = self.nodes.get_mut(parent_id) else {
            return Vec::new();
        };
        let old_parent_children = parent.children.clone();
        if !parent.children.contains(&root_id) {
            parent.children.push(root_id.clone());
        }

        for node in &pasted {
            self.nodes.insert(node.id.clone(), node.clone());
        }

        tracing::trace!(parent_id, root_id = %root_id, count = pasted.len(), record, "nodes pasted");

        if record {
            vec![Operation::new(OperationPayload::PasteNode {
                pasted_nodes: pasted,
                parent_node_id: parent_id.to_string(),
                old_parent_children,
            })]
        } else {
            Vec::new()
        }
    }
}
