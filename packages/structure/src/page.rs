//! Page structure with id lookups.
//!
//! The widget tree is owned as nested values. Lookups go through an index
//! mapping each id to its parent id and to the child-index path that leads
//! to it from the root. Every mutation rebuilds the index.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::StructureError;

/// An event a widget emits or handles, or a directive applied to it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEvent {
    pub label: String,

    #[serde(default)]
    pub params: Vec<String>,

    /// Handler source as written
    pub handler: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_handler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WidgetEvent {
    pub fn new(label: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            handler: handler.into(),
            ..Self::default()
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }
}

/// A widget as described in a page description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, WidgetEvent>,

    /// Source of a custom render function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_function: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub directives: BTreeMap<String, WidgetEvent>,
}

impl Widget {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: None,
            class_names: Vec::new(),
            style: None,
            properties: serde_json::Map::new(),
            events: BTreeMap::new(),
            render_function: None,
            directives: BTreeMap::new(),
        }
    }

    pub fn with_event(mut self, name: impl Into<String>, event: WidgetEvent) -> Self {
        self.events.insert(name.into(), event);
        self
    }
}

/// A node in the widget tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetTreeNode {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub widget: Widget,

    #[serde(default)]
    pub children: Vec<WidgetTreeNode>,
}

impl WidgetTreeNode {
    /// Wrap a widget as a childless node
    pub fn new(widget: Widget) -> Self {
        Self {
            id: widget.id.clone(),
            kind: widget.kind.clone(),
            widget,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<WidgetTreeNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    parent_id: Option<String>,
    /// Child indices from the root down to this node
    path: Vec<usize>,
}

/// Read-mostly widget tree with id lookups
#[derive(Debug, Clone)]
pub struct PageStructure {
    root: WidgetTreeNode,
    index: HashMap<String, IndexEntry>,
}

impl PageStructure {
    pub fn new(root: WidgetTreeNode) -> Self {
        let mut structure = Self {
            root,
            index: HashMap::new(),
        };
        structure.rebuild_index();
        structure
    }

    /// Build from a JSON page description whose top level is the root node
    pub fn from_json(source: &str) -> Result<Self, StructureError> {
        let root: WidgetTreeNode = serde_json::from_str(source)?;
        Ok(Self::new(root))
    }

    /// Format the current tree as a JSON page description
    pub fn to_json(&self) -> Result<String, StructureError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn root(&self) -> &WidgetTreeNode {
        &self.root
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&WidgetTreeNode> {
        let entry = self.index.get(id)?;
        self.node_at(&entry.path)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Widget> {
        self.get_node(id).map(|node| &node.widget)
    }

    pub fn get_parent(&self, id: &str) -> Option<&Widget> {
        let parent_id = self.index.get(id)?.parent_id.as_deref()?;
        self.get_by_id(parent_id)
    }

    /// Append `node` as the last child of `parent_id`.
    /// Returns false if the parent is unknown.
    pub fn append(&mut self, parent_id: &str, node: WidgetTreeNode) -> bool {
        let Some(path) = self.index.get(parent_id).map(|entry| entry.path.clone()) else {
            tracing::debug!(parent_id, "append: parent not found");
            return false;
        };
        let Some(parent) = self.node_at_mut(&path) else {
            return false;
        };

        parent.children.push(node);
        self.rebuild_index();
        true
    }

    /// Detach the node with `id` (and its subtree) from its parent.
    /// Returns false if the node is unknown or is the root.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let Some(entry) = self.index.get(id) else {
            return false;
        };
        let Some((&position, parent_path)) = entry.path.split_last() else {
            tracing::debug!(id, "remove_by_id: root cannot be removed");
            return false;
        };
        let parent_path = parent_path.to_vec();

        let Some(parent) = self.node_at_mut(&parent_path) else {
            return false;
        };
        if position >= parent.children.len() {
            return false;
        }

        parent.children.remove(position);
        self.rebuild_index();
        true
    }

    fn node_at(&self, path: &[usize]) -> Option<&WidgetTreeNode> {
        path.iter()
            .try_fold(&self.root, |node, &i| node.children.get(i))
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut WidgetTreeNode> {
        path.iter()
            .try_fold(&mut self.root, |node, &i| node.children.get_mut(i))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();

        let mut stack: Vec<(&WidgetTreeNode, Option<&str>, Vec<usize>)> =
            vec![(&self.root, None, Vec::new())];

        while let Some((node, parent_id, path)) = stack.pop() {
            for (i, child) in node.children.iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, Some(node.id.as_str()), child_path));
            }

            self.index.insert(
                node.id.clone(),
                IndexEntry {
                    parent_id: parent_id.map(str::to_string),
                    path,
                },
            );
        }

        tracing::trace!(nodes = self.index.len(), "page structure index rebuilt");
    }
}
