//! Page operations facade.
//!
//! Bundles a page's structure lookups with its interaction and config
//! registries, so a host holds one value per page.

use serde_json::{Map, Value};

use crate::{
    ConfigMeta, ConfigRegistry, InteractionMeta, Interactions, PageStructure, StructureError, Widget,
    WidgetTreeNode,
};

#[derive(Debug)]
pub struct PageOps {
    structure: PageStructure,
    interactions: Interactions,
    config: ConfigRegistry,
}

impl PageOps {
    /// Start from a single root widget
    pub fn new(root: Widget) -> Self {
        Self::with_root(WidgetTreeNode::new(root))
    }

    pub fn with_root(root: WidgetTreeNode) -> Self {
        Self {
            structure: PageStructure::new(root),
            interactions: Interactions::new(),
            config: ConfigRegistry::new(),
        }
    }

    pub fn from_json(source: &str) -> Result<Self, StructureError> {
        let root: WidgetTreeNode = serde_json::from_str(source)?;
        Ok(Self::with_root(root))
    }

    pub fn structure(&self) -> &PageStructure {
        &self.structure
    }

    pub fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    /// Mutable access to the loader and compiler registries
    pub fn config_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.config
    }

    pub fn get_widget_by_id(&self, id: &str) -> Option<&Widget> {
        self.structure.get_by_id(id)
    }

    pub fn get_parent_widget(&self, id: &str) -> Option<&Widget> {
        self.structure.get_parent(id)
    }

    pub fn append_widget(&mut self, parent_id: &str, node: WidgetTreeNode) -> bool {
        self.structure.append(parent_id, node)
    }

    pub fn remove_widget_by_id(&mut self, id: &str) -> bool {
        self.structure.remove_by_id(id)
    }

    pub fn add_interaction_meta(&mut self, key: impl Into<String>, meta: InteractionMeta) {
        self.interactions.add_interaction_meta(key, meta);
    }

    pub fn get_interaction_meta(&self, key: &str) -> Option<&InteractionMeta> {
        self.interactions.get_interaction_meta(key)
    }

    pub fn remove_interaction_meta(&mut self, key: &str) -> Option<InteractionMeta> {
        self.interactions.remove_interaction_meta(key)
    }

    pub fn add_config_meta(&mut self, meta: ConfigMeta) {
        self.config.add_config_meta(meta);
    }

    pub fn compile(&self) -> Map<String, Value> {
        self.config.compile()
    }

    pub fn to_json(&self) -> Result<String, StructureError> {
        self.structure.to_json()
    }
}
