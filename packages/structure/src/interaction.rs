//! Interaction points keyed by name.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Runs an interaction with its arguments
pub type TriggerFn = Box<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A UI or domain interaction point
pub struct InteractionMeta {
    pub label: String,
    pub event_name: String,
    pub trigger: TriggerFn,
}

impl InteractionMeta {
    pub fn new<F>(label: impl Into<String>, event_name: impl Into<String>, trigger: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            event_name: event_name.into(),
            trigger: Box::new(trigger),
        }
    }
}

impl fmt::Debug for InteractionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionMeta")
            .field("label", &self.label)
            .field("event_name", &self.event_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Interactions {
    relationships: HashMap<String, InteractionMeta>,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `meta` under `key`, replacing any previous entry
    pub fn add_interaction_meta(&mut self, key: impl Into<String>, meta: InteractionMeta) {
        self.relationships.insert(key.into(), meta);
    }

    pub fn get_interaction_meta(&self, key: &str) -> Option<&InteractionMeta> {
        self.relationships.get(key)
    }

    pub fn remove_interaction_meta(&mut self, key: &str) -> Option<InteractionMeta> {
        self.relationships.remove(key)
    }

    /// Run the interaction under `key`. `None` if nothing is registered.
    pub fn trigger(&self, key: &str, args: &[Value]) -> Option<Value> {
        let Some(meta) = self.relationships.get(key) else {
            tracing::debug!(key, "trigger: interaction not registered");
            return None;
        };
        Some((meta.trigger)(args))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
