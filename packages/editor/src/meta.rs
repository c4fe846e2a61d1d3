//! Per-node metadata records.
//!
//! Metadata shares the node id space but is stored apart from the tree;
//! nothing requires a meta id to exist as a node or the other way round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trellis_serializer::{Handler, Value, ValueMap};

use crate::node::present;

/// Properties and event handlers for one id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: String,

    #[serde(default)]
    pub properties: ValueMap,

    #[serde(default)]
    pub events: BTreeMap<String, Handler>,

    /// Dot-paths into `properties` holding function values. Paths are
    /// relative to `properties`: write `onClick`, not `properties.onClick`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_field_paths: Option<Vec<String>>,

    /// Dot-paths into `properties` holding nested objects or lists, relative
    /// to `properties` like `function_field_paths`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_field_paths: Option<Vec<String>>,
}

impl Meta {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.events.insert(name.into(), handler);
        self
    }

    pub fn with_function_fields<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function_field_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_json_fields<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.json_field_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Look up a property by dot-path
    pub fn property(&self, path: &str) -> Option<&Value> {
        get_path(&self.properties, path)
    }
}

/// Partial meta: each present field replaces the whole field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ValueMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeMap<String, Handler>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub function_field_paths: Option<Option<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub json_field_paths: Option<Option<Vec<String>>>,
}

impl MetaUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(mut self, properties: ValueMap) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_events(mut self, events: BTreeMap<String, Handler>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_function_fields(mut self, paths: Option<Vec<String>>) -> Self {
        self.function_field_paths = Some(paths);
        self
    }

    pub fn with_json_fields(mut self, paths: Option<Vec<String>>) -> Self {
        self.json_field_paths = Some(paths);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_none()
            && self.events.is_none()
            && self.function_field_paths.is_none()
            && self.json_field_paths.is_none()
    }

    /// Prior values of exactly the fields this update sets
    pub(crate) fn capture(&self, meta: &Meta) -> MetaUpdate {
        MetaUpdate {
            properties: self.properties.as_ref().map(|_| meta.properties.clone()),
            events: self.events.as_ref().map(|_| meta.events.clone()),
            function_field_paths: self
                .function_field_paths
                .as_ref()
                .map(|_| meta.function_field_paths.clone()),
            json_field_paths: self
                .json_field_paths
                .as_ref()
                .map(|_| meta.json_field_paths.clone()),
        }
    }

    pub(crate) fn apply_to(&self, meta: &mut Meta) {
        if let Some(properties) = &self.properties {
            meta.properties = properties.clone();
        }
        if let Some(events) = &self.events {
            meta.events = events.clone();
        }
        if let Some(paths) = &self.function_field_paths {
            meta.function_field_paths = paths.clone();
        }
        if let Some(paths) = &self.json_field_paths {
            meta.json_field_paths = paths.clone();
        }
    }
}

/// Persistable form of [`Meta`]: event handlers and listed function fields
/// are source text, listed JSON fields are JSON text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedMeta {
    pub id: String,

    #[serde(default)]
    pub properties: ValueMap,

    #[serde(default)]
    pub events: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_field_paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_field_paths: Option<Vec<String>>,
}

/// Resolve a dot-path. Missing segments resolve to `None`.
pub(crate) fn get_path<'a>(map: &'a ValueMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = map.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.as_map()?.get(segment))
}

/// Write a dot-path, creating (or replacing non-map) intermediates with
/// empty maps
pub(crate) fn set_path(map: &mut ValueMap, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = map;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(ValueMap::new()));
        if slot.as_map().is_none() {
            *slot = Value::Map(ValueMap::new());
        }
        let Some(inner) = slot.as_map_mut() else {
            return;
        };
        current = inner;
    }

    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_path_missing_segments() {
        let meta = Meta::new("m").with_property("style", Value::Map(ValueMap::new()));

        assert!(meta.property("style").is_some());
        assert!(meta.property("style.color").is_none());
        assert!(meta.property("nothing.at.all").is_none());
    }

    #[test]
    fn test_get_path_through_scalar_is_none() {
        let meta = Meta::new("m").with_property("label", "text");
        assert!(meta.property("label.inner").is_none());
    }

    #[test]
    fn test_paths_are_relative_to_properties() {
        let meta = Meta::new("m").with_property("onClick", Value::Function(Handler::noop()));

        assert!(meta.property("onClick").is_some());
        assert!(meta.property("properties.onClick").is_none());
    }

    #[test]
    fn test_set_path_creates_intermediates() {
        let mut map = ValueMap::new();
        set_path(&mut map, "a.b.c", Value::from(1i64));

        assert_eq!(get_path(&map, "a.b.c"), Some(&Value::from(1i64)));
    }

    #[test]
    fn test_set_path_replaces_scalar_intermediate() {
        let mut map = ValueMap::new();
        map.insert("a".to_string(), Value::from("scalar"));

        set_path(&mut map, "a.b", Value::Bool(true));
        assert_eq!(get_path(&map, "a.b"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_update_capture_and_restore() {
        let original = Meta::new("m")
            .with_property("text", "before")
            .with_function_fields(["onClick"]);
        let mut meta = original.clone();

        let mut properties = ValueMap::new();
        properties.insert("text".to_string(), Value::from("after"));
        let update = MetaUpdate::new()
            .with_properties(properties)
            .with_function_fields(None);

        let inverse = update.capture(&meta);
        assert!(inverse.events.is_none());

        update.apply_to(&mut meta);
        assert_eq!(meta.property("text"), Some(&Value::from("after")));
        assert_eq!(meta.function_field_paths, None);

        inverse.apply_to(&mut meta);
        assert_eq!(meta, original);
    }
}
