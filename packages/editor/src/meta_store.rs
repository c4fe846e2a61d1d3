//! # Meta Store
//!
//! Id-keyed property and event metadata, recorded the same way as the
//! [`crate::NodeStore`]: crate-private mutators with a `record` flag, silent
//! no-ops on unknown ids.
//!
//! The store also converts [`Meta`] to and from its persistable
//! [`SerializedMeta`] form through an injected [`Serializer`].

use std::collections::HashMap;
use std::sync::Arc;

use trellis_serializer::{Handler, Serializer, TargetType, Value};

use crate::meta::{get_path, set_path};
use crate::{Meta, MetaUpdate, Operation, OperationPayload, SerializedMeta};

#[derive(Debug)]
pub struct MetaStore {
    metas: HashMap<String, Meta>,
    serializer: Arc<Serializer>,
}

impl MetaStore {
    /// Create a store with the default serializer
    pub fn new() -> Self {
        Self::with_serializer(Arc::new(Serializer::new()))
    }

    pub fn with_serializer(serializer: Arc<Serializer>) -> Self {
        Self {
            metas: HashMap::new(),
            serializer,
        }
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn get(&self, id: &str) -> Option<&Meta> {
        self.metas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.metas.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    /// Insert `meta`, overwriting any record with the same id. The
    /// overwritten record is kept in the operation so undo can restore it.
    pub(crate) fn add_meta(&mut self, meta: Meta, record: bool) -> Vec<Operation> {
        tracing::trace!(meta_id = %meta.id, record, "meta added");
        let previous = self.metas.insert(meta.id.clone(), meta.clone());

        if record {
            vec![Operation::new(OperationPayload::AddMeta { meta, previous })]
        } else {
            Vec::new()
        }
    }

    /// Replace the fields present in `updates`
    pub(crate) fn update_meta(&mut self, id: &str, updates: MetaUpdate, record: bool) -> Vec<Operation> {
        let Some(meta) = self.metas.get_mut(id) else {
            tracing::debug!(meta_id = id, "update_meta: meta not found");
            return Vec::new();
        };

        let old_meta = updates.capture(meta);
        updates.apply_to(meta);

        if record {
            vec![Operation::new(OperationPayload::UpdateMeta {
                id: id.to_string(),
                updates,
                old_meta,
            })]
        } else {
            Vec::new()
        }
    }

    pub(crate) fn delete_meta(&mut self, id: &str, record: bool) -> Vec<Operation> {
        let Some(deleted_meta) = self.metas.remove(id) else {
            tracing::debug!(meta_id = id, "delete_meta: meta not found");
            return Vec::new();
        };

        tracing::trace!(meta_id = id, record, "meta deleted");
        if record {
            vec![Operation::new(OperationPayload::DeleteMeta { deleted_meta })]
        } else {
            Vec::new()
        }
    }

    /// Convert to the persistable form.
    ///
    /// Event handlers and function values at `function_field_paths` become
    /// source text; lists and maps at `json_field_paths` become JSON text.
    /// Everything else is copied as is.
    pub fn serialize(&self, meta: &Meta) -> SerializedMeta {
        let mut properties = meta.properties.clone();

        for path in meta.function_field_paths.iter().flatten() {
            if let Some(value) = get_path(&meta.properties, path).filter(|v| v.is_function()) {
                set_path(&mut properties, path, self.serializer.serialize(value));
            }
        }

        for path in meta.json_field_paths.iter().flatten() {
            if let Some(value) = get_path(&meta.properties, path).filter(|v| v.is_container()) {
                set_path(&mut properties, path, Value::String(value.to_json_string()));
            }
        }

        SerializedMeta {
            id: meta.id.clone(),
            properties,
            events: meta
                .events
                .iter()
                .map(|(name, handler)| (name.clone(), self.encode_handler(handler)))
                .collect(),
            function_field_paths: meta.function_field_paths.clone(),
            json_field_paths: meta.json_field_paths.clone(),
        }
    }

    /// Inverse of [`MetaStore::serialize`]. Undecodable handlers become
    /// no-op handlers and undecodable JSON stays as its original text.
    pub fn deserialize(&self, serialized: &SerializedMeta) -> Meta {
        let mut properties = serialized.properties.clone();

        for path in serialized.function_field_paths.iter().flatten() {
            if let Some(value) = get_path(&serialized.properties, path).filter(|v| v.as_str().is_some()) {
                let decoded = self.serializer.deserialize(value, Some(TargetType::Function));
                set_path(&mut properties, path, decoded);
            }
        }

        for path in serialized.json_field_paths.iter().flatten() {
            if let Some(value) = get_path(&serialized.properties, path).filter(|v| v.as_str().is_some()) {
                let decoded = self.serializer.deserialize(value, None);
                set_path(&mut properties, path, decoded);
            }
        }

        Meta {
            id: serialized.id.clone(),
            properties,
            events: serialized
                .events
                .iter()
                .map(|(name, source)| (name.clone(), self.decode_handler(name, source)))
                .collect(),
            function_field_paths: serialized.function_field_paths.clone(),
            json_field_paths: serialized.json_field_paths.clone(),
        }
    }

    fn encode_handler(&self, handler: &Handler) -> String {
        match self.serializer.serialize(&Value::Function(handler.clone())) {
            Value::String(source) => source,
            _ => handler.source().to_string(),
        }
    }

    fn decode_handler(&self, event: &str, source: &str) -> Handler {
        match self
            .serializer
            .deserialize(&Value::from(source), Some(TargetType::Function))
        {
            Value::Function(handler) => handler,
            other => {
                tracing::warn!(event, found = other.type_name(), "event handler did not decode to a function");
                Handler::noop()
            }
        }
    }
}

impl Default for MetaStore {
    fn default() -> Self {
        Self::new()
    }
}
