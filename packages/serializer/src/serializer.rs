//! # Type Handler Registry
//!
//! A [`Serializer`] holds an ordered list of [`TypeHandler`]s. Lookup walks
//! the list front to back and the most recently registered handler sits at
//! the front, so custom handlers shadow the defaults.
//!
//! Handlers report failures as [`SerializeError`]; the registry never
//! propagates them. A failed decode is logged and replaced with the
//! handler's fallback value, so a bad field cannot poison the record that
//! owns it.

use std::fmt;
use std::sync::Arc;

use crate::{Handler, SerializeError, Value};

/// Explicit decode target, used when the serialized form alone is ambiguous
/// (a function's source is just a string)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Function,
    Json,
}

/// Pluggable conversion between a [`Value`] and its persistable form
pub trait TypeHandler: fmt::Debug + Send + Sync {
    /// Debug name for this handler
    fn name(&self) -> &'static str;

    /// Target type this handler answers to, if any
    fn target(&self) -> Option<TargetType> {
        None
    }

    fn can_handle(&self, value: &Value) -> bool;

    fn serialize(&self, value: &Value) -> String;

    /// Decode a serialized value. `serializer` is the owning registry, for
    /// handlers that decode nested values.
    fn deserialize(&self, serialized: &Value, serializer: &Serializer) -> Result<Value, SerializeError>;

    /// Value substituted when [`TypeHandler::deserialize`] fails
    fn fallback(&self, serialized: &Value) -> Value {
        serialized.clone()
    }
}

/// Function values, persisted as their source text
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionTypeHandler;

impl TypeHandler for FunctionTypeHandler {
    fn name(&self) -> &'static str {
        "function"
    }

    fn target(&self) -> Option<TargetType> {
        Some(TargetType::Function)
    }

    fn can_handle(&self, value: &Value) -> bool {
        value.is_function()
    }

    fn serialize(&self, value: &Value) -> String {
        match value {
            Value::Function(handler) => handler.source().to_string(),
            other => other.to_json_string(),
        }
    }

    fn deserialize(&self, serialized: &Value, _serializer: &Serializer) -> Result<Value, SerializeError> {
        match serialized {
            Value::String(source) => Handler::compile(source).map(Value::Function),
            Value::Function(_) => Ok(serialized.clone()),
            other => Err(SerializeError::UnexpectedInput {
                handler: self.name(),
                found: other.type_name(),
            }),
        }
    }

    fn fallback(&self, _serialized: &Value) -> Value {
        Value::Function(Handler::noop())
    }
}

/// Strings holding JSON objects or arrays.
///
/// Decoding parses the text and then runs each direct child of the parsed
/// container back through the owning registry, so a JSON string held in a
/// field is unpacked too. Containers nested below that level are not
/// descended.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStringTypeHandler;

impl JsonStringTypeHandler {
    fn looks_like_json(s: &str) -> bool {
        let trimmed = s.trim();
        (trimmed.starts_with('{') && trimmed.ends_with('}'))
            || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    }
}

impl TypeHandler for JsonStringTypeHandler {
    fn name(&self) -> &'static str {
        "json-string"
    }

    fn target(&self) -> Option<TargetType> {
        Some(TargetType::Json)
    }

    fn can_handle(&self, value: &Value) -> bool {
        value.as_str().is_some_and(Self::looks_like_json)
    }

    fn serialize(&self, value: &Value) -> String {
        match value {
            // Already JSON text
            Value::String(s) => s.clone(),
            other => other.to_json_string(),
        }
    }

    fn deserialize(&self, serialized: &Value, serializer: &Serializer) -> Result<Value, SerializeError> {
        let text = serialized.as_str().ok_or(SerializeError::UnexpectedInput {
            handler: self.name(),
            found: serialized.type_name(),
        })?;

        let parsed = Value::from(serde_json::from_str::<serde_json::Value>(text)?);
        Ok(match parsed {
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| serializer.deserialize(item, None))
                    .collect(),
            ),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, item)| (key.clone(), serializer.deserialize(item, None)))
                    .collect(),
            ),
            primitive => primitive,
        })
    }
}

/// Registry of type handlers
#[derive(Debug, Clone)]
pub struct Serializer {
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl Serializer {
    /// Create a serializer with the default function and JSON-string handlers
    pub fn new() -> Self {
        let mut serializer = Self::empty();
        serializer.register_handler(FunctionTypeHandler);
        serializer.register_handler(JsonStringTypeHandler);
        serializer
    }

    /// Create a serializer with no handlers; every value passes through
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler ahead of every existing one
    pub fn register_handler(&mut self, handler: impl TypeHandler + 'static) {
        self.handlers.insert(0, Arc::new(handler));
    }

    /// Handler names in lookup order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Serialize with the first handler that accepts `value`.
    /// Unhandled values are returned unchanged.
    pub fn serialize(&self, value: &Value) -> Value {
        match self.handlers.iter().find(|h| h.can_handle(value)) {
            Some(handler) => Value::String(handler.serialize(value)),
            None => value.clone(),
        }
    }

    /// Deserialize `serialized`.
    ///
    /// With a `target`, the first handler answering to it is used. Otherwise
    /// the first handler that accepts the value is. Unhandled values are
    /// returned unchanged.
    pub fn deserialize(&self, serialized: &Value, target: Option<TargetType>) -> Value {
        let handler = target
            .and_then(|t| self.handlers.iter().find(|h| h.target() == Some(t)))
            .or_else(|| self.handlers.iter().find(|h| h.can_handle(serialized)));

        let Some(handler) = handler else {
            return serialized.clone();
        };

        match handler.deserialize(serialized, self) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    handler = handler.name(),
                    error = %err,
                    "deserialization failed, using fallback value"
                );
                handler.fallback(serialized)
            }
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
