//! # Trellis Serializer
//!
//! Turns values that have no plain-data form into persistable strings and
//! back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Value: schemaless property data             │
//! │  - JSON superset                            │
//! │  - Function(Handler) for script handlers    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Serializer: ordered TypeHandler registry    │
//! │  - most recent registration wins            │
//! │  - failures fall back, never propagate      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trellis_serializer::{Handler, Serializer, TargetType, Value};
//!
//! let serializer = Serializer::new();
//! let text = serializer.serialize(&Value::Function(Handler::new("() => save()")));
//! let handler = serializer.deserialize(&text, Some(TargetType::Function));
//! ```

mod error;
mod handler;
mod serializer;
mod value;

pub use error::SerializeError;
pub use handler::Handler;
pub use serializer::{FunctionTypeHandler, JsonStringTypeHandler, Serializer, TargetType, TypeHandler};
pub use value::{Value, ValueMap};
