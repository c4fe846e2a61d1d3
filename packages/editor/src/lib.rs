//! # Trellis Editor
//!
//! Transactional editing engine for a structural node tree and its
//! per-node metadata.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Orchestrator: the only write path           │
//! │  - one transaction per logical edit         │
//! │  - undo/redo, batching                      │
//! └─────────────────────────────────────────────┘
//!            ↓                        ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ NodeStore            │  │ MetaStore            │
//! │  - id-keyed arena    │  │  - properties/events │
//! │  - copy/paste        │  │  - (de)serialization │
//! └──────────────────────┘  └──────────────────────┘
//!            ↑                        ↑
//! ┌─────────────────────────────────────────────┐
//! │ UndoManager: replays Operations forward or  │
//! │ inverted with recording disabled            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Arena, not object graph**: nodes refer to each other by id only
//! 2. **Every edit is invertible**: operations carry their own pre-image
//! 3. **Replay never records**: store mutators take a `record` flag
//! 4. **Unknown ids are no-ops**: nothing is recorded, nothing fails
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trellis_editor::{Node, Orchestrator};
//!
//! let mut editor = Orchestrator::new();
//! editor.add_node(Node::new("root"), None);
//! editor.add_node(Node::new("child"), Some("root"));
//!
//! let copied = editor.copy_node("child");
//! editor.paste_node("root", &copied);
//!
//! editor.undo();
//! editor.redo();
//! ```

mod config;
mod errors;
mod id_generator;
mod meta;
mod meta_store;
mod node;
mod node_store;
mod operations;
mod orchestrator;
mod undo_stack;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use id_generator::IdGenerator;
pub use meta::{Meta, MetaUpdate, SerializedMeta};
pub use meta_store::MetaStore;
pub use node::{Node, NodeUpdate};
pub use node_store::NodeStore;
pub use operations::{Operation, OperationKind, OperationPayload, OperationSource};
pub use orchestrator::Orchestrator;
pub use undo_stack::{Transaction, UndoManager};

// Re-export serializer types for convenience
pub use trellis_serializer::{Handler, Serializer, TargetType, TypeHandler, Value, ValueMap};
