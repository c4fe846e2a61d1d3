//! # Trellis Structure
//!
//! Read-mostly lookups over a page's widget tree: find a widget by id, find
//! its parent, append a child, remove a subtree. Each mutation rebuilds the
//! id index in full, which keeps the index trivially correct for the small
//! trees a page description holds.
//!
//! [`PageOps`] pairs a page with its interaction registry and its config
//! loader/compiler registries.

mod config;
mod error;
mod interaction;
mod ops;
mod page;

pub use config::{CompilerFn, ConfigCompiler, ConfigLoader, ConfigMeta, ConfigRegistry, LoaderFn};
pub use error::StructureError;
pub use interaction::{InteractionMeta, Interactions, TriggerFn};
pub use ops::PageOps;
pub use page::{PageStructure, Widget, WidgetEvent, WidgetTreeNode};
