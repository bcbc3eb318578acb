//! Runtime value model and record reflection for copybook imports.
//!
//! The parsing engine addresses destination entities by dotted property
//! path (`Coverage.PlanCode`) and by collection path (`Lines`), both
//! spelled as strings in layout YAML. This crate supplies the machinery
//! that makes those strings safe and fast:
//!
//! - [`Value`]: the typed runtime value a field parser produces.
//! - [`Record`]: the trait every destination entity implements, carrying
//!   a static [`RecordDescriptor`] table of property setters/getters and
//!   collection appenders that downcast through [`std::any::Any`].
//! - [`record!`]: declares a plain struct together with its descriptor.
//! - [`RecordRegistry`]: the name-to-constructor allow-list; layouts can
//!   only instantiate entities that were registered up front.
//! - [`PropertyBinder`] / [`CollectionBinder`]: resolve a dotted path
//!   against a descriptor once, cache the bound accessor per
//!   (type, path), and stay lock-free on the hot path.
//!
//! Fixed-width imports drive millions of property writes per file, so
//! path resolution must never be repeated per line; the binders use
//! insert-if-absent caches and pure builders, making the whole layer
//! safe to share across worker threads.

mod bind;
mod error;
mod macros;
mod record;
mod registry;
mod value;

pub use bind::{BoundAdder, BoundGetter, BoundSetter, CollectionBinder, PropertyBinder};
pub use error::{BindError, CoerceError};
pub use record::{CollectionDef, NestedDef, PropertyDef, Record, RecordDescriptor};
pub use registry::RecordRegistry;
pub use value::{FromValue, ToValue, Value};

// Re-exported for `record!` expansions in downstream crates.
#[doc(hidden)]
pub use serde_json;
