//! The record trait and its descriptor metadata.
//!
//! A descriptor is a static table of function pointers that downcast a
//! `&dyn Any` to the concrete record type and touch one field. Tables
//! are built once per type (behind a `OnceLock` in the `record!`
//! expansion) and live for the program, so binders can hold `&'static`
//! references into them.

use std::any::Any;

use crate::error::BindError;
use crate::value::Value;

/// A destination entity the import engine can populate.
///
/// Implemented by the [`record!`](crate::record!) macro; hand
/// implementations are possible but rarely worth it.
pub trait Record: Any + Send + std::fmt::Debug {
    /// The static descriptor for this record type.
    fn record_descriptor() -> &'static RecordDescriptor
    where
        Self: Sized;

    /// The descriptor of this instance.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// Borrow as `Any` for descriptor-driven access.
    fn as_any(&self) -> &dyn Any;

    /// Borrow mutably as `Any` for descriptor-driven access.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Unwrap the box for collection appends.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Project the record to JSON for sinks and diagnostics.
    fn to_json(&self) -> serde_json::Value;
}

/// Static metadata for one record type.
#[derive(Debug)]
pub struct RecordDescriptor {
    /// Entity name, as referenced by layouts and the registry.
    pub name: &'static str,
    /// Scalar and nested-record properties.
    pub properties: Vec<PropertyDef>,
    /// Child collections.
    pub collections: Vec<CollectionDef>,
}

impl RecordDescriptor {
    /// Case-insensitive property lookup.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive collection lookup.
    pub fn collection(&self, name: &str) -> Option<&CollectionDef> {
        self.collections
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// One settable property of a record type.
pub struct PropertyDef {
    /// Property name as addressed by layout targets.
    pub name: &'static str,
    /// Coerce and write a value into the field.
    pub set: fn(&mut dyn Any, Value) -> Result<(), BindError>,
    /// Read the field back as a [`Value`].
    pub get: fn(&dyn Any) -> Value,
    /// Present when the property is itself a record, making it a legal
    /// non-terminal segment of a dotted path.
    pub nested: Option<NestedDef>,
}

impl std::fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDef")
            .field("name", &self.name)
            .field("nested", &self.nested.is_some())
            .finish()
    }
}

/// Traversal hooks for a record-typed property.
#[derive(Clone, Copy)]
#[derive(Debug)]
pub struct NestedDef {
    /// Descriptor of the nested record type.
    pub descriptor: fn() -> &'static RecordDescriptor,
    /// Borrow the nested record out of the parent.
    pub borrow: fn(&dyn Any) -> Result<&dyn Any, BindError>,
    /// Borrow the nested record mutably out of the parent.
    pub borrow_mut: fn(&mut dyn Any) -> Result<&mut dyn Any, BindError>,
}

/// One child collection of a record type.
pub struct CollectionDef {
    /// Collection name as addressed by layout targets.
    pub name: &'static str,
    /// Entity name of the element type.
    pub child: &'static str,
    /// Downcast and append a child.
    pub push: fn(&mut dyn Any, Box<dyn Record>) -> Result<(), BindError>,
}

impl std::fmt::Debug for CollectionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionDef")
            .field("name", &self.name)
            .field("child", &self.child)
            .finish()
    }
}
