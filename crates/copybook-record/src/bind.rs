//! Cached path-addressable property setters and collection appenders.
//!
//! A dotted path like `Coverage.PlanCode` is resolved against a record
//! descriptor exactly once per (concrete type, path); the resolved
//! accessor is cached in a concurrent map and shared by every worker
//! thread. Builders are pure, so the occasional duplicate build under
//! contention is harmless and the caches need no locking beyond
//! insert-if-absent.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::BindError;
use crate::record::{CollectionDef, NestedDef, PropertyDef, Record, RecordDescriptor};
use crate::value::Value;

/// Walk a chain of nested-record segments, returning the traversal
/// steps and the descriptor the chain lands on.
fn resolve_nested(
    descriptor: &'static RecordDescriptor,
    dotted: &str,
) -> Result<(Vec<NestedDef>, &'static RecordDescriptor), BindError> {
    let mut steps = Vec::new();
    let mut desc = descriptor;
    for segment in dotted.split('.') {
        let prop = desc
            .property(segment)
            .ok_or_else(|| BindError::UnknownProperty {
                entity: desc.name,
                path: segment.to_string(),
            })?;
        let nested = prop.nested.ok_or_else(|| BindError::NotARecord {
            entity: desc.name,
            segment: segment.to_string(),
        })?;
        desc = (nested.descriptor)();
        steps.push(nested);
    }
    Ok((steps, desc))
}

fn split_terminal(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((prefix, last)) => (Some(prefix), last),
        None => (None, path),
    }
}

fn resolve_property(
    descriptor: &'static RecordDescriptor,
    path: &str,
) -> Result<(Vec<NestedDef>, &'static PropertyDef), BindError> {
    let (prefix, last) = split_terminal(path);
    let (steps, desc) = match prefix {
        Some(prefix) => resolve_nested(descriptor, prefix)?,
        None => (Vec::new(), descriptor),
    };
    let prop = desc
        .property(last)
        .ok_or_else(|| BindError::UnknownProperty {
            entity: desc.name,
            path: path.to_string(),
        })?;
    if prop.nested.is_some() {
        return Err(BindError::RecordProperty {
            entity: desc.name,
            property: prop.name,
        });
    }
    Ok((steps, prop))
}

/// A setter compiled for one (type, path) pair.
#[derive(Debug)]
pub struct BoundSetter {
    steps: Vec<NestedDef>,
    terminal: &'static PropertyDef,
}

impl BoundSetter {
    /// Coerce `value` and write it through the resolved path.
    pub fn set(&self, target: &mut dyn Record, value: Value) -> Result<(), BindError> {
        let mut cursor: &mut dyn Any = target.as_any_mut();
        for step in &self.steps {
            cursor = (step.borrow_mut)(cursor)?;
        }
        (self.terminal.set)(cursor, value)
    }
}

/// A getter compiled for one (type, path) pair.
#[derive(Debug)]
pub struct BoundGetter {
    steps: Vec<NestedDef>,
    terminal: &'static PropertyDef,
}

impl BoundGetter {
    /// Read the property through the resolved path.
    pub fn get(&self, source: &dyn Record) -> Result<Value, BindError> {
        let mut cursor: &dyn Any = source.as_any();
        for step in &self.steps {
            cursor = (step.borrow)(cursor)?;
        }
        Ok((self.terminal.get)(cursor))
    }
}

type PathKey = (TypeId, String);

/// Cache of bound property accessors, keyed by (concrete type, path).
#[derive(Default)]
pub struct PropertyBinder {
    setters: DashMap<PathKey, Arc<BoundSetter>>,
    getters: DashMap<PathKey, Arc<BoundGetter>>,
}

impl PropertyBinder {
    /// Create an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve (or fetch from cache) the setter for a dotted path.
    pub fn setter(
        &self,
        descriptor: &'static RecordDescriptor,
        type_id: TypeId,
        path: &str,
    ) -> Result<Arc<BoundSetter>, BindError> {
        let key = (type_id, path.to_string());
        if let Some(found) = self.setters.get(&key) {
            return Ok(found.clone());
        }
        let (steps, terminal) = resolve_property(descriptor, path)?;
        let built = Arc::new(BoundSetter { steps, terminal });
        Ok(self.setters.entry(key).or_insert(built).clone())
    }

    /// Resolve (or fetch from cache) the getter for a dotted path.
    pub fn getter(
        &self,
        descriptor: &'static RecordDescriptor,
        type_id: TypeId,
        path: &str,
    ) -> Result<Arc<BoundGetter>, BindError> {
        let key = (type_id, path.to_string());
        if let Some(found) = self.getters.get(&key) {
            return Ok(found.clone());
        }
        let (steps, terminal) = resolve_property(descriptor, path)?;
        let built = Arc::new(BoundGetter { steps, terminal });
        Ok(self.getters.entry(key).or_insert(built).clone())
    }
}

/// An appender compiled for one (parent type, path, child) triple.
#[derive(Debug)]
pub struct BoundAdder {
    steps: Vec<NestedDef>,
    terminal: &'static CollectionDef,
}

impl BoundAdder {
    /// Append a child through the resolved collection path.
    pub fn add(&self, parent: &mut dyn Record, child: Box<dyn Record>) -> Result<(), BindError> {
        let mut cursor: &mut dyn Any = parent.as_any_mut();
        for step in &self.steps {
            cursor = (step.borrow_mut)(cursor)?;
        }
        (self.terminal.push)(cursor, child)
    }
}

type AdderKey = (TypeId, String, String);

/// Cache of bound collection appenders, keyed by
/// (parent type, path, child entity).
#[derive(Default)]
pub struct CollectionBinder {
    adders: DashMap<AdderKey, Arc<BoundAdder>>,
}

impl CollectionBinder {
    /// Create an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve (or fetch from cache) the appender for a collection path.
    ///
    /// `child` must name the collection's declared element entity; a
    /// mismatch is a configuration error surfaced here, before any
    /// children are constructed.
    pub fn adder(
        &self,
        descriptor: &'static RecordDescriptor,
        type_id: TypeId,
        path: &str,
        child: &str,
    ) -> Result<Arc<BoundAdder>, BindError> {
        let key = (type_id, path.to_string(), child.to_string());
        if let Some(found) = self.adders.get(&key) {
            return Ok(found.clone());
        }

        let (prefix, last) = split_terminal(path);
        let (steps, desc) = match prefix {
            Some(prefix) => resolve_nested(descriptor, prefix)?,
            None => (Vec::new(), descriptor),
        };
        let terminal = desc
            .collection(last)
            .ok_or_else(|| BindError::UnknownCollection {
                entity: desc.name,
                path: path.to_string(),
            })?;
        if !terminal.child.eq_ignore_ascii_case(child) {
            return Err(BindError::ChildMismatch {
                collection: terminal.name,
                expected: terminal.child,
                got: child.to_string(),
            });
        }

        let built = Arc::new(BoundAdder { steps, terminal });
        Ok(self.adders.entry(key).or_insert(built).clone())
    }
}
