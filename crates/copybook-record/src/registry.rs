//! The entity allow-list.

use std::collections::HashMap;

use crate::error::BindError;
use crate::record::{Record, RecordDescriptor};

struct Entry {
    make: fn() -> Box<dyn Record>,
    descriptor: fn() -> &'static RecordDescriptor,
}

/// Name-to-constructor allow-list for destination entities.
///
/// Layouts and manifests reference entities by name; only names
/// registered here can be instantiated, so a YAML file can never
/// construct an arbitrary type. Lookup is case-insensitive.
#[derive(Default)]
pub struct RecordRegistry {
    entries: HashMap<String, Entry>,
}

impl RecordRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type under its descriptor name.
    pub fn register<T: Record + Default>(&mut self) {
        fn construct<T: Record + Default>() -> Box<dyn Record> {
            Box::new(T::default())
        }
        let descriptor = T::record_descriptor();
        self.entries.insert(
            descriptor.name.to_ascii_lowercase(),
            Entry {
                make: construct::<T>,
                descriptor: T::record_descriptor,
            },
        );
    }

    /// Construct a fresh instance of a registered entity.
    pub fn create(&self, name: &str) -> Result<Box<dyn Record>, BindError> {
        self.entry(name).map(|e| (e.make)())
    }

    /// Look up a registered entity's descriptor without constructing it.
    pub fn descriptor(&self, name: &str) -> Result<&'static RecordDescriptor, BindError> {
        self.entry(name).map(|e| (e.descriptor)())
    }

    /// Whether an entity name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    fn entry(&self, name: &str) -> Result<&Entry, BindError> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| BindError::UnknownEntity(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    record! {
        pub struct Widget("Widget") {
            "Label" => label: Option<String>,
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = RecordRegistry::new();
        registry.register::<Widget>();

        assert!(registry.contains("Widget"));
        assert!(registry.contains("widget"));

        let instance = registry.create("WIDGET").unwrap();
        assert_eq!(instance.descriptor().name, "Widget");
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let registry = RecordRegistry::new();
        let err = registry.create("Gadget").unwrap_err();
        assert!(matches!(err, BindError::UnknownEntity(name) if name == "Gadget"));
    }

    #[test]
    fn test_descriptor_lookup() {
        let mut registry = RecordRegistry::new();
        registry.register::<Widget>();
        let descriptor = registry.descriptor("widget").unwrap();
        assert!(descriptor.property("label").is_some());
    }
}
