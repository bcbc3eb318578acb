//! Errors raised by value coercion and path binding.

use thiserror::Error;

/// A parsed value could not be converted to the destination property's
/// type. This is a record-level error: the line is malformed, the
/// configuration is fine.
#[derive(Debug, Clone, Error)]
#[error("cannot convert {kind} value '{value}' to {target}")]
pub struct CoerceError {
    /// The runtime kind of the offending value.
    pub kind: &'static str,
    /// The offending value, rendered for diagnostics.
    pub value: String,
    /// The destination type name.
    pub target: &'static str,
}

/// Errors from resolving or applying a property or collection path.
///
/// Every variant except [`BindError::Coerce`] is a configuration error:
/// the layout references structure the entity does not have. These are
/// fatal at job start and must not be swallowed.
#[derive(Debug, Error)]
pub enum BindError {
    /// The entity name is not in the registry allow-list.
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),
    /// A path segment does not name a property of the entity.
    #[error("entity '{entity}' has no property '{path}'")]
    UnknownProperty {
        /// Entity whose descriptor was searched.
        entity: &'static str,
        /// The offending path (or segment).
        path: String,
    },
    /// A non-terminal path segment is not a nested record.
    #[error("property '{segment}' of entity '{entity}' is not a nested record")]
    NotARecord {
        /// Entity whose descriptor was searched.
        entity: &'static str,
        /// The non-record segment.
        segment: String,
    },
    /// The terminal path segment is a nested record, which cannot be
    /// assigned from a parsed field value.
    #[error("property '{property}' of entity '{entity}' is a nested record and cannot be set directly")]
    RecordProperty {
        /// Entity whose descriptor was searched.
        entity: &'static str,
        /// The record-typed terminal segment.
        property: &'static str,
    },
    /// The path does not name a collection on the entity.
    #[error("entity '{entity}' has no collection '{path}'")]
    UnknownCollection {
        /// Entity whose descriptor was searched.
        entity: &'static str,
        /// The offending path.
        path: String,
    },
    /// The appended child is not the collection's declared child type.
    #[error("collection '{collection}' holds '{expected}' children, got '{got}'")]
    ChildMismatch {
        /// The collection name.
        collection: &'static str,
        /// Declared child entity name.
        expected: &'static str,
        /// Actual child entity name.
        got: String,
    },
    /// A bound accessor was invoked on an instance of a different
    /// concrete type than it was built for.
    #[error("bound accessor for entity '{entity}' applied to a different type")]
    InstanceMismatch {
        /// The entity the accessor was built for.
        entity: &'static str,
    },
    /// Value coercion failed (record-level, not configuration).
    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

impl BindError {
    /// Whether this error indicts the input line rather than the layout.
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Coerce(_))
    }
}
