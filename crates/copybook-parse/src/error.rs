//! Parse and configuration errors.

use copybook_record::{BindError, CoerceError};
use miette::Diagnostic;
use thiserror::Error;

/// Wiring problems between a layout and the registered entities.
///
/// Fatal at job start: the configuration is wrong, no line can fix it.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Entity or property wiring rejected by the record layer.
    #[error(transparent)]
    Bind(BindError),
    /// A count-terminated group names no count field.
    #[error("occurs group '{group}' has no countFieldTarget")]
    MissingCountField {
        /// Group name.
        group: String,
    },
    /// The count field holds a value no item count can be read from.
    #[error("count field '{field}' holds {kind} value '{value}', expected an integer")]
    CountFieldType {
        /// The count field target path.
        field: String,
        /// Runtime kind of the offending value.
        kind: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Errors from parsing one line.
///
/// [`ParseError::Config`] is fatal; every other variant indicts the
/// line, carrying the field name and raw text so the caller can log
/// and skip. A failure mid-line discards the partially built entity.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The field is present but malformed for its declared type.
    #[error("field '{field}': invalid {kind} value '{raw}'")]
    InvalidField {
        /// Field diagnostic name.
        field: String,
        /// The field type that rejected the value.
        kind: &'static str,
        /// The offending raw text.
        raw: String,
    },
    /// The parsed value would not coerce onto the target property.
    #[error("field '{field}': {source}")]
    Coerce {
        /// Field diagnostic name.
        field: String,
        /// Underlying conversion failure.
        #[source]
        source: CoerceError,
    },
    /// Fatal configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParseError {
    /// Whether the error indicts the configuration rather than the line.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Route a bind failure: coercion failures indict the line, every
    /// other bind failure is configuration.
    pub(crate) fn from_bind(field: &str, err: BindError) -> Self {
        match err {
            BindError::Coerce(source) => Self::Coerce {
                field: field.to_string(),
                source,
            },
            other => Self::Config(ConfigError::Bind(other)),
        }
    }
}

impl From<BindError> for ConfigError {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}
