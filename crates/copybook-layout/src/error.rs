//! Error types for layout and manifest loading.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while loading or validating declarative configuration.
///
/// Every variant is a configuration error in the sense of the import
/// pipeline: fatal at job start, never skipped.
#[derive(Debug, Error, Diagnostic)]
pub enum LayoutError {
    /// Configuration file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Configuration file is not valid YAML for the expected schema.
    #[error("cannot parse {}: {source}", .path.display())]
    Yaml {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_yaml::Error,
    },
    /// A structural invariant of the schema does not hold.
    #[error("{scope} '{name}': {message}")]
    Invalid {
        /// What kind of element is broken (field, occurs group, job).
        scope: &'static str,
        /// The element's configured name.
        name: String,
        /// Which invariant failed.
        message: String,
    },
}

impl LayoutError {
    /// Shorthand for a validation failure on a named element.
    pub(crate) fn invalid(scope: &'static str, name: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            scope,
            name: name.to_string(),
            message: message.into(),
        }
    }
}
