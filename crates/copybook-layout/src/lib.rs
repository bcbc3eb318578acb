//! Declarative layout and manifest schema for fixed-width flat-file imports.
//!
//! A *layout* describes one legacy file format the way a COBOL copybook
//! would: an ordered list of header fields sliced by 1-based column
//! position, optional repeating OCCURS groups materialized into child
//! collections, and the parsing rules (date formats, overpunch handling,
//! trim behavior) that apply when a field does not override them.
//!
//! A *manifest* lists import jobs: which files to read, which layout to
//! decode them with, and which registered entity receives the values.
//!
//! Both are plain YAML, loaded with serde and validated structurally
//! before any data is touched. Positions are 1-based in the files and
//! converted by the parsing engine; unknown mapping keys are ignored for
//! forward compatibility.
//!
//! # Example
//!
//! ```yaml
//! headerFields:
//!   - name: claim-number
//!     target: ClaimNumber
//!     start: 1
//!     length: 10
//!     type: string
//! occursGroups: []
//! rules:
//!   string:
//!     defaultTrim: right
//! ```

mod codes;
mod error;
mod layout;
mod manifest;
mod rules;

pub use error::LayoutError;
pub use layout::{FieldKind, FieldSpec, Layout, OccursGroupSpec, SequenceSpec, TerminationMode};
pub use manifest::{JobMode, JobSpec, Manifest};
pub use rules::{
    AllZerosBehavior, BooleanBlankBehavior, BooleanRules, CaseMode, DateRules, IntegerRules,
    NumericRules, ParsingRules, StringBlankBehavior, StringRules, TrimMode,
};

/// Result type for layout and manifest operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
