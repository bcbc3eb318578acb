//! Schema-driven fixed-width parsing engine.
//!
//! Turns one raw line of a legacy flat file into a typed entity graph:
//!
//! 1. the [slicer](slice()) cuts fixed-width fields by 0-based position,
//!    padding short lines with spaces so every slice has its declared
//!    width;
//! 2. the [value-source resolver](resolve_source) produces each field's
//!    raw input — a fixed-width slice, a constant with
//!    `${BatchId}`/`${SourceSystem}` substitution, or the shared job
//!    timestamp;
//! 3. the five [field parsers](field) apply per-type value semantics:
//!    exact-format dates, decimals with implied places and overpunch
//!    signs, bounded integers, trimmed/cased/replaced strings, and
//!    boolean literals;
//! 4. the [record parser](RecordParser) writes parsed values through the
//!    cached property binder and, in graph mode, expands OCCURS groups
//!    into child collections with padding or count termination.
//!
//! The engine is synchronous and holds no mutable state beyond the
//! write-once binder caches, so one [`RecordParser`] can serve any
//! number of worker threads parsing disjoint lines of the same job.

mod error;
pub mod field;
mod overpunch;
mod record;
mod slice;
mod source;
mod text;

pub use error::{ConfigError, ParseError};
pub use field::{parser_for, FieldParser};
pub use overpunch::{decode_overpunch, encode_overpunch};
pub use record::RecordParser;
pub use slice::slice;
pub use source::{resolve_source, ImportContext, RawValue};
pub use text::{
    apply_case, apply_trim, collapse_spaces, is_all_spaces, is_all_zeros, try_parse_exact_date,
};

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
