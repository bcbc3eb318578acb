//! The five field parsers and their type-dispatch factory.
//!
//! Each parser receives the already-sliced fixed-width string together
//! with the field spec (for per-field option overrides) and the
//! file-wide rules. `Ok(Value::Null)` means the field is semantically
//! absent; a malformed-but-present field is an error carrying the field
//! name and the offending raw text.

mod boolean;
mod date;
mod integer;
mod numeric;
mod string;

use copybook_layout::{FieldKind, FieldSpec, ParsingRules};
use copybook_record::Value;

use crate::error::ParseError;

pub use boolean::BooleanParser;
pub use date::DateParser;
pub use integer::IntegerParser;
pub use numeric::NumericParser;
pub use string::StringParser;

/// A pluggable decoder for one field type.
pub trait FieldParser: Sync {
    /// Decode an already-sliced raw value.
    fn parse(&self, raw: &str, field: &FieldSpec, rules: &ParsingRules)
        -> Result<Value, ParseError>;
}

/// Dispatch a field type tag to its parser.
pub fn parser_for(kind: FieldKind) -> &'static dyn FieldParser {
    static DATE: DateParser = DateParser;
    static NUMERIC: NumericParser = NumericParser;
    static INTEGER: IntegerParser = IntegerParser;
    static STRING: StringParser = StringParser;
    static BOOLEAN: BooleanParser = BooleanParser;
    match kind {
        FieldKind::Date => &DATE,
        FieldKind::Numeric => &NUMERIC,
        FieldKind::Integer => &INTEGER,
        FieldKind::String => &STRING,
        FieldKind::Boolean => &BOOLEAN,
    }
}

/// Diagnostic label for a field: its name, falling back to its target.
pub(crate) fn field_label(field: &FieldSpec) -> String {
    if field.name.trim().is_empty() {
        field.target.clone()
    } else {
        field.name.clone()
    }
}

pub(crate) fn invalid(field: &FieldSpec, kind: &'static str, raw: &str) -> ParseError {
    ParseError::InvalidField {
        field: field_label(field),
        kind,
        raw: raw.to_string(),
    }
}

/// Boolean option override, accepting `true`/`false` in any case.
pub(crate) fn opt_bool(field: &FieldSpec, key: &str) -> Option<bool> {
    field.option(key).and_then(|v| {
        if v.eq_ignore_ascii_case("true") {
            Some(true)
        } else if v.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    })
}

/// Numeric option override.
pub(crate) fn opt_u32(field: &FieldSpec, key: &str) -> Option<u32> {
    field.option(key).and_then(|v| v.trim().parse().ok())
}

/// Pipe-separated list option override.
pub(crate) fn opt_list(field: &FieldSpec, key: &str) -> Option<Vec<String>> {
    field
        .option(key)
        .map(|v| v.split('|').map(str::to_string).collect())
}

/// Pipe-separated `key=value` pairs option override.
pub(crate) fn opt_pairs(field: &FieldSpec, key: &str) -> Option<Vec<(String, String)>> {
    field.option(key).map(|v| {
        v.split('|')
            .filter_map(|pair| {
                pair.split_once('=')
                    .map(|(k, val)| (k.to_string(), val.to_string()))
            })
            .collect()
    })
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::BTreeMap;

    use copybook_layout::{FieldKind, FieldSpec};

    /// A field spec for parser tests; position is irrelevant because
    /// parsers receive the already-sliced value.
    pub fn spec(kind: FieldKind, options: &[(&str, &str)]) -> FieldSpec {
        FieldSpec {
            name: "test-field".to_string(),
            target: "Target".to_string(),
            start: 1,
            length: 10,
            kind,
            options: options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}
