//! Field value sources: fixed-width slice, constant, or job timestamp.

use chrono::{DateTime, Local, Utc};
use copybook_layout::FieldSpec;
use copybook_record::Value;

use crate::slice::slice;

/// Per-job context, constant across every line of the job.
///
/// One timestamp is taken at job start so every row imported by the
/// job carries the same stamp.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// Shared import timestamp.
    pub imported_at: DateTime<Utc>,
    /// Originating system label, substituted for `${SourceSystem}`.
    pub source_system: String,
    /// Batch identifier, substituted for `${BatchId}`.
    pub batch_id: String,
}

impl ImportContext {
    /// Context stamped with the current time.
    pub fn new(source_system: impl Into<String>, batch_id: impl Into<String>) -> Self {
        Self::at(Utc::now(), source_system, batch_id)
    }

    /// Context with an explicit timestamp.
    pub fn at(
        imported_at: DateTime<Utc>,
        source_system: impl Into<String>,
        batch_id: impl Into<String>,
    ) -> Self {
        Self {
            imported_at,
            source_system: source_system.into(),
            batch_id: batch_id.into(),
        }
    }
}

/// The raw input for one field, before type parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A fixed-width slice that must go through the field's parser.
    Sliced(String),
    /// A ready value written verbatim, bypassing the field parser.
    Literal(Value),
}

/// Produce the raw input for a field.
///
/// Driven by the `source` option: `fixedWidth` (the default, and the
/// fallback for unrecognized values) slices the line at the field's
/// position; `constant` emits `constantValue` with `${BatchId}` and
/// `${SourceSystem}` substituted; `now` emits the shared job
/// timestamp, converted to local wall time when `nowKind` is `local`.
pub fn resolve_source(line: &str, field: &FieldSpec, ctx: &ImportContext) -> RawValue {
    match field.option("source") {
        Some(source) if source.eq_ignore_ascii_case("constant") => {
            let template = field.option("constantValue").unwrap_or("");
            RawValue::Literal(Value::Str(substitute_tokens(template, ctx)))
        }
        Some(source) if source.eq_ignore_ascii_case("now") => {
            let stamp = if field
                .option("nowKind")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("local"))
            {
                ctx.imported_at.with_timezone(&Local).fixed_offset()
            } else {
                ctx.imported_at.fixed_offset()
            };
            RawValue::Literal(Value::Timestamp(stamp))
        }
        _ => RawValue::Sliced(slice(line, field.start_index(), field.length)),
    }
}

/// Replace `${BatchId}` and `${SourceSystem}` tokens, matching token
/// names case-insensitively. Unrecognized tokens pass through.
fn substitute_tokens(template: &str, ctx: &ImportContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                if token.eq_ignore_ascii_case("BatchId") {
                    out.push_str(&ctx.batch_id);
                } else if token.eq_ignore_ascii_case("SourceSystem") {
                    out.push_str(&ctx.source_system);
                } else {
                    out.push_str(&rest[open..open + 2 + close + 1]);
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
