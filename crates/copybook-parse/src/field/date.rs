//! Date field parsing.

use copybook_layout::{FieldSpec, ParsingRules};
use copybook_record::Value;

use super::{invalid, FieldParser};
use crate::error::ParseError;
use crate::text::{
    collapse_spaces, is_all_spaces, is_all_zeros, try_parse_exact_date, FALLBACK_DATE_FORMATS,
};

/// Parses calendar dates against an ordered strftime format list.
///
/// A field can override the file-wide list with a pipe-separated
/// `formats` option. After every configured format fails, a short
/// built-in list of unambiguous fallback formats is tried before the
/// value is rejected.
pub struct DateParser;

impl FieldParser for DateParser {
    fn parse(
        &self,
        raw: &str,
        field: &FieldSpec,
        rules: &ParsingRules,
    ) -> Result<Value, ParseError> {
        let date_rules = &rules.date;
        if is_all_spaces(raw) && date_rules.treat_all_spaces_as_null {
            return Ok(Value::Null);
        }
        let collapsed = collapse_spaces(raw);
        if collapsed.is_empty() {
            return Ok(Value::Null);
        }
        if is_all_zeros(&collapsed) && date_rules.treat_all_zeros_as_null {
            return Ok(Value::Null);
        }

        let parsed = match field.option("formats") {
            Some(formats) => {
                let formats: Vec<&str> = formats.split('|').collect();
                try_parse_exact_date(&collapsed, &formats)
            }
            None => try_parse_exact_date(&collapsed, &date_rules.formats),
        };
        parsed
            .or_else(|| try_parse_exact_date(&collapsed, FALLBACK_DATE_FORMATS))
            .map(Value::Date)
            .ok_or_else(|| invalid(field, "date", raw))
    }
}
