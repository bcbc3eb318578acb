//! Integer field parsing.

use copybook_layout::{AllZerosBehavior, FieldSpec, ParsingRules};
use copybook_record::Value;

use super::{invalid, opt_bool, FieldParser};
use crate::error::ParseError;
use crate::text::{collapse_spaces, is_all_spaces, is_all_zeros};

/// Widest digit count accepted for an integer field.
const MAX_DIGITS: usize = 11;

/// Parses 64-bit signed integers.
///
/// Recognized options: `treatAllSpacesAsNull`, `allZerosBehavior`.
/// No implied decimals, no overpunch; at most eleven digits survive
/// the filter before the value is rejected as out of range.
pub struct IntegerParser;

impl FieldParser for IntegerParser {
    fn parse(
        &self,
        raw: &str,
        field: &FieldSpec,
        rules: &ParsingRules,
    ) -> Result<Value, ParseError> {
        let integer_rules = &rules.integer;
        let spaces_null =
            opt_bool(field, "treatAllSpacesAsNull").unwrap_or(integer_rules.treat_all_spaces_as_null);
        if is_all_spaces(raw) && spaces_null {
            return Ok(Value::Null);
        }

        let zeros = field
            .option("allZerosBehavior")
            .and_then(AllZerosBehavior::parse)
            .unwrap_or(integer_rules.all_zeros_behavior);
        if is_all_zeros(raw) {
            return Ok(match zeros {
                AllZerosBehavior::Null => Value::Null,
                AllZerosBehavior::Zero => Value::Int(0),
            });
        }

        let mut text = collapse_spaces(raw);
        if text.is_empty() {
            return Ok(Value::Null);
        }

        let mut negative = false;
        if let Some(rest) = text.strip_prefix('+') {
            text = rest.to_string();
        } else if let Some(rest) = text.strip_prefix('-') {
            negative = true;
            text = rest.to_string();
        }

        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Ok(Value::Null);
        }
        if digits.len() > MAX_DIGITS {
            return Err(invalid(field, "integer", raw));
        }
        let parsed: i64 = digits
            .parse()
            .map_err(|_| invalid(field, "integer", raw))?;
        Ok(Value::Int(if negative { -parsed } else { parsed }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::testutil::spec;
    use copybook_layout::FieldKind;

    fn parse(raw: &str, options: &[(&str, &str)]) -> Result<Value, ParseError> {
        IntegerParser.parse(
            raw,
            &spec(FieldKind::Integer, options),
            &ParsingRules::default(),
        )
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse("00042", &[]).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_all_spaces_is_null() {
        assert_eq!(parse("     ", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_negative_sign() {
        assert_eq!(parse("  -17", &[]).unwrap(), Value::Int(-17));
        assert_eq!(parse("  +17", &[]).unwrap(), Value::Int(17));
    }

    #[test]
    fn test_all_zeros_default_is_zero() {
        assert_eq!(parse("0000", &[]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_all_zeros_null_override() {
        assert_eq!(
            parse("0000", &[("allZerosBehavior", "null")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_non_digits_are_filtered() {
        assert_eq!(parse("A12B3", &[]).unwrap(), Value::Int(123));
    }

    #[test]
    fn test_no_digits_is_null() {
        assert_eq!(parse("ABC", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_width_limit() {
        assert_eq!(
            parse("99999999999", &[]).unwrap(),
            Value::Int(99_999_999_999)
        );
        let err = parse("999999999999", &[]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField { kind: "integer", .. }
        ));
    }
}
