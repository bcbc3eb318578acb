//! Boolean field parsing.

use copybook_layout::{BooleanBlankBehavior, FieldSpec, ParsingRules};
use copybook_record::Value;

use super::{invalid, opt_bool, opt_list, FieldParser};
use crate::error::ParseError;
use crate::text::is_all_spaces;

/// Parses boolean flag fields against true/false literal lists.
///
/// Recognized options: `anyNonBlankIsTrue`, `allSpacesBehavior`, and
/// pipe-separated `trueValues`/`falseValues` lists. Literal comparison
/// is case-insensitive; a value matching neither list is a format
/// error.
pub struct BooleanParser;

fn contains_ci(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.eq_ignore_ascii_case(needle))
}

impl FieldParser for BooleanParser {
    fn parse(
        &self,
        raw: &str,
        field: &FieldSpec,
        rules: &ParsingRules,
    ) -> Result<Value, ParseError> {
        let boolean_rules = &rules.boolean;
        if is_all_spaces(raw) {
            let blank = field
                .option("allSpacesBehavior")
                .and_then(BooleanBlankBehavior::parse)
                .unwrap_or(boolean_rules.all_spaces_behavior);
            return Ok(match blank {
                BooleanBlankBehavior::Null => Value::Null,
                BooleanBlankBehavior::False => Value::Bool(false),
                BooleanBlankBehavior::True => Value::Bool(true),
            });
        }

        let trimmed = raw.trim_matches(' ');
        let any_non_blank =
            opt_bool(field, "anyNonBlankIsTrue").unwrap_or(boolean_rules.any_non_blank_is_true);
        if any_non_blank {
            return Ok(Value::Bool(true));
        }

        let is_true = match opt_list(field, "trueValues") {
            Some(values) => contains_ci(&values, trimmed),
            None => contains_ci(&boolean_rules.true_values, trimmed),
        };
        if is_true {
            return Ok(Value::Bool(true));
        }
        let is_false = match opt_list(field, "falseValues") {
            Some(values) => contains_ci(&values, trimmed),
            None => contains_ci(&boolean_rules.false_values, trimmed),
        };
        if is_false {
            return Ok(Value::Bool(false));
        }
        Err(invalid(field, "boolean", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::testutil::spec;
    use copybook_layout::FieldKind;

    fn parse(raw: &str, options: &[(&str, &str)]) -> Result<Value, ParseError> {
        BooleanParser.parse(
            raw,
            &spec(FieldKind::Boolean, options),
            &ParsingRules::default(),
        )
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(parse("Y", &[]).unwrap(), Value::Bool(true));
        assert_eq!(parse("n", &[]).unwrap(), Value::Bool(false));
        assert_eq!(parse(" TRUE ", &[]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_all_spaces_behaviors() {
        assert_eq!(parse("  ", &[]).unwrap(), Value::Null);
        assert_eq!(
            parse("  ", &[("allSpacesBehavior", "false")]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            parse("  ", &[("allSpacesBehavior", "true")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_any_non_blank_short_circuits() {
        assert_eq!(
            parse("Q", &[("anyNonBlankIsTrue", "true")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_custom_literal_lists() {
        let options = [("trueValues", "OUI|SI"), ("falseValues", "NON|NO")];
        assert_eq!(parse("oui", &options).unwrap(), Value::Bool(true));
        assert_eq!(parse("NON", &options).unwrap(), Value::Bool(false));
        assert!(parse("Y", &options).is_err());
    }

    #[test]
    fn test_unrecognized_literal_is_a_format_error() {
        let err = parse("X", &[]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField { kind: "boolean", .. }
        ));
    }
}
