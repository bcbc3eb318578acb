//! Numeric (decimal) field parsing.

use std::str::FromStr;

use copybook_layout::{AllZerosBehavior, FieldSpec, ParsingRules};
use copybook_record::Value;
use rust_decimal::Decimal;

use super::{invalid, opt_bool, opt_u32, FieldParser};
use crate::error::ParseError;
use crate::overpunch::decode_overpunch;
use crate::text::{collapse_spaces, is_all_spaces, is_all_zeros};

/// Parses decimals with implied places and overpunch signs.
///
/// Recognized options: `allowOverpunch`, `treatAllSpacesAsNull`,
/// `allZerosBehavior`, `impliedDecimalPlaces`.
///
/// A value carrying an explicit decimal point is parsed literally;
/// otherwise the surviving digits are scaled by the implied decimal
/// places. An explicit leading sign and a trailing overpunch sign
/// compose multiplicatively, so `-123J` decodes to +1231 scaled.
pub struct NumericParser;

impl FieldParser for NumericParser {
    fn parse(
        &self,
        raw: &str,
        field: &FieldSpec,
        rules: &ParsingRules,
    ) -> Result<Value, ParseError> {
        let numeric_rules = &rules.numeric;
        let spaces_null =
            opt_bool(field, "treatAllSpacesAsNull").unwrap_or(numeric_rules.treat_all_spaces_as_null);
        if is_all_spaces(raw) && spaces_null {
            return Ok(Value::Null);
        }

        let zeros = field
            .option("allZerosBehavior")
            .and_then(AllZerosBehavior::parse)
            .unwrap_or(numeric_rules.all_zeros_behavior);
        if is_all_zeros(raw) {
            return Ok(match zeros {
                AllZerosBehavior::Null => Value::Null,
                AllZerosBehavior::Zero => Value::Decimal(Decimal::ZERO),
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

        let allow_overpunch =
            opt_bool(field, "allowOverpunch").unwrap_or(numeric_rules.allow_overpunch);
        if allow_overpunch {
            if let Some((digit, sign)) = text.chars().last().and_then(decode_overpunch) {
                text.pop();
                text.push(char::from(b'0' + digit));
                if sign < 0 {
                    negative = !negative;
                }
            }
        }

        if text.contains('.') {
            let parsed =
                Decimal::from_str(&text).map_err(|_| invalid(field, "numeric", raw))?;
            return Ok(Value::Decimal(if negative { -parsed } else { parsed }));
        }

        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Ok(Value::Null);
        }
        let places = opt_u32(field, "impliedDecimalPlaces")
            .unwrap_or(numeric_rules.default_implied_decimal_places);
        let mut parsed = Decimal::from_str(&digits).map_err(|_| invalid(field, "numeric", raw))?;
        if places > 0 {
            parsed
                .set_scale(places)
                .map_err(|_| invalid(field, "numeric", raw))?;
        }
        Ok(Value::Decimal(if negative { -parsed } else { parsed }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::testutil::spec;
    use copybook_layout::FieldKind;

    fn parse(raw: &str, options: &[(&str, &str)]) -> Result<Value, ParseError> {
        NumericParser.parse(
            raw,
            &spec(FieldKind::Numeric, options),
            &ParsingRules::default(),
        )
    }

    fn dec(s: &str) -> Value {
        Value::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_plain_digits_with_implied_places() {
        assert_eq!(
            parse("0001234", &[("impliedDecimalPlaces", "2")]).unwrap(),
            dec("12.34")
        );
    }

    #[test]
    fn test_no_implied_places() {
        assert_eq!(parse("0001234", &[]).unwrap(), dec("1234"));
    }

    #[test]
    fn test_overpunch_negative() {
        // J carries digit 1 and a negative sign
        assert_eq!(
            parse("0000012345J", &[("impliedDecimalPlaces", "2")]).unwrap(),
            dec("-1234.51")
        );
    }

    #[test]
    fn test_overpunch_positive_zone() {
        // E carries digit 5, positive
        assert_eq!(parse("012E", &[]).unwrap(), dec("125"));
    }

    #[test]
    fn test_explicit_sign_composes_with_overpunch() {
        // leading '-' times negative zone 'J' is positive
        assert_eq!(parse("-12J", &[]).unwrap(), dec("121"));
    }

    #[test]
    fn test_overpunch_disabled_leaves_trailing_char() {
        // with overpunch off, 'J' survives the digit filter as nothing
        assert_eq!(
            parse("123J", &[("allowOverpunch", "false")]).unwrap(),
            dec("123")
        );
    }

    #[test]
    fn test_explicit_decimal_point() {
        assert_eq!(parse(" -12.50 ", &[]).unwrap(), dec("-12.50"));
    }

    #[test]
    fn test_all_spaces_is_null() {
        assert_eq!(parse("     ", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_all_spaces_kept_when_rule_off() {
        assert_eq!(
            parse("   ", &[("treatAllSpacesAsNull", "false")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_all_zeros_default_is_zero() {
        assert_eq!(parse("00000", &[]).unwrap(), Value::Decimal(Decimal::ZERO));
    }

    #[test]
    fn test_all_zeros_null_override() {
        assert_eq!(
            parse("00000", &[("allZerosBehavior", "null")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_sign_only_is_null() {
        assert_eq!(parse("   -  ", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_malformed_decimal_literal_is_rejected() {
        assert!(parse("1.2.3", &[]).is_err());
    }
}
