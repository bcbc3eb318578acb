//! Default parsing rules applied when a field does not override them.
//!
//! Every rule here can be overridden per field through the field's
//! free-form `options` map; the rule records hold the file-wide
//! defaults. Defaults lean toward mainframe-feed convention: overpunch
//! signs are honored, all-zero numerics mean zero, all-space fields mean
//! absent, strings are trimmed on the right.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codes::code_enum;

code_enum! {
    /// Which side of a string field to strip spaces from.
    TrimMode {
        /// Strip leading spaces.
        Left => "left",
        /// Strip trailing spaces.
        Right => "right",
        /// Strip both sides.
        Both => "both",
        /// Leave the value as sliced.
        None => "none",
    }
}

impl TrimMode {
    /// Parse an override code; unrecognized codes fall back to `Both`.
    pub fn parse_lenient(code: &str) -> Self {
        Self::parse(code).unwrap_or(Self::Both)
    }
}

code_enum! {
    /// Case normalization applied after trimming.
    CaseMode {
        /// Uppercase the value.
        Upper => "upper",
        /// Lowercase the value.
        Lower => "lower",
        /// Leave the case alone.
        None => "none",
    }
}

impl CaseMode {
    /// Parse an override code; unrecognized codes fall back to `None`.
    pub fn parse_lenient(code: &str) -> Self {
        Self::parse(code).unwrap_or(Self::None)
    }
}

code_enum! {
    /// What an all-zeros numeric or integer field means.
    AllZerosBehavior {
        /// The field is absent.
        Null => "null",
        /// The field is a literal zero.
        Zero => "zero",
    }
}

code_enum! {
    /// What an all-spaces string field produces.
    StringBlankBehavior {
        /// The field is absent.
        Null => "null",
        /// An empty string.
        Empty => "empty",
        /// The original space-padded slice.
        Keep => "keep",
    }
}

code_enum! {
    /// What an all-spaces boolean field produces.
    BooleanBlankBehavior {
        /// The field is absent.
        Null => "null",
        /// Boolean false.
        False => "false",
        /// Boolean true.
        True => "true",
    }
}

/// Rules for `date` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRules {
    /// Ordered strftime patterns tried for exact parsing.
    pub formats: Vec<String>,
    /// Whether an all-zeros field (e.g. `00000000`) is absent.
    pub treat_all_zeros_as_null: bool,
    /// Whether an all-spaces field is absent.
    pub treat_all_spaces_as_null: bool,
}

impl Default for DateRules {
    fn default() -> Self {
        Self {
            formats: vec!["%Y%m%d".to_string()],
            treat_all_zeros_as_null: true,
            treat_all_spaces_as_null: true,
        }
    }
}

/// Rules for `numeric` (decimal) fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericRules {
    /// Whether a trailing signed-zone character carries digit and sign.
    pub allow_overpunch: bool,
    /// Whether an all-spaces field is absent.
    pub treat_all_spaces_as_null: bool,
    /// What an all-zeros field means.
    pub all_zeros_behavior: AllZerosBehavior,
    /// Implied decimal places when the field carries no explicit point.
    pub default_implied_decimal_places: u32,
}

impl Default for NumericRules {
    fn default() -> Self {
        Self {
            allow_overpunch: true,
            treat_all_spaces_as_null: true,
            all_zeros_behavior: AllZerosBehavior::Zero,
            default_implied_decimal_places: 0,
        }
    }
}

/// Rules for `integer` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegerRules {
    /// Whether an all-spaces field is absent.
    pub treat_all_spaces_as_null: bool,
    /// What an all-zeros field means.
    pub all_zeros_behavior: AllZerosBehavior,
}

impl Default for IntegerRules {
    fn default() -> Self {
        Self {
            treat_all_spaces_as_null: true,
            all_zeros_behavior: AllZerosBehavior::Zero,
        }
    }
}

/// Rules for `string` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringRules {
    /// Default trim applied to sliced values.
    pub default_trim: TrimMode,
    /// What an all-spaces field produces.
    pub all_spaces_behavior: StringBlankBehavior,
    /// Case normalization applied after trimming.
    pub case_normalization: CaseMode,
    /// Literal substring replacements applied after trim and case.
    pub replacements: BTreeMap<String, String>,
}

impl Default for StringRules {
    fn default() -> Self {
        Self {
            default_trim: TrimMode::Right,
            all_spaces_behavior: StringBlankBehavior::Null,
            case_normalization: CaseMode::None,
            replacements: BTreeMap::new(),
        }
    }
}

/// Rules for `boolean` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BooleanRules {
    /// Literals recognized as true, compared case-insensitively.
    pub true_values: Vec<String>,
    /// Literals recognized as false, compared case-insensitively.
    pub false_values: Vec<String>,
    /// Whether any non-blank content short-circuits to true.
    pub any_non_blank_is_true: bool,
    /// What an all-spaces field produces.
    pub all_spaces_behavior: BooleanBlankBehavior,
}

impl Default for BooleanRules {
    fn default() -> Self {
        Self {
            true_values: ["Y", "T", "1", "YES", "TRUE"]
                .into_iter()
                .map(String::from)
                .collect(),
            false_values: ["N", "F", "0", "NO", "FALSE"]
                .into_iter()
                .map(String::from)
                .collect(),
            any_non_blank_is_true: false,
            all_spaces_behavior: BooleanBlankBehavior::Null,
        }
    }
}

/// File-wide parsing defaults, one record per field type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsingRules {
    /// Defaults for `date` fields.
    pub date: DateRules,
    /// Defaults for `numeric` fields.
    pub numeric: NumericRules,
    /// Defaults for `integer` fields.
    pub integer: IntegerRules,
    /// Defaults for `string` fields.
    pub string: StringRules,
    /// Defaults for `boolean` fields.
    pub boolean: BooleanRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_mode_codes() {
        assert_eq!(TrimMode::parse("RIGHT"), Some(TrimMode::Right));
        assert_eq!(TrimMode::parse("left"), Some(TrimMode::Left));
        assert_eq!(TrimMode::parse("sideways"), None);
        assert_eq!(TrimMode::parse_lenient("sideways"), TrimMode::Both);
        assert_eq!(TrimMode::Right.code(), "right");
    }

    #[test]
    fn test_case_mode_lenient_default() {
        assert_eq!(CaseMode::parse_lenient("upper"), CaseMode::Upper);
        assert_eq!(CaseMode::parse_lenient("mixed"), CaseMode::None);
    }

    #[test]
    fn test_rules_defaults() {
        let rules = ParsingRules::default();
        assert_eq!(rules.date.formats, vec!["%Y%m%d"]);
        assert!(rules.numeric.allow_overpunch);
        assert_eq!(rules.numeric.all_zeros_behavior, AllZerosBehavior::Zero);
        assert_eq!(rules.string.default_trim, TrimMode::Right);
        assert!(rules.boolean.true_values.contains(&"Y".to_string()));
    }

    #[test]
    fn test_rules_yaml_overrides() {
        let yaml = r#"
numeric:
  allowOverpunch: false
  allZerosBehavior: "null"
string:
  defaultTrim: both
  replacements:
    "*": ""
"#;
        let rules: ParsingRules = serde_yaml::from_str(yaml).unwrap();
        assert!(!rules.numeric.allow_overpunch);
        assert_eq!(rules.numeric.all_zeros_behavior, AllZerosBehavior::Null);
        assert_eq!(rules.string.default_trim, TrimMode::Both);
        assert_eq!(rules.string.replacements.get("*").unwrap(), "");
        // untouched sections keep their defaults
        assert!(rules.date.treat_all_zeros_as_null);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let yaml = "integer:\n  allZerosBehavior: maybe\n";
        assert!(serde_yaml::from_str::<ParsingRules>(yaml).is_err());
    }
}
