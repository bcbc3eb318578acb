//! String field parsing.

use copybook_layout::{CaseMode, FieldSpec, ParsingRules, StringBlankBehavior, TrimMode};
use copybook_record::Value;

use super::{opt_pairs, FieldParser};
use crate::error::ParseError;
use crate::text::{apply_case, apply_trim, is_all_spaces};

/// Parses text fields with trim, case, and literal replacements.
///
/// Recognized options: `trim`, `case`, `allSpacesBehavior`, and
/// `replacements` as pipe-separated `needle=substitute` pairs merged
/// over the rule-level map. Replacements are ordinal substring
/// substitutions applied after trim and case.
pub struct StringParser;

impl FieldParser for StringParser {
    fn parse(
        &self,
        raw: &str,
        field: &FieldSpec,
        rules: &ParsingRules,
    ) -> Result<Value, ParseError> {
        let string_rules = &rules.string;
        if is_all_spaces(raw) {
            let blank = field
                .option("allSpacesBehavior")
                .and_then(StringBlankBehavior::parse)
                .unwrap_or(string_rules.all_spaces_behavior);
            return Ok(match blank {
                StringBlankBehavior::Null => Value::Null,
                StringBlankBehavior::Empty => Value::Str(String::new()),
                StringBlankBehavior::Keep => Value::Str(raw.to_string()),
            });
        }

        let trim = field
            .option("trim")
            .map(TrimMode::parse_lenient)
            .unwrap_or(string_rules.default_trim);
        let case = field
            .option("case")
            .map(CaseMode::parse_lenient)
            .unwrap_or(string_rules.case_normalization);
        let mut out = apply_case(apply_trim(raw, trim), case);

        let mut replacements = string_rules.replacements.clone();
        if let Some(pairs) = opt_pairs(field, "replacements") {
            for (needle, substitute) in pairs {
                replacements.insert(needle, substitute);
            }
        }
        for (needle, substitute) in &replacements {
            if !needle.is_empty() {
                out = out.replace(needle.as_str(), substitute);
            }
        }
        Ok(Value::Str(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::testutil::spec;
    use copybook_layout::FieldKind;

    fn parse(raw: &str, options: &[(&str, &str)]) -> Result<Value, ParseError> {
        StringParser.parse(
            raw,
            &spec(FieldKind::String, options),
            &ParsingRules::default(),
        )
    }

    fn text(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    #[test]
    fn test_default_trims_right() {
        assert_eq!(parse("  JONES   ", &[]).unwrap(), text("  JONES"));
    }

    #[test]
    fn test_trim_override() {
        assert_eq!(parse("  JONES  ", &[("trim", "both")]).unwrap(), text("JONES"));
        assert_eq!(parse("  JONES  ", &[("trim", "none")]).unwrap(), text("  JONES  "));
    }

    #[test]
    fn test_unknown_trim_defaults_to_both() {
        assert_eq!(parse("  JONES  ", &[("trim", "edges")]).unwrap(), text("JONES"));
    }

    #[test]
    fn test_case_normalization() {
        assert_eq!(
            parse("Jones", &[("case", "upper"), ("trim", "both")]).unwrap(),
            text("JONES")
        );
    }

    #[test]
    fn test_all_spaces_default_is_null() {
        assert_eq!(parse("    ", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_all_spaces_overrides() {
        assert_eq!(
            parse("    ", &[("allSpacesBehavior", "empty")]).unwrap(),
            text("")
        );
        assert_eq!(
            parse("    ", &[("allSpacesBehavior", "keep")]).unwrap(),
            text("    ")
        );
    }

    #[test]
    fn test_replacements_apply_after_trim() {
        assert_eq!(
            parse("A*B*C  ", &[("replacements", "*=-")]).unwrap(),
            text("A-B-C")
        );
    }

    #[test]
    fn test_field_replacements_override_rules() {
        let mut rules = ParsingRules::default();
        rules
            .string
            .replacements
            .insert("#".to_string(), "X".to_string());
        let field = spec(FieldKind::String, &[("replacements", "#=Y")]);
        let out = StringParser.parse("A#B", &field, &rules).unwrap();
        assert_eq!(out, text("AYB"));
    }
}
