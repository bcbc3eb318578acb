//! Shared text predicates and normalization helpers.

use chrono::NaiveDate;
use copybook_layout::{CaseMode, TrimMode};

/// Fallback formats tried after every configured format fails.
///
/// Deliberately short and unambiguous; legacy feeds that need anything
/// else must configure it explicitly.
pub(crate) const FALLBACK_DATE_FORMATS: &[&str] =
    &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Whether every character is a space. Empty strings qualify.
pub fn is_all_spaces(s: &str) -> bool {
    s.chars().all(|c| c == ' ')
}

/// Whether the value is a zero fill: no spaces, only `0` and `.`, and
/// at least one `0` (so `"."` alone does not qualify).
pub fn is_all_zeros(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '0' || c == '.') && s.contains('0')
}

/// Remove every space character.
pub fn collapse_spaces(s: &str) -> String {
    s.chars().filter(|&c| c != ' ').collect()
}

/// Strip spaces from the configured side(s).
pub fn apply_trim(s: &str, mode: TrimMode) -> &str {
    match mode {
        TrimMode::Left => s.trim_start_matches(' '),
        TrimMode::Right => s.trim_end_matches(' '),
        TrimMode::Both => s.trim_matches(' '),
        TrimMode::None => s,
    }
}

/// Normalize case per the configured mode.
pub fn apply_case(s: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => s.to_uppercase(),
        CaseMode::Lower => s.to_lowercase(),
        CaseMode::None => s.to_string(),
    }
}

/// Try each strftime format in order; first match wins.
pub fn try_parse_exact_date(s: &str, formats: &[impl AsRef<str>]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt.as_ref()).ok())
}
