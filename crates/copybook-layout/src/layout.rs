//! Layout schema: header fields, OCCURS groups, and parsing rules.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codes::code_enum;
use crate::error::LayoutError;
use crate::rules::ParsingRules;
use crate::Result;

code_enum! {
    /// Field type tag, dispatching to one of the five field parsers.
    ///
    /// An unrecognized tag is rejected at load time rather than falling
    /// back to string parsing, so a typo in a layout surfaces before any
    /// data is read.
    FieldKind {
        /// Calendar date.
        Date => "date",
        /// Decimal with implied places and optional overpunch sign.
        Numeric => "numeric",
        /// 64-bit signed integer.
        Integer => "integer",
        /// Text with trim/case/replacement handling.
        String => "string",
        /// True/false literal.
        Boolean => "boolean",
    }
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::String
    }
}

code_enum! {
    /// How an OCCURS group decides it has emitted its last item.
    TerminationMode {
        /// Stop at the first all-spaces item block.
        Padding => "padding",
        /// A header field on the parent holds the exact item count.
        Count => "count",
    }
}

/// One fixed-width field: where it sits in the line and how to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Diagnostic name, used in log and error messages.
    #[serde(default)]
    pub name: String,
    /// Dotted property path on the destination entity.
    pub target: String,
    /// 1-based start column. For occurs-group item fields this is
    /// relative to the item block, not the line.
    #[serde(default = "default_start")]
    pub start: usize,
    /// Field width in columns. Zero is legal (always slices empty).
    #[serde(default)]
    pub length: usize,
    /// Which field parser decodes the sliced value.
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// Free-form per-field options; recognized keys depend on `kind`
    /// and on the value source (`source`, `constantValue`, `nowKind`).
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

fn default_start() -> usize {
    1
}

impl FieldSpec {
    /// The 0-based slice start.
    pub fn start_index(&self) -> usize {
        self.start.saturating_sub(1)
    }

    /// Case-insensitive lookup in the field's options map.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn validate(&self, scope: &'static str) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(LayoutError::invalid(scope, &self.name, "target is empty"));
        }
        if self.start < 1 {
            return Err(LayoutError::invalid(scope, &self.name, "start must be >= 1"));
        }
        Ok(())
    }
}

/// Per-item sequence numbering for an OCCURS group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SequenceSpec {
    /// Whether sequence numbering is active.
    pub enabled: bool,
    /// Child property that receives the sequence value.
    pub target: String,
    /// Value written to the first emitted item.
    pub start: i64,
    /// Increment between consecutive items.
    pub step: i64,
}

impl Default for SequenceSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            target: String::new(),
            start: 1,
            step: 1,
        }
    }
}

/// A repeating subgroup: a contiguous byte region of the line divided
/// into equal item blocks, each parsed into one child entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccursGroupSpec {
    /// Diagnostic name.
    #[serde(default)]
    pub name: String,
    /// Dotted path to the collection on the parent entity.
    pub parent_collection_target: String,
    /// Registry name of the child entity type.
    pub child_entity: String,
    /// 1-based start column of the group region within the line.
    pub start: usize,
    /// Total width of the group region.
    pub length: usize,
    /// Fixed width of one repetition.
    pub item_length: usize,
    /// Upper bound on repetitions.
    pub max_items: usize,
    /// How the group detects its end.
    pub termination_mode: TerminationMode,
    /// Parent property holding the item count (count mode only). Must
    /// be populated by a header field before groups are expanded.
    #[serde(default)]
    pub count_field_target: Option<String>,
    /// Optional per-item sequence numbering.
    #[serde(default)]
    pub sequence: Option<SequenceSpec>,
    /// Fields of one item block, with item-relative start columns.
    pub item_fields: Vec<FieldSpec>,
}

impl OccursGroupSpec {
    fn validate(&self) -> Result<()> {
        let group = "occurs group";
        if self.parent_collection_target.trim().is_empty() {
            return Err(LayoutError::invalid(
                group,
                &self.name,
                "parentCollectionTarget is empty",
            ));
        }
        if self.child_entity.trim().is_empty() {
            return Err(LayoutError::invalid(group, &self.name, "childEntity is empty"));
        }
        if self.start < 1 {
            return Err(LayoutError::invalid(group, &self.name, "start must be >= 1"));
        }
        if self.length == 0 || self.item_length == 0 || self.max_items == 0 {
            return Err(LayoutError::invalid(
                group,
                &self.name,
                "length, itemLength and maxItems must all be > 0",
            ));
        }
        if self.item_fields.is_empty() {
            return Err(LayoutError::invalid(group, &self.name, "itemFields is empty"));
        }
        if self.termination_mode == TerminationMode::Count
            && self
                .count_field_target
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(LayoutError::invalid(
                group,
                &self.name,
                "count termination requires countFieldTarget",
            ));
        }
        if let Some(seq) = &self.sequence {
            if seq.enabled && seq.target.trim().is_empty() {
                return Err(LayoutError::invalid(
                    group,
                    &self.name,
                    "sequence is enabled but has no target",
                ));
            }
        }
        for field in &self.item_fields {
            field.validate("item field")?;
            // A sliced item field must fit inside the item block.
            if field.length > 0 && field.start_index() + field.length > self.item_length {
                return Err(LayoutError::invalid(
                    "item field",
                    &field.name,
                    format!(
                        "columns {}..{} exceed item length {}",
                        field.start,
                        field.start_index() + field.length,
                        self.item_length
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// One source file format: header fields, OCCURS groups, parsing rules.
///
/// Loaded and validated once per job, immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    /// Fields applied to every line, in declaration order.
    pub header_fields: Vec<FieldSpec>,
    /// Repeating subgroups, expanded in declaration order (graph mode).
    pub occurs_groups: Vec<OccursGroupSpec>,
    /// File-wide parsing defaults.
    pub rules: ParsingRules,
}

impl Layout {
    /// Load a layout from a YAML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: Self =
            serde_yaml::from_str(&content).map_err(|source| LayoutError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check every structural invariant of the schema.
    pub fn validate(&self) -> Result<()> {
        for field in &self.header_fields {
            field.validate("header field")?;
        }
        for group in &self.occurs_groups {
            group.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sliced(name: &str, target: &str, start: usize, length: usize) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            target: target.to_string(),
            start,
            length,
            kind: FieldKind::String,
            options: BTreeMap::new(),
        }
    }

    fn group() -> OccursGroupSpec {
        OccursGroupSpec {
            name: "lines".to_string(),
            parent_collection_target: "Lines".to_string(),
            child_entity: "ClaimLine".to_string(),
            start: 41,
            length: 60,
            item_length: 20,
            max_items: 3,
            termination_mode: TerminationMode::Padding,
            count_field_target: None,
            sequence: None,
            item_fields: vec![sliced("code", "Code", 1, 8)],
        }
    }

    #[test]
    fn test_layout_yaml_roundtrip() {
        let yaml = r#"
headerFields:
  - name: claim-number
    target: ClaimNumber
    start: 1
    length: 10
    type: string
  - name: received
    target: ReceivedDate
    start: 11
    length: 8
    type: date
    options:
      formats: "%Y%m%d|%Y-%m-%d"
occursGroups:
  - name: lines
    parentCollectionTarget: Lines
    childEntity: ClaimLine
    start: 19
    length: 40
    itemLength: 20
    maxItems: 2
    terminationMode: padding
    itemFields:
      - name: code
        target: Code
        start: 1
        length: 8
        type: string
rules:
  numeric:
    defaultImpliedDecimalPlaces: 2
"#;
        let layout: Layout = serde_yaml::from_str(yaml).unwrap();
        layout.validate().unwrap();
        assert_eq!(layout.header_fields.len(), 2);
        assert_eq!(layout.header_fields[1].kind, FieldKind::Date);
        assert_eq!(
            layout.header_fields[1].option("FORMATS"),
            Some("%Y%m%d|%Y-%m-%d")
        );
        assert_eq!(layout.occurs_groups[0].max_items, 2);
        assert_eq!(layout.rules.numeric.default_implied_decimal_places, 2);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let yaml = r#"
headerFields: []
futureSection:
  whatever: 1
"#;
        let layout: Layout = serde_yaml::from_str(yaml).unwrap();
        assert!(layout.header_fields.is_empty());
        assert!(layout.occurs_groups.is_empty());
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let yaml = r#"
headerFields:
  - target: X
    type: money
"#;
        assert!(serde_yaml::from_str::<Layout>(yaml).is_err());
    }

    #[test]
    fn test_empty_target_fails_validation() {
        let layout = Layout {
            header_fields: vec![sliced("f", "  ", 1, 4)],
            ..Layout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_count_mode_requires_count_target() {
        let mut g = group();
        g.termination_mode = TerminationMode::Count;
        let layout = Layout {
            occurs_groups: vec![g],
            ..Layout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_item_field_must_fit_item_block() {
        let mut g = group();
        g.item_fields = vec![sliced("wide", "Code", 15, 10)];
        let layout = Layout {
            occurs_groups: vec![g],
            ..Layout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_zero_item_length_is_rejected() {
        let mut g = group();
        g.item_length = 0;
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_zero_length_field_is_legal() {
        let layout = Layout {
            header_fields: vec![sliced("tag", "Tag", 1, 0)],
            ..Layout::default()
        };
        layout.validate().unwrap();
    }
}
