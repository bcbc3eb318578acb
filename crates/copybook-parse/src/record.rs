//! The top-level record parser.

use std::any::Any;

use copybook_layout::{FieldSpec, Layout, OccursGroupSpec, ParsingRules, TerminationMode};
use copybook_record::{CollectionBinder, PropertyBinder, Record, RecordRegistry, Value};

use crate::error::{ConfigError, ParseError};
use crate::field::{field_label, parser_for};
use crate::slice::slice;
use crate::source::{resolve_source, ImportContext, RawValue};
use crate::text::is_all_spaces;
use crate::Result;

/// Drives a layout over one line, producing a flat record or a parent
/// with repeating children.
///
/// Holds only shared read-only state (the entity registry and the
/// binder caches), so one parser instance can serve any number of
/// threads working disjoint lines of the same job.
pub struct RecordParser<'a> {
    registry: &'a RecordRegistry,
    properties: &'a PropertyBinder,
    collections: &'a CollectionBinder,
}

impl<'a> RecordParser<'a> {
    /// Create a parser over shared registry and binder caches.
    pub fn new(
        registry: &'a RecordRegistry,
        properties: &'a PropertyBinder,
        collections: &'a CollectionBinder,
    ) -> Self {
        Self {
            registry,
            properties,
            collections,
        }
    }

    /// Parse one line into a flat record, ignoring OCCURS groups.
    pub fn parse_single(
        &self,
        line: &str,
        entity: &str,
        layout: &Layout,
        ctx: &ImportContext,
    ) -> Result<Box<dyn Record>> {
        let mut record = self.registry.create(entity).map_err(ConfigError::from)?;
        self.apply_fields(record.as_mut(), line, &layout.header_fields, &layout.rules, ctx)?;
        Ok(record)
    }

    /// Parse one line into a parent record plus its OCCURS children.
    pub fn parse_graph(
        &self,
        line: &str,
        parent_entity: &str,
        layout: &Layout,
        ctx: &ImportContext,
    ) -> Result<Box<dyn Record>> {
        let mut parent = self
            .registry
            .create(parent_entity)
            .map_err(ConfigError::from)?;
        self.apply_fields(parent.as_mut(), line, &layout.header_fields, &layout.rules, ctx)?;
        for group in &layout.occurs_groups {
            self.expand_group(parent.as_mut(), line, group, &layout.rules, ctx)?;
        }
        Ok(parent)
    }

    /// Resolve, parse, and write every field spec onto `record`.
    ///
    /// `line` is the whole input line for header fields and the item
    /// block for occurs-group item fields; sliced positions are always
    /// relative to what is passed here.
    fn apply_fields(
        &self,
        record: &mut dyn Record,
        line: &str,
        fields: &[FieldSpec],
        rules: &ParsingRules,
        ctx: &ImportContext,
    ) -> Result<()> {
        let descriptor = record.descriptor();
        let type_id = record.as_any().type_id();
        for spec in fields {
            let value = match resolve_source(line, spec, ctx) {
                RawValue::Sliced(raw) => parser_for(spec.kind).parse(&raw, spec, rules)?,
                RawValue::Literal(value) => value,
            };
            let setter = self
                .properties
                .setter(descriptor, type_id, &spec.target)
                .map_err(ConfigError::from)?;
            setter
                .set(record, value)
                .map_err(|err| ParseError::from_bind(&field_label(spec), err))?;
        }
        Ok(())
    }

    /// Expand one OCCURS group into the parent's collection.
    fn expand_group(
        &self,
        parent: &mut dyn Record,
        line: &str,
        group: &OccursGroupSpec,
        rules: &ParsingRules,
        ctx: &ImportContext,
    ) -> Result<()> {
        let parent_descriptor = parent.descriptor();
        let parent_type = parent.as_any().type_id();

        // Resolving the child and the adder up front surfaces wiring
        // errors even for lines whose group region is empty.
        self.registry
            .descriptor(&group.child_entity)
            .map_err(ConfigError::from)?;
        let adder = self
            .collections
            .adder(
                parent_descriptor,
                parent_type,
                &group.parent_collection_target,
                &group.child_entity,
            )
            .map_err(ConfigError::from)?;

        let block = slice(line, group.start.saturating_sub(1), group.length);
        let items_to_parse = match group.termination_mode {
            TerminationMode::Padding => group.max_items,
            TerminationMode::Count => self.read_item_count(parent, group)?,
        };
        let bound = group.length.min(group.item_length * group.max_items);

        let mut emitted = 0usize;
        for index in 0..items_to_parse {
            let offset = index * group.item_length;
            if offset >= bound {
                break;
            }
            let item_raw = slice(&block, offset, group.item_length);
            if group.termination_mode == TerminationMode::Padding && is_all_spaces(&item_raw) {
                break;
            }

            let mut child = self
                .registry
                .create(&group.child_entity)
                .map_err(ConfigError::from)?;
            self.apply_fields(child.as_mut(), &item_raw, &group.item_fields, rules, ctx)?;

            if let Some(sequence) = group.sequence.as_ref().filter(|s| s.enabled) {
                let setter = self
                    .properties
                    .setter(
                        child.descriptor(),
                        child.as_any().type_id(),
                        &sequence.target,
                    )
                    .map_err(ConfigError::from)?;
                let value = sequence.start + index as i64 * sequence.step;
                setter
                    .set(child.as_mut(), Value::Int(value))
                    .map_err(|err| ParseError::from_bind(&sequence.target, err))?;
            }

            adder
                .add(parent, child)
                .map_err(|err| ParseError::from_bind(&group.parent_collection_target, err))?;
            emitted += 1;
        }
        tracing::trace!(group = %group.name, emitted, "occurs group expanded");
        Ok(())
    }

    /// Read the populated item count for a count-terminated group from
    /// the parent, clamped to `[0, maxItems]`.
    fn read_item_count(&self, parent: &dyn Record, group: &OccursGroupSpec) -> Result<usize> {
        let target = group
            .count_field_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingCountField {
                group: group.name.clone(),
            })?;
        let getter = self
            .properties
            .getter(parent.descriptor(), parent.as_any().type_id(), target)
            .map_err(ConfigError::from)?;
        let value = getter.get(parent).map_err(ConfigError::from)?;
        let count = match &value {
            Value::Null => 0,
            Value::Int(n) => *n,
            Value::Decimal(d) if d.fract().is_zero() => {
                use rust_decimal::prelude::ToPrimitive;
                d.trunc().to_i64().ok_or_else(|| ConfigError::CountFieldType {
                    field: target.to_string(),
                    kind: value.kind(),
                    value: value.to_string(),
                })?
            }
            Value::Str(s) => s.trim().parse().map_err(|_| ConfigError::CountFieldType {
                field: target.to_string(),
                kind: value.kind(),
                value: value.to_string(),
            })?,
            _ => {
                return Err(ConfigError::CountFieldType {
                    field: target.to_string(),
                    kind: value.kind(),
                    value: value.to_string(),
                }
                .into())
            }
        };
        Ok(count.clamp(0, group.max_items as i64) as usize)
    }
}
