//! Check command: validate configuration before touching any data.

use std::any::Any;
use std::path::Path;

use copybook_layout::{JobSpec, Layout, Manifest, TerminationMode};
use copybook_record::Record;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::entities::default_registry;
use crate::runner::ImportEngine;

/// Load a manifest, load and validate every referenced layout, and
/// resolve every entity, property path, and collection path against
/// the registry, so configuration errors surface before a run.
pub fn check(manifest_path: &Path) -> Result<()> {
    let engine = ImportEngine::new(default_registry());
    let manifest = Manifest::load(manifest_path)?;

    for job in &manifest.jobs {
        let layout = Layout::load(&job.layout_path)
            .wrap_err_with(|| format!("job '{}'", job.name))?;
        verify_wiring(&engine, job, &layout)
            .wrap_err_with(|| format!("job '{}'", job.name))?;
        println!(
            "job '{}': OK ({} header fields, {} occurs groups)",
            job.name,
            layout.header_fields.len(),
            layout.occurs_groups.len()
        );
    }

    println!("{} job(s) validated", manifest.jobs.len());
    Ok(())
}

/// Resolve every path the layout references on the registered entities.
fn verify_wiring(engine: &ImportEngine, job: &JobSpec, layout: &Layout) -> Result<()> {
    let parent = engine.registry.create(&job.entity).into_diagnostic()?;
    let parent_descriptor = parent.descriptor();
    let parent_type = parent.as_any().type_id();

    for field in &layout.header_fields {
        engine
            .properties
            .setter(parent_descriptor, parent_type, &field.target)
            .into_diagnostic()
            .wrap_err_with(|| format!("header field '{}'", field.name))?;
    }

    for group in &layout.occurs_groups {
        let child = engine
            .registry
            .create(&group.child_entity)
            .into_diagnostic()
            .wrap_err_with(|| format!("occurs group '{}'", group.name))?;
        let child_descriptor = child.descriptor();
        let child_type = child.as_any().type_id();

        engine
            .collections
            .adder(
                parent_descriptor,
                parent_type,
                &group.parent_collection_target,
                &group.child_entity,
            )
            .into_diagnostic()
            .wrap_err_with(|| format!("occurs group '{}'", group.name))?;

        if group.termination_mode == TerminationMode::Count {
            let target = group.count_field_target.as_deref().unwrap_or("");
            engine
                .properties
                .getter(parent_descriptor, parent_type, target)
                .into_diagnostic()
                .wrap_err_with(|| format!("count field of occurs group '{}'", group.name))?;
        }

        if let Some(sequence) = group.sequence.as_ref().filter(|s| s.enabled) {
            engine
                .properties
                .setter(child_descriptor, child_type, &sequence.target)
                .into_diagnostic()
                .wrap_err_with(|| format!("sequence target of occurs group '{}'", group.name))?;
        }

        for field in &group.item_fields {
            engine
                .properties
                .setter(child_descriptor, child_type, &field.target)
                .into_diagnostic()
                .wrap_err_with(|| format!("item field '{}'", field.name))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use copybook_layout::{FieldKind, FieldSpec, JobMode};

    fn job(entity: &str) -> JobSpec {
        JobSpec {
            name: "test".to_string(),
            input_glob: "*.dat".to_string(),
            layout_path: "unused.yaml".into(),
            mode: JobMode::Single,
            entity: entity.to_string(),
            source_system: None,
            batch_id: None,
        }
    }

    fn header(target: &str) -> Layout {
        Layout {
            header_fields: vec![FieldSpec {
                name: "f".to_string(),
                target: target.to_string(),
                start: 1,
                length: 4,
                kind: FieldKind::String,
                options: Default::default(),
            }],
            ..Layout::default()
        }
    }

    #[test]
    fn test_valid_wiring_passes() {
        let engine = ImportEngine::new(default_registry());
        verify_wiring(&engine, &job("Policy"), &header("PolicyNumber")).unwrap();
    }

    #[test]
    fn test_unknown_entity_fails() {
        let engine = ImportEngine::new(default_registry());
        assert!(verify_wiring(&engine, &job("Ghost"), &header("PolicyNumber")).is_err());
    }

    #[test]
    fn test_unknown_property_fails() {
        let engine = ImportEngine::new(default_registry());
        assert!(verify_wiring(&engine, &job("Policy"), &header("Nope")).is_err());
    }
}
