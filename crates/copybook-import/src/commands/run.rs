//! Run command: execute every job in a manifest.

use std::path::Path;

use copybook_layout::Manifest;
use miette::Result;

use crate::entities::default_registry;
use crate::runner::{run_manifest, ImportEngine};

/// Execute the manifest and print per-job statistics.
pub fn run(manifest_path: &Path, out_dir: Option<&Path>, batch_size: usize) -> Result<()> {
    let engine = ImportEngine::new(default_registry());
    let manifest = Manifest::load(manifest_path)?;
    let results = run_manifest(&engine, &manifest, out_dir, batch_size)?;

    for (name, stats) in &results {
        println!(
            "job '{}': {} file(s), {} line(s), {} record(s), {} skipped",
            name, stats.files, stats.lines, stats.records, stats.skipped
        );
    }
    Ok(())
}
