//! Job runner: walks the manifest, streams lines, collects stats.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use copybook_layout::{JobMode, JobSpec, Layout, Manifest};
use copybook_parse::{ImportContext, RecordParser};
use copybook_record::{CollectionBinder, PropertyBinder, RecordRegistry};
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::sink::{JsonLinesSink, RecordSink};

/// Shared read-only parsing state: the entity registry plus the
/// setter/adder caches, built once and used by every job.
pub struct ImportEngine {
    /// Registered destination entities.
    pub registry: RecordRegistry,
    /// Property setter/getter cache.
    pub properties: PropertyBinder,
    /// Collection appender cache.
    pub collections: CollectionBinder,
}

impl ImportEngine {
    /// Build an engine over a registry.
    pub fn new(registry: RecordRegistry) -> Self {
        Self {
            registry,
            properties: PropertyBinder::new(),
            collections: CollectionBinder::new(),
        }
    }

    /// A record parser borrowing this engine's shared state.
    pub fn parser(&self) -> RecordParser<'_> {
        RecordParser::new(&self.registry, &self.properties, &self.collections)
    }
}

/// Per-job outcome counters.
#[derive(Debug, Default, Clone)]
pub struct JobStats {
    /// Input files processed.
    pub files: usize,
    /// Non-blank lines read.
    pub lines: u64,
    /// Records parsed and written.
    pub records: u64,
    /// Malformed lines logged and skipped.
    pub skipped: u64,
}

/// Run every job in the manifest, in declaration order.
pub fn run_manifest(
    engine: &ImportEngine,
    manifest: &Manifest,
    out_dir: Option<&Path>,
    batch_size: usize,
) -> Result<Vec<(String, JobStats)>> {
    let mut results = Vec::with_capacity(manifest.jobs.len());
    for job in &manifest.jobs {
        let stats = run_job(engine, job, out_dir, batch_size)?;
        tracing::info!(
            job = %job.name,
            files = stats.files,
            lines = stats.lines,
            records = stats.records,
            skipped = stats.skipped,
            "job finished"
        );
        results.push((job.name.clone(), stats));
    }
    Ok(results)
}

/// Run one job: enumerate inputs, parse line by line, write the sink.
///
/// A record-level parse failure is logged and skipped; a configuration
/// error aborts the job immediately.
pub fn run_job(
    engine: &ImportEngine,
    job: &JobSpec,
    out_dir: Option<&Path>,
    batch_size: usize,
) -> Result<JobStats> {
    let layout = Layout::load(&job.layout_path)
        .wrap_err_with(|| format!("loading layout for job '{}'", job.name))?;

    let imported_at = Utc::now();
    let batch_id = job
        .batch_id
        .clone()
        .unwrap_or_else(|| format!("B{}", imported_at.format("%Y%m%d%H%M%S")));
    let source_system = job
        .source_system
        .clone()
        .unwrap_or_else(|| job.name.clone());
    let ctx = ImportContext::at(imported_at, source_system, batch_id);
    tracing::info!(job = %job.name, mode = %job.mode, batch = %ctx.batch_id, "job started");

    let mut paths: Vec<PathBuf> = glob::glob(&job.input_glob)
        .into_diagnostic()
        .wrap_err_with(|| format!("bad input glob for job '{}'", job.name))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();
    if paths.is_empty() {
        tracing::warn!(job = %job.name, glob = %job.input_glob, "no input files matched");
    }

    let writer: Box<dyn Write> = match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .into_diagnostic()
                .wrap_err_with(|| format!("creating output directory {}", dir.display()))?;
            let path = dir.join(format!("{}.jsonl", job.name));
            Box::new(
                File::create(&path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("creating {}", path.display()))?,
            )
        }
        None => Box::new(std::io::stdout()),
    };
    let mut sink = JsonLinesSink::new(writer, batch_size);

    let parser = engine.parser();
    let mut stats = JobStats::default();
    for path in &paths {
        stats.files += 1;
        let file = File::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot open {}", path.display()))?;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .into_diagnostic()
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            if line.is_empty() {
                continue;
            }
            stats.lines += 1;

            let parsed = match job.mode {
                JobMode::Single => parser.parse_single(&line, &job.entity, &layout, &ctx),
                JobMode::Graph => parser.parse_graph(&line, &job.entity, &layout, &ctx),
            };
            match parsed {
                Ok(record) => {
                    sink.accept(record.as_ref()).into_diagnostic()?;
                    stats.records += 1;
                }
                Err(err) if err.is_config() => {
                    return Err(err)
                        .wrap_err_with(|| format!("configuration error in job '{}'", job.name));
                }
                Err(err) => {
                    tracing::warn!(
                        job = %job.name,
                        file = %path.display(),
                        line = index + 1,
                        error = %err,
                        "skipping malformed line"
                    );
                    stats.skipped += 1;
                }
            }
        }
    }
    sink.flush().into_diagnostic()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::default_registry;

    struct TempWorkspace {
        root: PathBuf,
    }

    impl TempWorkspace {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "copybook-import-{tag}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.root.join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    impl Drop for TempWorkspace {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    const POLICY_LAYOUT: &str = r#"
headerFields:
  - name: policy-number
    target: PolicyNumber
    start: 1
    length: 8
    type: string
  - name: holder
    target: HolderName
    start: 9
    length: 12
    type: string
    options:
      trim: both
  - name: premium
    target: AnnualPremium
    start: 21
    length: 7
    type: numeric
    options:
      impliedDecimalPlaces: "2"
  - name: active
    target: Active
    start: 28
    length: 1
    type: boolean
  - name: batch
    target: ImportBatchId
    type: string
    options:
      source: constant
      constantValue: "${BatchId}"
"#;

    fn policy_job(workspace: &TempWorkspace) -> JobSpec {
        let layout_path = workspace.write("policies.layout.yaml", POLICY_LAYOUT);
        workspace.write(
            "policies.dat",
            "POL00001JOHN SMITH  0012500Y\nPOL00002JANE DOE    0009900Q\nPOL00003MAX POWER   0020000N\n",
        );
        JobSpec {
            name: "policies".to_string(),
            input_glob: workspace.root.join("*.dat").to_string_lossy().into_owned(),
            layout_path,
            mode: JobMode::Single,
            entity: "Policy".to_string(),
            source_system: None,
            batch_id: Some("B42".to_string()),
        }
    }

    #[test]
    fn test_run_job_end_to_end() {
        let workspace = TempWorkspace::new("run-job");
        let engine = ImportEngine::new(default_registry());
        let job = policy_job(&workspace);
        let out_dir = workspace.root.join("out");

        let stats = run_job(&engine, &job, Some(&out_dir), 10).unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.records, 2);
        // line 2 has boolean flag 'Q', logged and skipped
        assert_eq!(stats.skipped, 1);

        let output = std::fs::read_to_string(out_dir.join("policies.jsonl")).unwrap();
        let rows: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["PolicyNumber"], "POL00001");
        assert_eq!(rows[0]["HolderName"], "JOHN SMITH");
        assert_eq!(rows[0]["AnnualPremium"], "125.00");
        assert_eq!(rows[0]["Active"], true);
        assert_eq!(rows[0]["ImportBatchId"], "B42");
        assert_eq!(rows[1]["PolicyNumber"], "POL00003");
        assert_eq!(rows[1]["Active"], false);
    }

    #[test]
    fn test_config_error_aborts_job() {
        let workspace = TempWorkspace::new("config-error");
        let engine = ImportEngine::new(default_registry());
        let layout_path = workspace.write(
            "bad.layout.yaml",
            "headerFields:\n  - target: NoSuchColumn\n    start: 1\n    length: 4\n    type: string\n",
        );
        workspace.write("bad.dat", "ABCD\n");
        let job = JobSpec {
            name: "bad".to_string(),
            input_glob: workspace.root.join("*.dat").to_string_lossy().into_owned(),
            layout_path,
            mode: JobMode::Single,
            entity: "Policy".to_string(),
            source_system: None,
            batch_id: None,
        };

        assert!(run_job(&engine, &job, Some(&workspace.root.join("out")), 10).is_err());
    }

    #[test]
    fn test_missing_files_is_not_an_error() {
        let workspace = TempWorkspace::new("no-files");
        let engine = ImportEngine::new(default_registry());
        let mut job = policy_job(&workspace);
        job.input_glob = workspace
            .root
            .join("nothing-*.dat")
            .to_string_lossy()
            .into_owned();

        let stats = run_job(&engine, &job, Some(&workspace.root.join("out")), 10).unwrap();
        assert_eq!(stats.files, 0);
        assert_eq!(stats.records, 0);
    }
}
