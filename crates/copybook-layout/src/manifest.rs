//! Import manifest: the list of jobs to run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codes::code_enum;
use crate::error::LayoutError;
use crate::Result;

code_enum! {
    /// Whether a line yields one flat record or a parent with children.
    JobMode {
        /// One line, one record; OCCURS groups are ignored.
        Single => "single",
        /// One line, one parent plus child-collection members.
        Graph => "graph",
    }
}

/// One import job: input files, layout, mode, and destination entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Job name, used in logs and as the default source system.
    pub name: String,
    /// Glob matching the input flat files.
    pub input_glob: String,
    /// Path to the layout YAML describing the file format.
    pub layout_path: PathBuf,
    /// Parse mode.
    pub mode: JobMode,
    /// Registry name of the destination entity (the parent in graph mode).
    pub entity: String,
    /// Overrides the source-system stamp; defaults to the job name.
    #[serde(default)]
    pub source_system: Option<String>,
    /// Overrides the batch id; defaults to a timestamp-derived id.
    #[serde(default)]
    pub batch_id: Option<String>,
}

impl JobSpec {
    fn validate(&self) -> Result<()> {
        let job = "job";
        if self.name.trim().is_empty() {
            return Err(LayoutError::invalid(job, &self.name, "name is empty"));
        }
        if self.input_glob.trim().is_empty() {
            return Err(LayoutError::invalid(job, &self.name, "inputGlob is empty"));
        }
        if self.layout_path.as_os_str().is_empty() {
            return Err(LayoutError::invalid(job, &self.name, "layoutPath is empty"));
        }
        if self.entity.trim().is_empty() {
            return Err(LayoutError::invalid(job, &self.name, "entity is empty"));
        }
        Ok(())
    }
}

/// The manifest file: an ordered list of jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Manifest {
    /// Jobs, run in declaration order.
    pub jobs: Vec<JobSpec>,
}

impl Manifest {
    /// Load a manifest from a YAML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self =
            serde_yaml::from_str(&content).map_err(|source| LayoutError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check every job's structural invariants.
    pub fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            job.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_yaml() {
        let yaml = r#"
jobs:
  - name: claims
    inputGlob: "data/CLAIM01*.dat"
    layoutPath: layouts/claims.yaml
    mode: graph
    entity: Claim
    batchId: B42
"#;
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        manifest.validate().unwrap();
        let job = &manifest.jobs[0];
        assert_eq!(job.mode, JobMode::Graph);
        assert_eq!(job.batch_id.as_deref(), Some("B42"));
        assert!(job.source_system.is_none());
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        assert_eq!(JobMode::parse("SINGLE"), Some(JobMode::Single));
        assert_eq!(JobMode::parse("Graph"), Some(JobMode::Graph));
        assert_eq!(JobMode::parse("tree"), None);
    }

    #[test]
    fn test_empty_glob_is_rejected() {
        let yaml = r#"
jobs:
  - name: claims
    inputGlob: "  "
    layoutPath: layouts/claims.yaml
    mode: single
    entity: Claim
"#;
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let yaml = r#"
jobs:
  - name: claims
    inputGlob: "*.dat"
    layoutPath: l.yaml
    mode: forest
    entity: Claim
"#;
        assert!(serde_yaml::from_str::<Manifest>(yaml).is_err());
    }
}
