//! Snapshots: a record batch plus its summary, on disk and in memory.
//!
//! On disk a snapshot is two pretty-printed JSON files in a data directory:
//! the record array and the summary object. Both are caches: they can be
//! rebuilt at any time from a fresh generate + summarize.
//!
//! In memory a Snapshot is immutable. ExperimentCatalog owns the current one
//! behind an Arc and replaces it whole, so a reader always sees either the
//! old batch or the new one.

use crate::{
    error::{LabError, LabResult},
    experiment::ExperimentRecord,
    generator::ExperimentGenerator,
    query::{self, FilterOptions, Query},
    summary::{summarize, SummaryReport},
    types::Seed,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const RECORDS_FILE: &str = "climate_experiments.json";
pub const SUMMARY_FILE: &str = "experiment_summary.json";

/// One generation run: the records and the rollup computed from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    records: Vec<ExperimentRecord>,
    summary: SummaryReport,
}

impl Snapshot {
    /// Summarize `records` and seal both into a snapshot.
    pub fn build(records: Vec<ExperimentRecord>) -> LabResult<Self> {
        let summary = summarize(&records)?;
        Ok(Self { records, summary })
    }

    /// Generate and summarize as one unit.
    pub fn generate(generator: &ExperimentGenerator, count: usize) -> LabResult<Self> {
        Self::build(generator.generate(count)?)
    }

    pub fn records(&self) -> &[ExperimentRecord] {
        &self.records
    }

    pub fn summary(&self) -> &SummaryReport {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn query(&self, query: &Query) -> Vec<&ExperimentRecord> {
        query.apply(&self.records)
    }

    pub fn experiment(&self, id: &str) -> Option<&ExperimentRecord> {
        query::find_by_id(&self.records, id)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }
}

/// Paths of the two snapshot files inside a data directory.
#[derive(Debug, Clone)]
pub struct SnapshotFiles {
    pub records_path: PathBuf,
    pub summary_path: PathBuf,
}

impl SnapshotFiles {
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            records_path: dir.join(RECORDS_FILE),
            summary_path: dir.join(SUMMARY_FILE),
        }
    }

    pub fn records_exist(&self) -> bool {
        self.records_path.is_file()
    }

    /// Write both files, each via a temp file and rename.
    pub fn save(&self, snapshot: &Snapshot) -> LabResult<()> {
        write_json_atomic(&self.records_path, &snapshot.records)?;
        write_json_atomic(&self.summary_path, &snapshot.summary)?;
        log::info!(
            "saved {} experiments to {}",
            snapshot.len(),
            self.records_path.display()
        );
        Ok(())
    }

    pub fn load_records(&self) -> LabResult<Vec<ExperimentRecord>> {
        read_json(&self.records_path)
    }

    pub fn load_summary(&self) -> LabResult<SummaryReport> {
        read_json(&self.summary_path)
    }

    /// Load the record batch and recompute its summary. The summary file is
    /// a cache; it is rewritten when missing or out of date. A failed rewrite
    /// is logged and does not fail the load.
    pub fn load(&self) -> LabResult<Snapshot> {
        let snapshot = Snapshot::build(self.load_records()?)?;
        match self.load_summary() {
            Ok(cached) if cached == snapshot.summary => {}
            Ok(_) => {
                log::warn!(
                    "{} is stale, rewriting from records",
                    self.summary_path.display()
                );
                self.refresh_summary(&snapshot.summary);
            }
            Err(e) => {
                log::warn!("summary cache unusable ({e}), rewriting from records");
                self.refresh_summary(&snapshot.summary);
            }
        }
        log::info!(
            "loaded {} experiments from {}",
            snapshot.len(),
            self.records_path.display()
        );
        Ok(snapshot)
    }

    fn refresh_summary(&self, summary: &SummaryReport) {
        if let Err(e) = write_json_atomic(&self.summary_path, summary) {
            log::warn!(
                "cannot rewrite {}: {e}; serving the recomputed summary",
                self.summary_path.display()
            );
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LabResult<T> {
    if !path.is_file() {
        return Err(LabError::SnapshotMissing {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> LabResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Why bootstrap had to generate instead of load.
#[derive(Debug, Clone, PartialEq)]
pub enum RegenerateReason {
    Missing,
    Unreadable(String),
}

/// The observable outcome of the startup step.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapDecision {
    Loaded { count: usize },
    Generated { count: usize, seed: Seed, reason: RegenerateReason },
}

impl fmt::Display for BootstrapDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { count } => write!(f, "loaded {count} experiments from snapshot"),
            Self::Generated { count, seed, reason } => {
                let why = match reason {
                    RegenerateReason::Missing => "no snapshot found".to_string(),
                    RegenerateReason::Unreadable(e) => format!("snapshot unreadable: {e}"),
                };
                write!(f, "generated {count} experiments with seed {seed} ({why})")
            }
        }
    }
}

/// Run once before serving any reader: load the snapshot if it is usable,
/// otherwise generate a fresh batch of `count` and persist it. Fails only
/// when a fresh batch cannot be generated or written. The caller reports
/// the returned decision.
pub fn bootstrap(
    files: &SnapshotFiles,
    generator: &ExperimentGenerator,
    count: usize,
) -> LabResult<(Snapshot, BootstrapDecision)> {
    let reason = if files.records_exist() {
        match files.load() {
            Ok(snapshot) => {
                let decision = BootstrapDecision::Loaded { count: snapshot.len() };
                return Ok((snapshot, decision));
            }
            Err(e) => {
                log::warn!(
                    "bootstrap: cannot use {}: {e}",
                    files.records_path.display()
                );
                RegenerateReason::Unreadable(e.to_string())
            }
        }
    } else {
        RegenerateReason::Missing
    };

    let snapshot = Snapshot::generate(generator, count)?;
    files.save(&snapshot)?;
    let decision = BootstrapDecision::Generated {
        count: snapshot.len(),
        seed: generator.seed(),
        reason,
    };
    Ok((snapshot, decision))
}

/// Owner of the current snapshot. Readers take an Arc and keep a
/// consistent view even if the catalog is replaced underneath them.
#[derive(Debug, Clone)]
pub struct ExperimentCatalog {
    current: Arc<Snapshot>,
}

impl ExperimentCatalog {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: Arc::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Swap in a complete new snapshot, returning the previous one.
    pub fn replace(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        std::mem::replace(&mut self.current, Arc::new(snapshot))
    }

    /// Generate, persist, then swap. On any failure the current snapshot
    /// stays in place and nothing on disk is half-written.
    pub fn regenerate(
        &mut self,
        files: &SnapshotFiles,
        generator: &ExperimentGenerator,
        count: usize,
    ) -> LabResult<Arc<Snapshot>> {
        let snapshot = Snapshot::generate(generator, count)?;
        files.save(&snapshot)?;
        log::info!(
            "catalog regenerated: {} experiments (seed={})",
            snapshot.len(),
            generator.seed()
        );
        self.replace(snapshot);
        Ok(self.snapshot())
    }
}
