//! Climate alert experiment lab: seeded generation of synthetic
//! experiment records, rollup summaries, shared query logic and
//! flat-file snapshots.

pub mod config;
pub mod error;
pub mod experiment;
pub mod export;
pub mod generator;
pub mod hypothesis;
pub mod query;
pub mod rng;
pub mod snapshot;
pub mod summary;
pub mod types;

pub use config::DomainConfig;
pub use error::{LabError, LabResult};
pub use experiment::ExperimentRecord;
pub use generator::ExperimentGenerator;
pub use snapshot::{bootstrap, BootstrapDecision, ExperimentCatalog, Snapshot, SnapshotFiles};
pub use summary::{summarize, SummaryReport};
