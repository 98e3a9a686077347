use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Invalid experiment count: expected at least 1, got {requested}")]
    InvalidCount { requested: usize },

    #[error("Cannot summarize an empty experiment batch")]
    EmptyBatch,

    #[error("Invalid domain config: {0}")]
    InvalidConfig(String),

    #[error("Experiment {id} violates its domain: {reason}")]
    RecordViolation { id: String, reason: String },

    #[error("Snapshot not found at {path}")]
    SnapshotMissing { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LabResult<T> = Result<T, LabError>;
