use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenStatsError {
    #[error("file not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid record on line {line}: expected {expected} fields, found {found}")]
    InvalidRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("no durations to summarize")]
    EmptyDataset,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenStatsError>;

impl GenStatsError {
    /// The single line shown to the user when a run fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileMissing(_) => "No generation times file found yet".to_string(),
            other => format!("Error calculating statistics: {other}"),
        }
    }
}
