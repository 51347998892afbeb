//! Error types for loading, cleaning and exporting delivery data.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Row {row}: invalid number in {field}: {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: invalid date in {field}: {value:?} (expected DD-MM-YYYY)")]
    InvalidDate {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: delivery time {value:?} has no \"(min) \" marker")]
    MissingTimeMarker { row: usize, value: String },
}
