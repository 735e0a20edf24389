//! Error types for mn-measure.

use thiserror::Error;

/// A persistence failure.  Always fatal to the run.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, MeasureError>`.
pub type MeasureResult<T> = Result<T, MeasureError>;
