// crates/retail-analytics-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("row {row}: could not parse transaction date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: transaction date is missing")]
    MissingDate { row: usize },

    #[error("failed to render chart {chart}: {message}")]
    Chart { chart: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
