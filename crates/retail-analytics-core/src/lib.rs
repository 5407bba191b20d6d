pub mod aggregates;
pub mod charts;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod schema;

pub use error::{AnalyticsError, Result};
pub use pipeline::{analyze, run, Analysis, AnalysisConfig};
pub use report::RunSummary;
