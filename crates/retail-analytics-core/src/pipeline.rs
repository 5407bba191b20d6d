use std::path::PathBuf;

use polars::prelude::DataFrame;
use tracing::info;

use crate::aggregates;
use crate::correlation::{self, InventoryCorrelation};
use crate::error::Result;
use crate::loader;
use crate::report::{self, RunSummary};

pub const DEFAULT_INPUT: &str = "data/transactions.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_BOTTOM_N: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// How many lowest-margin sub-categories the loss chart shows.
    pub bottom_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            bottom_n: DEFAULT_BOTTOM_N,
        }
    }
}

/// Every table derived from one transaction frame.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub input_rows: usize,
    pub categories: DataFrame,
    pub products: DataFrame,
    pub correlation: InventoryCorrelation,
    pub seasonal: DataFrame,
    pub lowest_margins: DataFrame,
}

/// Runs the aggregation and correlation steps in memory.
pub fn analyze(transactions: &DataFrame, bottom_n: usize) -> Result<Analysis> {
    let categories = aggregates::category_margins(transactions)?;
    let products = aggregates::product_stats(transactions)?;
    let correlation = correlation::inventory_margin_correlation(&products)?;
    let seasonal = aggregates::seasonal_trends(transactions)?;
    let lowest_margins = aggregates::lowest_margins(&categories, bottom_n)?;

    Ok(Analysis {
        input_rows: transactions.height(),
        categories,
        products,
        correlation,
        seasonal,
        lowest_margins,
    })
}

/// Load, analyze and write the full report for `config`.
pub fn run(config: &AnalysisConfig) -> Result<RunSummary> {
    let transactions = loader::load_transactions(&config.input)?;
    let analysis = analyze(&transactions, config.bottom_n)?;

    info!(
        categories = analysis.categories.height(),
        products = analysis.products.height(),
        seasonal_rows = analysis.seasonal.height(),
        correlation = ?analysis.correlation.coefficient,
        "analysis complete"
    );

    report::write_report(&analysis, &config.input, &config.output_dir)
}
