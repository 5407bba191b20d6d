use std::fs::{self, File};
use std::path::Path;

use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::charts;
use crate::error::Result;
use crate::pipeline::Analysis;

pub const INVENTORY_CHART_FILE: &str = "inventory_vs_margin.svg";
pub const LOSS_CHART_FILE: &str = "top_loss_categories.svg";
pub const CATEGORY_TABLE_FILE: &str = "category_margins.csv";
pub const PRODUCT_TABLE_FILE: &str = "product_stats.csv";
pub const SEASONAL_TABLE_FILE: &str = "seasonal_trends.csv";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Record of a completed run, persisted next to the tables.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub input_path: String,
    pub output_dir: String,
    pub input_rows: usize,
    pub category_rows: usize,
    pub product_rows: usize,
    pub seasonal_rows: usize,
    pub correlation_samples: usize,
    pub inventory_margin_correlation: Option<f64>,
    pub files: Vec<String>,
}

/// Creates `output_dir` if needed and writes every chart and table for `analysis`.
pub fn write_report(
    analysis: &Analysis,
    input_path: &Path,
    output_dir: &Path,
) -> Result<RunSummary> {
    fs::create_dir_all(output_dir)?;

    charts::plot_inventory_vs_margin(
        &analysis.correlation.samples,
        &output_dir.join(INVENTORY_CHART_FILE),
    )?;
    charts::plot_top_loss_categories(&analysis.lowest_margins, &output_dir.join(LOSS_CHART_FILE))?;

    write_csv(&analysis.categories, &output_dir.join(CATEGORY_TABLE_FILE))?;
    write_csv(&analysis.products, &output_dir.join(PRODUCT_TABLE_FILE))?;
    write_csv(&analysis.seasonal, &output_dir.join(SEASONAL_TABLE_FILE))?;

    let summary = RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        input_path: input_path.display().to_string(),
        output_dir: output_dir.display().to_string(),
        input_rows: analysis.input_rows,
        category_rows: analysis.categories.height(),
        product_rows: analysis.products.height(),
        seasonal_rows: analysis.seasonal.height(),
        correlation_samples: analysis.correlation.samples.height(),
        inventory_margin_correlation: analysis.correlation.coefficient,
        files: [
            INVENTORY_CHART_FILE,
            LOSS_CHART_FILE,
            CATEGORY_TABLE_FILE,
            PRODUCT_TABLE_FILE,
            SEASONAL_TABLE_FILE,
        ]
        .iter()
        .map(|name| name.to_string())
        .collect(),
    };

    let summary_path = output_dir.join(SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_vec_pretty(&summary)?)?;
    info!(output_dir = %output_dir.display(), "report written");

    Ok(summary)
}

pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    let mut frame = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;
    info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}
