use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use retail_analytics_core::pipeline::{
    self, AnalysisConfig, DEFAULT_BOTTOM_N, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Retail profitability and inventory analytics report", long_about = None)]
struct Cli {
    /// Transaction export to analyze
    #[arg(long, env = "RETAIL_ANALYTICS_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory that receives charts and tables (created if missing)
    #[arg(long, env = "RETAIL_ANALYTICS_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Number of lowest-margin sub-categories shown in the loss chart
    #[arg(long, default_value_t = DEFAULT_BOTTOM_N as u64, value_parser = clap::value_parser!(u64).range(1..))]
    bottom_n: u64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig {
        input: cli.input,
        output_dir: cli.output_dir,
        bottom_n: usize::try_from(cli.bottom_n).context("--bottom-n is too large")?,
    };
    info!(input = %config.input.display(), "starting analysis");

    let summary = pipeline::run(&config).with_context(|| {
        format!(
            "analysis of {} into {} failed",
            config.input.display(),
            config.output_dir.display()
        )
    })?;

    match summary.inventory_margin_correlation {
        Some(coefficient) => println!(
            "Correlation between avg_inventory_days and product_margin: {coefficient:.6}"
        ),
        None => println!("Correlation between avg_inventory_days and product_margin: undefined"),
    }
    println!("Analysis complete. Outputs saved to {}", summary.output_dir);

    Ok(())
}
