use std::fs;

use retail_analytics_core::report::{
    CATEGORY_TABLE_FILE, INVENTORY_CHART_FILE, LOSS_CHART_FILE, PRODUCT_TABLE_FILE,
    SEASONAL_TABLE_FILE, SUMMARY_FILE,
};
use retail_analytics_core::{analyze, run, AnalysisConfig};
use retail_analytics_core::loader::load_transactions_from_bytes;

const TRANSACTIONS: &str = "\
transaction_date,category,sub_category,product_id,product_name,quantity,revenue,profit,inventory_days
2024-01-05,Office,Paper,1001,Copy Paper,10,100.0,20.0,12
2024-01-18,Office,Paper,1001,Copy Paper,5,50.0,10.0,14
2024-02-02,Office,Binders,1002,Ring Binder,3,45.0,-9.0,60
2024-03-11,Tech,Phones,2001,Handset,1,300.0,15.0,30
2024-03-12,Tech,Phones,2002,Charger,4,0.0,-8.0,
2024-06-30,Furniture,Chairs,3001,Stool,2,80.0,-20.0,90
2024-07-01,Furniture,Tables,3002,Desk,1,250.0,50.0,20
";

#[test]
fn analyze_builds_every_table() -> anyhow::Result<()> {
    let df = load_transactions_from_bytes(TRANSACTIONS.as_bytes())?;
    let analysis = analyze(&df, 3)?;

    assert_eq!(analysis.input_rows, 7);
    assert_eq!(analysis.categories.height(), 5);
    assert_eq!(analysis.products.height(), 6);
    assert_eq!(analysis.seasonal.height(), 5);
    assert_eq!(analysis.lowest_margins.height(), 3);
    // Charger has no inventory days.
    assert_eq!(analysis.correlation.samples.height(), 5);
    let coefficient = analysis.correlation.coefficient.unwrap();
    assert!((-1.0..=1.0).contains(&coefficient));

    let worst = analysis.lowest_margins.column("sub_category")?.str()?.get(0);
    assert_eq!(worst, Some("Chairs"));
    Ok(())
}

#[test]
fn run_writes_tables_charts_and_summary() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("transactions.csv");
    fs::write(&input, TRANSACTIONS)?;
    let output_dir = dir.path().join("reports").join("latest");

    let config = AnalysisConfig {
        input,
        output_dir: output_dir.clone(),
        ..AnalysisConfig::default()
    };
    let summary = run(&config)?;

    for name in [
        INVENTORY_CHART_FILE,
        LOSS_CHART_FILE,
        CATEGORY_TABLE_FILE,
        PRODUCT_TABLE_FILE,
        SEASONAL_TABLE_FILE,
        SUMMARY_FILE,
    ] {
        assert!(output_dir.join(name).is_file(), "{name} missing");
    }

    let categories = fs::read_to_string(output_dir.join(CATEGORY_TABLE_FILE))?;
    let mut lines = categories.lines();
    assert_eq!(
        lines.next(),
        Some("category,sub_category,total_profit,total_revenue,units_sold,profit_margin")
    );
    assert_eq!(lines.count(), 5);

    let seasonal = fs::read_to_string(output_dir.join(SEASONAL_TABLE_FILE))?;
    assert_eq!(
        seasonal.lines().next(),
        Some("category,sub_category,month,units_sold,revenue,profit")
    );

    let chart = fs::read_to_string(output_dir.join(LOSS_CHART_FILE))?;
    assert!(chart.contains("<svg"));

    assert_eq!(summary.input_rows, 7);
    assert_eq!(summary.files.len(), 5);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join(SUMMARY_FILE))?)?;
    assert_eq!(json["category_rows"], 5);
    assert_eq!(json["correlation_samples"], 5);
    Ok(())
}

#[test]
fn run_renders_charts_for_degenerate_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("transactions.csv");
    fs::write(
        &input,
        "transaction_date,category,sub_category,product_id,product_name,quantity,revenue,profit,inventory_days\n\
         2024-05-01,Tech,Cables,9001,Cable,2,0.0,-1.0,\n",
    )?;
    let output_dir = dir.path().join("out");

    let summary = run(&AnalysisConfig {
        input,
        output_dir: output_dir.clone(),
        bottom_n: 10,
    })?;

    assert!(summary.inventory_margin_correlation.is_none());
    assert_eq!(summary.correlation_samples, 0);
    assert!(output_dir.join(INVENTORY_CHART_FILE).is_file());
    Ok(())
}

#[test]
fn run_fails_when_input_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        input: dir.path().join("absent.csv"),
        output_dir: dir.path().join("out"),
        bottom_n: 10,
    };

    assert!(run(&config).is_err());
    assert!(!dir.path().join("out").exists());
}
