use std::path::Path;

use plotters::prelude::*;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::schema::{AVG_INVENTORY_DAYS, CATEGORY, PRODUCT_MARGIN, PROFIT_MARGIN, SUB_CATEGORY};

const SCATTER_SIZE: (u32, u32) = (800, 600);
const BAR_SIZE: (u32, u32) = (1000, 600);
const INVENTORY_CHART: &str = "inventory_vs_margin";
const LOSS_CHART: &str = "top_loss_categories";

fn chart_error(chart: &'static str) -> impl Fn(String) -> AnalyticsError {
    move |message| AnalyticsError::Chart { chart, message }
}

/// Pads a data range so single points and flat series still get a drawable axis.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.1 };
    (min - pad)..(max + pad)
}

/// Scatter of average inventory days against product margin.
pub fn plot_inventory_vs_margin(samples: &DataFrame, out_path: &Path) -> Result<()> {
    let days = samples.column(AVG_INVENTORY_DAYS)?.f64()?;
    let margin = samples.column(PRODUCT_MARGIN)?.f64()?;
    let points: Vec<(f64, f64)> = days
        .into_iter()
        .zip(margin)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();

    let to_err = chart_error(INVENTORY_CHART);
    let x_range = padded_range(points.iter().map(|(x, _)| *x));
    let y_range = padded_range(points.iter().map(|(_, y)| *y));

    let root = SVGBackend::new(out_path, SCATTER_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| to_err(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Inventory Days vs Product Profit Margin", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| to_err(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Average Inventory Days")
        .y_desc("Product Profit Margin")
        .draw()
        .map_err(|e| to_err(e.to_string()))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.7).filled())),
        )
        .map_err(|e| to_err(e.to_string()))?;

    root.present().map_err(|e| to_err(e.to_string()))?;
    debug!(path = %out_path.display(), points = points.len(), "rendered scatter chart");
    Ok(())
}

/// Horizontal bars for the given lowest-margin rows, worst at the top.
pub fn plot_top_loss_categories(bottom: &DataFrame, out_path: &Path) -> Result<()> {
    let categories = bottom.column(CATEGORY)?.str()?;
    let sub_categories = bottom.column(SUB_CATEGORY)?.str()?;
    let margins = bottom.column(PROFIT_MARGIN)?.f64()?;

    let bars: Vec<(String, f64)> = (0..bottom.height())
        .map(|idx| {
            let label = format!(
                "{} | {}",
                sub_categories.get(idx).unwrap_or(""),
                categories.get(idx).unwrap_or("")
            );
            (label, margins.get(idx).unwrap_or(0.0))
        })
        .collect();

    let to_err = chart_error(LOSS_CHART);
    let x_range = padded_range(bars.iter().map(|(_, m)| *m).chain(std::iter::once(0.0)));
    let rows = bars.len().max(1) as f64;

    let root = SVGBackend::new(out_path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| to_err(e.to_string()))?;

    let label_for = |y: &f64| -> String {
        let idx = y.round();
        if (y - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        // Row 0 is drawn at the top.
        let position = bars.len() as isize - 1 - idx as isize;
        usize::try_from(position)
            .ok()
            .and_then(|p| bars.get(p))
            .map(|(label, _)| label.clone())
            .unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {} Profit-Draining Sub-Categories", bars.len()),
            ("sans-serif", 22),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(260)
        .build_cartesian_2d(x_range, -0.5..(rows - 0.5))
        .map_err(|e| to_err(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(bars.len().max(1))
        .y_label_formatter(&label_for)
        .x_desc("Profit Margin")
        .draw()
        .map_err(|e| to_err(e.to_string()))?;

    let top = bars.len() as f64 - 1.0;
    chart
        .draw_series(bars.iter().enumerate().map(|(idx, (_, margin))| {
            let y = top - idx as f64;
            Rectangle::new([(0.0, y - 0.35), (*margin, y + 0.35)], RED.mix(0.75).filled())
        }))
        .map_err(|e| to_err(e.to_string()))?;

    root.present().map_err(|e| to_err(e.to_string()))?;
    debug!(path = %out_path.display(), bars = bars.len(), "rendered bar chart");
    Ok(())
}
