use polars::prelude::*;
use tracing::debug;

use crate::schema::{AVG_INVENTORY_DAYS, PRODUCT_MARGIN};

#[derive(Debug, Clone)]
pub struct InventoryCorrelation {
    /// Pearson coefficient; `None` when fewer than two rows remain or a variable is constant.
    pub coefficient: Option<f64>,
    /// Product rows with a known average inventory dwell time.
    pub samples: DataFrame,
}

pub fn inventory_margin_correlation(products: &DataFrame) -> PolarsResult<InventoryCorrelation> {
    let samples = products
        .clone()
        .lazy()
        .filter(col(AVG_INVENTORY_DAYS).is_not_null())
        .collect()?;

    let days = samples.column(AVG_INVENTORY_DAYS)?.f64()?;
    let margin = samples.column(PRODUCT_MARGIN)?.f64()?;

    let pairs: Vec<(f64, f64)> = days
        .into_iter()
        .zip(margin)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();

    let coefficient = pearson(&pairs);
    debug!(samples = pairs.len(), ?coefficient, "inventory/margin correlation");

    Ok(InventoryCorrelation {
        coefficient,
        samples,
    })
}

/// Sample Pearson correlation over `(x, y)` pairs.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let (sum_x, sum_y) = pairs
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let r = cov / denominator;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
