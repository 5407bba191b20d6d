use polars::prelude::*;
use tracing::debug;

use crate::schema::{
    AVG_INVENTORY_DAYS, CATEGORY, INVENTORY_DAYS, MONTH, PRODUCT_ID, PRODUCT_MARGIN, PRODUCT_NAME,
    PROFIT, PROFIT_MARGIN, QUANTITY, REVENUE, SUB_CATEGORY, TOTAL_PROFIT, TOTAL_REVENUE,
    TOTAL_UNITS, TRANSACTION_DATE, UNITS_SOLD,
};

/// `profit / revenue`, or 0 when revenue is exactly zero.
pub fn guarded_margin(profit: &str, revenue: &str) -> Expr {
    when(col(revenue).eq(lit(0.0)))
        .then(lit(0.0))
        .otherwise(col(profit) / col(revenue))
}

/// Profit margin per (category, sub_category), worst performers first.
pub fn category_margins(df: &DataFrame) -> PolarsResult<DataFrame> {
    let out = df
        .clone()
        .lazy()
        .group_by([col(CATEGORY), col(SUB_CATEGORY)])
        .agg([
            col(PROFIT).sum().alias(TOTAL_PROFIT),
            col(REVENUE).sum().alias(TOTAL_REVENUE),
            col(QUANTITY).sum().alias(UNITS_SOLD),
        ])
        .with_column(guarded_margin(TOTAL_PROFIT, TOTAL_REVENUE).alias(PROFIT_MARGIN))
        .sort(
            [PROFIT_MARGIN, CATEGORY, SUB_CATEGORY],
            SortMultipleOptions::default(),
        )
        .collect()?;

    debug!(groups = out.height(), "computed category margins");
    Ok(out)
}

/// Per-product inventory dwell time and margin, ordered by product key.
pub fn product_stats(df: &DataFrame) -> PolarsResult<DataFrame> {
    let out = df
        .clone()
        .lazy()
        .group_by([col(PRODUCT_ID), col(PRODUCT_NAME)])
        .agg([
            col(INVENTORY_DAYS).mean().alias(AVG_INVENTORY_DAYS),
            col(PROFIT).sum().alias(TOTAL_PROFIT),
            col(REVENUE).sum().alias(TOTAL_REVENUE),
            col(QUANTITY).sum().alias(TOTAL_UNITS),
        ])
        .with_column(guarded_margin(TOTAL_PROFIT, TOTAL_REVENUE).alias(PRODUCT_MARGIN))
        .sort([PRODUCT_ID, PRODUCT_NAME], SortMultipleOptions::default())
        .collect()?;

    debug!(products = out.height(), "computed product stats");
    Ok(out)
}

/// Units, revenue and profit per (category, sub_category, calendar month).
pub fn seasonal_trends(df: &DataFrame) -> PolarsResult<DataFrame> {
    let out = df
        .clone()
        .lazy()
        .with_column(
            col(TRANSACTION_DATE)
                .dt()
                .month()
                .cast(DataType::Int32)
                .alias(MONTH),
        )
        .group_by([col(CATEGORY), col(SUB_CATEGORY), col(MONTH)])
        .agg([
            col(QUANTITY).sum().alias(UNITS_SOLD),
            col(REVENUE).sum(),
            col(PROFIT).sum(),
        ])
        .sort([CATEGORY, SUB_CATEGORY, MONTH], SortMultipleOptions::default())
        .collect()?;

    debug!(rows = out.height(), "computed seasonal trends");
    Ok(out)
}

/// The `n` rows with the smallest profit margin, ascending.
pub fn lowest_margins(categories: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
    let limit = IdxSize::try_from(n).unwrap_or(IdxSize::MAX);
    categories
        .clone()
        .lazy()
        .sort(
            [PROFIT_MARGIN, CATEGORY, SUB_CATEGORY],
            SortMultipleOptions::default(),
        )
        .limit(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_margin_handles_zero_and_negative_revenue() -> PolarsResult<()> {
        let df = df!(
            "p" => &[10.0f64, -5.0, 3.0],
            "r" => &[0.0f64, -10.0, 12.0],
        )?;
        let out = df
            .lazy()
            .select([guarded_margin("p", "r").alias("m")])
            .collect()?;
        let margin = out.column("m")?.f64()?;

        assert_eq!(margin.get(0), Some(0.0));
        assert_eq!(margin.get(1), Some(0.5));
        assert_eq!(margin.get(2), Some(0.25));
        Ok(())
    }
}
