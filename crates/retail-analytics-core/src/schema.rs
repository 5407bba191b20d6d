use polars::prelude::*;

pub const TRANSACTION_DATE: &str = "transaction_date";
pub const CATEGORY: &str = "category";
pub const SUB_CATEGORY: &str = "sub_category";
pub const PRODUCT_ID: &str = "product_id";
pub const PRODUCT_NAME: &str = "product_name";
pub const QUANTITY: &str = "quantity";
pub const REVENUE: &str = "revenue";
pub const PROFIT: &str = "profit";
pub const INVENTORY_DAYS: &str = "inventory_days";

pub const TOTAL_PROFIT: &str = "total_profit";
pub const TOTAL_REVENUE: &str = "total_revenue";
pub const UNITS_SOLD: &str = "units_sold";
pub const TOTAL_UNITS: &str = "total_units";
pub const PROFIT_MARGIN: &str = "profit_margin";
pub const PRODUCT_MARGIN: &str = "product_margin";
pub const AVG_INVENTORY_DAYS: &str = "avg_inventory_days";
pub const MONTH: &str = "month";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    TRANSACTION_DATE,
    CATEGORY,
    SUB_CATEGORY,
    PRODUCT_ID,
    PRODUCT_NAME,
    QUANTITY,
    REVENUE,
    PROFIT,
    INVENTORY_DAYS,
];

/// Dtypes forced onto the raw CSV columns. The date column is read as text and
/// converted by the loader so malformed values can be reported per row.
pub fn input_schema() -> Schema {
    Schema::from_iter(vec![
        Field::new(TRANSACTION_DATE.into(), DataType::String),
        Field::new(CATEGORY.into(), DataType::String),
        Field::new(SUB_CATEGORY.into(), DataType::String),
        Field::new(PRODUCT_ID.into(), DataType::String),
        Field::new(PRODUCT_NAME.into(), DataType::String),
        Field::new(QUANTITY.into(), DataType::Float64),
        Field::new(REVENUE.into(), DataType::Float64),
        Field::new(PROFIT.into(), DataType::Float64),
        Field::new(INVENTORY_DAYS.into(), DataType::Float64),
    ])
}
