// crates/retail-analytics-core/src/loader.rs

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{AnalyticsError, Result};
use crate::schema::{self, REQUIRED_COLUMNS, TRANSACTION_DATE};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const RAW_DATE: &str = "transaction_date_raw";

/// Reads the transaction export at `path` into a frame with a `Date` typed
/// `transaction_date` column.
pub fn load_transactions(path: &Path) -> Result<DataFrame> {
    debug!(path = %path.display(), "reading transaction export");
    let content = fs::read(path)?;
    let df = load_transactions_from_bytes(&content)?;
    info!(path = %path.display(), rows = df.height(), "loaded transactions");
    Ok(df)
}

pub fn load_transactions_from_bytes(content: &[u8]) -> Result<DataFrame> {
    check_header(content)?;

    let parse_options = CsvParseOptions::default().with_null_values(Some(
        NullValues::AllColumns(vec!["".into(), "NA".into(), "NaN".into(), "null".into()]),
    ));

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(schema::input_schema())))
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()?;

    let dates = parse_date_column(&df)?;
    df.with_column(dates)?;

    Ok(df)
}

fn check_header(content: &[u8]) -> Result<()> {
    let header_line = content
        .split(|byte| *byte == b'\n')
        .next()
        .unwrap_or_default();
    let header = String::from_utf8_lossy(header_line);
    let names: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|name| name.trim().trim_matches('"'))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !names.contains(&column) {
            return Err(AnalyticsError::MissingColumn { column });
        }
    }
    Ok(())
}

fn lenient(format: &str) -> StrptimeOptions {
    StrptimeOptions {
        format: Some(format.into()),
        strict: false,
        exact: true,
        cache: true,
    }
}

/// First accepted format that parses wins; values no format accepts stay null.
fn date_expr() -> Expr {
    let raw = col(TRANSACTION_DATE).str().strip_chars(lit(NULL));

    let mut candidates: Vec<Expr> = DATE_FORMATS
        .iter()
        .map(|format| raw.clone().str().to_date(lenient(format)))
        .collect();
    candidates.extend(DATETIME_FORMATS.iter().map(|format| {
        raw.clone()
            .str()
            .to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                lenient(format),
                lit("raise"),
            )
            .cast(DataType::Date)
    }));

    coalesce(&candidates)
}

fn parse_date_column(df: &DataFrame) -> Result<Column> {
    let checked = df
        .clone()
        .lazy()
        .select([
            col(TRANSACTION_DATE).alias(RAW_DATE),
            date_expr().alias(TRANSACTION_DATE),
        ])
        .collect()?;

    let raw = checked.column(RAW_DATE)?.str()?;
    let unparsed = checked.column(TRANSACTION_DATE)?.is_null();

    for (idx, (value, missing)) in raw.into_iter().zip(&unparsed).enumerate() {
        if missing != Some(true) {
            continue;
        }
        let row = idx + 1;
        return Err(match value {
            None => AnalyticsError::MissingDate { row },
            Some(value) => AnalyticsError::InvalidDate {
                row,
                value: value.to_string(),
            },
        });
    }

    Ok(checked.column(TRANSACTION_DATE)?.clone())
}
