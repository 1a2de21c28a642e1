//! Report module - Summary table output

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print a summary table to stdout.
pub fn print_summary(df: &DataFrame) {
    println!("{df}");
}

/// Write a summary table to `path`. A `.json` extension selects a JSON
/// array of row objects; everything else is written as CSV.
pub fn write_summary(df: &DataFrame, path: &Path) -> Result<(), ReportError> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &rows_as_json(df)?)?;
    } else {
        let file = File::create(path)?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df.clone())?;
    }
    info!(rows = df.height(), path = %path.display(), "wrote summary");
    Ok(())
}

/// Convert a DataFrame into a JSON array of row objects.
fn rows_as_json(df: &DataFrame) -> Result<Vec<serde_json::Value>, ReportError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = serde_json::Map::with_capacity(names.len());
        for (name, column) in names.iter().zip(df.get_columns()) {
            let value = match column.get(i)? {
                AnyValue::Null => serde_json::Value::Null,
                AnyValue::Float64(v) => serde_json::json!(v),
                AnyValue::Float32(v) => serde_json::json!(v),
                AnyValue::Int64(v) => serde_json::json!(v),
                AnyValue::Int32(v) => serde_json::json!(v),
                AnyValue::UInt32(v) => serde_json::json!(v),
                AnyValue::Boolean(v) => serde_json::json!(v),
                AnyValue::String(v) => serde_json::json!(v),
                other => serde_json::json!(other.to_string().trim_matches('"')),
            };
            row.insert(name.clone(), value);
        }
        rows.push(serde_json::Value::Object(row));
    }
    Ok(rows)
}
