//! CSV Loader Module
//! Handles raw and cleaned CSV loading using Polars.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Required columns of a raw postings file, in canonical order.
pub const RAW_COLUMNS: [&str; 6] = ["title", "location", "salary", "skills", "date", "company"];

/// Columns the cleaned table is guaranteed to carry.
pub const CLEANED_COLUMNS: [&str; 11] = [
    "title",
    "company",
    "city",
    "state",
    "min_salary",
    "max_salary",
    "frequency",
    "min_annual_comp",
    "max_annual_comp",
    "skills",
    "date",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Input schema mismatch: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a raw postings CSV. Every column is read as text; values are
/// normalized downstream, not at load time.
pub fn load_raw_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    // Schema inference length 0 keeps every column as a string.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    check_schema(&df, &RAW_COLUMNS)?;
    info!(rows = df.height(), path = %path.display(), "loaded raw postings");
    Ok(df)
}

/// Load a cleaned postings CSV produced by the `clean` command.
pub fn load_cleaned_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    check_schema(&df, &CLEANED_COLUMNS)?;
    info!(rows = df.height(), path = %path.display(), "loaded cleaned postings");
    Ok(df)
}

/// Write a DataFrame to a CSV file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), LoaderError> {
    let file = File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    info!(rows = df.height(), path = %path.display(), "wrote table");
    Ok(())
}

/// Check that the DataFrame carries exactly the expected columns.
/// Column order is not significant.
fn check_schema(df: &DataFrame, expected: &[&str]) -> Result<(), LoaderError> {
    let found: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut found_sorted = found.clone();
    found_sorted.sort();
    let mut expected_sorted: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected_sorted.sort();

    if found_sorted != expected_sorted {
        return Err(LoaderError::SchemaMismatch {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found,
        });
    }
    Ok(())
}
