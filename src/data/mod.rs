//! Data module - CSV loading and cleaning

mod cleaner;
mod loader;
mod locations;
mod salary;

pub use cleaner::{clean_postings, to_dataframe, tokenize_skills, CleanError, CleanedRecord};
pub use loader::{
    load_cleaned_csv, load_raw_csv, write_csv, LoaderError, CLEANED_COLUMNS, RAW_COLUMNS,
};
pub use locations::{normalize_location, Location};
pub use salary::{parse_salary, PayFrequency, SalaryRange};
