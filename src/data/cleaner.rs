//! Cleaner Module
//! Turns raw scraped postings into normalized records with null-safe fields.

use crate::data::locations::{normalize_location, Location};
use crate::data::salary::{parse_salary, SalaryRange};
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::{debug, info};

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// A normalized job posting. Every field that can fail normalization is
/// an `Option`; only the title is guaranteed present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<Location>,
    pub salary: Option<SalaryRange>,
    pub skills: BTreeSet<String>,
    pub date: Option<NaiveDate>,
}

/// One raw row, all fields as scraped.
struct RawRow {
    title: Option<String>,
    location: Option<String>,
    salary: Option<String>,
    skills: Option<String>,
    date: Option<String>,
    company: Option<String>,
}

impl RawRow {
    /// Deduplication key over all six fields. A null field and an empty
    /// field are distinct.
    fn dedup_key(&self) -> String {
        [
            &self.title,
            &self.location,
            &self.salary,
            &self.skills,
            &self.date,
            &self.company,
        ]
        .iter()
        .map(|f| f.as_deref().unwrap_or("\u{0}"))
        .collect::<Vec<_>>()
        .join("\u{1f}")
    }
}

/// Clean a raw postings DataFrame into normalized records.
///
/// Exact-duplicate rows are removed (first occurrence wins) and rows
/// without a job title are dropped. Every other malformed field degrades
/// to `None` instead of failing the row. The input is not mutated.
pub fn clean_postings(df: &DataFrame) -> Result<Vec<CleanedRecord>, CleanError> {
    let rows = extract_rows(df)?;
    let total = rows.len();

    let mut seen: HashSet<String> = HashSet::new();
    let deduped: Vec<&RawRow> = rows.iter().filter(|r| seen.insert(r.dedup_key())).collect();
    let duplicates = total - deduped.len();

    // Row transforms are independent; rayon preserves input order here.
    let cleaned: Vec<CleanedRecord> = deduped.par_iter().filter_map(|r| clean_row(r)).collect();

    info!(
        rows_in = total,
        duplicates,
        dropped_untitled = deduped.len() - cleaned.len(),
        rows_out = cleaned.len(),
        "cleaned postings"
    );
    Ok(cleaned)
}

/// Materialize the cleaned records as a DataFrame with the fixed schema.
pub fn to_dataframe(records: &[CleanedRecord]) -> Result<DataFrame, CleanError> {
    let mut titles: Vec<String> = Vec::with_capacity(records.len());
    let mut companies: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut cities: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut states: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut min_salaries: Vec<Option<f64>> = Vec::with_capacity(records.len());
    let mut max_salaries: Vec<Option<f64>> = Vec::with_capacity(records.len());
    let mut frequencies: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut min_annual: Vec<Option<f64>> = Vec::with_capacity(records.len());
    let mut max_annual: Vec<Option<f64>> = Vec::with_capacity(records.len());
    let mut skills: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut dates: Vec<Option<String>> = Vec::with_capacity(records.len());

    for record in records {
        titles.push(record.title.clone());
        companies.push(record.company.clone());
        cities.push(record.location.as_ref().map(|l| l.city.clone()));
        states.push(record.location.as_ref().map(|l| l.state.clone()));
        min_salaries.push(record.salary.map(|s| s.min));
        max_salaries.push(record.salary.map(|s| s.max));
        frequencies.push(record.salary.map(|s| s.frequency.as_str().to_string()));
        min_annual.push(record.salary.map(|s| s.annual_bounds().0));
        max_annual.push(record.salary.map(|s| s.annual_bounds().1));
        skills.push(if record.skills.is_empty() {
            None
        } else {
            Some(
                record
                    .skills
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        });
        dates.push(record.date.map(|d| d.format("%Y-%m-%d").to_string()));
    }

    let df = DataFrame::new(vec![
        Column::new("title".into(), titles),
        Column::new("company".into(), companies),
        Column::new("city".into(), cities),
        Column::new("state".into(), states),
        Column::new("min_salary".into(), min_salaries),
        Column::new("max_salary".into(), max_salaries),
        Column::new("frequency".into(), frequencies),
        Column::new("min_annual_comp".into(), min_annual),
        Column::new("max_annual_comp".into(), max_annual),
        Column::new("skills".into(), skills),
        Column::new("date".into(), dates),
    ])?;

    Ok(df)
}

/// Extract the six raw columns row by row, as text.
fn extract_rows(df: &DataFrame) -> Result<Vec<RawRow>, CleanError> {
    let column = |name: &str| -> Result<StringChunked, CleanError> {
        let cast = df.column(name)?.cast(&DataType::String)?;
        Ok(cast.as_materialized_series().str()?.clone())
    };

    let titles = column("title")?;
    let locations = column("location")?;
    let salaries = column("salary")?;
    let skills = column("skills")?;
    let dates = column("date")?;
    let companies = column("company")?;

    let owned = |ca: &StringChunked, i: usize| ca.get(i).map(|s| s.to_string());

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(RawRow {
            title: owned(&titles, i),
            location: owned(&locations, i),
            salary: owned(&salaries, i),
            skills: owned(&skills, i),
            date: owned(&dates, i),
            company: owned(&companies, i),
        });
    }
    Ok(rows)
}

/// Clean a single row. Returns `None` when the title is missing, which
/// drops the row entirely.
fn clean_row(raw: &RawRow) -> Option<CleanedRecord> {
    let title = raw.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

    let company = raw
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let location = raw.location.as_deref().and_then(normalize_location);
    let salary = raw.salary.as_deref().and_then(parse_salary);
    let skills = raw.skills.as_deref().map(tokenize_skills).unwrap_or_default();
    let date = raw.date.as_deref().and_then(parse_date);

    Some(CleanedRecord {
        title: title.to_string(),
        company,
        location,
        salary,
        skills,
        date,
    })
}

/// Split a comma-delimited skills string into lowercase trimmed tokens.
/// Empty entries are discarded.
pub fn tokenize_skills(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Try each known date format in turn.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    debug!(value = trimmed, "unparseable posting date");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::salary::PayFrequency;

    fn raw_frame(rows: &[(&str, &str, &str, &str, &str, &str)]) -> DataFrame {
        let pick = |idx: usize| -> Vec<Option<String>> {
            rows.iter()
                .map(|r| {
                    let v = match idx {
                        0 => r.0,
                        1 => r.1,
                        2 => r.2,
                        3 => r.3,
                        4 => r.4,
                        _ => r.5,
                    };
                    if v.is_empty() {
                        None
                    } else {
                        Some(v.to_string())
                    }
                })
                .collect()
        };

        DataFrame::new(vec![
            Column::new("title".into(), pick(0)),
            Column::new("location".into(), pick(1)),
            Column::new("salary".into(), pick(2)),
            Column::new("skills".into(), pick(3)),
            Column::new("date".into(), pick(4)),
            Column::new("company".into(), pick(5)),
        ])
        .unwrap()
    }

    #[test]
    fn exact_duplicates_collapse_to_one_row() {
        let df = raw_frame(&[
            ("Engineer", "NYC", "$50k", "python", "2023-01-15", "Initech"),
            ("Engineer", "NYC", "$50k", "python", "2023-01-15", "Initech"),
        ]);
        let cleaned = clean_postings(&df).unwrap();
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn untitled_rows_are_dropped() {
        let df = raw_frame(&[
            ("", "NYC", "$50k", "python", "2023-01-15", "Initech"),
            ("   ", "NYC", "$50k", "python", "2023-01-15", "Initech"),
            ("Engineer", "NYC", "$50k", "python", "2023-01-15", "Initech"),
        ]);
        let cleaned = clean_postings(&df).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title, "Engineer");
    }

    #[test]
    fn garbled_salary_degrades_to_null_and_keeps_row() {
        let df = raw_frame(&[(
            "Engineer",
            "NYC",
            "competitive",
            "python",
            "2023-01-15",
            "Initech",
        )]);
        let cleaned = clean_postings(&df).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert!(cleaned[0].salary.is_none());
    }

    #[test]
    fn parseable_salary_range_is_normalized() {
        let df = raw_frame(&[(
            "Engineer",
            "NYC",
            "$50,000 - $70,000",
            "python",
            "2023-01-15",
            "Initech",
        )]);
        let cleaned = clean_postings(&df).unwrap();
        let salary = cleaned[0].salary.unwrap();
        assert_eq!((salary.min, salary.max), (50_000.0, 70_000.0));
        assert!(salary.min <= salary.max);
        assert_eq!(salary.frequency, PayFrequency::Yearly);
    }

    #[test]
    fn unrecognized_location_becomes_null() {
        let df = raw_frame(&[(
            "Engineer",
            "Middle of Nowhere",
            "$50k",
            "python",
            "2023-01-15",
            "Initech",
        )]);
        let cleaned = clean_postings(&df).unwrap();
        assert!(cleaned[0].location.is_none());
    }

    #[test]
    fn skills_become_a_normalized_token_set() {
        let tokens = tokenize_skills(" Python, SQL ,, sql,  Rust ");
        let expected: BTreeSet<String> = ["python", "sql", "rust"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn date_formats_are_tried_in_turn() {
        assert_eq!(
            parse_date("2023-01-15"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert_eq!(
            parse_date("01/15/2023"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert_eq!(
            parse_date("January 15, 2023"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert_eq!(parse_date("someday soon"), None);
    }

    #[test]
    fn cleaning_already_clean_values_is_idempotent() {
        let df = raw_frame(&[(
            "Engineer",
            "New York, NY",
            "50000 - 70000 yearly",
            "python, sql",
            "2023-01-15",
            "Initech",
        )]);
        let first = clean_postings(&df).unwrap();

        // Rebuild a raw-shaped table from the cleaned values and clean again.
        let record = &first[0];
        let location = record.location.as_ref().unwrap();
        let salary = record.salary.unwrap();
        let round_trip = raw_frame(&[(
            record.title.as_str(),
            &format!("{}, {}", location.city, location.state),
            &format!(
                "{} - {} {}",
                salary.min,
                salary.max,
                salary.frequency.as_str()
            ),
            &record
                .skills
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            &record.date.unwrap().format("%Y-%m-%d").to_string(),
            record.company.as_deref().unwrap(),
        )]);
        let second = clean_postings(&round_trip).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cleaned_frame_has_fixed_schema() {
        let df = raw_frame(&[("Engineer", "NYC", "$50k", "python", "2023-01-15", "Initech")]);
        let cleaned = clean_postings(&df).unwrap();
        let out = to_dataframe(&cleaned).unwrap();
        assert_eq!(
            out.get_column_names()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>(),
            crate::data::loader::CLEANED_COLUMNS.to_vec()
        );
        assert_eq!(out.height(), 1);
    }
}
