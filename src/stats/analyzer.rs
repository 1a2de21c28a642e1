//! Analyzer Module
//! Grouped aggregates and skill summaries over the cleaned postings table.

use polars::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Label used for null-keyed rows when the caller asks for them.
pub const UNKNOWN_BUCKET: &str = "unknown";

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("unknown grouping key {0:?}; expected one of: state, city, title, company")]
    UnknownGroupKey(String),
    #[error("unknown metric {0:?}; expected one of: count, mean-salary, min-salary, max-salary")]
    UnknownMetric(String),
    #[error("invalid salary range {0:?}; expected MIN-MAX, e.g. 50000-120000")]
    InvalidSalaryRange(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Column of the cleaned table to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    State,
    City,
    Title,
    Company,
}

impl GroupKey {
    pub fn column(&self) -> &'static str {
        match self {
            GroupKey::State => "state",
            GroupKey::City => "city",
            GroupKey::Title => "title",
            GroupKey::Company => "company",
        }
    }
}

impl FromStr for GroupKey {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state" => Ok(GroupKey::State),
            "city" => Ok(GroupKey::City),
            "title" => Ok(GroupKey::Title),
            "company" => Ok(GroupKey::Company),
            other => Err(AnalyzerError::UnknownGroupKey(other.to_string())),
        }
    }
}

/// Statistic computed per group. Salary metrics operate on the per-row
/// mean annual compensation so hourly and yearly postings compare on a
/// common scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    MeanSalary,
    MinSalary,
    MaxSalary,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Count => "count",
            Metric::MeanSalary => "mean_salary",
            Metric::MinSalary => "min_salary",
            Metric::MaxSalary => "max_salary",
        }
    }
}

impl FromStr for Metric {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Metric::Count),
            "mean-salary" => Ok(Metric::MeanSalary),
            "min-salary" => Ok(Metric::MinSalary),
            "max-salary" => Ok(Metric::MaxSalary),
            other => Err(AnalyzerError::UnknownMetric(other.to_string())),
        }
    }
}

/// Compute one aggregate summary over the cleaned table.
///
/// Null-keyed rows are excluded unless `include_unknown` is set, in which
/// case they count under [`UNKNOWN_BUCKET`]. The summary is sorted by
/// group key; the input table is never mutated.
pub fn aggregate(
    df: &DataFrame,
    key: GroupKey,
    metric: Metric,
    include_unknown: bool,
) -> Result<DataFrame, AnalyzerError> {
    let keys = string_column(df, key.column())?;
    let values = mean_annual_column(df)?;

    let mut grouped: HashMap<String, Vec<Option<f64>>> = HashMap::new();
    for i in 0..df.height() {
        let group = match keys.get(i) {
            Some(k) => k.to_string(),
            None if include_unknown => UNKNOWN_BUCKET.to_string(),
            None => continue,
        };
        grouped.entry(group).or_default().push(values.get(i));
    }

    let mut names: Vec<String> = grouped.keys().cloned().collect();
    names.sort();

    let mut stats: Vec<Option<f64>> = Vec::with_capacity(names.len());
    for name in &names {
        let rows = &grouped[name];
        let stat = match metric {
            Metric::Count => Some(rows.len() as f64),
            Metric::MeanSalary => {
                let present: Vec<f64> = rows.iter().flatten().copied().collect();
                if present.is_empty() {
                    None
                } else {
                    Some(present.iter().sum::<f64>() / present.len() as f64)
                }
            }
            Metric::MinSalary => rows
                .iter()
                .flatten()
                .copied()
                .fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.min(v)))
                }),
            Metric::MaxSalary => rows
                .iter()
                .flatten()
                .copied()
                .fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.max(v)))
                }),
        };
        stats.push(stat);
    }

    info!(
        key = key.column(),
        metric = metric.column(),
        groups = names.len(),
        "computed aggregate summary"
    );

    let summary = DataFrame::new(vec![
        Column::new(key.column().into(), names),
        Column::new(metric.column().into(), stats),
    ])?;
    Ok(summary)
}

/// Keep only rows whose annual compensation falls inside `MIN-MAX`.
/// Rows with a null salary are excluded by the filter.
pub fn filter_by_salary_range(df: &DataFrame, range: &str) -> Result<DataFrame, AnalyzerError> {
    let invalid = || AnalyzerError::InvalidSalaryRange(range.to_string());
    let (lo, hi) = range.split_once('-').ok_or_else(invalid)?;
    let lo: f64 = lo.trim().parse().map_err(|_| invalid())?;
    let hi: f64 = hi.trim().parse().map_err(|_| invalid())?;
    if lo > hi {
        return Err(invalid());
    }

    let filtered = df
        .clone()
        .lazy()
        .filter(
            col("min_annual_comp")
                .gt_eq(lit(lo))
                .and(col("max_annual_comp").lt_eq(lit(hi))),
        )
        .collect()?;
    Ok(filtered)
}

/// Count skill-token occurrences across all rows and return the top `n`.
pub fn top_skills(df: &DataFrame, n: usize) -> Result<DataFrame, AnalyzerError> {
    let skills = string_column(df, "skills")?;

    let mut counts: HashMap<String, u32> = HashMap::new();
    for i in 0..df.height() {
        let Some(row_skills) = skills.get(i) else {
            continue;
        };
        for token in row_skills.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    // Highest count first; ties broken alphabetically for determinism.
    let mut ranked: Vec<(String, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);

    let (names, totals): (Vec<String>, Vec<u32>) = ranked.into_iter().unzip();
    let summary = DataFrame::new(vec![
        Column::new("skill".into(), names),
        Column::new("count".into(), totals),
    ])?;
    Ok(summary)
}

/// For each state, the job title with the most postings.
pub fn title_by_state(df: &DataFrame) -> Result<DataFrame, AnalyzerError> {
    let states = string_column(df, "state")?;
    let titles = string_column(df, "title")?;

    let mut counts: HashMap<(String, String), u32> = HashMap::new();
    for i in 0..df.height() {
        if let (Some(state), Some(title)) = (states.get(i), titles.get(i)) {
            *counts
                .entry((state.to_string(), title.to_string()))
                .or_insert(0) += 1;
        }
    }

    // Argmax per state; ties go to the lexicographically smaller title.
    let mut best: HashMap<String, (String, u32)> = HashMap::new();
    for ((state, title), count) in counts {
        match best.get(&state) {
            Some((held_title, held_count))
                if *held_count > count || (*held_count == count && *held_title < title) => {}
            _ => {
                best.insert(state, (title, count));
            }
        }
    }

    let mut states_out: Vec<String> = best.keys().cloned().collect();
    states_out.sort();
    let titles_out: Vec<String> = states_out.iter().map(|s| best[s].0.clone()).collect();
    let counts_out: Vec<u32> = states_out.iter().map(|s| best[s].1).collect();

    let summary = DataFrame::new(vec![
        Column::new("state".into(), states_out),
        Column::new("title".into(), titles_out),
        Column::new("count".into(), counts_out),
    ])?;
    Ok(summary)
}

/// Percentage of the wanted skills each posting mentions, highest match
/// first. Rows without skills get a null match and sort last.
pub fn skill_match(df: &DataFrame, wanted: &[String]) -> Result<DataFrame, AnalyzerError> {
    let normalized: Vec<String> = wanted
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let titles = string_column(df, "title")?;
    let companies = string_column(df, "company")?;
    let skills = string_column(df, "skills")?;

    let mut rows: Vec<(String, Option<String>, Option<f64>)> = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(title) = titles.get(i) else {
            continue;
        };
        let company = companies.get(i).map(|c| c.to_string());
        let matched = skills.get(i).map(|row_skills| {
            if normalized.is_empty() {
                return 0.0;
            }
            let have: Vec<&str> = row_skills.split(',').map(str::trim).collect();
            let hits = normalized.iter().filter(|w| have.contains(&w.as_str())).count();
            hits as f64 / normalized.len() as f64 * 100.0
        });
        rows.push((title.to_string(), company, matched));
    }

    rows.sort_by(|a, b| match (a.2, b.2) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let summary = DataFrame::new(vec![
        Column::new(
            "title".into(),
            rows.iter().map(|r| r.0.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "company".into(),
            rows.iter().map(|r| r.1.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "skill_match".into(),
            rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(summary)
}

/// Fetch a column as text, tolerating non-string dtypes.
fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked, AnalyzerError> {
    let cast = df.column(name)?.cast(&DataType::String)?;
    Ok(cast.as_materialized_series().str()?.clone())
}

/// Per-row mean annual compensation, null when the salary was unparseable.
fn mean_annual_column(df: &DataFrame) -> Result<Float64Chunked, AnalyzerError> {
    let lo = df.column("min_annual_comp")?.cast(&DataType::Float64)?;
    let hi = df.column("max_annual_comp")?.cast(&DataType::Float64)?;
    let lo = lo.f64()?;
    let hi = hi.f64()?;

    let means: Vec<Option<f64>> = (0..lo.len())
        .map(|i| match (lo.get(i), hi.get(i)) {
            (Some(a), Some(b)) => Some((a + b) / 2.0),
            _ => None,
        })
        .collect();
    Ok(Float64Chunked::from_iter_options("mean_annual".into(), means.into_iter()))
}
