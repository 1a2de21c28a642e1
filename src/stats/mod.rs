//! Stats module - Grouped aggregates and skill summaries

mod analyzer;

pub use analyzer::{
    aggregate, filter_by_salary_range, skill_match, title_by_state, top_skills, AnalyzerError,
    GroupKey, Metric, UNKNOWN_BUCKET,
};
