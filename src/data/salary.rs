//! Salary Parser Module
//! Extracts numeric salary ranges and pay frequency from free-text strings.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

const HOURLY_KEYWORDS: [&str; 3] = ["hr", "hourly", "hour"];
const YEARLY_KEYWORDS: [&str; 5] = ["yearly", "annual", "annum", "year", "yr"];
const MONTHLY_KEYWORDS: [&str; 3] = ["monthly", "mo", "month"];
const WEEKLY_KEYWORDS: [&str; 2] = ["weekly", "week"];

/// How often the quoted amount is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayFrequency {
    Hourly,
    Weekly,
    Monthly,
    Yearly,
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Hourly => "hourly",
            PayFrequency::Weekly => "weekly",
            PayFrequency::Monthly => "monthly",
            PayFrequency::Yearly => "yearly",
        }
    }

    /// Multiplier converting one payment to annual compensation.
    ///
    /// Hourly assumes a 40-hour week, 4 weeks a month.
    fn annual_factor(&self) -> f64 {
        match self {
            PayFrequency::Hourly => 40.0 * 4.0 * 12.0,
            PayFrequency::Weekly => 52.0,
            PayFrequency::Monthly => 12.0,
            PayFrequency::Yearly => 1.0,
        }
    }
}

/// A parsed salary range. Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub frequency: PayFrequency,
}

impl SalaryRange {
    /// Annualized (min, max) compensation.
    pub fn annual_bounds(&self) -> (f64, f64) {
        let factor = self.frequency.annual_factor();
        (self.min * factor, self.max * factor)
    }

    /// Midpoint of the annualized bounds.
    pub fn mean_annual(&self) -> f64 {
        let (lo, hi) = self.annual_bounds();
        (lo + hi) / 2.0
    }
}

/// Parse a free-text salary string.
///
/// Handles single amounts ("$50k"), ranges ("$50,000 - $70,000",
/// "235k-45k"), `k`/`m` magnitude suffixes and thousands separators.
/// Strings without any digits yield `None`.
pub fn parse_salary(raw: &str) -> Option<SalaryRange> {
    let text = raw.to_lowercase().replace(',', "");

    let mut amounts: Vec<f64> = Vec::new();
    for m in NUMBER_RE.find_iter(&text) {
        let value: f64 = match m.as_str().parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let scaled = match text[m.end()..].chars().next() {
            Some('k') => value * 1_000.0,
            Some('m') => value * 1_000_000.0,
            _ => value,
        };
        amounts.push(round2(scaled));
    }

    if amounts.is_empty() {
        return None;
    }

    let (mut min, mut max) = if amounts.len() == 1 {
        (amounts[0], amounts[0])
    } else {
        (amounts[0], amounts[1])
    };
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }

    let frequency = detect_frequency(&text, min, max);
    Some(SalaryRange {
        min,
        max,
        frequency,
    })
}

/// Detect pay frequency from keywords, falling back to amount magnitude.
fn detect_frequency(text: &str, min: f64, max: f64) -> PayFrequency {
    if HOURLY_KEYWORDS.iter().any(|k| text.contains(k)) {
        return PayFrequency::Hourly;
    }
    if YEARLY_KEYWORDS.iter().any(|k| text.contains(k)) {
        return PayFrequency::Yearly;
    }
    if MONTHLY_KEYWORDS.iter().any(|k| text.contains(k)) {
        return PayFrequency::Monthly;
    }
    if WEEKLY_KEYWORDS.iter().any(|k| text.contains(k)) {
        return PayFrequency::Weekly;
    }

    // No keyword present; amounts under 500 are almost certainly hourly,
    // amounts over 35k yearly.
    if max <= 500.0 {
        PayFrequency::Hourly
    } else if min >= 35_000.0 {
        PayFrequency::Yearly
    } else {
        PayFrequency::Monthly
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbled_string_yields_none() {
        assert_eq!(parse_salary("competitive"), None);
        assert_eq!(parse_salary("afdslk"), None);
        assert_eq!(parse_salary(""), None);
    }

    #[test]
    fn dollar_range_with_commas() {
        let range = parse_salary("$50,000 - $70,000").unwrap();
        assert_eq!(range.min, 50_000.0);
        assert_eq!(range.max, 70_000.0);
        assert!(range.min <= range.max);
        assert_eq!(range.frequency, PayFrequency::Yearly);
    }

    #[test]
    fn descending_bounds_are_swapped() {
        let range = parse_salary("235k-45k").unwrap();
        assert_eq!(range.min, 45_000.0);
        assert_eq!(range.max, 235_000.0);
    }

    #[test]
    fn magnitude_suffixes() {
        let range = parse_salary("$456M-678m").unwrap();
        assert_eq!(range.min, 456_000_000.0);
        assert_eq!(range.max, 678_000_000.0);

        let range = parse_salary("$50k").unwrap();
        assert_eq!((range.min, range.max), (50_000.0, 50_000.0));
        assert_eq!(range.frequency, PayFrequency::Yearly);
    }

    #[test]
    fn decimal_amounts() {
        let range = parse_salary("$456.67-678.56").unwrap();
        assert_eq!(range.min, 456.67);
        assert_eq!(range.max, 678.56);
    }

    #[test]
    fn single_amount_collapses_to_point_range() {
        let range = parse_salary("$345").unwrap();
        assert_eq!((range.min, range.max), (345.0, 345.0));
    }

    #[test]
    fn frequency_keywords() {
        assert_eq!(
            parse_salary("$345 hr").unwrap().frequency,
            PayFrequency::Hourly
        );
        assert_eq!(
            parse_salary("$345k-$450k annual").unwrap().frequency,
            PayFrequency::Yearly
        );
        assert_eq!(
            parse_salary("$345 a week").unwrap().frequency,
            PayFrequency::Weekly
        );
        assert_eq!(
            parse_salary("$345/mo").unwrap().frequency,
            PayFrequency::Monthly
        );
    }

    #[test]
    fn frequency_magnitude_fallback() {
        assert_eq!(
            parse_salary("$15-$20").unwrap().frequency,
            PayFrequency::Hourly
        );
        assert_eq!(
            parse_salary("$40000-$60000").unwrap().frequency,
            PayFrequency::Yearly
        );
        assert_eq!(
            parse_salary("$3000-$5000").unwrap().frequency,
            PayFrequency::Monthly
        );
    }

    #[test]
    fn annualization() {
        let hourly = parse_salary("$20 hr").unwrap();
        assert_eq!(hourly.annual_bounds(), (38_400.0, 38_400.0));

        let monthly = parse_salary("$4000/mo").unwrap();
        assert_eq!(monthly.annual_bounds(), (48_000.0, 48_000.0));

        let weekly = parse_salary("$1000 weekly").unwrap();
        assert_eq!(weekly.annual_bounds(), (52_000.0, 52_000.0));

        let yearly = parse_salary("$90,000 annual").unwrap();
        assert_eq!(yearly.annual_bounds(), (90_000.0, 90_000.0));
    }
}
