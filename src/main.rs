//! CLI entry point for the postings cleaning and analysis pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use joblens::data;
use joblens::report;
use joblens::stats::{self, GroupKey, Metric};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI-compatible grouping key enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliGroupKey {
    /// Group by canonical state
    State,
    /// Group by canonical city
    City,
    /// Group by job title
    Title,
    /// Group by company name
    Company,
}

impl From<CliGroupKey> for GroupKey {
    fn from(cli: CliGroupKey) -> Self {
        match cli {
            CliGroupKey::State => GroupKey::State,
            CliGroupKey::City => GroupKey::City,
            CliGroupKey::Title => GroupKey::Title,
            CliGroupKey::Company => GroupKey::Company,
        }
    }
}

/// CLI-compatible metric enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMetric {
    /// Number of postings per group
    Count,
    /// Mean annual compensation per group
    MeanSalary,
    /// Lowest annual compensation per group
    MinSalary,
    /// Highest annual compensation per group
    MaxSalary,
}

impl From<CliMetric> for Metric {
    fn from(cli: CliMetric) -> Self {
        match cli {
            CliMetric::Count => Metric::Count,
            CliMetric::MeanSalary => Metric::MeanSalary,
            CliMetric::MinSalary => Metric::MinSalary,
            CliMetric::MaxSalary => Metric::MaxSalary,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "joblens",
    version,
    about = "Clean and summarize scraped tech job postings",
    long_about = "A batch pipeline over job postings CSVs.\n\n\
                  EXAMPLES:\n  \
                  # Normalize a raw scrape\n  \
                  joblens clean -i raw.csv -o cleaned.csv\n\n  \
                  # Posting counts per state\n  \
                  joblens analyze -i cleaned.csv --group-by state --metric count\n\n  \
                  # Ten most demanded skills\n  \
                  joblens top-skills -i cleaned.csv -n 10"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a raw postings CSV into the normalized schema
    Clean {
        /// Path to the raw postings CSV
        #[arg(short, long)]
        input: PathBuf,
        /// Destination path for the cleaned CSV
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compute a grouped aggregate over a cleaned CSV
    Analyze {
        /// Path to the cleaned postings CSV
        #[arg(short, long)]
        input: PathBuf,
        /// Column to group by
        #[arg(long, value_enum)]
        group_by: CliGroupKey,
        /// Statistic to compute per group
        #[arg(long, value_enum, default_value = "count")]
        metric: CliMetric,
        /// Count null-keyed rows under an explicit "unknown" bucket
        #[arg(long)]
        include_unknown: bool,
        /// Keep only rows with annual compensation inside MIN-MAX
        #[arg(long)]
        salary_range: Option<String>,
        /// Optional path for the summary (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rank the most in-demand skills across all postings
    TopSkills {
        /// Path to the cleaned postings CSV
        #[arg(short, long)]
        input: PathBuf,
        /// How many skills to report
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Optional path for the summary (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Most common job title per state
    TitleByState {
        /// Path to the cleaned postings CSV
        #[arg(short, long)]
        input: PathBuf,
        /// Optional path for the summary (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score each posting against a wanted skill list
    SkillMatch {
        /// Path to the cleaned postings CSV
        #[arg(short, long)]
        input: PathBuf,
        /// Comma-separated skills to match against
        #[arg(long, value_delimiter = ',', required = true)]
        skills: Vec<String>,
        /// Optional path for the summary (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Clean { input, output } => {
            let raw = data::load_raw_csv(&input)?;
            let records = data::clean_postings(&raw)?;
            let mut cleaned = data::to_dataframe(&records)?;
            data::write_csv(&mut cleaned, &output)?;
            info!(rows = cleaned.height(), output = %output.display(), "clean finished");
        }
        Command::Analyze {
            input,
            group_by,
            metric,
            include_unknown,
            salary_range,
            output,
        } => {
            let mut cleaned = data::load_cleaned_csv(&input)?;
            if let Some(range) = salary_range {
                cleaned = stats::filter_by_salary_range(&cleaned, &range)?;
            }
            let summary =
                stats::aggregate(&cleaned, group_by.into(), metric.into(), include_unknown)?;
            emit(&summary, output.as_deref())?;
        }
        Command::TopSkills {
            input,
            count,
            output,
        } => {
            let cleaned = data::load_cleaned_csv(&input)?;
            let summary = stats::top_skills(&cleaned, count)?;
            emit(&summary, output.as_deref())?;
        }
        Command::TitleByState { input, output } => {
            let cleaned = data::load_cleaned_csv(&input)?;
            let summary = stats::title_by_state(&cleaned)?;
            emit(&summary, output.as_deref())?;
        }
        Command::SkillMatch {
            input,
            skills,
            output,
        } => {
            let cleaned = data::load_cleaned_csv(&input)?;
            let summary = stats::skill_match(&cleaned, &skills)?;
            emit(&summary, output.as_deref())?;
        }
    }
    Ok(())
}

/// Print a summary and optionally persist it.
fn emit(summary: &polars::prelude::DataFrame, output: Option<&std::path::Path>) -> Result<()> {
    report::print_summary(summary);
    if let Some(path) = output {
        report::write_summary(summary, path)?;
    }
    Ok(())
}
