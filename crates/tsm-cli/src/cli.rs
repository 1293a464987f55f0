//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Freelancer timesheet master reporting.
///
/// Reads per-freelancer timesheet CSV files plus billing and reimbursement
/// terms, computes billing results and trip reimbursements, and renders the
/// consolidated master tables.
#[derive(Debug, Parser)]
#[command(name = "tsm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Input locations shared by all subcommands. Unset values fall back to the
/// configuration file.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Directory of per-freelancer timesheet CSV files.
    #[arg(long)]
    pub entries: Option<PathBuf>,

    /// CSV file with per-(freelancer, project) billing terms.
    #[arg(long)]
    pub terms: Option<PathBuf>,

    /// CSV file with tiered per-diem reimbursement terms.
    #[arg(long)]
    pub trip_terms: Option<PathBuf>,

    /// Abort the run on the first failing source instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the master timesheet tables.
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Directory to write the CSV tables into.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print one JSON document to stdout instead of writing CSV files.
        #[arg(long)]
        json: bool,

        /// Only include entries and trips of this project.
        #[arg(long)]
        project: Option<String>,

        /// Only include entries and trips of this year.
        #[arg(long)]
        year: Option<i32>,

        /// Only include entries and trips of this month (1-12).
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Show trip reimbursement summary statistics.
    Trips {
        #[command(flatten)]
        input: InputArgs,

        /// Only include trips of this freelancer.
        #[arg(long)]
        freelancer: Option<String>,

        /// Only include trips of this project.
        #[arg(long)]
        project: Option<String>,

        /// Only include trips touching this year.
        #[arg(long)]
        year: Option<i32>,

        /// Only include trips touching this month (1-12).
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show billable hours per freelancer and ISO week.
    Weekly {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn month_requires_year() {
        let result = Cli::try_parse_from(["tsm", "report", "--month", "6"]);
        assert!(result.is_err());
    }

    #[test]
    fn month_range_is_validated() {
        let result = Cli::try_parse_from(["tsm", "report", "--year", "2023", "--month", "13"]);
        assert!(result.is_err());
    }
}
