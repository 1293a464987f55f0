//! Report command generating the master timesheet tables.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Utc};
use tsm_core::{AggregatedTimesheetData, ProjectCode, ValidationError, generate_master_data};

use crate::cli::InputArgs;
use crate::config::Config;
use crate::writer::{master_to_json, write_master_csv};

/// Scope filter applied after aggregation, before table generation.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub project: Option<ProjectCode>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ReportFilter {
    pub fn from_args(
        project: Option<&str>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            project: project.map(ProjectCode::new).transpose()?,
            year,
            month,
        })
    }

    const fn is_empty(&self) -> bool {
        self.project.is_none() && self.year.is_none() && self.month.is_none()
    }

    fn keep_date(&self, date: chrono::NaiveDate) -> bool {
        self.year.is_none_or(|y| date.year() == y)
            && self.month.is_none_or(|m| date.month() == m)
    }
}

/// Restricts aggregated data to the filter scope.
///
/// Entries and billing results are rebuilt together so `entries[i]` keeps
/// corresponding to `billing_results[i]`. Trips follow the month-filter
/// semantics of the ledger: a boundary-spanning trip stays in every month it
/// touches.
#[must_use]
pub fn apply_filter(data: AggregatedTimesheetData, filter: &ReportFilter) -> AggregatedTimesheetData {
    if filter.is_empty() {
        return data;
    }

    let (entries, billing_results) = data
        .entries
        .into_iter()
        .zip(data.billing_results)
        .filter(|(entry, _)| {
            filter
                .project
                .as_ref()
                .is_none_or(|p| entry.project == *p)
                && filter.keep_date(entry.date)
        })
        .unzip();

    let mut trips = data.trips;
    if let Some(project) = &filter.project {
        trips = trips.filter_by_project(project);
    }
    trips = match (filter.year, filter.month) {
        (Some(year), Some(month)) => trips.filter_by_month(year, month),
        (Some(year), None) => trips.filter_by_year(year),
        _ => trips,
    };

    AggregatedTimesheetData {
        entries,
        billing_results,
        trips,
        summary: data.summary,
    }
}

/// Formats the per-run source accounting.
fn format_run_summary(data: &AggregatedTimesheetData) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "Sources: {} processed, {} skipped ({} entries)",
        data.summary.sources_processed,
        data.summary.skipped.len(),
        data.summary.entries_processed
    )
    .unwrap();
    for skipped in &data.summary.skipped {
        writeln!(output, "  skipped {}: {}", skipped.source_id, skipped.reason).unwrap();
    }
    output
}

/// Runs the report command.
pub fn run(
    config: &Config,
    input: &InputArgs,
    out: Option<PathBuf>,
    json: bool,
    filter: &ReportFilter,
) -> Result<()> {
    let data = super::run_pipeline(config, input)?;
    let summary_text = format_run_summary(&data);
    let filtered = apply_filter(data, filter);
    let master = generate_master_data(&filtered, Utc::now());

    if json {
        println!("{}", master_to_json(&master)?);
        eprint!("{summary_text}");
    } else {
        let out_dir = out.unwrap_or_else(|| config.output_dir.clone());
        let (entries_path, trips_path) = write_master_csv(&master, &out_dir)?;
        println!(
            "Wrote {} entry rows and {} trip rows",
            master.entry_rows.len(),
            master.trip_rows.len()
        );
        println!("  {}", entries_path.display());
        println!("  {}", trips_path.display());
        print!("{summary_text}");
    }

    Ok(())
}
