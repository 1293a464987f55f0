//! Trips command showing reimbursement summary statistics.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use tsm_core::{FreelancerName, ProjectCode, TripLedger, TripSummary, ValidationError};

use crate::cli::InputArgs;
use crate::config::Config;

/// Scope filter for the trip ledger.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub freelancer: Option<FreelancerName>,
    pub project: Option<ProjectCode>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl TripFilter {
    pub fn from_args(
        freelancer: Option<&str>,
        project: Option<&str>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            freelancer: freelancer.map(FreelancerName::new).transpose()?,
            project: project.map(ProjectCode::new).transpose()?,
            year,
            month,
        })
    }
}

/// Applies the filter to a ledger.
#[must_use]
pub fn apply_filter(ledger: TripLedger, filter: &TripFilter) -> TripLedger {
    let mut ledger = ledger;
    if let Some(freelancer) = &filter.freelancer {
        ledger = ledger.filter_by_freelancer(freelancer);
    }
    if let Some(project) = &filter.project {
        ledger = ledger.filter_by_project(project);
    }
    match (filter.year, filter.month) {
        (Some(year), Some(month)) => ledger.filter_by_month(year, month),
        (Some(year), None) => ledger.filter_by_year(year),
        _ => ledger,
    }
}

/// JSON output shape.
#[derive(Debug, Serialize)]
struct JsonTrips {
    summary: TripSummary,
    trips: Vec<JsonTripEntry>,
}

#[derive(Debug, Serialize)]
struct JsonTripEntry {
    freelancer: String,
    project: String,
    location: String,
    start_date: String,
    end_date: String,
    duration_days: u32,
    reimbursement_amount: Option<String>,
    reimbursement_type: Option<String>,
}

fn to_json(ledger: &TripLedger) -> Result<String> {
    let trips = ledger
        .records()
        .iter()
        .map(|record| JsonTripEntry {
            freelancer: record.trip.freelancer.to_string(),
            project: record.trip.project.to_string(),
            location: record.trip.location.clone(),
            start_date: record.trip.start_date.to_string(),
            end_date: record.trip.end_date.to_string(),
            duration_days: record.trip.duration_days(),
            reimbursement_amount: record.reimbursement.as_ref().map(|r| r.amount.to_string()),
            reimbursement_type: record
                .reimbursement
                .as_ref()
                .map(|r| r.reimbursement_type.clone()),
        })
        .collect();

    let document = JsonTrips {
        summary: ledger.summary_statistics(),
        trips,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Formats the human-readable trip report.
fn format_trips(ledger: &TripLedger) -> String {
    let mut output = String::new();
    writeln!(output, "TRIP REPORT").unwrap();
    writeln!(output, "───────────").unwrap();

    if ledger.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No trips in scope.").unwrap();
        return output;
    }

    for record in ledger.records() {
        let trip = &record.trip;
        let reimbursement = record.reimbursement.as_ref().map_or_else(
            || "no rates configured".to_string(),
            |r| format!("{} {}", r.amount, r.reimbursement_type),
        );
        writeln!(
            output,
            "  {}  {}  {}  {} to {}  {:>2}d  {}",
            trip.freelancer,
            trip.project,
            trip.location,
            trip.start_date,
            trip.end_date,
            trip.duration_days(),
            reimbursement
        )
        .unwrap();
    }

    let summary = ledger.summary_statistics();
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Trips:                 {}", summary.trip_count).unwrap();
    writeln!(output, "Total reimbursement:   {}", summary.total_reimbursement).unwrap();
    writeln!(output, "Average reimbursement: {}", summary.average_reimbursement).unwrap();
    writeln!(
        output,
        "Duration (avg/min/max): {} / {} / {}",
        summary.average_duration_days, summary.min_duration_days, summary.max_duration_days
    )
    .unwrap();
    output
}

/// Runs the trips command.
pub fn run(config: &Config, input: &InputArgs, filter: &TripFilter, json: bool) -> Result<()> {
    let data = super::run_pipeline(config, input)?;
    let ledger = apply_filter(data.trips, filter);

    if json {
        println!("{}", to_json(&ledger)?);
    } else {
        print!("{}", format_trips(&ledger));
    }
    Ok(())
}
