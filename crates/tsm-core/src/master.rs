//! Master table generation.
//!
//! Flattens one [`AggregatedTimesheetData`] into two tabular structures ready
//! for external rendering and pivoting: an entry-level ledger and a trip-level
//! ledger. Generation is a pure function of its input; the generation
//! timestamp is supplied by the caller and attached as metadata only, never
//! to row content.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::AggregatedTimesheetData;

/// Column names of the entry-level table, in output order.
pub const ENTRY_COLUMNS: [&str; 24] = [
    "freelancer",
    "date",
    "year",
    "month",
    "iso_week",
    "project",
    "location",
    "topic",
    "start_time",
    "end_time",
    "break_minutes",
    "travel_time_minutes",
    "billable_hours",
    "travel_hours_billed",
    "hourly_rate",
    "cost_per_hour",
    "hours_billed",
    "travel_surcharge_billed",
    "total_billed",
    "hours_cost",
    "travel_surcharge_cost",
    "total_cost",
    "profit",
    "profit_margin_pct",
];

/// Column names of the trip-level table, in output order.
pub const TRIP_COLUMNS: [&str; 8] = [
    "freelancer",
    "project",
    "location",
    "start_date",
    "end_date",
    "duration_days",
    "reimbursement_amount",
    "reimbursement_type",
];

/// One row of the entry-level master table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub freelancer: String,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub iso_week: u32,
    pub project: String,
    pub location: String,
    pub topic: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: u32,
    pub travel_time_minutes: u32,
    pub billable_hours: Decimal,
    pub travel_hours_billed: Decimal,
    pub hourly_rate: Decimal,
    pub cost_per_hour: Decimal,
    pub hours_billed: Decimal,
    pub travel_surcharge_billed: Decimal,
    pub total_billed: Decimal,
    pub hours_cost: Decimal,
    pub travel_surcharge_cost: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub profit_margin_pct: Decimal,
}

/// One row of the trip-level master table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRow {
    pub freelancer: String,
    pub project: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    /// Absent when no reimbursement tiers were configured.
    pub reimbursement_amount: Option<Decimal>,
    pub reimbursement_type: Option<String>,
}

/// The flattened master output.
#[derive(Debug, Clone, Serialize)]
pub struct MasterTimesheetData {
    /// When the tables were generated. Metadata only.
    pub generated_at: DateTime<Utc>,
    pub entry_rows: Vec<EntryRow>,
    pub trip_rows: Vec<TripRow>,
}

/// Flattens aggregated data into the two master tables.
///
/// Row order follows input order: entry rows in entry order, trip rows in
/// ledger order. No re-sorting is applied.
#[must_use]
pub fn generate_master_data(
    data: &AggregatedTimesheetData,
    generated_at: DateTime<Utc>,
) -> MasterTimesheetData {
    let entry_rows = data
        .entries
        .iter()
        .zip(&data.billing_results)
        .map(|(entry, billing)| EntryRow {
            freelancer: entry.freelancer.to_string(),
            date: entry.date,
            year: entry.date.year(),
            month: entry.date.month(),
            iso_week: entry.date.iso_week().week(),
            project: entry.project.to_string(),
            location: entry.location.clone(),
            topic: entry.topic.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            break_minutes: entry.break_minutes,
            travel_time_minutes: entry.travel_time_minutes,
            billable_hours: billing.billable_hours,
            travel_hours_billed: billing.travel_hours_billed,
            hourly_rate: billing.hourly_rate,
            cost_per_hour: billing.cost_per_hour,
            hours_billed: billing.hours_billed,
            travel_surcharge_billed: billing.travel_surcharge_billed,
            total_billed: billing.total_billed,
            hours_cost: billing.hours_cost,
            travel_surcharge_cost: billing.travel_surcharge_cost,
            total_cost: billing.total_cost,
            profit: billing.profit,
            profit_margin_pct: billing.profit_margin_pct,
        })
        .collect();

    let trip_rows = data
        .trips
        .records()
        .iter()
        .map(|record| TripRow {
            freelancer: record.trip.freelancer.to_string(),
            project: record.trip.project.to_string(),
            location: record.trip.location.clone(),
            start_date: record.trip.start_date,
            end_date: record.trip.end_date,
            duration_days: record.trip.duration_days(),
            reimbursement_amount: record.reimbursement.as_ref().map(|r| r.amount),
            reimbursement_type: record
                .reimbursement
                .as_ref()
                .map(|r| r.reimbursement_type.clone()),
        })
        .collect();

    MasterTimesheetData {
        generated_at,
        entry_rows,
        trip_rows,
    }
}
