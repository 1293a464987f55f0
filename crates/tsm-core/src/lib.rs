//! Billing and aggregation engine for freelancer timesheets.
//!
//! This crate contains the fundamental types and logic for:
//! - Billing: converting timesheet entries plus rate terms into billed
//!   amounts, cost and profit
//! - Trips: detecting contiguous on-site runs and matching them against
//!   tiered per-diem reimbursement terms
//! - Aggregation: orchestrating the pipeline across freelancer sources
//! - Master tables: flattening aggregated data for external presentation

pub mod aggregator;
pub mod billing;
pub mod entry;
pub mod ledger;
pub mod master;
pub mod terms;
pub mod trip;
pub mod types;
pub mod weekly;

pub use aggregator::{
    AggregatedTimesheetData, AggregationError, AggregatorConfig, EntrySource, RunSummary,
    SkippedSource, SourceError, TermsSource, TimesheetAggregator,
};
pub use billing::{
    BillingCalculator, BillingConfig, BillingError, BillingResult, TravelBillingMode,
};
pub use entry::TimesheetEntry;
pub use ledger::{TripLedger, TripRecord, TripSummary};
pub use master::{
    ENTRY_COLUMNS, EntryRow, MasterTimesheetData, TRIP_COLUMNS, TripRow, generate_master_data,
};
pub use terms::{ProjectTerms, TripTerm};
pub use trip::{Reimbursement, Trip, detect_trips};
pub use types::{FreelancerName, ProjectCode, ValidationError};
pub use weekly::{WeekKey, WeeklyHoursMatrix, weekly_hours};
