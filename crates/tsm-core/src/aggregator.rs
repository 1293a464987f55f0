//! End-to-end aggregation across freelancer sources.
//!
//! The aggregator is the orchestration seam between external readers and the
//! computation modules: it pulls entries per source, computes one billing
//! result per entry, detects trips, matches them against the reimbursement
//! tiers, and merges everything into one [`AggregatedTimesheetData`].

use rayon::prelude::*;
use thiserror::Error;

use crate::billing::{BillingCalculator, BillingConfig, BillingResult};
use crate::entry::TimesheetEntry;
use crate::ledger::TripLedger;
use crate::terms::{ProjectTerms, TripTerm};
use crate::trip::detect_trips;

/// Errors a source reader may return.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// A supplier of timesheet entries for one freelancer source.
///
/// This is the seam where external readers (spreadsheet services, CSV files,
/// test fixtures) plug in. Implementations must be `Sync`; sources are read
/// in parallel.
pub trait EntrySource: Sync {
    /// Identifier used in logs and the run summary (e.g. a file name).
    fn id(&self) -> &str;

    /// Reads all entries of this source.
    fn read_entries(&self) -> Result<Vec<TimesheetEntry>, SourceError>;
}

/// A supplier of billing and reimbursement terms.
pub trait TermsSource {
    fn project_terms(&self) -> Result<Vec<ProjectTerms>, SourceError>;
    fn trip_terms(&self) -> Result<Vec<TripTerm>, SourceError>;
}

/// Aggregation failures.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// A source failed and fail-fast was requested.
    #[error("source '{source_id}' failed: {reason}")]
    SourceFailed { source_id: String, reason: String },
}

/// Configuration for an aggregation run.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Abort the whole run on the first failing source instead of skipping
    /// it.
    pub fail_fast: bool,
    /// Location label marking a non-travel day (case-insensitive).
    pub remote_location: String,
    pub billing: BillingConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            remote_location: "Remote".to_string(),
            billing: BillingConfig::default(),
        }
    }
}

/// A source that was skipped, with the reason recorded for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: String,
}

/// Per-run accounting of which sources succeeded and which were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    pub sources_processed: usize,
    pub entries_processed: usize,
    pub skipped: Vec<SkippedSource>,
}

/// The consolidated output of one aggregation run.
///
/// `entries[i]` always corresponds to `billing_results[i]`; a source is
/// either fully represented or not at all, so no half-computed result can
/// appear.
#[derive(Debug, Clone)]
pub struct AggregatedTimesheetData {
    pub entries: Vec<TimesheetEntry>,
    pub billing_results: Vec<BillingResult>,
    pub trips: TripLedger,
    pub summary: RunSummary,
}

/// Orchestrates aggregation over entry sources.
#[derive(Debug, Clone, Default)]
pub struct TimesheetAggregator {
    config: AggregatorConfig,
    calculator: BillingCalculator,
}

/// Fully processed output of a single source.
struct SourceOutput {
    entries: Vec<TimesheetEntry>,
    billing_results: Vec<BillingResult>,
    trips: TripLedger,
}

impl TimesheetAggregator {
    #[must_use]
    pub const fn new(config: AggregatorConfig) -> Self {
        let calculator = BillingCalculator::new(config.billing);
        Self { config, calculator }
    }

    /// Runs aggregation over all sources.
    ///
    /// Sources are processed in parallel but merged in input order, so the
    /// output is deterministic. A failing source (unreadable, malformed row,
    /// missing billing terms) is logged and skipped unless `fail_fast` is
    /// set, in which case the first failure in source order aborts the run.
    pub fn aggregate<S: EntrySource>(
        &self,
        sources: &[S],
        project_terms: &[ProjectTerms],
        trip_terms: &[TripTerm],
    ) -> Result<AggregatedTimesheetData, AggregationError> {
        let outcomes: Vec<(String, Result<SourceOutput, String>)> = sources
            .par_iter()
            .map(|source| {
                let id = source.id().to_string();
                let outcome = self.process_source(source, project_terms, trip_terms);
                (id, outcome)
            })
            .collect();

        let mut data = AggregatedTimesheetData {
            entries: Vec::new(),
            billing_results: Vec::new(),
            trips: TripLedger::default(),
            summary: RunSummary::default(),
        };

        for (source_id, outcome) in outcomes {
            match outcome {
                Ok(output) => {
                    tracing::debug!(
                        source_id = %source_id,
                        entries = output.entries.len(),
                        trips = output.trips.len(),
                        "source processed"
                    );
                    data.summary.sources_processed += 1;
                    data.summary.entries_processed += output.entries.len();
                    data.entries.extend(output.entries);
                    data.billing_results.extend(output.billing_results);
                    data.trips.extend(output.trips);
                }
                Err(reason) => {
                    if self.config.fail_fast {
                        return Err(AggregationError::SourceFailed { source_id, reason });
                    }
                    tracing::warn!(source_id = %source_id, reason = %reason, "skipping source");
                    data.summary.skipped.push(SkippedSource { source_id, reason });
                }
            }
        }

        tracing::info!(
            sources_processed = data.summary.sources_processed,
            sources_skipped = data.summary.skipped.len(),
            entries = data.summary.entries_processed,
            "aggregation run complete"
        );
        Ok(data)
    }

    /// Processes one source completely or not at all.
    fn process_source<S: EntrySource>(
        &self,
        source: &S,
        project_terms: &[ProjectTerms],
        trip_terms: &[TripTerm],
    ) -> Result<SourceOutput, String> {
        let entries = source.read_entries().map_err(|e| e.to_string())?;

        let billing_results: Vec<BillingResult> = entries
            .iter()
            .map(|entry| self.calculator.calculate_with_lookup(entry, project_terms))
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?;

        let detected = detect_trips(&entries, &self.config.remote_location);
        let trips = TripLedger::aggregate_trips(detected, trip_terms);

        Ok(SourceOutput {
            entries,
            billing_results,
            trips,
        })
    }
}
