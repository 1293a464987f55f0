//! Subcommand implementations.

pub mod report;
pub mod trips;
pub mod weekly;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tsm_core::{
    AggregatedTimesheetData, AggregatorConfig, BillingConfig, TermsSource, TimesheetAggregator,
};

use crate::cli::InputArgs;
use crate::config::Config;
use crate::reader::{CsvTermsSource, discover_entry_sources};

/// Runs the aggregation pipeline over the configured inputs.
///
/// Command-line paths take precedence over configuration values.
pub(crate) fn run_pipeline(config: &Config, input: &InputArgs) -> Result<AggregatedTimesheetData> {
    let entries_dir: PathBuf = input
        .entries
        .clone()
        .unwrap_or_else(|| config.entries_dir.clone());
    let terms_file = input
        .terms
        .clone()
        .unwrap_or_else(|| config.terms_file.clone());
    let trip_terms_file = input
        .trip_terms
        .clone()
        .unwrap_or_else(|| config.trip_terms_file.clone());

    let sources = discover_entry_sources(&entries_dir)
        .with_context(|| format!("failed to discover timesheets in {}", entries_dir.display()))?;
    tracing::debug!(count = sources.len(), dir = %entries_dir.display(), "discovered sources");

    let terms_source = CsvTermsSource::new(terms_file, trip_terms_file);
    let project_terms = terms_source
        .project_terms()
        .map_err(|e| anyhow!("failed to load billing terms: {e}"))?;
    let trip_terms = terms_source
        .trip_terms()
        .map_err(|e| anyhow!("failed to load trip terms: {e}"))?;

    let aggregator = TimesheetAggregator::new(AggregatorConfig {
        fail_fast: input.fail_fast,
        remote_location: config.remote_location.clone(),
        billing: BillingConfig {
            travel_billing: config.travel_billing,
        },
    });
    let data = aggregator
        .aggregate(&sources, &project_terms, &trip_terms)
        .context("aggregation failed")?;
    Ok(data)
}
