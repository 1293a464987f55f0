//! Per-entry billing computation.
//!
//! Converts one [`TimesheetEntry`] plus its applicable [`ProjectTerms`] into
//! a [`BillingResult`]. All arithmetic is exact `Decimal`; nothing is rounded
//! until the presentation layer formats the output, so aggregated totals do
//! not accumulate rounding error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::TimesheetEntry;
use crate::terms::ProjectTerms;
use crate::types::{FreelancerName, ProjectCode};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Billing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// No billing terms were configured for the entry's pair. The caller
    /// decides whether to skip the entry or abort the run.
    #[error("no billing terms for freelancer '{freelancer}' on project '{project}'")]
    TermsNotFound {
        freelancer: FreelancerName,
        project: ProjectCode,
    },
}

/// How billable travel time enters the total.
///
/// The surcharge column always reports whatever travel amount was added to
/// the total, so the two table columns sum to the total in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelBillingMode {
    /// Only the incremental premium above standard billing is added:
    /// `travel_hours × rate × surcharge_pct / 100`.
    #[default]
    SurchargeOnly,
    /// Base travel billing plus the premium is added:
    /// `travel_hours × rate × (1 + surcharge_pct / 100)`.
    Inclusive,
}

/// Configuration for billing computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingConfig {
    pub travel_billing: TravelBillingMode,
}

/// The computed financial outcome for one timesheet entry.
///
/// Derived data only; constructed by [`BillingCalculator`] (and directly in
/// tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingResult {
    pub freelancer: FreelancerName,
    pub date: NaiveDate,
    pub project: ProjectCode,
    /// Net worked hours (span minus break), excluding travel.
    pub billable_hours: Decimal,
    /// The applied billing rate, carried for reporting.
    pub hourly_rate: Decimal,
    /// The applied cost rate, carried for reporting.
    pub cost_per_hour: Decimal,
    /// Billable travel hours after applying the travel-time percentage.
    pub travel_hours_billed: Decimal,
    pub hours_billed: Decimal,
    pub travel_surcharge_billed: Decimal,
    pub total_billed: Decimal,
    pub hours_cost: Decimal,
    pub travel_surcharge_cost: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    /// Profit as a percentage of total billed; zero when nothing was billed.
    pub profit_margin_pct: Decimal,
}

/// Computes billing results from entries and their terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingCalculator {
    config: BillingConfig,
}

impl BillingCalculator {
    #[must_use]
    pub const fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// Computes the billing result for one entry under the given terms.
    ///
    /// The caller is responsible for passing the terms matching the entry's
    /// (freelancer, project) pair; see [`Self::calculate_with_lookup`].
    #[must_use]
    pub fn calculate(&self, entry: &TimesheetEntry, terms: &ProjectTerms) -> BillingResult {
        let billable_hours = Decimal::from(entry.worked_minutes()) / MINUTES_PER_HOUR;
        let travel_hours_billed = Decimal::from(entry.travel_time_minutes)
            * terms.travel_time_pct
            / Decimal::ONE_HUNDRED
            / MINUTES_PER_HOUR;

        let hours_billed = billable_hours * terms.hourly_rate;
        let hours_cost = billable_hours * terms.cost_per_hour;

        let travel_base = travel_hours_billed * terms.hourly_rate;
        let travel_premium = travel_base * terms.travel_surcharge_pct / Decimal::ONE_HUNDRED;
        let travel_surcharge_billed = match self.config.travel_billing {
            TravelBillingMode::SurchargeOnly => travel_premium,
            TravelBillingMode::Inclusive => travel_base + travel_premium,
        };
        let travel_surcharge_cost = travel_hours_billed * terms.cost_per_hour;

        let total_billed = hours_billed + travel_surcharge_billed;
        let total_cost = hours_cost + travel_surcharge_cost;
        let profit = total_billed - total_cost;
        let profit_margin_pct = if total_billed.is_zero() {
            Decimal::ZERO
        } else {
            profit / total_billed * Decimal::ONE_HUNDRED
        };

        BillingResult {
            freelancer: entry.freelancer.clone(),
            date: entry.date,
            project: entry.project.clone(),
            billable_hours,
            hourly_rate: terms.hourly_rate,
            cost_per_hour: terms.cost_per_hour,
            travel_hours_billed,
            hours_billed,
            travel_surcharge_billed,
            total_billed,
            hours_cost,
            travel_surcharge_cost,
            total_cost,
            profit,
            profit_margin_pct,
        }
    }

    /// Finds the first terms matching the entry's pair and computes billing.
    pub fn calculate_with_lookup(
        &self,
        entry: &TimesheetEntry,
        terms: &[ProjectTerms],
    ) -> Result<BillingResult, BillingError> {
        let matched = terms
            .iter()
            .find(|t| t.matches(&entry.freelancer, &entry.project))
            .ok_or_else(|| BillingError::TermsNotFound {
                freelancer: entry.freelancer.clone(),
                project: entry.project.clone(),
            })?;
        Ok(self.calculate(entry, matched))
    }
}
