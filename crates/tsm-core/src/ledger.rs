//! The trip ledger: tiered reimbursement matching plus filter, group and
//! statistics operations over (trip, reimbursement) data.
//!
//! Each [`TripRecord`] carries its trip and its optional reimbursement in one
//! composite value, so a reimbursement can never drift to a different trip no
//! matter how the ledger is filtered or regrouped.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use chrono::Datelike;

use crate::terms::TripTerm;
use crate::trip::{Reimbursement, Trip};
use crate::types::{FreelancerName, ProjectCode};

/// One trip together with its computed reimbursement, if any.
///
/// `reimbursement` is `None` only when no reimbursement tiers were
/// configured at all; trips that matched no tier are excluded from the
/// ledger instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip: Trip,
    pub reimbursement: Option<Reimbursement>,
}

/// An ordered collection of trip records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLedger {
    records: Vec<TripRecord>,
}

/// Summary statistics over a ledger.
///
/// All sums and means are defined as zero on an empty ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripSummary {
    pub trip_count: usize,
    pub total_reimbursement: Decimal,
    pub average_duration_days: Decimal,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
    pub average_reimbursement: Decimal,
}

impl TripLedger {
    /// Matches each trip against the tiered terms and builds the ledger.
    ///
    /// The first tier (in input order) covering the trip's duration wins;
    /// overlapping tiers are resolved by scan order. A trip with no covering
    /// tier is excluded, as is one whose computed amount is exactly zero —
    /// only strictly positive reimbursements are retained. With an empty
    /// tier list every trip is kept with no reimbursement, which signals
    /// "no rates configured" rather than "zero amount".
    #[must_use]
    pub fn aggregate_trips(trips: Vec<Trip>, terms: &[TripTerm]) -> Self {
        if terms.is_empty() {
            return Self {
                records: trips
                    .into_iter()
                    .map(|trip| TripRecord {
                        trip,
                        reimbursement: None,
                    })
                    .collect(),
            };
        }

        let records = trips
            .into_iter()
            .filter_map(|trip| {
                let duration = trip.duration_days();
                let Some(tier) = terms.iter().find(|t| t.covers(duration)) else {
                    tracing::debug!(
                        freelancer = %trip.freelancer,
                        duration_days = duration,
                        "no reimbursement tier covers trip, excluding"
                    );
                    return None;
                };
                let amount = tier.amount_per_day * Decimal::from(duration);
                if amount.is_zero() {
                    return None;
                }
                // Tier validation guarantees a non-empty type label
                let reimbursement =
                    Reimbursement::new(amount, tier.reimbursement_type.clone()).ok()?;
                Some(TripRecord {
                    trip,
                    reimbursement: Some(reimbursement),
                })
            })
            .collect();

        Self { records }
    }

    /// Builds a ledger directly from records.
    #[must_use]
    pub const fn from_records(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// The trips in ledger order.
    pub fn trips(&self) -> impl Iterator<Item = &Trip> {
        self.records.iter().map(|r| &r.trip)
    }

    /// The computed reimbursements in ledger order, skipping trips that
    /// carry none.
    pub fn reimbursements(&self) -> impl Iterator<Item = &Reimbursement> {
        self.records.iter().filter_map(|r| r.reimbursement.as_ref())
    }

    /// Appends all records of another ledger, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.records.extend(other.records);
    }

    /// Retains trips whose start or end date falls in the given month.
    ///
    /// A trip spanning a month boundary is attributed to both months it
    /// touches.
    #[must_use]
    pub fn filter_by_month(&self, year: i32, month: u32) -> Self {
        self.filtered(|r| r.trip.touches_month(year, month))
    }

    /// Retains trips whose start or end date falls in the given year.
    #[must_use]
    pub fn filter_by_year(&self, year: i32) -> Self {
        self.filtered(|r| {
            r.trip.start_date.year() == year || r.trip.end_date.year() == year
        })
    }

    /// Retains trips of one freelancer (exact match).
    #[must_use]
    pub fn filter_by_freelancer(&self, freelancer: &FreelancerName) -> Self {
        self.filtered(|r| r.trip.freelancer == *freelancer)
    }

    /// Retains trips of one project (exact match).
    #[must_use]
    pub fn filter_by_project(&self, project: &ProjectCode) -> Self {
        self.filtered(|r| r.trip.project == *project)
    }

    /// Partitions the ledger by the (year, month) of each trip's start date.
    ///
    /// Unlike [`Self::filter_by_month`], a boundary-spanning trip lands only
    /// in its starting month.
    #[must_use]
    pub fn group_by_month(&self) -> BTreeMap<(i32, u32), Self> {
        let mut groups: BTreeMap<(i32, u32), Self> = BTreeMap::new();
        for record in &self.records {
            let key = (record.trip.start_date.year(), record.trip.start_date.month());
            groups.entry(key).or_default().records.push(record.clone());
        }
        groups
    }

    /// Computes summary statistics over the ledger.
    #[must_use]
    pub fn summary_statistics(&self) -> TripSummary {
        if self.records.is_empty() {
            return TripSummary {
                trip_count: 0,
                total_reimbursement: Decimal::ZERO,
                average_duration_days: Decimal::ZERO,
                min_duration_days: 0,
                max_duration_days: 0,
                average_reimbursement: Decimal::ZERO,
            };
        }

        let count = Decimal::from(self.records.len());
        let total_reimbursement: Decimal = self
            .records
            .iter()
            .filter_map(|r| r.reimbursement.as_ref())
            .map(|r| r.amount)
            .sum();
        let durations: Vec<u32> = self.records.iter().map(|r| r.trip.duration_days()).collect();
        let duration_sum: Decimal = durations.iter().map(|&d| Decimal::from(d)).sum();

        TripSummary {
            trip_count: self.records.len(),
            total_reimbursement,
            average_duration_days: duration_sum / count,
            min_duration_days: durations.iter().copied().min().unwrap_or(0),
            max_duration_days: durations.iter().copied().max().unwrap_or(0),
            average_reimbursement: total_reimbursement / count,
        }
    }

    fn filtered(&self, keep: impl Fn(&TripRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
