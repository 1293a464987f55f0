//! Freelancer × ISO-week billable-hours matrix.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::billing::BillingResult;
use crate::types::FreelancerName;

/// Bucket key: one freelancer in one ISO week.
///
/// The ISO year is part of the key because the ISO year of late-December and
/// early-January dates can differ from the calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekKey {
    pub freelancer: FreelancerName,
    pub iso_year: i32,
    pub iso_week: u32,
}

/// Sparse mapping of billable hours per freelancer and ISO week.
///
/// Buckets accumulate by summation; freelancers/weeks with no hours have no
/// entry at all, leaving gap rendering to the presentation layer.
pub type WeeklyHoursMatrix = HashMap<WeekKey, Decimal>;

/// Builds the weekly hours matrix from billing results.
///
/// Each result contributes its billable hours to the bucket keyed by the
/// (freelancer, ISO year, ISO week) of its entry date.
#[must_use]
pub fn weekly_hours(results: &[BillingResult]) -> WeeklyHoursMatrix {
    let mut matrix = WeeklyHoursMatrix::new();
    for result in results {
        let iso = result.date.iso_week();
        let key = WeekKey {
            freelancer: result.freelancer.clone(),
            iso_year: iso.year(),
            iso_week: iso.week(),
        };
        *matrix.entry(key).or_insert(Decimal::ZERO) += result.billable_hours;
    }
    matrix
}
