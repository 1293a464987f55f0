//! Business trips and their detection from timesheet entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entry::TimesheetEntry;
use crate::types::{FreelancerName, ProjectCode, ValidationError};

/// A contiguous span of on-site workdays for one freelancer at one
/// project/location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub freelancer: FreelancerName,
    pub project: ProjectCode,
    pub location: String,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip, inclusive.
    pub end_date: NaiveDate,
}

impl Trip {
    /// Creates a validated trip. The end date must not precede the start.
    pub fn new(
        freelancer: FreelancerName,
        project: ProjectCode,
        location: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(ValidationError::Empty { field: "location" });
        }
        if end_date < start_date {
            return Err(ValidationError::EndBeforeStart {
                field: "end date",
                start_field: "start date",
            });
        }
        Ok(Self {
            freelancer,
            project,
            location: location.trim().to_string(),
            start_date,
            end_date,
        })
    }

    /// Inclusive day count: June 1 to June 5 is 5 days. Always >= 1.
    #[must_use]
    pub fn duration_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(days).unwrap_or(1)
    }

    /// True when the trip touches the given month with either endpoint.
    #[must_use]
    pub fn touches_month(&self, year: i32, month: u32) -> bool {
        let in_month = |d: NaiveDate| {
            use chrono::Datelike;
            d.year() == year && d.month() == month
        };
        in_month(self.start_date) || in_month(self.end_date)
    }
}

/// A per-diem reimbursement computed for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reimbursement {
    pub amount: Decimal,
    pub reimbursement_type: String,
}

impl Reimbursement {
    /// Creates a validated reimbursement.
    pub fn new(
        amount: Decimal,
        reimbursement_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reimbursement_type = reimbursement_type.into();
        if reimbursement_type.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "reimbursement type",
            });
        }
        if amount < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "reimbursement amount",
                value: amount.to_string(),
                constraint: "must be >= 0",
            });
        }
        Ok(Self {
            amount,
            reimbursement_type: reimbursement_type.trim().to_string(),
        })
    }
}

/// Detects trips in one freelancer's entries.
///
/// A trip is a maximal run of date-contiguous on-site days at the same
/// project and location; it ends on a calendar gap, a change of location, or
/// a change of project. Entries whose location equals `remote_location`
/// (case-insensitive) are not on-site and never contribute to a trip.
///
/// Entries need not be pre-sorted; detection orders them by date internally.
/// Multiple entries on the same day extend the current run.
#[must_use]
pub fn detect_trips(entries: &[TimesheetEntry], remote_location: &str) -> Vec<Trip> {
    let mut onsite: Vec<&TimesheetEntry> = entries
        .iter()
        .filter(|e| !e.location.eq_ignore_ascii_case(remote_location))
        .collect();
    onsite.sort_by_key(|e| e.date);

    let mut trips = Vec::new();
    let mut current: Option<Trip> = None;

    for entry in onsite {
        match current.take() {
            Some(trip)
                if trip.project == entry.project
                    && trip.location == entry.location
                    && (entry.date - trip.end_date).num_days() <= 1 =>
            {
                current = Some(Trip {
                    end_date: trip.end_date.max(entry.date),
                    ..trip
                });
            }
            other => {
                if let Some(finished) = other {
                    trips.push(finished);
                }
                current = Some(Trip {
                    freelancer: entry.freelancer.clone(),
                    project: entry.project.clone(),
                    location: entry.location.clone(),
                    start_date: entry.date,
                    end_date: entry.date,
                });
            }
        }
    }
    if let Some(trip) = current {
        trips.push(trip);
    }

    trips
}
