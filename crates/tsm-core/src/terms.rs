//! Billing and reimbursement rate terms.
//!
//! Terms are typed, validated records rather than free-form key-value maps;
//! a typo in a rate column fails at load time, not mid-computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{FreelancerName, ProjectCode, ValidationError};

/// Billing terms for one (freelancer, project) pair.
///
/// All money and percentage fields are exact decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTerms {
    pub freelancer: FreelancerName,
    pub project: ProjectCode,
    /// Rate billed to the client per worked hour. Strictly positive.
    pub hourly_rate: Decimal,
    /// Premium percentage applied on top of standard billing for travel
    /// time, in `[0, 100]`.
    pub travel_surcharge_pct: Decimal,
    /// Share of reported travel minutes that is billable, in `[0, 100]`.
    pub travel_time_pct: Decimal,
    /// What the freelancer is paid per hour. Non-negative and strictly
    /// below `hourly_rate` so every billed hour carries a positive margin.
    pub cost_per_hour: Decimal,
}

impl ProjectTerms {
    /// Creates validated terms.
    pub fn new(
        freelancer: FreelancerName,
        project: ProjectCode,
        hourly_rate: Decimal,
        travel_surcharge_pct: Decimal,
        travel_time_pct: Decimal,
        cost_per_hour: Decimal,
    ) -> Result<Self, ValidationError> {
        if hourly_rate <= Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "hourly rate",
                value: hourly_rate.to_string(),
                constraint: "must be > 0",
            });
        }
        validate_percentage("travel surcharge percentage", travel_surcharge_pct)?;
        validate_percentage("travel time percentage", travel_time_pct)?;
        if cost_per_hour < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "cost per hour",
                value: cost_per_hour.to_string(),
                constraint: "must be >= 0",
            });
        }
        if cost_per_hour >= hourly_rate {
            return Err(ValidationError::OutOfRange {
                field: "cost per hour",
                value: cost_per_hour.to_string(),
                constraint: "must be < hourly rate",
            });
        }

        Ok(Self {
            freelancer,
            project,
            hourly_rate,
            travel_surcharge_pct,
            travel_time_pct,
            cost_per_hour,
        })
    }

    /// True when these terms apply to the given (freelancer, project) pair.
    #[must_use]
    pub fn matches(&self, freelancer: &FreelancerName, project: &ProjectCode) -> bool {
        self.freelancer == *freelancer && self.project == *project
    }
}

/// One per-diem reimbursement tier.
///
/// A trip whose inclusive duration falls within `[min_days, max_days]` is
/// reimbursed at `amount_per_day` for every day of the trip. Tier lists are
/// scanned in caller-supplied order and the first match wins, so overlapping
/// tiers are legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTerm {
    pub min_days: u32,
    pub max_days: u32,
    pub reimbursement_type: String,
    pub amount_per_day: Decimal,
}

impl TripTerm {
    /// Creates a validated tier.
    pub fn new(
        min_days: u32,
        max_days: u32,
        reimbursement_type: impl Into<String>,
        amount_per_day: Decimal,
    ) -> Result<Self, ValidationError> {
        let reimbursement_type = reimbursement_type.into();
        if reimbursement_type.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "reimbursement type",
            });
        }
        if min_days == 0 {
            return Err(ValidationError::OutOfRange {
                field: "min days",
                value: min_days.to_string(),
                constraint: "must be >= 1",
            });
        }
        if max_days < min_days {
            return Err(ValidationError::EndBeforeStart {
                field: "max days",
                start_field: "min days",
            });
        }
        if amount_per_day < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "amount per day",
                value: amount_per_day.to_string(),
                constraint: "must be >= 0",
            });
        }

        Ok(Self {
            min_days,
            max_days,
            reimbursement_type: reimbursement_type.trim().to_string(),
            amount_per_day,
        })
    }

    /// True when a trip of `duration_days` falls within this tier.
    #[must_use]
    pub const fn covers(&self, duration_days: u32) -> bool {
        self.min_days <= duration_days && duration_days <= self.max_days
    }
}

fn validate_percentage(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            constraint: "must be between 0 and 100",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn terms(
        rate: Decimal,
        surcharge: Decimal,
        travel: Decimal,
        cost: Decimal,
    ) -> Result<ProjectTerms, ValidationError> {
        ProjectTerms::new(
            FreelancerName::new("Alice").unwrap(),
            ProjectCode::new("ACME-01").unwrap(),
            rate,
            surcharge,
            travel,
            cost,
        )
    }

    #[test]
    fn accepts_valid_terms() {
        let t = terms(dec!(95.00), dec!(20), dec!(50), dec!(60.00)).unwrap();
        assert_eq!(t.hourly_rate, dec!(95.00));
        assert!(t.matches(
            &FreelancerName::new("Alice").unwrap(),
            &ProjectCode::new("ACME-01").unwrap()
        ));
    }

    #[test]
    fn rejects_zero_rate() {
        let err = terms(dec!(0), dec!(0), dec!(0), dec!(0)).unwrap_err();
        assert!(err.to_string().contains("hourly rate"));
    }

    #[test]
    fn rejects_percentage_above_100() {
        assert!(terms(dec!(95), dec!(101), dec!(50), dec!(60)).is_err());
        assert!(terms(dec!(95), dec!(20), dec!(-1), dec!(60)).is_err());
    }

    #[test]
    fn rejects_cost_at_or_above_rate() {
        // Equal cost and rate would mean zero margin
        assert!(terms(dec!(95), dec!(20), dec!(50), dec!(95)).is_err());
        assert!(terms(dec!(95), dec!(20), dec!(50), dec!(120)).is_err());
        assert!(terms(dec!(95), dec!(20), dec!(50), dec!(-1)).is_err());
    }

    #[test]
    fn percentage_boundaries_are_inclusive() {
        assert!(terms(dec!(95), dec!(0), dec!(100), dec!(60)).is_ok());
        assert!(terms(dec!(95), dec!(100), dec!(0), dec!(60)).is_ok());
    }

    #[test]
    fn trip_term_covers_inclusive_bounds() {
        let tier = TripTerm::new(3, 7, "Per Diem", dec!(45.00)).unwrap();
        assert!(!tier.covers(2));
        assert!(tier.covers(3));
        assert!(tier.covers(7));
        assert!(!tier.covers(8));
    }

    #[test]
    fn trip_term_rejects_invalid_bounds() {
        assert!(TripTerm::new(0, 2, "Per Diem", dec!(50)).is_err());
        assert!(TripTerm::new(5, 2, "Per Diem", dec!(50)).is_err());
        assert!(TripTerm::new(1, 2, "  ", dec!(50)).is_err());
        assert!(TripTerm::new(1, 2, "Per Diem", dec!(-1)).is_err());
    }

    #[test]
    fn single_day_tier_is_valid() {
        let tier = TripTerm::new(1, 1, "Day Rate", dec!(30)).unwrap();
        assert!(tier.covers(1));
        assert!(!tier.covers(2));
    }

    #[test]
    fn terms_decimal_serde_is_lossless() {
        let t = terms(dec!(95.50), dec!(12.5), dec!(50), dec!(60.10)).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let parsed: ProjectTerms = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
        assert_eq!(parsed.hourly_rate, dec!(95.50));
    }
}
