//! Raw timesheet entries as reported by freelancers.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::{FreelancerName, ProjectCode, ValidationError};

/// One reported work day for one freelancer on one project.
///
/// Entries are immutable after construction; [`TimesheetEntry::new`] enforces
/// all invariants up front so downstream computation never has to re-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub freelancer: FreelancerName,
    pub date: NaiveDate,
    pub project: ProjectCode,
    /// Work location for the day. Compared against the configured remote
    /// label when detecting trips.
    pub location: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Free-text description of the work done.
    pub topic: String,
    pub break_minutes: u32,
    pub travel_time_minutes: u32,
}

impl TimesheetEntry {
    /// Creates a validated entry.
    ///
    /// Rejects empty identifying strings, `end_time` at or before
    /// `start_time`, and breaks longer than the worked span.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the raw timesheet row shape"
    )]
    pub fn new(
        freelancer: FreelancerName,
        date: NaiveDate,
        project: ProjectCode,
        location: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        topic: impl Into<String>,
        break_minutes: u32,
        travel_time_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(ValidationError::Empty { field: "location" });
        }

        if end_time <= start_time {
            return Err(ValidationError::EndBeforeStart {
                field: "end time",
                start_field: "start time",
            });
        }

        let span_minutes = u32::try_from((end_time - start_time).num_minutes()).unwrap_or(0);
        if break_minutes > span_minutes {
            return Err(ValidationError::BreakExceedsSpan {
                break_minutes,
                span_minutes,
            });
        }

        Ok(Self {
            freelancer,
            date,
            project,
            location: location.trim().to_string(),
            start_time,
            end_time,
            topic: topic.into(),
            break_minutes,
            travel_time_minutes,
        })
    }

    /// Worked minutes between start and end, before subtracting the break.
    #[must_use]
    pub fn span_minutes(&self) -> u32 {
        u32::try_from((self.end_time - self.start_time).num_minutes()).unwrap_or(0)
    }

    /// Net worked minutes after subtracting the break.
    #[must_use]
    pub fn worked_minutes(&self) -> u32 {
        self.span_minutes().saturating_sub(self.break_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: (u32, u32), end: (u32, u32), break_minutes: u32) -> Result<TimesheetEntry, ValidationError> {
        TimesheetEntry::new(
            FreelancerName::new("Alice").unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            ProjectCode::new("ACME-01").unwrap(),
            "Berlin",
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            "onsite work",
            break_minutes,
            60,
        )
    }

    #[test]
    fn valid_entry_reports_worked_minutes() {
        let e = entry((9, 0), (17, 30), 30).unwrap();
        assert_eq!(e.span_minutes(), 510);
        assert_eq!(e.worked_minutes(), 480);
    }

    #[test]
    fn rejects_end_before_start() {
        let err = entry((17, 0), (9, 0), 0).unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    }

    #[test]
    fn rejects_end_equal_to_start() {
        assert!(entry((9, 0), (9, 0), 0).is_err());
    }

    #[test]
    fn rejects_break_longer_than_span() {
        let err = entry((9, 0), (10, 0), 90).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BreakExceedsSpan {
                break_minutes: 90,
                span_minutes: 60,
            }
        );
    }

    #[test]
    fn rejects_blank_location() {
        let result = TimesheetEntry::new(
            FreelancerName::new("Alice").unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            ProjectCode::new("ACME-01").unwrap(),
            "   ",
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            "work",
            0,
            0,
        );
        assert!(matches!(
            result,
            Err(ValidationError::Empty { field: "location" })
        ));
    }

    #[test]
    fn entry_serde_roundtrip() {
        let e = entry((9, 0), (17, 0), 45).unwrap();
        let json = serde_json::to_string(&e).unwrap();
        let parsed: TimesheetEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, e);
    }
}
