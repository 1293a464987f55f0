//! CSV-backed implementations of the core source traits.
//!
//! One CSV file per freelancer supplies entries; two further CSV files
//! supply billing terms and reimbursement tiers. Parse failures carry the
//! file and row so a bad import can be diagnosed without re-running.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tsm_core::{
    EntrySource, FreelancerName, ProjectCode, ProjectTerms, SourceError, TermsSource,
    TimesheetEntry, TripTerm,
};

/// Raw entry row as it appears in a timesheet CSV.
#[derive(Debug, Deserialize)]
struct EntryRecord {
    freelancer: String,
    date: NaiveDate,
    project: String,
    location: String,
    start_time: String,
    end_time: String,
    topic: String,
    break_minutes: u32,
    travel_time_minutes: u32,
}

/// Raw billing terms row.
#[derive(Debug, Deserialize)]
struct TermsRecord {
    freelancer: String,
    project: String,
    hourly_rate: Decimal,
    travel_surcharge_pct: Decimal,
    travel_time_pct: Decimal,
    cost_per_hour: Decimal,
}

/// Raw reimbursement tier row.
#[derive(Debug, Deserialize)]
struct TripTermRecord {
    min_days: u32,
    max_days: u32,
    reimbursement_type: String,
    amount_per_day: Decimal,
}

/// Accepts `HH:MM` and `HH:MM:SS`.
fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| format!("invalid time '{value}': {e}"))
}

/// One per-freelancer timesheet CSV file.
#[derive(Debug, Clone)]
pub struct CsvEntrySource {
    path: PathBuf,
    id: String,
}

impl CsvEntrySource {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unnamed>")
            .to_string();
        Self { path, id }
    }
}

impl EntrySource for CsvEntrySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_entries(&self) -> Result<Vec<TimesheetEntry>, SourceError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| format!("cannot open {}: {e}", self.path.display()))?;

        let mut entries = Vec::new();
        for (index, record) in reader.deserialize::<EntryRecord>().enumerate() {
            // Header is line 1, first record line 2
            let line = index + 2;
            let record = record.map_err(|e| format!("{}:{line}: {e}", self.id))?;
            let entry = TimesheetEntry::new(
                FreelancerName::new(record.freelancer).map_err(|e| row_error(&self.id, line, &e))?,
                record.date,
                ProjectCode::new(record.project).map_err(|e| row_error(&self.id, line, &e))?,
                record.location,
                parse_time(&record.start_time).map_err(|e| row_error(&self.id, line, &e))?,
                parse_time(&record.end_time).map_err(|e| row_error(&self.id, line, &e))?,
                record.topic,
                record.break_minutes,
                record.travel_time_minutes,
            )
            .map_err(|e| row_error(&self.id, line, &e))?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

fn row_error(source_id: &str, line: usize, error: &dyn std::fmt::Display) -> String {
    format!("{source_id}:{line}: {error}")
}

/// Billing and reimbursement terms loaded from two CSV files.
#[derive(Debug, Clone)]
pub struct CsvTermsSource {
    terms_path: PathBuf,
    trip_terms_path: PathBuf,
}

impl CsvTermsSource {
    #[must_use]
    pub const fn new(terms_path: PathBuf, trip_terms_path: PathBuf) -> Self {
        Self {
            terms_path,
            trip_terms_path,
        }
    }
}

impl TermsSource for CsvTermsSource {
    fn project_terms(&self) -> Result<Vec<ProjectTerms>, SourceError> {
        let mut reader = csv::Reader::from_path(&self.terms_path)
            .map_err(|e| format!("cannot open {}: {e}", self.terms_path.display()))?;
        let id = file_id(&self.terms_path);

        let mut terms = Vec::new();
        for (index, record) in reader.deserialize::<TermsRecord>().enumerate() {
            let line = index + 2;
            let record = record.map_err(|e| format!("{id}:{line}: {e}"))?;
            let parsed = ProjectTerms::new(
                FreelancerName::new(record.freelancer).map_err(|e| row_error(&id, line, &e))?,
                ProjectCode::new(record.project).map_err(|e| row_error(&id, line, &e))?,
                record.hourly_rate,
                record.travel_surcharge_pct,
                record.travel_time_pct,
                record.cost_per_hour,
            )
            .map_err(|e| row_error(&id, line, &e))?;
            terms.push(parsed);
        }
        Ok(terms)
    }

    fn trip_terms(&self) -> Result<Vec<TripTerm>, SourceError> {
        let mut reader = csv::Reader::from_path(&self.trip_terms_path)
            .map_err(|e| format!("cannot open {}: {e}", self.trip_terms_path.display()))?;
        let id = file_id(&self.trip_terms_path);

        // Tier order in the file is the match order
        let mut tiers = Vec::new();
        for (index, record) in reader.deserialize::<TripTermRecord>().enumerate() {
            let line = index + 2;
            let record = record.map_err(|e| format!("{id}:{line}: {e}"))?;
            let tier = TripTerm::new(
                record.min_days,
                record.max_days,
                record.reimbursement_type,
                record.amount_per_day,
            )
            .map_err(|e| row_error(&id, line, &e))?;
            tiers.push(tier);
        }
        Ok(tiers)
    }
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Finds all `.csv` files in a directory, sorted by file name.
///
/// The sort fixes the source order, which in turn fixes the row order of the
/// merged output.
pub fn discover_entry_sources(dir: &Path) -> anyhow::Result<Vec<CsvEntrySource>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    Ok(paths.into_iter().map(CsvEntrySource::new).collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    const ENTRY_HEADER: &str =
        "freelancer,date,project,location,start_time,end_time,topic,break_minutes,travel_time_minutes";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn reads_entries_from_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "alice.csv",
            &format!(
                "{ENTRY_HEADER}\nAlice,2023-06-01,ACME-01,Berlin,09:00,17:30,onsite work,30,60\n"
            ),
        );

        let source = CsvEntrySource::new(path);
        assert_eq!(source.id(), "alice.csv");

        let entries = source.read_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].freelancer.as_str(), "Alice");
        assert_eq!(entries[0].worked_minutes(), 480);
        assert_eq!(entries[0].travel_time_minutes, 60);
    }

    #[test]
    fn accepts_times_with_seconds() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "alice.csv",
            &format!("{ENTRY_HEADER}\nAlice,2023-06-01,ACME-01,Berlin,09:00:00,17:00:00,work,0,0\n"),
        );

        let entries = CsvEntrySource::new(path).read_entries().unwrap();
        assert_eq!(entries[0].span_minutes(), 480);
    }

    #[test]
    fn parse_error_names_file_and_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "alice.csv",
            &format!("{ENTRY_HEADER}\nAlice,2023-06-01,ACME-01,Berlin,nonsense,17:00,work,0,0\n"),
        );

        let err = CsvEntrySource::new(path).read_entries().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("alice.csv:2"), "was: {message}");
        assert!(message.contains("nonsense"), "was: {message}");
    }

    #[test]
    fn validation_error_names_file_and_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "alice.csv",
            &format!(
                "{ENTRY_HEADER}\nAlice,2023-06-01,ACME-01,Berlin,09:00,17:00,ok,0,0\nAlice,2023-06-02,ACME-01,Berlin,17:00,09:00,backwards,0,0\n"
            ),
        );

        let err = CsvEntrySource::new(path).read_entries().unwrap_err();
        assert!(err.to_string().starts_with("alice.csv:3"));
    }

    #[test]
    fn reads_project_terms() {
        let dir = TempDir::new().unwrap();
        let terms_path = write_file(
            &dir,
            "terms.csv",
            "freelancer,project,hourly_rate,travel_surcharge_pct,travel_time_pct,cost_per_hour\n\
             Alice,ACME-01,95.00,20,50,60.00\n",
        );
        let tiers_path = write_file(
            &dir,
            "trip_terms.csv",
            "min_days,max_days,reimbursement_type,amount_per_day\n1,2,Per Diem,50.00\n3,7,Per Diem,45.00\n",
        );

        let source = CsvTermsSource::new(terms_path, tiers_path);

        let terms = source.project_terms().unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].hourly_rate, dec!(95.00));
        assert_eq!(terms[0].cost_per_hour, dec!(60.00));

        let tiers = source.trip_terms().unwrap();
        assert_eq!(tiers.len(), 2);
        // File order is preserved for first-match-wins semantics
        assert_eq!(tiers[0].min_days, 1);
        assert_eq!(tiers[1].amount_per_day, dec!(45.00));
    }

    #[test]
    fn invalid_terms_are_rejected_with_location() {
        let dir = TempDir::new().unwrap();
        let terms_path = write_file(
            &dir,
            "terms.csv",
            "freelancer,project,hourly_rate,travel_surcharge_pct,travel_time_pct,cost_per_hour\n\
             Alice,ACME-01,95.00,20,50,120.00\n",
        );
        let tiers_path = write_file(
            &dir,
            "trip_terms.csv",
            "min_days,max_days,reimbursement_type,amount_per_day\n",
        );

        let err = CsvTermsSource::new(terms_path, tiers_path)
            .project_terms()
            .unwrap_err();
        assert!(err.to_string().contains("terms.csv:2"));
        assert!(err.to_string().contains("cost per hour"));
    }

    #[test]
    fn discovers_sources_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "bob.csv", &format!("{ENTRY_HEADER}\n"));
        write_file(&dir, "alice.csv", &format!("{ENTRY_HEADER}\n"));
        write_file(&dir, "notes.txt", "not a timesheet\n");

        let sources = discover_entry_sources(dir.path()).unwrap();
        let ids: Vec<&str> = sources.iter().map(EntrySource::id).collect();
        assert_eq!(ids, vec!["alice.csv", "bob.csv"]);
    }

    #[test]
    fn empty_trip_terms_file_yields_empty_tiers() {
        let dir = TempDir::new().unwrap();
        let terms_path = write_file(
            &dir,
            "terms.csv",
            "freelancer,project,hourly_rate,travel_surcharge_pct,travel_time_pct,cost_per_hour\n",
        );
        let tiers_path = write_file(
            &dir,
            "trip_terms.csv",
            "min_days,max_days,reimbursement_type,amount_per_day\n",
        );

        let source = CsvTermsSource::new(terms_path, tiers_path);
        assert!(source.trip_terms().unwrap().is_empty());
    }
}
