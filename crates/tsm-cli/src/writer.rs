//! Renders master tables to CSV files or one JSON document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tsm_core::MasterTimesheetData;

/// File names of the two written tables.
pub const ENTRIES_FILE: &str = "entries_master.csv";
pub const TRIPS_FILE: &str = "trips_master.csv";

/// Writes both master tables as CSV files into `out_dir`.
///
/// Returns the paths of the written files. The directory is created if
/// missing.
pub fn write_master_csv(master: &MasterTimesheetData, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let entries_path = out_dir.join(ENTRIES_FILE);
    write_table(&entries_path, &master.entry_rows)?;

    let trips_path = out_dir.join(TRIPS_FILE);
    write_table(&trips_path, &master.trip_rows)?;

    tracing::info!(
        entries = master.entry_rows.len(),
        trips = master.trip_rows.len(),
        out_dir = %out_dir.display(),
        "master tables written"
    );
    Ok((entries_path, trips_path))
}

fn write_table<R: Serialize>(path: &Path, rows: &[R]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Renders the entire master output as one pretty-printed JSON document.
pub fn master_to_json(master: &MasterTimesheetData) -> Result<String> {
    serde_json::to_string_pretty(master).context("failed to serialize master data")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;
    use tsm_core::{EntryRow, TripRow};

    use super::*;

    fn sample_master() -> MasterTimesheetData {
        MasterTimesheetData {
            generated_at: Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap(),
            entry_rows: vec![EntryRow {
                freelancer: "Alice".to_string(),
                date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                year: 2023,
                month: 6,
                iso_week: 22,
                project: "ACME-01".to_string(),
                location: "Berlin".to_string(),
                topic: "onsite work".to_string(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
                break_minutes: 30,
                travel_time_minutes: 60,
                billable_hours: dec!(8),
                travel_hours_billed: dec!(0.5),
                hourly_rate: dec!(100.00),
                cost_per_hour: dec!(60.00),
                hours_billed: dec!(800.00),
                travel_surcharge_billed: dec!(10.00),
                total_billed: dec!(810.00),
                hours_cost: dec!(480.00),
                travel_surcharge_cost: dec!(30.00),
                total_cost: dec!(510.00),
                profit: dec!(300.00),
                profit_margin_pct: dec!(37.04),
            }],
            trip_rows: vec![TripRow {
                freelancer: "Alice".to_string(),
                project: "ACME-01".to_string(),
                location: "Berlin".to_string(),
                start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2023, 6, 2).unwrap(),
                duration_days: 2,
                reimbursement_amount: Some(dec!(100.00)),
                reimbursement_type: Some("Per Diem".to_string()),
            }],
        }
    }

    #[test]
    fn writes_both_tables_with_headers() {
        let dir = TempDir::new().unwrap();
        let (entries_path, trips_path) =
            write_master_csv(&sample_master(), dir.path()).unwrap();

        let entries = std::fs::read_to_string(entries_path).unwrap();
        let mut lines = entries.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("freelancer,date,year,month,iso_week"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Alice,2023-06-01,2023,6,22"));

        let trips = std::fs::read_to_string(trips_path).unwrap();
        assert!(trips.contains("Alice,ACME-01,Berlin,2023-06-01,2023-06-02,2,100.00,Per Diem"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("june");
        write_master_csv(&sample_master(), &nested).unwrap();
        assert!(nested.join(ENTRIES_FILE).exists());
        assert!(nested.join(TRIPS_FILE).exists());
    }

    #[test]
    fn json_document_contains_both_tables() {
        let json = master_to_json(&sample_master()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entry_rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["trip_rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["entry_rows"][0]["freelancer"], "Alice");
    }
}
