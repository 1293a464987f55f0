//! Weekly command printing billable hours per freelancer and ISO week.

use std::fmt::Write as _;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tsm_core::{WeeklyHoursMatrix, weekly_hours};

use crate::cli::InputArgs;
use crate::config::Config;

/// One cell of the weekly matrix, ordered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyRow {
    pub freelancer: String,
    pub iso_year: i32,
    pub iso_week: u32,
    pub billable_hours: Decimal,
}

/// Flattens the matrix into rows sorted by freelancer, then week.
#[must_use]
pub fn sorted_rows(matrix: &WeeklyHoursMatrix) -> Vec<WeeklyRow> {
    let mut rows: Vec<WeeklyRow> = matrix
        .iter()
        .map(|(key, hours)| WeeklyRow {
            freelancer: key.freelancer.to_string(),
            iso_year: key.iso_year,
            iso_week: key.iso_week,
            billable_hours: *hours,
        })
        .collect();
    rows.sort_by(|a, b| {
        (&a.freelancer, a.iso_year, a.iso_week).cmp(&(&b.freelancer, b.iso_year, b.iso_week))
    });
    rows
}

fn format_rows(rows: &[WeeklyRow]) -> String {
    let mut output = String::new();
    writeln!(output, "WEEKLY HOURS").unwrap();
    writeln!(output, "────────────").unwrap();

    if rows.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No billed hours in scope.").unwrap();
        return output;
    }

    let mut current: Option<&str> = None;
    for row in rows {
        if current != Some(row.freelancer.as_str()) {
            writeln!(output).unwrap();
            writeln!(output, "{}", row.freelancer).unwrap();
            current = Some(row.freelancer.as_str());
        }
        writeln!(
            output,
            "  {}-W{:02}  {:>8}",
            row.iso_year, row.iso_week, row.billable_hours
        )
        .unwrap();
    }
    output
}

/// Runs the weekly command.
pub fn run(config: &Config, input: &InputArgs, json: bool) -> Result<()> {
    let data = super::run_pipeline(config, input)?;
    let matrix = weekly_hours(&data.billing_results);
    let rows = sorted_rows(&matrix);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_rows(&rows));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tsm_core::{FreelancerName, WeekKey};

    use super::*;

    fn key(name: &str, iso_year: i32, iso_week: u32) -> WeekKey {
        WeekKey {
            freelancer: FreelancerName::new(name).unwrap(),
            iso_year,
            iso_week,
        }
    }

    #[test]
    fn rows_sort_by_freelancer_then_week() {
        let mut matrix = WeeklyHoursMatrix::new();
        matrix.insert(key("Bob", 2023, 2), dec!(8));
        matrix.insert(key("Alice", 2023, 10), dec!(4.5));
        matrix.insert(key("Alice", 2022, 52), dec!(6));

        let rows = sorted_rows(&matrix);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            (rows[0].freelancer.as_str(), rows[0].iso_year, rows[0].iso_week),
            ("Alice", 2022, 52)
        );
        assert_eq!(
            (rows[1].freelancer.as_str(), rows[1].iso_year, rows[1].iso_week),
            ("Alice", 2023, 10)
        );
        assert_eq!(rows[2].freelancer.as_str(), "Bob");
    }

    #[test]
    fn human_output_groups_by_freelancer() {
        let mut matrix = WeeklyHoursMatrix::new();
        matrix.insert(key("Alice", 2023, 1), dec!(8));
        matrix.insert(key("Alice", 2023, 2), dec!(7.5));
        matrix.insert(key("Bob", 2023, 1), dec!(4));

        let output = format_rows(&sorted_rows(&matrix));
        assert!(output.contains("Alice\n"));
        assert!(output.contains("2023-W01"));
        assert!(output.contains("7.5"));
        assert_eq!(output.matches("Bob").count(), 1);
    }

    #[test]
    fn human_output_for_empty_matrix() {
        let output = format_rows(&[]);
        assert!(output.contains("No billed hours in scope."));
    }
}
