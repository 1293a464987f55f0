//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tsm_core::TravelBillingMode;

/// Application configuration.
///
/// Command-line arguments override these values where both are given.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of per-freelancer timesheet CSV files.
    pub entries_dir: PathBuf,
    /// CSV file with billing terms.
    pub terms_file: PathBuf,
    /// CSV file with tiered reimbursement terms.
    pub trip_terms_file: PathBuf,
    /// Directory the master tables are written into.
    pub output_dir: PathBuf,
    /// Location label marking a non-travel day.
    pub remote_location: String,
    /// How billable travel time enters the total.
    pub travel_billing: TravelBillingMode,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("entries_dir", &self.entries_dir)
            .field("terms_file", &self.terms_file)
            .field("trip_terms_file", &self.trip_terms_file)
            .field("output_dir", &self.output_dir)
            .field("remote_location", &self.remote_location)
            .field("travel_billing", &self.travel_billing)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries_dir: PathBuf::from("timesheets"),
            terms_file: PathBuf::from("terms.csv"),
            trip_terms_file: PathBuf::from("trip_terms.csv"),
            output_dir: PathBuf::from("out"),
            remote_location: "Remote".to_string(),
            travel_billing: TravelBillingMode::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Precedence, lowest to highest: built-in defaults, `config.toml` in
    /// the platform config directory, the explicit file, `TSM_*` environment
    /// variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TSM_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tsm.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tsm"))
}
