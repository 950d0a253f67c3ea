use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;

/// The root configuration structure for the journal application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub journal: JournalSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

/// Where the trade journal lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    /// Path of the JSON journal file.
    pub path: PathBuf,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("trades.json"),
        }
    }
}

/// How results are presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// ISO 4217 code appended to amounts (e.g. "USD"). Empty for none.
    pub currency: String,
    /// `strftime` pattern for trade dates.
    pub date_format: String,
    pub output: OutputFormat,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            output: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.journal.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("journal.path", "must not be empty"));
        }
        let currency = self.display.currency.trim();
        if !currency.is_empty()
            && !(currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(ConfigError::invalid(
                "display.currency",
                format!("expected a three-letter code, got '{currency}'"),
            ));
        }
        if !formats_a_date(&self.display.date_format) {
            return Err(ConfigError::invalid(
                "display.date_format",
                format!(
                    "'{}' is not a strftime pattern for calendar dates",
                    self.display.date_format
                ),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::invalid("logging.filter", "must not be empty"));
        }
        Ok(())
    }
}

/// Unknown specifiers and ones needing a time or offset (`%H`, `%z`) fail here.
fn formats_a_date(pattern: &str) -> bool {
    let sample = NaiveDate::default();
    let mut out = String::new();
    write!(out, "{}", sample.format(pattern)).is_ok()
}
