use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_logging;
pub use settings::{DisplaySettings, JournalSettings, LoggingSettings, OutputFormat, Settings};

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "journal.toml";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `JOURNAL__<SECTION>__<KEY>` environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let builder = config::Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix("JOURNAL").separator("__"));
    build(builder)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::path::PathBuf;

    fn from_toml(raw: &str) -> Result<Settings, ConfigError> {
        build(config::Config::builder().add_source(File::from_str(raw, FileFormat::Toml)))
    }

    #[test]
    fn empty_file_yields_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.journal.path, PathBuf::from("trades.json"));
        assert_eq!(settings.display.output, OutputFormat::Table);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = from_toml(
            r#"
            [display]
            currency = "BRL"

            [logging]
            directory = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(settings.display.currency, "BRL");
        assert_eq!(settings.display.date_format, "%Y-%m-%d");
        assert_eq!(settings.display.output, OutputFormat::Table);
        assert_eq!(settings.logging.filter, "warn");
        assert_eq!(settings.logging.directory, Some(PathBuf::from("logs")));
    }

    #[test]
    fn output_format_is_read_in_lowercase() {
        let settings = from_toml("[display]\noutput = \"json\"").unwrap();
        assert_eq!(settings.display.output, OutputFormat::Json);
    }

    fn rejected_key(raw: &str) -> &'static str {
        match from_toml(raw) {
            Err(ConfigError::InvalidSetting { key, .. }) => key,
            other => panic!("expected an invalid setting, got {other:?}"),
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(rejected_key("[display]\ncurrency = \"dollars\""), "display.currency");
        assert_eq!(rejected_key("[journal]\npath = \"\""), "journal.path");
        assert_eq!(rejected_key("[display]\ndate_format = \"%d/%Q\""), "display.date_format");
        assert_eq!(rejected_key("[display]\ndate_format = \"%H:%M\""), "display.date_format");
        assert_eq!(rejected_key("[logging]\nfilter = \" \""), "logging.filter");
        assert!(matches!(
            from_toml("[display]\noutput = \"xml\""),
            Err(ConfigError::Source(_))
        ));
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let settings = load_settings(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert!(settings.validate().is_ok());
    }
}
