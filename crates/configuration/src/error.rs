use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file or an environment override could not be read or typed.
    #[error("Failed to read journal configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key,
            reason: reason.into(),
        }
    }
}
