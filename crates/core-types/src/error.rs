use thiserror::Error;

/// Rejections raised while validating a trade entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// The form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidField { field, .. } => field,
        }
    }
}
