use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for gross-up searches and their configuration
#[derive(Debug, Error)]
pub enum GrossUpError {
    /// A search bound was hit before the target was reached
    #[error("Search limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value}). {suggestion}")]
    SearchLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// The live search was cancelled, usually because a newer one replaced it
    #[error("Search {search_id} was cancelled")]
    Cancelled { search_id: u64 },

    /// Stepping the gross salary left the representable decimal range
    #[error("Gross salary overflowed after {gross_salary}")]
    Overflow { gross_salary: Decimal },

    /// A deduction bracket schedule is malformed
    #[error("Invalid bracket schedule: {0}")]
    InvalidSchedule(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GrossUpError {
    /// Create a search limit error
    pub fn limit_exceeded(
        limit_name: impl Into<String>,
        limit_value: impl ToString,
        actual_value: impl ToString,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::SearchLimitExceeded {
            limit_name: limit_name.into(),
            limit_value: limit_value.to_string(),
            actual_value: actual_value.to_string(),
            suggestion: suggestion.into(),
        }
    }

    /// Whether this error was caused by a search bound rather than a fault
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::SearchLimitExceeded { .. })
    }
}
