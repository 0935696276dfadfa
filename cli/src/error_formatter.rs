use grossup::GrossUpError;

/// Format a GrossUpError for the terminal
pub fn format_error(error: &GrossUpError) -> String {
    match error {
        GrossUpError::SearchLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Search limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        GrossUpError::Cancelled { search_id } => {
            format!("Search {} was cancelled before reaching its target", search_id)
        }
        GrossUpError::Overflow { gross_salary } => format!(
            "Gross salary cannot grow past {}; the target is out of reach",
            gross_salary
        ),
        GrossUpError::InvalidSchedule(msg) => format!("Invalid deduction schedule: {}", msg),
        GrossUpError::Config(msg) => format!("Configuration error: {}", msg),
        GrossUpError::Json(err) => format!(
            "Invalid configuration JSON at line {}, column {}: {}",
            err.line(),
            err.column(),
            err
        ),
    }
}
