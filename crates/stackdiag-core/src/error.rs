//! Diagnosis-level error taxonomy.
//!
//! Only two failures ever reach the caller: a malformed invocation and a
//! failed status lookup. History and nested-stack failures are absorbed
//! into the report instead.

use crate::report::ErrorReport;

/// `error` text reported when the status lookup fails.
pub const STATUS_LOOKUP_FAILED: &str = "Failed to retrieve stack status";

/// Errors that abort a diagnosis.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("{0}")]
    Usage(String),

    #[error("{prefix} for {stack}: {reason}", prefix = STATUS_LOOKUP_FAILED)]
    LookupFailure {
        stack: String,
        reason: String,
        kind: &'static str,
    },
}

impl DiagnosisError {
    /// Project the error onto the `{ "error", "reason"? }` output object.
    pub fn to_error_report(&self) -> ErrorReport {
        match self {
            DiagnosisError::Usage(usage) => ErrorReport::new(usage.clone()),
            DiagnosisError::LookupFailure { reason, .. } => {
                ErrorReport::new(STATUS_LOOKUP_FAILED).with_reason(reason.clone())
            }
        }
    }
}

/// Result type for diagnosis operations.
pub type Result<T> = std::result::Result<T, DiagnosisError>;
