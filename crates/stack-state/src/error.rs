//! Error types for stack-state

use thiserror::Error;

/// Failures reported by the control plane when reading a stack.
///
/// Every variant carries the collaborator's own message. Callers that only
/// need a single failure string can rely on `Display`; callers that want to
/// branch on the cause can match on the variant or use [`kind`](Self::kind).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackStateError {
    /// The named stack does not exist in the target account/region
    #[error("Stack not found: {0}")]
    StackNotFound(String),

    /// Caller lacks permission, or credentials were rejected
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Request was rate limited by the control plane
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Request never produced a response (connect failure, timeout)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Any other service-side error
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// The stack was found but carried no status
    #[error("Stack has no status: {0}")]
    EmptyStatus(String),
}

impl StackStateError {
    /// Stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StackStateError::StackNotFound(_) => "stack_not_found",
            StackStateError::AccessDenied(_) => "access_denied",
            StackStateError::Throttled(_) => "throttled",
            StackStateError::Transport(_) => "transport",
            StackStateError::Remote(_) => "remote",
            StackStateError::EmptyStatus(_) => "empty_status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_collaborator_message() {
        let err = StackStateError::StackNotFound("Stack with id web-app does not exist".into());
        assert_eq!(
            err.to_string(),
            "Stack not found: Stack with id web-app does not exist"
        );
    }

    #[test]
    fn kind_tags_are_distinct() {
        let all = [
            StackStateError::StackNotFound(String::new()),
            StackStateError::AccessDenied(String::new()),
            StackStateError::Throttled(String::new()),
            StackStateError::Transport(String::new()),
            StackStateError::Remote(String::new()),
            StackStateError::EmptyStatus(String::new()),
        ];
        let mut kinds: Vec<_> = all.iter().map(StackStateError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), all.len());
    }
}
