//! Failure policy over a [`StackStateClient`].
//!
//! The client reports every remote failure. `StackReader` decides what each
//! failure means for a diagnosis:
//!
//! | Query | On failure |
//! |-------|------------|
//! | status | fatal: `DiagnosisError::LookupFailure` |
//! | history | degrades to an empty history |
//! | nested history | passed through to the nested resolver |

use stack_state::{StackEvent, StackStateClient, StackStatusSnapshot, StateResult};

use crate::error::{DiagnosisError, Result};
use crate::obs;

/// Stateless read-through adapter; holds only the borrowed client.
pub struct StackReader<'a> {
    client: &'a dyn StackStateClient,
}

impl<'a> StackReader<'a> {
    pub fn new(client: &'a dyn StackStateClient) -> Self {
        Self { client }
    }

    /// Current status of `stack_name`; any failure is a `LookupFailure`.
    pub async fn get_status(&self, stack_name: &str) -> Result<StackStatusSnapshot> {
        match self.client.describe_status(stack_name).await {
            Ok(snapshot) if snapshot.status.is_empty() => {
                let reason = format!("Stack {stack_name} reported an empty status");
                obs::emit_status_unavailable(stack_name, "empty_status", &reason);
                Err(DiagnosisError::LookupFailure {
                    stack: stack_name.to_string(),
                    reason,
                    kind: "empty_status",
                })
            }
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                obs::emit_status_unavailable(stack_name, err.kind(), &err);
                Err(DiagnosisError::LookupFailure {
                    stack: stack_name.to_string(),
                    reason: err.to_string(),
                    kind: err.kind(),
                })
            }
        }
    }

    /// Event history of `stack_name`, or an empty history if it cannot be read.
    pub async fn get_events(&self, stack_name: &str) -> Vec<StackEvent> {
        match self.client.describe_events(stack_name).await {
            Ok(events) => events,
            Err(err) => {
                obs::emit_history_unavailable(stack_name, err.kind(), &err);
                Vec::new()
            }
        }
    }

    /// Event history of `stack_name` with failures passed through.
    pub async fn try_get_events(&self, stack_name: &str) -> StateResult<Vec<StackEvent>> {
        self.client.describe_events(stack_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_state::fakes::MemoryStackStateClient;
    use stack_state::{StackStateError, CREATE_FAILED};

    #[tokio::test]
    async fn status_failure_becomes_lookup_failure() {
        let client = MemoryStackStateClient::new();
        let reader = StackReader::new(&client);

        let err = reader.get_status("ghost").await.unwrap_err();
        match err {
            DiagnosisError::LookupFailure { stack, kind, reason } => {
                assert_eq!(stack, "ghost");
                assert_eq!(kind, "stack_not_found");
                assert!(reason.contains("ghost"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_status_is_a_lookup_failure() {
        let client = MemoryStackStateClient::new().with_stack("web-app", "");
        let reader = StackReader::new(&client);

        let err = reader.get_status("web-app").await.unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::LookupFailure {
                kind: "empty_status",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn history_failure_degrades_to_empty() {
        let client = MemoryStackStateClient::new()
            .with_stack("web-app", "ROLLBACK_COMPLETE")
            .fail_events("web-app", StackStateError::Transport("connection reset".into()));
        let reader = StackReader::new(&client);

        assert!(reader.get_events("web-app").await.is_empty());
        assert!(reader.try_get_events("web-app").await.is_err());
    }

    #[tokio::test]
    async fn history_is_returned_unchanged() {
        let events = vec![StackEvent::new("Bucket1", "AWS::S3::Bucket", CREATE_FAILED)];
        let client = MemoryStackStateClient::new()
            .with_stack("web-app", "ROLLBACK_COMPLETE")
            .with_events("web-app", events.clone());
        let reader = StackReader::new(&client);

        assert_eq!(reader.get_events("web-app").await, events);
    }
}
