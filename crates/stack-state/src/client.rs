//! Client trait and data types for reading stack state
//!
//! - `StackStatusSnapshot`: point-in-time status of one stack
//! - `StackEvent`: one resource-provisioning transition
//! - `StackStateClient`: the two remote reads stackdiag performs
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StackStateError;

/// Result type for stack-state operations
pub type StateResult<T> = std::result::Result<T, StackStateError>;

/// Resource status emitted when a resource fails to create.
pub const CREATE_FAILED: &str = "CREATE_FAILED";

/// Resource status emitted on the stack itself when a rollback starts.
pub const ROLLBACK_IN_PROGRESS: &str = "ROLLBACK_IN_PROGRESS";

/// Resource type marking a nested stack.
pub const NESTED_STACK_RESOURCE_TYPE: &str = "AWS::CloudFormation::Stack";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Status of a stack as observed at one point in time.
///
/// `status` is the control plane's raw value (e.g. `ROLLBACK_COMPLETE`);
/// the set of statuses is owned by the remote API, not by stackdiag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackStatusSnapshot {
    pub stack_name: String,
    pub status: String,
    pub reason: Option<String>,
}

impl StackStatusSnapshot {
    pub fn new(stack_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            status: status.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// A single resource event from a stack's history.
///
/// String fields the remote API leaves out are stored as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEvent {
    /// Template-level name of the resource (unique within the stack)
    pub logical_resource_id: String,
    /// Provider-assigned id (for nested stacks, the stack ARN)
    pub physical_resource_id: Option<String>,
    /// e.g. `AWS::S3::Bucket` or [`NESTED_STACK_RESOURCE_TYPE`]
    pub resource_type: String,
    /// e.g. [`CREATE_FAILED`]
    pub resource_status: String,
    pub resource_status_reason: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl StackEvent {
    pub fn new(
        logical_resource_id: impl Into<String>,
        resource_type: impl Into<String>,
        resource_status: impl Into<String>,
    ) -> Self {
        Self {
            logical_resource_id: logical_resource_id.into(),
            physical_resource_id: None,
            resource_type: resource_type.into(),
            resource_status: resource_status.into(),
            resource_status_reason: None,
            timestamp: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.resource_status_reason = Some(reason.into());
        self
    }

    pub fn with_physical_id(mut self, physical_id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(physical_id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// True when the event belongs to a nested stack resource.
    pub fn is_nested_stack(&self) -> bool {
        self.resource_type == NESTED_STACK_RESOURCE_TYPE
    }
}

// ---------------------------------------------------------------------------
// StackStateClient
// ---------------------------------------------------------------------------

/// Read-only access to a stack's current status and event history.
///
/// Guarantees:
/// - Implementations hold no state between calls.
/// - `describe_events` returns events in the control plane's natural order
///   (newest first for CloudFormation) and never re-sorts them.
/// - Both calls surface remote failures as [`StackStateError`]; deciding
///   which failures are fatal is left to the caller.
#[async_trait]
pub trait StackStateClient: Send + Sync {
    /// Fetch the current status of the named stack.
    async fn describe_status(&self, stack_name: &str) -> StateResult<StackStatusSnapshot>;

    /// Fetch the event history of the named stack.
    async fn describe_events(&self, stack_name: &str) -> StateResult<Vec<StackEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_stack_detection_matches_marker_exactly() {
        let nested = StackEvent::new("Child", NESTED_STACK_RESOURCE_TYPE, CREATE_FAILED);
        let bucket = StackEvent::new("Bucket1", "AWS::S3::Bucket", CREATE_FAILED);
        let lookalike = StackEvent::new("Child", "AWS::CloudFormation::StackSet", CREATE_FAILED);

        assert!(nested.is_nested_stack());
        assert!(!bucket.is_nested_stack());
        assert!(!lookalike.is_nested_stack());
    }

    #[test]
    fn builder_fills_optional_fields() {
        let event = StackEvent::new("Role1", "AWS::IAM::Role", CREATE_FAILED)
            .with_reason("Insufficient permissions")
            .with_physical_id("arn:aws:iam::123456789012:role/app");

        assert_eq!(
            event.resource_status_reason.as_deref(),
            Some("Insufficient permissions")
        );
        assert_eq!(
            event.physical_resource_id.as_deref(),
            Some("arn:aws:iam::123456789012:role/app")
        );
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn status_snapshot_serializes_reason() {
        let snapshot = StackStatusSnapshot::new("web-app", "ROLLBACK_COMPLETE")
            .with_reason("The following resource(s) failed to create: [Bucket1].");
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["stack_name"], "web-app");
        assert_eq!(value["status"], "ROLLBACK_COMPLETE");
        assert_eq!(
            value["reason"],
            "The following resource(s) failed to create: [Bucket1]."
        );
    }
}
