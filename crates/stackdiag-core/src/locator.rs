//! Rollback trigger location.
//!
//! Scans an event history in the order given and picks the first event whose
//! resource status is a failure signal (`CREATE_FAILED` or
//! `ROLLBACK_IN_PROGRESS`). The history is never re-sorted: CloudFormation
//! returns newest-first, and the first match in that order is the answer.

use serde::Serialize;
use stack_state::{StackEvent, CREATE_FAILED, ROLLBACK_IN_PROGRESS};

use crate::nested::NestedIdentity;

/// Reason reported for a matching event that carries none.
pub const NO_REASON_PROVIDED: &str = "No reason provided";

/// The event chosen as the explanation for a rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RollbackTrigger {
    pub resource_id: String,
    pub error_message: String,
    pub resource_type: String,
    #[serde(skip)]
    pub physical_resource_id: Option<String>,
}

impl RollbackTrigger {
    fn from_event(event: &StackEvent) -> Self {
        Self {
            resource_id: event.logical_resource_id.clone(),
            error_message: event
                .resource_status_reason
                .clone()
                .unwrap_or_else(|| NO_REASON_PROVIDED.to_string()),
            resource_type: event.resource_type.clone(),
            physical_resource_id: event.physical_resource_id.clone(),
        }
    }

    /// True when the failed resource is itself a nested stack.
    pub fn is_nested_stack(&self) -> bool {
        self.resource_type == stack_state::NESTED_STACK_RESOURCE_TYPE
    }

    /// Name to query when following this trigger into its nested stack.
    ///
    /// `PhysicalId` falls back to the logical id when the event has none.
    pub fn nested_stack_name(&self, identity: NestedIdentity) -> &str {
        match identity {
            NestedIdentity::LogicalId => &self.resource_id,
            NestedIdentity::PhysicalId => self
                .physical_resource_id
                .as_deref()
                .unwrap_or(&self.resource_id),
        }
    }
}

/// True for the resource statuses that explain a rollback.
pub fn is_failure_signal(resource_status: &str) -> bool {
    resource_status == CREATE_FAILED || resource_status == ROLLBACK_IN_PROGRESS
}

/// First event in `events` carrying a failure signal, if any.
pub fn locate(events: &[StackEvent]) -> Option<RollbackTrigger> {
    events
        .iter()
        .find(|event| is_failure_signal(&event.resource_status))
        .map(RollbackTrigger::from_event)
}
