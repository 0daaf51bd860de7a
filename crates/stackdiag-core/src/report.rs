//! Diagnosis report assembly and rendering.
//!
//! Output shape (keys in this order, optional keys omitted when absent):
//!
//! ```text
//! { "StackName": string,
//!   "StackStatus": string,
//!   "RollbackTrigger": { "ResourceId", "ErrorMessage", "ResourceType" }
//!                      | "No specific resource identified",
//!   "NestedRollbackTrigger": { "ResourceId", "ErrorMessage" } }
//! ```

use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::locator::RollbackTrigger;
use crate::nested::NestedRollbackTrigger;

/// `RollbackTrigger` value when a rollback has no identifiable cause.
pub const NO_TRIGGER_IDENTIFIED: &str = "No specific resource identified";

/// The `RollbackTrigger` entry of a report on a rolled-back stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerField {
    Identified(RollbackTrigger),
    NotIdentified,
}

impl Serialize for TriggerField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TriggerField::Identified(trigger) => trigger.serialize(serializer),
            TriggerField::NotIdentified => serializer.serialize_str(NO_TRIGGER_IDENTIFIED),
        }
    }
}

/// Result of one diagnosis. Built once, never mutated after rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiagnosisReport {
    pub stack_name: String,
    pub stack_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_trigger: Option<TriggerField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_rollback_trigger: Option<NestedRollbackTrigger>,
}

impl DiagnosisReport {
    /// Report carrying status only (stack not in rollback).
    pub fn new(stack_name: impl Into<String>, stack_status: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            stack_status: stack_status.into(),
            rollback_trigger: None,
            nested_rollback_trigger: None,
        }
    }

    /// Record the outcome of trigger location for a rolled-back stack.
    ///
    /// A trigger with an empty resource id does not identify anything.
    pub fn with_trigger(mut self, trigger: Option<RollbackTrigger>) -> Self {
        self.rollback_trigger = Some(match trigger {
            Some(trigger) if !trigger.resource_id.is_empty() => TriggerField::Identified(trigger),
            _ => TriggerField::NotIdentified,
        });
        self
    }

    pub fn with_nested(mut self, nested: Option<NestedRollbackTrigger>) -> Self {
        self.nested_rollback_trigger = nested;
        self
    }

    /// The identified primary trigger, if any.
    pub fn trigger(&self) -> Option<&RollbackTrigger> {
        match &self.rollback_trigger {
            Some(TriggerField::Identified(trigger)) => Some(trigger),
            _ => None,
        }
    }

    /// Pretty JSON with 4-space indentation.
    pub fn render_pretty(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Output object for the failure paths: `{ "error": ..., "reason"?: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Single-line JSON.
    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
