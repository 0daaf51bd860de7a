//! Nested stack resolution.
//!
//! When the primary trigger is itself a nested stack, the real cause lives in
//! that stack's own history. The resolver reads it and applies the same
//! first-match scan as [`locate`](crate::locator::locate).
//!
//! By default exactly one level is followed, and that first read always
//! happens, even when the trigger names the parent stack itself. A larger
//! `max_depth` keeps following while the located trigger is again a nested
//! stack, up to [`MAX_NESTED_DEPTH`], and stops on any stack it has already
//! visited.
//!
//! A failed nested read never fails the diagnosis; it becomes
//! [`NestedOutcome::Failed`] and is reported alongside the primary trigger.

use std::collections::HashSet;

use serde::Serialize;

use crate::locator::{locate, RollbackTrigger};
use crate::obs;
use crate::reader::StackReader;

/// Upper bound for `--nested-depth`.
pub const MAX_NESTED_DEPTH: usize = 5;

/// Prefix of the error message reported when a nested read fails.
pub const NESTED_FAILURE_PREFIX: &str = "Failed to get nested stack details";

/// Which id of a nested-stack event names the stack to query next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedIdentity {
    /// The logical resource id from the parent template.
    #[default]
    LogicalId,
    /// The physical resource id (the nested stack's ARN).
    PhysicalId,
}

/// Trigger found inside a nested stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedRollbackTrigger {
    pub resource_id: String,
    pub error_message: String,
}

impl From<&RollbackTrigger> for NestedRollbackTrigger {
    fn from(trigger: &RollbackTrigger) -> Self {
        Self {
            resource_id: trigger.resource_id.clone(),
            error_message: trigger.error_message.clone(),
        }
    }
}

/// Result of following a trigger into its nested stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedOutcome {
    Found(NestedRollbackTrigger),
    NotFound,
    Failed { stack_name: String, message: String },
}

impl NestedOutcome {
    /// The value reported as `NestedRollbackTrigger`, if any.
    ///
    /// A failed read is reported against the nested stack it tried to read,
    /// with the failure as the error message.
    pub fn into_report_field(self) -> Option<NestedRollbackTrigger> {
        match self {
            NestedOutcome::Found(trigger) => Some(trigger),
            NestedOutcome::NotFound => None,
            NestedOutcome::Failed {
                stack_name,
                message,
            } => Some(NestedRollbackTrigger {
                resource_id: stack_name,
                error_message: message,
            }),
        }
    }
}

/// Follows nested-stack triggers up to a fixed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedResolver {
    max_depth: usize,
    identity: NestedIdentity,
}

impl Default for NestedResolver {
    fn default() -> Self {
        Self::new(1, NestedIdentity::default())
    }
}

impl NestedResolver {
    /// `max_depth` is clamped to `1..=MAX_NESTED_DEPTH`.
    pub fn new(max_depth: usize, identity: NestedIdentity) -> Self {
        Self {
            max_depth: max_depth.clamp(1, MAX_NESTED_DEPTH),
            identity,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve the nested cause of `trigger`, found in `parent_stack`.
    ///
    /// Only meaningful when `trigger.is_nested_stack()`; the caller checks.
    pub async fn resolve(
        &self,
        reader: &StackReader<'_>,
        parent_stack: &str,
        trigger: &RollbackTrigger,
    ) -> NestedOutcome {
        let mut visited: HashSet<String> = HashSet::from([parent_stack.to_string()]);
        let mut current = trigger.clone();
        let mut deepest: Option<NestedRollbackTrigger> = None;

        for depth in 1..=self.max_depth {
            let stack_name = current.nested_stack_name(self.identity).to_string();
            if !visited.insert(stack_name.clone()) && depth > 1 {
                obs::emit_nested_cycle(&stack_name, depth);
                break;
            }

            let events = match reader.try_get_events(&stack_name).await {
                Ok(events) => events,
                Err(err) => {
                    obs::emit_nested_failed(&stack_name, depth, &err);
                    return match deepest {
                        Some(found) => NestedOutcome::Found(found),
                        None => NestedOutcome::Failed {
                            stack_name,
                            message: format!("{NESTED_FAILURE_PREFIX}: {err}"),
                        },
                    };
                }
            };

            let found = match locate(&events) {
                Some(found) if !found.resource_id.is_empty() => found,
                _ => break,
            };
            obs::emit_nested_resolved(&stack_name, &found.resource_id, depth);
            deepest = Some(NestedRollbackTrigger::from(&found));

            if !found.is_nested_stack() {
                break;
            }
            current = found;
        }

        deepest.map_or(NestedOutcome::NotFound, NestedOutcome::Found)
    }
}
