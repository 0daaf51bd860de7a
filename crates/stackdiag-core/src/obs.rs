//! Structured observability hooks for the diagnosis lifecycle.
//!
//! This module provides:
//! - A diagnosis-scoped tracing span via `DiagnosisSpan`
//! - Emission functions for each step: status, history, trigger, nested stack
//!
//! Steps are logged at `info!`; degraded reads at `warn!`. Verbosity follows
//! `RUST_LOG` (see [`init_tracing`](crate::init_tracing)).

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::diagnose::DiagnosisStage;

/// Diagnosis-scoped span for one invocation.
///
/// # Example
///
/// ```ignore
/// let span = DiagnosisSpan::new("web-app");
/// work().instrument(span.span().clone()).await; // events carry diagnosis_id and stack_name
/// ```
pub struct DiagnosisSpan {
    diagnosis_id: Uuid,
    span: tracing::Span,
}

impl DiagnosisSpan {
    /// Create a span tagged with a fresh diagnosis id.
    pub fn new(stack_name: &str) -> Self {
        let diagnosis_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "stackdiag.diagnosis",
            diagnosis_id = %diagnosis_id,
            stack_name = %stack_name,
        );
        Self { diagnosis_id, span }
    }

    pub fn diagnosis_id(&self) -> Uuid {
        self.diagnosis_id
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

/// Emit event: the orchestrator moved to a new stage.
pub fn emit_stage(stage: DiagnosisStage) {
    debug!(event = "diagnosis.stage", stage = stage.as_str());
}

/// Emit event: current status obtained.
pub fn emit_status_obtained(stack_name: &str, status: &str, in_rollback: bool) {
    info!(
        event = "status.obtained",
        stack_name = %stack_name,
        status = %status,
        in_rollback = in_rollback,
    );
}

/// Emit event: the status lookup failed; the diagnosis stops here.
pub fn emit_status_unavailable(stack_name: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "status.unavailable", stack_name = %stack_name, kind = %kind, error = %error);
}

/// Emit event: history read failed and was replaced by an empty history.
pub fn emit_history_unavailable(stack_name: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "history.unavailable", stack_name = %stack_name, kind = %kind, error = %error);
}

/// Emit event: a rollback trigger was located.
pub fn emit_trigger_located(stack_name: &str, resource_id: &str, resource_type: &str) {
    info!(
        event = "trigger.located",
        stack_name = %stack_name,
        resource_id = %resource_id,
        resource_type = %resource_type,
    );
}

/// Emit event: no event in the history matched a failure signal.
pub fn emit_no_trigger(stack_name: &str, events_scanned: usize) {
    info!(event = "trigger.none", stack_name = %stack_name, events_scanned = events_scanned);
}

/// Emit event: a trigger was located inside a nested stack.
pub fn emit_nested_resolved(nested_stack: &str, resource_id: &str, depth: usize) {
    info!(
        event = "nested.resolved",
        nested_stack = %nested_stack,
        resource_id = %resource_id,
        depth = depth,
    );
}

/// Emit event: nested-stack history could not be read.
pub fn emit_nested_failed(nested_stack: &str, depth: usize, error: &dyn std::fmt::Display) {
    warn!(event = "nested.failed", nested_stack = %nested_stack, depth = depth, error = %error);
}

/// Emit event: the nested chain points back at a stack already visited.
pub fn emit_nested_cycle(nested_stack: &str, depth: usize) {
    warn!(event = "nested.cycle", nested_stack = %nested_stack, depth = depth);
}

/// Emit event: report assembled.
pub fn emit_diagnosis_finished(stack_name: &str, duration_ms: u64, trigger_found: bool) {
    info!(
        event = "diagnosis.finished",
        stack_name = %stack_name,
        duration_ms = duration_ms,
        trigger_found = trigger_found,
    );
}
