//! Diagnosis orchestration.
//!
//! Sequences at most three remote reads, each skipped when earlier results
//! make it unnecessary:
//!
//! ```text
//! FetchingStatus ──fail──▶ StatusUnavailable (error)
//!       │
//!  StatusObtained ──no "ROLLBACK" in status──▶ ReportReady
//!       │
//!  FetchingHistory ─▶ LocatingTrigger ─[trigger is a nested stack]─▶ ResolvingNested
//!                            │                                           │
//!                            └──────────────────▶ ReportReady ◀──────────┘
//! ```

use std::time::Instant;

use stack_state::StackStateClient;
use tracing::Instrument;

use crate::error::{DiagnosisError, Result};
use crate::locator::locate;
use crate::nested::{NestedIdentity, NestedResolver};
use crate::obs::{self, DiagnosisSpan};
use crate::reader::StackReader;
use crate::report::DiagnosisReport;

/// Substring marking any rollback status (`ROLLBACK_COMPLETE`,
/// `UPDATE_ROLLBACK_FAILED`, ...). New rollback statuses need no code change.
pub const ROLLBACK_MARKER: &str = "ROLLBACK";

/// True when `status` indicates the stack rolled back or is rolling back.
pub fn is_rollback_status(status: &str) -> bool {
    status.contains(ROLLBACK_MARKER)
}

/// Orchestrator states, used for stage logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisStage {
    FetchingStatus,
    StatusUnavailable,
    StatusObtained,
    FetchingHistory,
    LocatingTrigger,
    ResolvingNested,
    ReportReady,
}

impl DiagnosisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisStage::FetchingStatus => "fetching_status",
            DiagnosisStage::StatusUnavailable => "status_unavailable",
            DiagnosisStage::StatusObtained => "status_obtained",
            DiagnosisStage::FetchingHistory => "fetching_history",
            DiagnosisStage::LocatingTrigger => "locating_trigger",
            DiagnosisStage::ResolvingNested => "resolving_nested",
            DiagnosisStage::ReportReady => "report_ready",
        }
    }
}

/// Knobs for nested-stack resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnoseOptions {
    /// Nested levels to follow; 1 follows the primary trigger only.
    pub nested_depth: usize,
    pub nested_identity: NestedIdentity,
}

impl Default for DiagnoseOptions {
    fn default() -> Self {
        Self {
            nested_depth: 1,
            nested_identity: NestedIdentity::LogicalId,
        }
    }
}

/// Diagnose `stack_name`.
///
/// Fails only when `stack_name` is empty or its status cannot be read.
/// Every other failure is absorbed into the returned report.
pub async fn diagnose(
    client: &dyn StackStateClient,
    stack_name: &str,
    options: &DiagnoseOptions,
) -> Result<DiagnosisReport> {
    if stack_name.trim().is_empty() {
        return Err(DiagnosisError::Usage(
            "stack name must not be empty".to_string(),
        ));
    }

    let span = DiagnosisSpan::new(stack_name);
    run(client, stack_name, options)
        .instrument(span.span().clone())
        .await
}

async fn run(
    client: &dyn StackStateClient,
    stack_name: &str,
    options: &DiagnoseOptions,
) -> Result<DiagnosisReport> {
    let started = Instant::now();
    let reader = StackReader::new(client);

    obs::emit_stage(DiagnosisStage::FetchingStatus);
    let snapshot = match reader.get_status(stack_name).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            obs::emit_stage(DiagnosisStage::StatusUnavailable);
            return Err(err);
        }
    };

    obs::emit_stage(DiagnosisStage::StatusObtained);
    let in_rollback = is_rollback_status(&snapshot.status);
    obs::emit_status_obtained(stack_name, &snapshot.status, in_rollback);
    if let Some(reason) = &snapshot.reason {
        tracing::debug!(status_reason = %reason, "Stack status reason");
    }

    let mut report = DiagnosisReport::new(stack_name, snapshot.status);

    if in_rollback {
        obs::emit_stage(DiagnosisStage::FetchingHistory);
        let events = reader.get_events(stack_name).await;

        obs::emit_stage(DiagnosisStage::LocatingTrigger);
        report = report.with_trigger(locate(&events));

        match report.trigger().cloned() {
            Some(trigger) => {
                obs::emit_trigger_located(stack_name, &trigger.resource_id, &trigger.resource_type);

                if trigger.is_nested_stack() {
                    obs::emit_stage(DiagnosisStage::ResolvingNested);
                    let resolver =
                        NestedResolver::new(options.nested_depth, options.nested_identity);
                    let outcome = resolver.resolve(&reader, stack_name, &trigger).await;
                    report = report.with_nested(outcome.into_report_field());
                }
            }
            None => obs::emit_no_trigger(stack_name, events.len()),
        }
    }

    obs::emit_stage(DiagnosisStage::ReportReady);
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    obs::emit_diagnosis_finished(stack_name, duration_ms, report.trigger().is_some());

    Ok(report)
}
