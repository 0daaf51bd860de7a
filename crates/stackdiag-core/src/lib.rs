//! stackdiag Core Library
//!
//! Explains a stack rollback: locates the first failure event in the stack's
//! history, follows it into a nested stack when the failed resource is one,
//! and assembles the result into a [`DiagnosisReport`].

pub mod diagnose;
pub mod error;
pub mod locator;
pub mod nested;
pub mod obs;
pub mod reader;
pub mod report;
pub mod telemetry;

pub use diagnose::{diagnose, is_rollback_status, DiagnoseOptions, DiagnosisStage, ROLLBACK_MARKER};
pub use error::{DiagnosisError, Result, STATUS_LOOKUP_FAILED};
pub use locator::{is_failure_signal, locate, RollbackTrigger, NO_REASON_PROVIDED};
pub use nested::{
    NestedIdentity, NestedOutcome, NestedResolver, NestedRollbackTrigger, MAX_NESTED_DEPTH,
    NESTED_FAILURE_PREFIX,
};
pub use obs::DiagnosisSpan;
pub use reader::StackReader;
pub use report::{DiagnosisReport, ErrorReport, TriggerField, NO_TRIGGER_IDENTIFIED};
pub use telemetry::init_tracing;

pub use stack_state::{StackEvent, StackStateClient, StackStatusSnapshot};

/// stackdiag version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
