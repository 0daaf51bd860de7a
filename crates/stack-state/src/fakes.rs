//! In-memory fake for `StackStateClient` (testing only)
//!
//! `MemoryStackStateClient` serves scripted statuses and event histories,
//! can be told to fail either query for a given stack, and records every
//! call it receives so tests can assert which remote reads happened.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{StackEvent, StackStateClient, StackStatusSnapshot, StateResult};
use crate::error::StackStateError;

/// One query received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    DescribeStatus(String),
    DescribeEvents(String),
}

/// Scripted stack-state client backed by `HashMap`s.
///
/// Unknown stacks answer with `StackStateError::StackNotFound`, matching the
/// control plane's behavior for both queries.
#[derive(Debug, Default)]
pub struct MemoryStackStateClient {
    statuses: HashMap<String, StackStatusSnapshot>,
    events: HashMap<String, Vec<StackEvent>>,
    status_failures: HashMap<String, StackStateError>,
    event_failures: HashMap<String, StackStateError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MemoryStackStateClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stack with the given status.
    pub fn with_stack(mut self, stack_name: &str, status: &str) -> Self {
        self.statuses.insert(
            stack_name.to_string(),
            StackStatusSnapshot::new(stack_name, status),
        );
        self
    }

    /// Register a stack with a status and a status reason.
    pub fn with_stack_reason(mut self, stack_name: &str, status: &str, reason: &str) -> Self {
        self.statuses.insert(
            stack_name.to_string(),
            StackStatusSnapshot::new(stack_name, status).with_reason(reason),
        );
        self
    }

    /// Set the event history returned for a stack.
    ///
    /// A stack with a history but no registered status is still readable
    /// through `describe_events`; nested stacks are usually set up this way.
    pub fn with_events(mut self, stack_name: &str, events: Vec<StackEvent>) -> Self {
        self.events.insert(stack_name.to_string(), events);
        self
    }

    /// Make `describe_status` fail for a stack.
    pub fn fail_status(mut self, stack_name: &str, err: StackStateError) -> Self {
        self.status_failures.insert(stack_name.to_string(), err);
        self
    }

    /// Make `describe_events` fail for a stack.
    pub fn fail_events(mut self, stack_name: &str, err: StackStateError) -> Self {
        self.event_failures.insert(stack_name.to_string(), err);
        self
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `describe_events` calls received so far.
    pub fn event_queries(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCall::DescribeEvents(_)))
            .count()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StackStateClient for MemoryStackStateClient {
    async fn describe_status(&self, stack_name: &str) -> StateResult<StackStatusSnapshot> {
        self.record(RecordedCall::DescribeStatus(stack_name.to_string()));

        if let Some(err) = self.status_failures.get(stack_name) {
            return Err(err.clone());
        }
        self.statuses.get(stack_name).cloned().ok_or_else(|| {
            StackStateError::StackNotFound(format!("Stack with id {stack_name} does not exist"))
        })
    }

    async fn describe_events(&self, stack_name: &str) -> StateResult<Vec<StackEvent>> {
        self.record(RecordedCall::DescribeEvents(stack_name.to_string()));

        if let Some(err) = self.event_failures.get(stack_name) {
            return Err(err.clone());
        }
        if let Some(events) = self.events.get(stack_name) {
            return Ok(events.clone());
        }
        if self.statuses.contains_key(stack_name) {
            return Ok(Vec::new());
        }
        Err(StackStateError::StackNotFound(format!(
            "Stack [{stack_name}] does not exist"
        )))
    }
}
