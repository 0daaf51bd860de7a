//! Stack-State: CloudFormation Boundary for stackdiag
//!
//! This crate owns every read against the deployment control plane. The rest
//! of stackdiag only ever sees the [`StackStateClient`] trait and the plain
//! data types defined here.
//!
//! ## Layer 0 - Collaborator Boundary
//!
//! Focus: turning remote responses into owned values and remote failures into
//! a small tagged error enum.
//!
//! ## Key Components
//!
//! - `StackStateClient`: status and event-history queries for a named stack
//! - `CloudFormationClient`: AWS SDK implementation of the trait
//! - `ClientConfig`: region/profile/endpoint settings read from the environment
//! - `fakes::MemoryStackStateClient`: scripted in-memory client for tests

pub mod client;
pub mod cloudformation;
mod config;
mod error;
pub mod fakes;

pub use client::{
    StackEvent, StackStateClient, StackStatusSnapshot, StateResult, CREATE_FAILED,
    NESTED_STACK_RESOURCE_TYPE, ROLLBACK_IN_PROGRESS,
};
pub use cloudformation::CloudFormationClient;
pub use config::{ClientConfig, ENDPOINT_URL_ENV, PROFILE_ENV, REGION_ENV};
pub use error::StackStateError;
