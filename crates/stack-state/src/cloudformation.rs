//! CloudFormation-backed StackStateClient implementation
//!
//! Wraps `aws_sdk_cloudformation::Client`, converting SDK output shapes to
//! `client` types and SDK errors to [`StackStateError`] at the boundary.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudformation::types::{Stack, StackEvent as AwsStackEvent};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::client::{StackEvent, StackStateClient, StackStatusSnapshot, StateResult};
use crate::config::ClientConfig;
use crate::error::StackStateError;

/// CloudFormation implementation of [`StackStateClient`].
///
/// Retries are disabled: a failed call is reported once and the caller
/// decides whether that failure is fatal.
#[derive(Debug, Clone)]
pub struct CloudFormationClient {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationClient {
    /// Build a client from the SDK's default chain plus `config` overrides.
    pub async fn from_config(config: &ClientConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        debug!(
            region = ?sdk_config.region(),
            endpoint_override = config.endpoint_url.is_some(),
            "CloudFormation client configured"
        );

        Self::from_sdk_client(aws_sdk_cloudformation::Client::new(&sdk_config))
    }

    /// Wrap an already constructed SDK client.
    pub fn from_sdk_client(client: aws_sdk_cloudformation::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StackStateClient for CloudFormationClient {
    #[instrument(skip(self))]
    async fn describe_status(&self, stack_name: &str) -> StateResult<StackStatusSnapshot> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        let stack = output.stacks().first().ok_or_else(|| {
            StackStateError::StackNotFound(format!("Stack with id {stack_name} does not exist"))
        })?;

        to_status_snapshot(stack_name, stack)
    }

    #[instrument(skip(self))]
    async fn describe_events(&self, stack_name: &str) -> StateResult<Vec<StackEvent>> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        let events: Vec<StackEvent> = output.stack_events().iter().map(to_stack_event).collect();
        debug!(count = events.len(), "Fetched stack events");
        Ok(events)
    }
}

fn to_status_snapshot(stack_name: &str, stack: &Stack) -> StateResult<StackStatusSnapshot> {
    let status = stack
        .stack_status()
        .map(|s| s.as_str().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StackStateError::EmptyStatus(stack_name.to_string()))?;

    Ok(StackStatusSnapshot {
        stack_name: stack_name.to_string(),
        status,
        reason: stack.stack_status_reason().map(str::to_string),
    })
}

fn to_stack_event(event: &AwsStackEvent) -> StackEvent {
    StackEvent {
        logical_resource_id: event.logical_resource_id().unwrap_or_default().to_string(),
        physical_resource_id: event
            .physical_resource_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        resource_type: event.resource_type().unwrap_or_default().to_string(),
        resource_status: event
            .resource_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        resource_status_reason: event.resource_status_reason().map(str::to_string),
        timestamp: event.timestamp().and_then(to_chrono),
    }
}

fn to_chrono(ts: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

fn classify_sdk_error<E>(err: &SdkError<E>) -> StackStateError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let rendered = DisplayErrorContext(err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StackStateError::Transport(rendered)
        }
        _ => classify_error_code(err.code(), err.message(), rendered),
    }
}

/// Map a control-plane error code to a failure kind.
fn classify_error_code(
    code: Option<&str>,
    message: Option<&str>,
    rendered: String,
) -> StackStateError {
    let message = message.unwrap_or_default();
    match code {
        Some("ValidationError") if message.contains("does not exist") => {
            StackStateError::StackNotFound(rendered)
        }
        Some(c)
            if c.starts_with("AccessDenied")
                || c == "UnauthorizedOperation"
                || c == "InvalidClientTokenId"
                || c == "ExpiredToken" =>
        {
            StackStateError::AccessDenied(rendered)
        }
        Some("Throttling" | "ThrottlingException" | "RequestLimitExceeded") => {
            StackStateError::Throttled(rendered)
        }
        _ => StackStateError::Remote(rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudformation::types::{ResourceStatus, StackStatus};

    #[test]
    fn missing_stack_is_classified_as_not_found() {
        let err = classify_error_code(
            Some("ValidationError"),
            Some("Stack with id web-app does not exist"),
            "ValidationError: Stack with id web-app does not exist".to_string(),
        );
        assert!(matches!(err, StackStateError::StackNotFound(_)));
        assert!(err.to_string().contains("web-app does not exist"));
    }

    #[test]
    fn other_validation_errors_stay_remote() {
        let err = classify_error_code(
            Some("ValidationError"),
            Some("1 validation error detected"),
            "bad input".to_string(),
        );
        assert!(matches!(err, StackStateError::Remote(_)));
    }

    #[test]
    fn auth_and_throttle_codes_are_tagged() {
        let denied = classify_error_code(Some("AccessDenied"), None, "denied".to_string());
        let expired = classify_error_code(Some("ExpiredToken"), None, "expired".to_string());
        let throttled = classify_error_code(Some("Throttling"), None, "slow down".to_string());

        assert_eq!(denied.kind(), "access_denied");
        assert_eq!(expired.kind(), "access_denied");
        assert_eq!(throttled.kind(), "throttled");
    }

    #[test]
    fn unknown_code_is_remote() {
        let err = classify_error_code(None, None, "boom".to_string());
        assert_eq!(err, StackStateError::Remote("boom".to_string()));
    }

    #[test]
    fn sdk_timestamp_converts_to_utc() {
        let converted = to_chrono(&AwsDateTime::from_secs(1_700_000_000));
        assert_eq!(converted.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    fn sdk_event() -> aws_sdk_cloudformation::types::builders::StackEventBuilder {
        AwsStackEvent::builder()
            .stack_name("web-app")
            .event_id("evt-1")
            .resource_type("AWS::S3::Bucket")
            .resource_status(ResourceStatus::CreateFailed)
            .timestamp(AwsDateTime::from_secs(1_700_000_000))
    }

    #[test]
    fn sdk_event_maps_every_field() {
        let event = sdk_event()
            .logical_resource_id("Bucket1")
            .physical_resource_id("web-app-bucket1-abc123")
            .resource_status_reason("Bucket already exists")
            .build();

        let mapped = to_stack_event(&event);

        assert_eq!(mapped.logical_resource_id, "Bucket1");
        assert_eq!(
            mapped.physical_resource_id.as_deref(),
            Some("web-app-bucket1-abc123")
        );
        assert_eq!(mapped.resource_type, "AWS::S3::Bucket");
        assert_eq!(mapped.resource_status, "CREATE_FAILED");
        assert_eq!(
            mapped.resource_status_reason.as_deref(),
            Some("Bucket already exists")
        );
        assert_eq!(mapped.timestamp.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn sdk_event_without_reason_has_no_reason() {
        let event = sdk_event().logical_resource_id("Bucket1").build();

        let mapped = to_stack_event(&event);

        assert_eq!(mapped.resource_status_reason, None);
        assert_eq!(mapped.physical_resource_id, None);
    }

    #[test]
    fn empty_physical_id_is_dropped() {
        let event = sdk_event()
            .logical_resource_id("Bucket1")
            .physical_resource_id("")
            .build();

        assert_eq!(to_stack_event(&event).physical_resource_id, None);
    }

    #[test]
    fn missing_logical_id_maps_to_empty_string() {
        let event = sdk_event().build();

        assert_eq!(to_stack_event(&event).logical_resource_id, "");
    }

    #[test]
    fn sdk_stack_maps_status_and_reason() {
        let stack = Stack::builder()
            .stack_name("web-app")
            .stack_status(StackStatus::RollbackComplete)
            .stack_status_reason("The following resource(s) failed to create: [Bucket1].")
            .build();

        let snapshot = to_status_snapshot("web-app", &stack).unwrap();

        assert_eq!(snapshot.stack_name, "web-app");
        assert_eq!(snapshot.status, "ROLLBACK_COMPLETE");
        assert_eq!(
            snapshot.reason.as_deref(),
            Some("The following resource(s) failed to create: [Bucket1].")
        );
    }

    #[test]
    fn sdk_stack_without_status_is_empty_status() {
        let stack = Stack::builder().stack_name("web-app").build();

        assert_eq!(
            to_status_snapshot("web-app", &stack),
            Err(StackStateError::EmptyStatus("web-app".to_string()))
        );
    }
}
