//! Client configuration read from the environment

/// Region override. Unset means the SDK resolves `AWS_REGION` / profile itself.
pub const REGION_ENV: &str = "STACKDIAG_REGION";
/// Named credentials/config profile.
pub const PROFILE_ENV: &str = "STACKDIAG_PROFILE";
/// Endpoint override, e.g. a local CloudFormation emulator.
pub const ENDPOINT_URL_ENV: &str = "STACKDIAG_ENDPOINT_URL";

/// Settings for constructing a [`CloudFormationClient`](crate::CloudFormationClient).
///
/// Credentials are never part of this struct; they come from the SDK's
/// default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientConfig {
    /// Empty configuration: everything resolved by the SDK defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - STACKDIAG_REGION (optional)
    /// - STACKDIAG_PROFILE (optional)
    /// - STACKDIAG_ENDPOINT_URL (optional)
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            region: read(REGION_ENV),
            profile: read(PROFILE_ENV),
            endpoint_url: read(ENDPOINT_URL_ENV),
        }
    }

    /// Set region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set endpoint URL
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}
