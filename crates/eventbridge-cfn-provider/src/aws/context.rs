//! Shared AWS configuration context
//!
//! Provides `AwsContext` for loading AWS SDK configuration once and
//! creating service clients from the same config.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;

/// Shared AWS configuration context for creating service clients.
///
/// # Example
/// ```ignore
/// let aws = AwsContext::new(Some("us-east-1"), None).await;
/// let events = EventsClient::from_context(&aws);
/// ```
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
}

impl AwsContext {
    /// Load AWS configuration, optionally pinning region and profile.
    ///
    /// Anything not pinned is resolved from the environment, config files
    /// and instance roles.
    pub async fn new(region: Option<&str>, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        Self {
            config: Arc::new(loader.load().await),
        }
    }

    /// Get the underlying SDK config for direct client construction.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Get the resolved region, if any.
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }

    /// Create an EventBridge client from this context.
    pub fn events_client(&self) -> aws_sdk_eventbridge::Client {
        aws_sdk_eventbridge::Client::new(self.sdk_config())
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region())
            .finish_non_exhaustive()
    }
}
