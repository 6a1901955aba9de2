//! EventBridge resource types served by the provider

use crate::defaults::*;

/// Types of EventBridge resources managed through CloudFormation
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ResourceKind {
    #[strum(to_string = "AWS::Events::Rule", serialize = "rule")]
    Rule,
    #[strum(to_string = "AWS::Events::EventBus", serialize = "event-bus")]
    EventBus,
    #[strum(to_string = "AWS::Events::Connection", serialize = "connection")]
    Connection,
    #[strum(to_string = "AWS::Events::ApiDestination", serialize = "api-destination")]
    ApiDestination,
}

impl ResourceKind {
    /// Delay between stabilization polls, in seconds
    pub fn poll_delay_secs(self) -> u64 {
        match self {
            Self::Rule => RULE_POLL_DELAY_SECS,
            Self::EventBus => EVENT_BUS_POLL_DELAY_SECS,
            Self::Connection => CONNECTION_POLL_DELAY_SECS,
            Self::ApiDestination => API_DESTINATION_POLL_DELAY_SECS,
        }
    }

    /// Overall stabilization timeout for a single step, in seconds
    pub fn stabilization_timeout_secs(self) -> u64 {
        match self {
            Self::Rule => RULE_STABILIZATION_TIMEOUT_SECS,
            Self::EventBus => EVENT_BUS_STABILIZATION_TIMEOUT_SECS,
            Self::Connection => CONNECTION_STABILIZATION_TIMEOUT_SECS,
            Self::ApiDestination => API_DESTINATION_STABILIZATION_TIMEOUT_SECS,
        }
    }
}
