//! Handler error taxonomy
//!
//! The orchestrator keys its retry behavior off these codes, so both the set
//! and the wire names are fixed.

use serde::{Deserialize, Serialize};

/// Error codes a handler may report on a failed progress event
///
/// Wire names follow CloudFormation. `Conflict` is transmitted as
/// `ResourceConflict`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum HandlerErrorCode {
    NotFound,
    AlreadyExists,
    #[serde(rename = "ResourceConflict")]
    #[strum(serialize = "ResourceConflict")]
    Conflict,
    ServiceLimitExceeded,
    InvalidRequest,
    InternalFailure,
    Throttling,
    GeneralServiceException,
}

impl HandlerErrorCode {
    /// Throttling is retried by the orchestrator instead of being surfaced
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Throttling)
    }
}
