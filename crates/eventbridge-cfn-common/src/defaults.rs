//! Stabilization schedules shared by every handler
//!
//! Polling is constant-interval. Each resource type has a fixed delay between
//! polls and an overall timeout after which the chain fails instead of polling.

/// Delay between rule stabilization polls, in seconds
pub const RULE_POLL_DELAY_SECS: u64 = 5;

/// Maximum time spent stabilizing one rule step, in seconds
pub const RULE_STABILIZATION_TIMEOUT_SECS: u64 = 300;

/// Delay between event bus polls, in seconds
pub const EVENT_BUS_POLL_DELAY_SECS: u64 = 5;

/// Maximum time spent stabilizing one event bus step, in seconds
pub const EVENT_BUS_STABILIZATION_TIMEOUT_SECS: u64 = 60;

/// Delay between connection polls, in seconds
pub const CONNECTION_POLL_DELAY_SECS: u64 = 5;

/// Maximum time spent stabilizing one connection step, in seconds (10 minutes).
/// OAuth connections authorize asynchronously against the remote endpoint.
pub const CONNECTION_STABILIZATION_TIMEOUT_SECS: u64 = 600;

/// Delay between API destination polls, in seconds
pub const API_DESTINATION_POLL_DELAY_SECS: u64 = 5;

/// Maximum time spent stabilizing one API destination step, in seconds
pub const API_DESTINATION_STABILIZATION_TIMEOUT_SECS: u64 = 60;

/// Maximum length of a generated resource name
pub const MAX_GENERATED_NAME_LENGTH: usize = 64;

/// Targets accepted per PutTargets/RemoveTargets call
pub const TARGET_BATCH_SIZE: usize = 10;
