//! Shared test utilities for the EventBridge providers
//!
//! This crate provides common fixtures that can be used across test modules
//! without depending on the provider crate itself.
//!
//! ## Modules
//!
//! - [`arns`]: Account ids and ARN builders
//! - [`requests`]: Handler request documents

pub mod arns;
pub mod requests;

// Re-export commonly used items
pub use arns::{
    OTHER_ACCOUNT_ID, TEST_ACCOUNT_ID, TEST_PARTITION, TEST_REGION, api_destination_arn,
    connection_arn, event_bus_arn, rule_arn,
};
pub use requests::{handler_request, list_request, test_request_token, update_request};
