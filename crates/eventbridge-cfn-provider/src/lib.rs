//! eventbridge-cfn-provider - CloudFormation resource handlers for EventBridge
//!
//! Each invocation takes one handler request for a rule, event bus,
//! connection or API destination and returns one progress event. Long
//! operations suspend with `IN_PROGRESS` and resume from the callback context.

pub mod aws;
pub mod config;
pub mod engine;
pub mod handlers;
pub mod identifier;
pub mod request;
