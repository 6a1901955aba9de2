//! eventbridge-cfn-common - Shared handler types
//!
//! This crate provides the types exchanged between a resource handler and the
//! CloudFormation orchestrator, without any AWS SDK dependencies.
//!
//! ## Modules
//!
//! - [`action`]: Lifecycle actions a handler can be invoked for
//! - [`defaults`]: Stabilization schedules per resource type
//! - [`error_code`]: The fixed handler error taxonomy
//! - [`progress`]: Progress events returned from every invocation
//! - [`resource_kind`]: The EventBridge resource types served by the provider

pub mod action;
pub mod defaults;
pub mod error_code;
pub mod progress;
pub mod resource_kind;

// Re-export commonly used types
pub use action::Action;
pub use error_code::HandlerErrorCode;
pub use progress::{OperationStatus, ProgressEvent};
pub use resource_kind::ResourceKind;
