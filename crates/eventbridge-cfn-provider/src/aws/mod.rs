//! AWS client modules for the provider
//!
//! This module provides:
//! - account: Strongly-typed caller account id
//! - context: Shared SDK configuration
//! - error: Service error type and the handler error classifier
//! - events: EventBridge client wrapper and the mockable operations trait
//! - tags: Tag merging and diffing

pub mod account;
pub mod context;
pub mod error;
pub mod events;
pub mod tags;

pub use account::AccountId;
pub use context::AwsContext;
pub use error::{ServiceError, TranslateError, classify};
pub use events::{EventsClient, EventsOperations};
