//! EventBridge client
//!
//! Every call converts SDK failures into [`ServiceError`](crate::aws::ServiceError)
//! at this boundary. Handlers only ever see the [`EventsOperations`] trait.

mod api_destinations;
mod connections;
mod event_buses;
mod operations;
mod rules;

pub use operations::EventsOperations;

#[cfg(test)]
pub use operations::MockEventsOperations;

use crate::aws::context::AwsContext;
use aws_sdk_eventbridge::Client;

/// EventBridge client for the resource handlers
pub struct EventsClient {
    pub(crate) client: Client,
}

impl EventsClient {
    /// Create a client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.events_client(),
        }
    }
}
