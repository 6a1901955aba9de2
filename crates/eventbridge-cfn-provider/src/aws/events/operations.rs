//! EventBridge operations trait for testing

use super::EventsClient;
use crate::aws::error::ServiceError;
use aws_sdk_eventbridge::operation::{
    create_api_destination::{CreateApiDestinationInput, CreateApiDestinationOutput},
    create_connection::{CreateConnectionInput, CreateConnectionOutput},
    create_event_bus::{CreateEventBusInput, CreateEventBusOutput},
    delete_api_destination::{DeleteApiDestinationInput, DeleteApiDestinationOutput},
    delete_connection::{DeleteConnectionInput, DeleteConnectionOutput},
    delete_event_bus::{DeleteEventBusInput, DeleteEventBusOutput},
    delete_rule::{DeleteRuleInput, DeleteRuleOutput},
    describe_api_destination::{DescribeApiDestinationInput, DescribeApiDestinationOutput},
    describe_connection::{DescribeConnectionInput, DescribeConnectionOutput},
    describe_event_bus::{DescribeEventBusInput, DescribeEventBusOutput},
    describe_rule::{DescribeRuleInput, DescribeRuleOutput},
    list_api_destinations::{ListApiDestinationsInput, ListApiDestinationsOutput},
    list_connections::{ListConnectionsInput, ListConnectionsOutput},
    list_event_buses::{ListEventBusesInput, ListEventBusesOutput},
    list_rules::{ListRulesInput, ListRulesOutput},
    list_tags_for_resource::{ListTagsForResourceInput, ListTagsForResourceOutput},
    list_targets_by_rule::{ListTargetsByRuleInput, ListTargetsByRuleOutput},
    put_permission::{PutPermissionInput, PutPermissionOutput},
    put_rule::{PutRuleInput, PutRuleOutput},
    put_targets::{PutTargetsInput, PutTargetsOutput},
    remove_permission::{RemovePermissionInput, RemovePermissionOutput},
    remove_targets::{RemoveTargetsInput, RemoveTargetsOutput},
    tag_resource::{TagResourceInput, TagResourceOutput},
    untag_resource::{UntagResourceInput, UntagResourceOutput},
    update_api_destination::{UpdateApiDestinationInput, UpdateApiDestinationOutput},
    update_connection::{UpdateConnectionInput, UpdateConnectionOutput},
    update_event_bus::{UpdateEventBusInput, UpdateEventBusOutput},
};

/// Trait for EventBridge calls that can be mocked in tests.
///
/// Each method takes the SDK input shape and returns the SDK output shape, so
/// translation code is exercised the same way against a mock as against the
/// real service.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait EventsOperations: Send + Sync {
    // Rules

    /// Describe a rule on an event bus
    async fn describe_rule(
        &self,
        input: DescribeRuleInput,
    ) -> Result<DescribeRuleOutput, ServiceError>;

    /// Create or replace a rule
    async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ServiceError>;

    /// Delete a rule with no remaining targets
    async fn delete_rule(&self, input: DeleteRuleInput) -> Result<DeleteRuleOutput, ServiceError>;

    /// List one page of rules
    async fn list_rules(&self, input: ListRulesInput) -> Result<ListRulesOutput, ServiceError>;

    /// Add or replace targets on a rule
    async fn put_targets(&self, input: PutTargetsInput) -> Result<PutTargetsOutput, ServiceError>;

    /// Remove targets from a rule by id
    async fn remove_targets(
        &self,
        input: RemoveTargetsInput,
    ) -> Result<RemoveTargetsOutput, ServiceError>;

    /// List one page of a rule's targets
    async fn list_targets_by_rule(
        &self,
        input: ListTargetsByRuleInput,
    ) -> Result<ListTargetsByRuleOutput, ServiceError>;

    /// Add or overwrite tags
    async fn tag_resource(
        &self,
        input: TagResourceInput,
    ) -> Result<TagResourceOutput, ServiceError>;

    /// Remove tags by key
    async fn untag_resource(
        &self,
        input: UntagResourceInput,
    ) -> Result<UntagResourceOutput, ServiceError>;

    /// List tags on a resource
    async fn list_tags_for_resource(
        &self,
        input: ListTagsForResourceInput,
    ) -> Result<ListTagsForResourceOutput, ServiceError>;

    // Event buses

    /// Create a custom or partner event bus
    async fn create_event_bus(
        &self,
        input: CreateEventBusInput,
    ) -> Result<CreateEventBusOutput, ServiceError>;

    /// Describe an event bus
    async fn describe_event_bus(
        &self,
        input: DescribeEventBusInput,
    ) -> Result<DescribeEventBusOutput, ServiceError>;

    /// Update description, encryption and dead-letter config
    async fn update_event_bus(
        &self,
        input: UpdateEventBusInput,
    ) -> Result<UpdateEventBusOutput, ServiceError>;

    /// Delete an event bus
    async fn delete_event_bus(
        &self,
        input: DeleteEventBusInput,
    ) -> Result<DeleteEventBusOutput, ServiceError>;

    /// List one page of event buses
    async fn list_event_buses(
        &self,
        input: ListEventBusesInput,
    ) -> Result<ListEventBusesOutput, ServiceError>;

    /// Attach a resource policy to an event bus
    async fn put_permission(
        &self,
        input: PutPermissionInput,
    ) -> Result<PutPermissionOutput, ServiceError>;

    /// Remove resource policy statements
    async fn remove_permission(
        &self,
        input: RemovePermissionInput,
    ) -> Result<RemovePermissionOutput, ServiceError>;

    // Connections

    /// Create a connection
    async fn create_connection(
        &self,
        input: CreateConnectionInput,
    ) -> Result<CreateConnectionOutput, ServiceError>;

    /// Describe a connection
    async fn describe_connection(
        &self,
        input: DescribeConnectionInput,
    ) -> Result<DescribeConnectionOutput, ServiceError>;

    /// Update a connection
    async fn update_connection(
        &self,
        input: UpdateConnectionInput,
    ) -> Result<UpdateConnectionOutput, ServiceError>;

    /// Delete a connection
    async fn delete_connection(
        &self,
        input: DeleteConnectionInput,
    ) -> Result<DeleteConnectionOutput, ServiceError>;

    /// List one page of connections
    async fn list_connections(
        &self,
        input: ListConnectionsInput,
    ) -> Result<ListConnectionsOutput, ServiceError>;

    // API destinations

    /// Create an API destination
    async fn create_api_destination(
        &self,
        input: CreateApiDestinationInput,
    ) -> Result<CreateApiDestinationOutput, ServiceError>;

    /// Describe an API destination
    async fn describe_api_destination(
        &self,
        input: DescribeApiDestinationInput,
    ) -> Result<DescribeApiDestinationOutput, ServiceError>;

    /// Update an API destination
    async fn update_api_destination(
        &self,
        input: UpdateApiDestinationInput,
    ) -> Result<UpdateApiDestinationOutput, ServiceError>;

    /// Delete an API destination
    async fn delete_api_destination(
        &self,
        input: DeleteApiDestinationInput,
    ) -> Result<DeleteApiDestinationOutput, ServiceError>;

    /// List one page of API destinations
    async fn list_api_destinations(
        &self,
        input: ListApiDestinationsInput,
    ) -> Result<ListApiDestinationsOutput, ServiceError>;
}

impl EventsOperations for EventsClient {
    async fn describe_rule(
        &self,
        input: DescribeRuleInput,
    ) -> Result<DescribeRuleOutput, ServiceError> {
        EventsClient::describe_rule(self, input).await
    }

    async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ServiceError> {
        EventsClient::put_rule(self, input).await
    }

    async fn delete_rule(&self, input: DeleteRuleInput) -> Result<DeleteRuleOutput, ServiceError> {
        EventsClient::delete_rule(self, input).await
    }

    async fn list_rules(&self, input: ListRulesInput) -> Result<ListRulesOutput, ServiceError> {
        EventsClient::list_rules(self, input).await
    }

    async fn put_targets(&self, input: PutTargetsInput) -> Result<PutTargetsOutput, ServiceError> {
        EventsClient::put_targets(self, input).await
    }

    async fn remove_targets(
        &self,
        input: RemoveTargetsInput,
    ) -> Result<RemoveTargetsOutput, ServiceError> {
        EventsClient::remove_targets(self, input).await
    }

    async fn list_targets_by_rule(
        &self,
        input: ListTargetsByRuleInput,
    ) -> Result<ListTargetsByRuleOutput, ServiceError> {
        EventsClient::list_targets_by_rule(self, input).await
    }

    async fn tag_resource(
        &self,
        input: TagResourceInput,
    ) -> Result<TagResourceOutput, ServiceError> {
        EventsClient::tag_resource(self, input).await
    }

    async fn untag_resource(
        &self,
        input: UntagResourceInput,
    ) -> Result<UntagResourceOutput, ServiceError> {
        EventsClient::untag_resource(self, input).await
    }

    async fn list_tags_for_resource(
        &self,
        input: ListTagsForResourceInput,
    ) -> Result<ListTagsForResourceOutput, ServiceError> {
        EventsClient::list_tags_for_resource(self, input).await
    }

    async fn create_event_bus(
        &self,
        input: CreateEventBusInput,
    ) -> Result<CreateEventBusOutput, ServiceError> {
        EventsClient::create_event_bus(self, input).await
    }

    async fn describe_event_bus(
        &self,
        input: DescribeEventBusInput,
    ) -> Result<DescribeEventBusOutput, ServiceError> {
        EventsClient::describe_event_bus(self, input).await
    }

    async fn update_event_bus(
        &self,
        input: UpdateEventBusInput,
    ) -> Result<UpdateEventBusOutput, ServiceError> {
        EventsClient::update_event_bus(self, input).await
    }

    async fn delete_event_bus(
        &self,
        input: DeleteEventBusInput,
    ) -> Result<DeleteEventBusOutput, ServiceError> {
        EventsClient::delete_event_bus(self, input).await
    }

    async fn list_event_buses(
        &self,
        input: ListEventBusesInput,
    ) -> Result<ListEventBusesOutput, ServiceError> {
        EventsClient::list_event_buses(self, input).await
    }

    async fn put_permission(
        &self,
        input: PutPermissionInput,
    ) -> Result<PutPermissionOutput, ServiceError> {
        EventsClient::put_permission(self, input).await
    }

    async fn remove_permission(
        &self,
        input: RemovePermissionInput,
    ) -> Result<RemovePermissionOutput, ServiceError> {
        EventsClient::remove_permission(self, input).await
    }

    async fn create_connection(
        &self,
        input: CreateConnectionInput,
    ) -> Result<CreateConnectionOutput, ServiceError> {
        EventsClient::create_connection(self, input).await
    }

    async fn describe_connection(
        &self,
        input: DescribeConnectionInput,
    ) -> Result<DescribeConnectionOutput, ServiceError> {
        EventsClient::describe_connection(self, input).await
    }

    async fn update_connection(
        &self,
        input: UpdateConnectionInput,
    ) -> Result<UpdateConnectionOutput, ServiceError> {
        EventsClient::update_connection(self, input).await
    }

    async fn delete_connection(
        &self,
        input: DeleteConnectionInput,
    ) -> Result<DeleteConnectionOutput, ServiceError> {
        EventsClient::delete_connection(self, input).await
    }

    async fn list_connections(
        &self,
        input: ListConnectionsInput,
    ) -> Result<ListConnectionsOutput, ServiceError> {
        EventsClient::list_connections(self, input).await
    }

    async fn create_api_destination(
        &self,
        input: CreateApiDestinationInput,
    ) -> Result<CreateApiDestinationOutput, ServiceError> {
        EventsClient::create_api_destination(self, input).await
    }

    async fn describe_api_destination(
        &self,
        input: DescribeApiDestinationInput,
    ) -> Result<DescribeApiDestinationOutput, ServiceError> {
        EventsClient::describe_api_destination(self, input).await
    }

    async fn update_api_destination(
        &self,
        input: UpdateApiDestinationInput,
    ) -> Result<UpdateApiDestinationOutput, ServiceError> {
        EventsClient::update_api_destination(self, input).await
    }

    async fn delete_api_destination(
        &self,
        input: DeleteApiDestinationInput,
    ) -> Result<DeleteApiDestinationOutput, ServiceError> {
        EventsClient::delete_api_destination(self, input).await
    }

    async fn list_api_destinations(
        &self,
        input: ListApiDestinationsInput,
    ) -> Result<ListApiDestinationsOutput, ServiceError> {
        EventsClient::list_api_destinations(self, input).await
    }
}
