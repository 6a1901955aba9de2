//! Event bus and permission calls

use super::EventsClient;
use crate::aws::error::ServiceError;
use aws_sdk_eventbridge::operation::{
    create_event_bus::{CreateEventBusInput, CreateEventBusOutput},
    delete_event_bus::{DeleteEventBusInput, DeleteEventBusOutput},
    describe_event_bus::{DescribeEventBusInput, DescribeEventBusOutput},
    list_event_buses::{ListEventBusesInput, ListEventBusesOutput},
    put_permission::{PutPermissionInput, PutPermissionOutput},
    remove_permission::{RemovePermissionInput, RemovePermissionOutput},
    update_event_bus::{UpdateEventBusInput, UpdateEventBusOutput},
};
use tracing::debug;

impl EventsClient {
    pub async fn create_event_bus(
        &self,
        input: CreateEventBusInput,
    ) -> Result<CreateEventBusOutput, ServiceError> {
        debug!(event_bus = ?input.name, "CreateEventBus");
        self.client
            .create_event_bus()
            .set_name(input.name)
            .set_event_source_name(input.event_source_name)
            .set_description(input.description)
            .set_kms_key_identifier(input.kms_key_identifier)
            .set_dead_letter_config(input.dead_letter_config)
            .set_tags(input.tags)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn describe_event_bus(
        &self,
        input: DescribeEventBusInput,
    ) -> Result<DescribeEventBusOutput, ServiceError> {
        self.client
            .describe_event_bus()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn update_event_bus(
        &self,
        input: UpdateEventBusInput,
    ) -> Result<UpdateEventBusOutput, ServiceError> {
        debug!(event_bus = ?input.name, "UpdateEventBus");
        self.client
            .update_event_bus()
            .set_name(input.name)
            .set_description(input.description)
            .set_kms_key_identifier(input.kms_key_identifier)
            .set_dead_letter_config(input.dead_letter_config)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn delete_event_bus(
        &self,
        input: DeleteEventBusInput,
    ) -> Result<DeleteEventBusOutput, ServiceError> {
        debug!(event_bus = ?input.name, "DeleteEventBus");
        self.client
            .delete_event_bus()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_event_buses(
        &self,
        input: ListEventBusesInput,
    ) -> Result<ListEventBusesOutput, ServiceError> {
        self.client
            .list_event_buses()
            .set_name_prefix(input.name_prefix)
            .set_next_token(input.next_token)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn put_permission(
        &self,
        input: PutPermissionInput,
    ) -> Result<PutPermissionOutput, ServiceError> {
        debug!(event_bus = ?input.event_bus_name, "PutPermission");
        self.client
            .put_permission()
            .set_event_bus_name(input.event_bus_name)
            .set_action(input.action)
            .set_principal(input.principal)
            .set_statement_id(input.statement_id)
            .set_condition(input.condition)
            .set_policy(input.policy)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn remove_permission(
        &self,
        input: RemovePermissionInput,
    ) -> Result<RemovePermissionOutput, ServiceError> {
        debug!(event_bus = ?input.event_bus_name, "RemovePermission");
        self.client
            .remove_permission()
            .set_event_bus_name(input.event_bus_name)
            .set_statement_id(input.statement_id)
            .set_remove_all_permissions(input.remove_all_permissions)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }
}
