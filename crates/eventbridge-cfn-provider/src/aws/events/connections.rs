//! Connection calls

use super::EventsClient;
use crate::aws::error::ServiceError;
use aws_sdk_eventbridge::operation::{
    create_connection::{CreateConnectionInput, CreateConnectionOutput},
    delete_connection::{DeleteConnectionInput, DeleteConnectionOutput},
    describe_connection::{DescribeConnectionInput, DescribeConnectionOutput},
    list_connections::{ListConnectionsInput, ListConnectionsOutput},
    update_connection::{UpdateConnectionInput, UpdateConnectionOutput},
};
use tracing::debug;

impl EventsClient {
    pub async fn create_connection(
        &self,
        input: CreateConnectionInput,
    ) -> Result<CreateConnectionOutput, ServiceError> {
        debug!(connection = ?input.name, "CreateConnection");
        self.client
            .create_connection()
            .set_name(input.name)
            .set_description(input.description)
            .set_authorization_type(input.authorization_type)
            .set_auth_parameters(input.auth_parameters)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn describe_connection(
        &self,
        input: DescribeConnectionInput,
    ) -> Result<DescribeConnectionOutput, ServiceError> {
        self.client
            .describe_connection()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn update_connection(
        &self,
        input: UpdateConnectionInput,
    ) -> Result<UpdateConnectionOutput, ServiceError> {
        debug!(connection = ?input.name, "UpdateConnection");
        self.client
            .update_connection()
            .set_name(input.name)
            .set_description(input.description)
            .set_authorization_type(input.authorization_type)
            .set_auth_parameters(input.auth_parameters)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn delete_connection(
        &self,
        input: DeleteConnectionInput,
    ) -> Result<DeleteConnectionOutput, ServiceError> {
        debug!(connection = ?input.name, "DeleteConnection");
        self.client
            .delete_connection()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_connections(
        &self,
        input: ListConnectionsInput,
    ) -> Result<ListConnectionsOutput, ServiceError> {
        self.client
            .list_connections()
            .set_name_prefix(input.name_prefix)
            .set_connection_state(input.connection_state)
            .set_next_token(input.next_token)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }
}
