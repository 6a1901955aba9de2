//! API destination calls

use super::EventsClient;
use crate::aws::error::ServiceError;
use aws_sdk_eventbridge::operation::{
    create_api_destination::{CreateApiDestinationInput, CreateApiDestinationOutput},
    delete_api_destination::{DeleteApiDestinationInput, DeleteApiDestinationOutput},
    describe_api_destination::{DescribeApiDestinationInput, DescribeApiDestinationOutput},
    list_api_destinations::{ListApiDestinationsInput, ListApiDestinationsOutput},
    update_api_destination::{UpdateApiDestinationInput, UpdateApiDestinationOutput},
};
use tracing::debug;

impl EventsClient {
    pub async fn create_api_destination(
        &self,
        input: CreateApiDestinationInput,
    ) -> Result<CreateApiDestinationOutput, ServiceError> {
        debug!(api_destination = ?input.name, "CreateApiDestination");
        self.client
            .create_api_destination()
            .set_name(input.name)
            .set_description(input.description)
            .set_connection_arn(input.connection_arn)
            .set_invocation_endpoint(input.invocation_endpoint)
            .set_http_method(input.http_method)
            .set_invocation_rate_limit_per_second(input.invocation_rate_limit_per_second)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn describe_api_destination(
        &self,
        input: DescribeApiDestinationInput,
    ) -> Result<DescribeApiDestinationOutput, ServiceError> {
        self.client
            .describe_api_destination()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn update_api_destination(
        &self,
        input: UpdateApiDestinationInput,
    ) -> Result<UpdateApiDestinationOutput, ServiceError> {
        debug!(api_destination = ?input.name, "UpdateApiDestination");
        self.client
            .update_api_destination()
            .set_name(input.name)
            .set_description(input.description)
            .set_connection_arn(input.connection_arn)
            .set_invocation_endpoint(input.invocation_endpoint)
            .set_http_method(input.http_method)
            .set_invocation_rate_limit_per_second(input.invocation_rate_limit_per_second)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn delete_api_destination(
        &self,
        input: DeleteApiDestinationInput,
    ) -> Result<DeleteApiDestinationOutput, ServiceError> {
        debug!(api_destination = ?input.name, "DeleteApiDestination");
        self.client
            .delete_api_destination()
            .set_name(input.name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_api_destinations(
        &self,
        input: ListApiDestinationsInput,
    ) -> Result<ListApiDestinationsOutput, ServiceError> {
        self.client
            .list_api_destinations()
            .set_name_prefix(input.name_prefix)
            .set_connection_arn(input.connection_arn)
            .set_next_token(input.next_token)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }
}
