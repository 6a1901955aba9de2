//! API destination model to EventBridge request mapping

use super::model::ApiDestinationModel;
use crate::aws::error::TranslateError;
use aws_sdk_eventbridge::operation::{
    create_api_destination::CreateApiDestinationInput,
    delete_api_destination::DeleteApiDestinationInput,
    describe_api_destination::{DescribeApiDestinationInput, DescribeApiDestinationOutput},
    list_api_destinations::ListApiDestinationsInput,
    update_api_destination::UpdateApiDestinationInput,
};
use aws_sdk_eventbridge::types::ApiDestinationHttpMethod;

fn name(model: &ApiDestinationModel) -> Result<&str, TranslateError> {
    model.name.as_deref().ok_or(TranslateError::MissingField("Name"))
}

fn http_method(model: &ApiDestinationModel) -> Option<ApiDestinationHttpMethod> {
    model.http_method.as_deref().map(ApiDestinationHttpMethod::from)
}

pub fn create_api_destination(
    model: &ApiDestinationModel,
) -> Result<CreateApiDestinationInput, TranslateError> {
    let connection_arn = model
        .connection_arn
        .as_deref()
        .ok_or(TranslateError::MissingField("ConnectionArn"))?;
    let endpoint = model
        .invocation_endpoint
        .as_deref()
        .ok_or(TranslateError::MissingField("InvocationEndpoint"))?;
    let method = http_method(model).ok_or(TranslateError::MissingField("HttpMethod"))?;

    Ok(CreateApiDestinationInput::builder()
        .name(name(model)?)
        .set_description(model.description.clone())
        .connection_arn(connection_arn)
        .invocation_endpoint(endpoint)
        .http_method(method)
        .set_invocation_rate_limit_per_second(model.invocation_rate_limit_per_second)
        .build()?)
}

pub fn update_api_destination(
    model: &ApiDestinationModel,
) -> Result<UpdateApiDestinationInput, TranslateError> {
    Ok(UpdateApiDestinationInput::builder()
        .name(name(model)?)
        .set_description(model.description.clone())
        .set_connection_arn(model.connection_arn.clone())
        .set_invocation_endpoint(model.invocation_endpoint.clone())
        .set_http_method(http_method(model))
        .set_invocation_rate_limit_per_second(model.invocation_rate_limit_per_second)
        .build()?)
}

pub fn describe_api_destination(
    model: &ApiDestinationModel,
) -> Result<DescribeApiDestinationInput, TranslateError> {
    Ok(DescribeApiDestinationInput::builder().name(name(model)?).build()?)
}

pub fn delete_api_destination(
    model: &ApiDestinationModel,
) -> Result<DeleteApiDestinationInput, TranslateError> {
    Ok(DeleteApiDestinationInput::builder().name(name(model)?).build()?)
}

pub fn list_api_destinations(
    next_token: Option<String>,
) -> Result<ListApiDestinationsInput, TranslateError> {
    Ok(ListApiDestinationsInput::builder()
        .set_next_token(next_token)
        .build()?)
}

pub fn apply_description(model: &mut ApiDestinationModel, output: &DescribeApiDestinationOutput) {
    model.name = output.name().map(str::to_string);
    model.arn = output.api_destination_arn().map(str::to_string);
    model.connection_arn = output.connection_arn().map(str::to_string);
    model.description = output.description().map(str::to_string);
    model.invocation_endpoint = output.invocation_endpoint().map(str::to_string);
    model.http_method = output.http_method().map(|method| method.as_str().to_string());
    model.invocation_rate_limit_per_second = output.invocation_rate_limit_per_second();
}
