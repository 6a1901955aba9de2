//! Event bus model to EventBridge request mapping

use super::model::{DeadLetterConfig, EventBusModel};
use crate::aws::error::TranslateError;
use crate::aws::tags;
use crate::handlers::{json_document, parse_document};
use aws_sdk_eventbridge::operation::{
    create_event_bus::CreateEventBusInput,
    delete_event_bus::DeleteEventBusInput,
    describe_event_bus::{DescribeEventBusInput, DescribeEventBusOutput},
    list_event_buses::ListEventBusesInput,
    put_permission::PutPermissionInput,
    remove_permission::RemovePermissionInput,
    update_event_bus::UpdateEventBusInput,
};
use aws_sdk_eventbridge::types;
use serde_json::Value;
use std::collections::BTreeMap;

fn name(model: &EventBusModel) -> Result<&str, TranslateError> {
    model.name.as_deref().ok_or(TranslateError::MissingField("Name"))
}

fn dead_letter_config(model: &EventBusModel) -> Option<types::DeadLetterConfig> {
    model.dead_letter_config.as_ref().map(|config| {
        types::DeadLetterConfig::builder()
            .set_arn(config.arn.clone())
            .build()
    })
}

pub fn create_event_bus(
    model: &EventBusModel,
    create_tags: &BTreeMap<String, String>,
) -> Result<CreateEventBusInput, TranslateError> {
    let tags = Some(create_tags)
        .filter(|tags| !tags.is_empty())
        .map(tags::to_sdk)
        .transpose()?;

    Ok(CreateEventBusInput::builder()
        .name(name(model)?)
        .set_event_source_name(model.event_source_name.clone())
        .set_description(model.description.clone())
        .set_kms_key_identifier(model.kms_key_identifier.clone())
        .set_dead_letter_config(dead_letter_config(model))
        .set_tags(tags)
        .build()?)
}

pub fn describe_event_bus(model: &EventBusModel) -> Result<DescribeEventBusInput, TranslateError> {
    Ok(DescribeEventBusInput::builder().name(name(model)?).build()?)
}

pub fn update_event_bus(model: &EventBusModel) -> Result<UpdateEventBusInput, TranslateError> {
    Ok(UpdateEventBusInput::builder()
        .name(name(model)?)
        .set_description(model.description.clone())
        .set_kms_key_identifier(model.kms_key_identifier.clone())
        .set_dead_letter_config(dead_letter_config(model))
        .build()?)
}

pub fn delete_event_bus(model: &EventBusModel) -> Result<DeleteEventBusInput, TranslateError> {
    Ok(DeleteEventBusInput::builder().name(name(model)?).build()?)
}

pub fn put_policy(model: &EventBusModel, policy: &Value) -> Result<PutPermissionInput, TranslateError> {
    Ok(PutPermissionInput::builder()
        .event_bus_name(name(model)?)
        .policy(json_document("Policy", policy)?)
        .build()?)
}

pub fn remove_policy(model: &EventBusModel) -> Result<RemovePermissionInput, TranslateError> {
    Ok(RemovePermissionInput::builder()
        .event_bus_name(name(model)?)
        .remove_all_permissions(true)
        .build()?)
}

pub fn list_event_buses(next_token: Option<String>) -> Result<ListEventBusesInput, TranslateError> {
    Ok(ListEventBusesInput::builder()
        .set_next_token(next_token)
        .build()?)
}

/// Overwrite the described fields of `model`; `EventSourceName` is not
/// reported back and is left alone
pub fn apply_description(model: &mut EventBusModel, output: &DescribeEventBusOutput) {
    model.name = output.name().map(str::to_string);
    model.arn = output.arn().map(str::to_string);
    model.description = output.description().map(str::to_string);
    model.kms_key_identifier = output.kms_key_identifier().map(str::to_string);
    model.dead_letter_config = output.dead_letter_config().map(|config| DeadLetterConfig {
        arn: config.arn().map(str::to_string),
    });
    model.policy = output.policy().map(parse_document);
}
