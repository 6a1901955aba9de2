//! Resource handler sets
//!
//! Each resource type turns one lifecycle action into a [`Chain`](crate::engine::Chain)
//! and runs it once. List is a single page and skips the engine.
//!
//! - [`rule`]: `AWS::Events::Rule`
//! - [`event_bus`]: `AWS::Events::EventBus`
//! - [`connection`]: `AWS::Events::Connection`
//! - [`api_destination`]: `AWS::Events::ApiDestination`

pub mod api_destination;
pub mod connection;
pub mod event_bus;
pub mod rule;

use crate::aws::error::{ServiceError, TranslateError, classify};
use crate::aws::events::EventsOperations;
use crate::aws::tags::{self, ResourceTag, TagDiff};
use crate::engine::{CallbackContext, Step};
use crate::request::HandlerRequest;
use anyhow::Context;
use aws_sdk_eventbridge::operation::{
    list_tags_for_resource::ListTagsForResourceInput, tag_resource::TagResourceInput,
    untag_resource::UntagResourceInput,
};
use eventbridge_cfn_common::{Action, HandlerErrorCode, ProgressEvent, ResourceKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::{info, warn};

/// Every action but list needs a desired state
pub(crate) fn missing_model<M, C>(kind: ResourceKind) -> ProgressEvent<M, C> {
    ProgressEvent::failed(
        HandlerErrorCode::InvalidRequest,
        format!("{kind}: desiredResourceState is required"),
    )
}

/// List calls run outside the engine, so their errors are classified here.
/// Throttling is reported as a failure; the orchestrator retries it.
pub(crate) fn list_failed<M, C>(kind: ResourceKind, error: ServiceError) -> ProgressEvent<M, C> {
    let code = classify(&error);
    warn!(%kind, code = %code, error = %error, "List failed");
    ProgressEvent::failed(code, format!("{kind}: {error}"))
}

/// JSON documents (patterns, policies) may arrive as objects or as strings.
/// Strings are sent as they are.
pub(crate) fn json_document(field: &'static str, value: &Value) -> Result<String, TranslateError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string(other)
            .map_err(|source| TranslateError::Document { field, source }),
    }
}

/// Documents come back as strings; models carry them as JSON where possible
pub(crate) fn parse_document(document: &str) -> Value {
    serde_json::from_str(document).unwrap_or_else(|_| Value::String(document.to_string()))
}

/// Names resources created without one
pub(crate) fn assign_name<'a, M: 'a, S: 'a>(
    name: fn(&mut M) -> &mut Option<String>,
    generated: String,
) -> Step<'a, M, S> {
    Step::local("assign-name", move |mut model, state| {
        let slot = name(&mut model);
        if slot.is_none() {
            info!(name = %generated, "Generated physical name");
            *slot = Some(generated.clone());
        }
        Ok((model, state))
    })
}

/// Applies new and changed tags; a no-op when there are none
pub(crate) fn tag_resource<'a, O: EventsOperations, M: 'a, S: 'a>(
    ops: &'a O,
    diff: &'a TagDiff,
    arn: fn(&M) -> Option<&str>,
) -> Step<'a, M, S> {
    Step::call(
        "tag-resource",
        move |model: &M, _: &S| {
            TagResourceInput::builder()
                .set_resource_arn(arn(model).map(str::to_string))
                .set_tags(Some(tags::to_sdk(&diff.to_tag)?))
                .build()
                .map_err(TranslateError::from)
        },
        move |input| ops.tag_resource(input),
        |_, model, state| Ok((model, state)),
    )
    .when(move |_: &M, _: &S| !diff.to_tag.is_empty())
}

/// Removes dropped tag keys; a no-op when there are none
pub(crate) fn untag_resource<'a, O: EventsOperations, M: 'a, S: 'a>(
    ops: &'a O,
    diff: &'a TagDiff,
    arn: fn(&M) -> Option<&str>,
) -> Step<'a, M, S> {
    Step::call(
        "untag-resource",
        move |model: &M, _: &S| {
            UntagResourceInput::builder()
                .set_resource_arn(arn(model).map(str::to_string))
                .set_tag_keys(Some(diff.to_untag.clone()))
                .build()
                .map_err(TranslateError::from)
        },
        move |input| ops.untag_resource(input),
        |_, model, state| Ok((model, state)),
    )
    .when(move |_: &M, _: &S| !diff.to_untag.is_empty())
}

/// Reads tags back into the model
pub(crate) fn list_tags<'a, O: EventsOperations, M: 'a, S: 'a>(
    ops: &'a O,
    arn: fn(&M) -> Option<&str>,
    set: fn(&mut M, Vec<ResourceTag>),
) -> Step<'a, M, S> {
    Step::call(
        "list-tags",
        move |model: &M, _: &S| {
            let arn = arn(model).ok_or(TranslateError::MissingField("Arn"))?;
            ListTagsForResourceInput::builder()
                .resource_arn(arn)
                .build()
                .map_err(TranslateError::from)
        },
        move |input| ops.list_tags_for_resource(input),
        move |output, mut model, state| {
            set(&mut model, tags::from_sdk(output.tags()));
            Ok((model, state))
        },
    )
}

/// Tag changes between the previous and desired state of an update
pub(crate) fn tag_diff<M>(
    request: &HandlerRequest<M>,
    model_tags: fn(&M) -> &[ResourceTag],
) -> TagDiff {
    let previous = request
        .previous_resource_state
        .as_ref()
        .map(model_tags)
        .unwrap_or_default();
    let desired = request
        .desired_resource_state
        .as_ref()
        .map(model_tags)
        .unwrap_or_default();
    TagDiff::between(&request.previous_tags(previous), &request.desired_tags(desired))
}

/// Run one invocation from JSON and return the progress event as JSON
pub async fn dispatch<O: EventsOperations>(
    ops: &O,
    kind: ResourceKind,
    action: Action,
    request: Value,
    context: Option<Value>,
) -> anyhow::Result<Value> {
    info!(%kind, %action, "Handling request");
    match kind {
        ResourceKind::Rule => {
            invoke(request, context, |request, context| {
                rule::handle(ops, action, request, context)
            })
            .await
        }
        ResourceKind::EventBus => {
            invoke(request, context, |request, context| {
                event_bus::handle(ops, action, request, context)
            })
            .await
        }
        ResourceKind::Connection => {
            invoke(request, context, |request, context| {
                connection::handle(ops, action, request, context)
            })
            .await
        }
        ResourceKind::ApiDestination => {
            invoke(request, context, |request, context| {
                api_destination::handle(ops, action, request, context)
            })
            .await
        }
    }
}

async fn invoke<M, S, F, Fut>(
    request: Value,
    context: Option<Value>,
    handler: F,
) -> anyhow::Result<Value>
where
    M: Serialize + DeserializeOwned,
    S: Serialize + DeserializeOwned,
    F: FnOnce(HandlerRequest<M>, Option<CallbackContext<S>>) -> Fut,
    Fut: Future<Output = ProgressEvent<M, CallbackContext<S>>>,
{
    let request: HandlerRequest<M> =
        serde_json::from_value(request).context("Invalid handler request")?;
    let context: Option<CallbackContext<S>> = context
        .map(serde_json::from_value)
        .transpose()
        .context("Invalid callback context")?;

    let event = handler(request, context).await;
    info!(status = %event.status, error_code = ?event.error_code, "Invocation finished");
    serde_json::to_value(&event).context("Failed to serialize progress event")
}
