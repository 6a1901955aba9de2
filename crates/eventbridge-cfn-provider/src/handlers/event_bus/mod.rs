//! `AWS::Events::EventBus` handlers
//!
//! EventBridge gives no completion signal for bus mutations, so create and
//! delete wait out one propagation delay.

pub mod model;
pub mod translate;

pub use model::{DeadLetterConfig, EventBusCallbackState, EventBusModel};

use crate::aws::error::TranslateError;
use crate::aws::events::EventsOperations;
use crate::aws::tags::{ResourceTag, TagDiff};
use crate::engine::{
    CallbackContext, Chain, ChainEvent, Stabilization, StabilizationPolicy, Step, StepFailure,
    propagation_delay,
};
use crate::handlers::{list_failed, list_tags, missing_model, tag_diff, tag_resource, untag_resource};
use crate::identifier::IdentifierResolver;
use crate::request::HandlerRequest;
use eventbridge_cfn_common::{Action, HandlerErrorCode, ProgressEvent, ResourceKind};
use futures::future;

const KIND: ResourceKind = ResourceKind::EventBus;

type State = EventBusCallbackState;

pub type EventBusEvent = ChainEvent<EventBusModel, EventBusCallbackState>;

pub async fn handle<O: EventsOperations>(
    ops: &O,
    action: Action,
    request: HandlerRequest<EventBusModel>,
    context: Option<CallbackContext<State>>,
) -> EventBusEvent {
    if action == Action::List {
        return list(ops, &request).await;
    }
    let Some(model) = request.desired_resource_state.clone() else {
        return missing_model(KIND);
    };
    let Some(name) = model.name.clone() else {
        return ProgressEvent::failed(
            HandlerErrorCode::InvalidRequest,
            format!("{KIND}: Name is required"),
        );
    };
    let context = context.unwrap_or_default();
    let resolver = request.resolver();
    let diff = tag_diff(&request, tags_of);

    let steps = match action {
        Action::Create => create_steps(ops, &request, resolver),
        Action::Update => update_steps(ops, &diff),
        Action::Delete => delete_steps(ops),
        _ => read_steps(ops),
    };
    let event = Chain::new(KIND, name, steps).run(model, context).await;
    if action == Action::Delete {
        event.without_model()
    } else {
        event
    }
}

fn arn_of(model: &EventBusModel) -> Option<&str> {
    model.arn.as_deref()
}

fn tags_of(model: &EventBusModel) -> &[ResourceTag] {
    &model.tags
}

fn set_tags(model: &mut EventBusModel, tags: Vec<ResourceTag>) {
    model.tags = tags;
}

fn propagation() -> StabilizationPolicy {
    StabilizationPolicy::for_kind(KIND)
}

fn wait_for_propagation(
    _: &EventBusModel,
    _: &State,
    polls: u32,
) -> future::Ready<Result<Stabilization, StepFailure>> {
    future::ready(Ok(propagation_delay(polls)))
}

fn create_steps<'a, O: EventsOperations>(
    ops: &'a O,
    request: &'a HandlerRequest<EventBusModel>,
    resolver: IdentifierResolver<'a>,
) -> Vec<Step<'a, EventBusModel, State>> {
    let mut steps = vec![
        Step::call(
            "create-event-bus",
            move |model: &EventBusModel, _: &State| {
                translate::create_event_bus(model, &request.create_tags(&model.tags))
            },
            move |input| ops.create_event_bus(input),
            move |output, mut model: EventBusModel, state| {
                let arn = match (output.event_bus_arn(), model.name.as_deref()) {
                    (Some(arn), _) => arn.to_string(),
                    (None, Some(name)) => resolver.event_bus_arn(name),
                    (None, None) => return Err(TranslateError::MissingField("Name").into()),
                };
                model.arn = Some(arn);
                Ok((model, state))
            },
        )
        .stabilize(propagation(), wait_for_propagation),
        put_policy(ops),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn update_steps<'a, O: EventsOperations>(
    ops: &'a O,
    diff: &'a TagDiff,
) -> Vec<Step<'a, EventBusModel, State>> {
    let mut steps = vec![
        Step::call(
            "describe-event-bus",
            |model: &EventBusModel, _: &State| translate::describe_event_bus(model),
            move |input| ops.describe_event_bus(input),
            |output, mut model: EventBusModel, mut state: State| {
                model.arn = output.arn().map(str::to_string);
                state.had_policy = output.policy().is_some();
                Ok((model, state))
            },
        ),
        Step::call(
            "update-event-bus",
            |model: &EventBusModel, _: &State| translate::update_event_bus(model),
            move |input| ops.update_event_bus(input),
            |_, model, state| Ok((model, state)),
        ),
        put_policy(ops),
        Step::call(
            "remove-policy",
            |model: &EventBusModel, _: &State| translate::remove_policy(model),
            move |input| ops.remove_permission(input),
            |_, model, state| Ok((model, state)),
        )
        .when(|model: &EventBusModel, state: &State| model.policy.is_none() && state.had_policy),
        tag_resource(ops, diff, arn_of),
        untag_resource(ops, diff, arn_of),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn delete_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, EventBusModel, State>> {
    vec![
        Step::call(
            "describe-event-bus",
            |model: &EventBusModel, _: &State| translate::describe_event_bus(model),
            move |input| ops.describe_event_bus(input),
            |_, model, state| Ok((model, state)),
        ),
        Step::call(
            "delete-event-bus",
            |model: &EventBusModel, _: &State| translate::delete_event_bus(model),
            move |input| ops.delete_event_bus(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(propagation(), wait_for_propagation),
    ]
}

fn read_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, EventBusModel, State>> {
    vec![
        Step::call(
            "describe-event-bus",
            |model: &EventBusModel, _: &State| translate::describe_event_bus(model),
            move |input| ops.describe_event_bus(input),
            |output, mut model: EventBusModel, state| {
                translate::apply_description(&mut model, &output);
                Ok((model, state))
            },
        ),
        list_tags(ops, arn_of, set_tags),
    ]
}

fn put_policy<O: EventsOperations>(ops: &O) -> Step<'_, EventBusModel, State> {
    Step::call(
        "put-policy",
        |model: &EventBusModel, _: &State| {
            let policy = model
                .policy
                .as_ref()
                .ok_or(TranslateError::MissingField("Policy"))?;
            translate::put_policy(model, policy)
        },
        move |input| ops.put_permission(input),
        |_, model, state| Ok((model, state)),
    )
    .when(|model: &EventBusModel, _: &State| model.policy.is_some())
}

async fn list<O: EventsOperations>(
    ops: &O,
    request: &HandlerRequest<EventBusModel>,
) -> EventBusEvent {
    let input = match translate::list_event_buses(request.next_token.clone()) {
        Ok(input) => input,
        Err(error) => {
            return ProgressEvent::failed(HandlerErrorCode::InvalidRequest, format!("{KIND}: {error}"));
        }
    };
    match ops.list_event_buses(input).await {
        Ok(output) => {
            let models = output
                .event_buses()
                .iter()
                .map(|bus| EventBusModel {
                    name: bus.name().map(str::to_string),
                    arn: bus.arn().map(str::to_string),
                    ..EventBusModel::default()
                })
                .collect();
            ProgressEvent::listed(models, output.next_token().map(str::to_string))
        }
        Err(error) => list_failed(KIND, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::ServiceError;
    use crate::aws::events::MockEventsOperations;
    use aws_sdk_eventbridge::operation::{
        create_event_bus::CreateEventBusOutput, delete_event_bus::DeleteEventBusOutput,
        describe_event_bus::DescribeEventBusOutput, list_event_buses::ListEventBusesOutput,
        list_tags_for_resource::ListTagsForResourceOutput, put_permission::PutPermissionOutput,
        remove_permission::RemovePermissionOutput, update_event_bus::UpdateEventBusOutput,
    };
    use aws_sdk_eventbridge::types::{self, Tag};
    use eventbridge_cfn_test_utils::{
        TEST_ACCOUNT_ID, event_bus_arn, handler_request, list_request, update_request,
    };
    use serde_json::{Value, json};

    fn request(value: Value) -> HandlerRequest<EventBusModel> {
        serde_json::from_value(value).unwrap()
    }

    fn described(policy: Option<&str>) -> DescribeEventBusOutput {
        DescribeEventBusOutput::builder()
            .name("orders")
            .arn(event_bus_arn(TEST_ACCOUNT_ID, "orders"))
            .set_policy(policy.map(str::to_string))
            .build()
    }

    #[tokio::test]
    async fn create_waits_once_then_applies_policy() {
        let mut ops = MockEventsOperations::new();
        ops.expect_create_event_bus()
            .times(1)
            .withf(|input| {
                input.name() == Some("orders")
                    && input.tags().iter().any(|tag| tag.key() == "team")
            })
            .returning(|_| {
                Ok(CreateEventBusOutput::builder()
                    .event_bus_arn(event_bus_arn(TEST_ACCOUNT_ID, "orders"))
                    .build())
            });
        ops.expect_put_permission()
            .times(1)
            .withf(|input| input.policy().is_some_and(|policy| policy.contains("2012-10-17")))
            .returning(|_| Ok(PutPermissionOutput::builder().build()));
        ops.expect_describe_event_bus()
            .returning(|_| Ok(described(Some(r#"{"Version":"2012-10-17"}"#))));
        ops.expect_list_tags_for_resource().returning(|_| {
            Ok(ListTagsForResourceOutput::builder()
                .tags(Tag::builder().key("team").value("shop").build().unwrap())
                .build())
        });

        let mut request = request(handler_request(json!({
            "Name": "orders",
            "Policy": {"Version": "2012-10-17"},
            "Tags": [{"Key": "team", "Value": "shop"}]
        })));

        let first = handle(&ops, Action::Create, request.clone(), None).await;
        assert!(first.is_in_progress());
        assert_eq!(first.callback_delay_seconds, Some(KIND.poll_delay_secs()));
        let arn = first.resource_model.as_ref().unwrap().arn.clone();
        assert_eq!(arn, Some(event_bus_arn(TEST_ACCOUNT_ID, "orders")));

        request.desired_resource_state = first.resource_model;
        let second = handle(&ops, Action::Create, request, first.callback_context).await;

        assert!(second.is_success(), "{:?}", second.message);
        let model = second.resource_model.unwrap();
        assert_eq!(model.policy, Some(json!({"Version": "2012-10-17"})));
        assert_eq!(model.tags, vec![ResourceTag::new("team", "shop")]);
    }

    #[tokio::test]
    async fn update_drops_policy_that_was_removed() {
        let mut ops = MockEventsOperations::new();
        ops.expect_describe_event_bus()
            .times(1)
            .returning(|_| Ok(described(Some(r#"{"Version":"2012-10-17"}"#))));
        ops.expect_describe_event_bus()
            .returning(|_| Ok(described(None)));
        ops.expect_update_event_bus()
            .times(1)
            .withf(|input| input.description() == Some("orders bus"))
            .returning(|_| Ok(UpdateEventBusOutput::builder().build()));
        ops.expect_put_permission().never();
        ops.expect_remove_permission()
            .times(1)
            .withf(|input| input.remove_all_permissions() == Some(true))
            .returning(|_| Ok(RemovePermissionOutput::builder().build()));
        ops.expect_tag_resource().never();
        ops.expect_untag_resource().never();
        ops.expect_list_tags_for_resource()
            .returning(|_| Ok(ListTagsForResourceOutput::builder().build()));

        let event = handle(
            &ops,
            Action::Update,
            request(update_request(
                json!({"Name": "orders", "Description": "orders bus"}),
                json!({"Name": "orders", "Policy": {"Version": "2012-10-17"}}),
            )),
            None,
        )
        .await;

        assert!(event.is_success(), "{:?}", event.message);
        assert_eq!(event.resource_model.unwrap().policy, None);
    }

    #[tokio::test]
    async fn delete_of_absent_bus_is_not_found() {
        let mut ops = MockEventsOperations::new();
        ops.expect_describe_event_bus()
            .returning(|_| Err(ServiceError::not_found("Event bus orders does not exist")));
        ops.expect_delete_event_bus().never();

        let event = handle(
            &ops,
            Action::Delete,
            request(handler_request(json!({"Name": "orders"}))),
            None,
        )
        .await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
    }

    #[tokio::test]
    async fn delete_waits_out_propagation() {
        let mut ops = MockEventsOperations::new();
        ops.expect_describe_event_bus()
            .times(1)
            .returning(|_| Ok(described(None)));
        ops.expect_delete_event_bus()
            .times(1)
            .returning(|_| Ok(DeleteEventBusOutput::builder().build()));

        let request = request(handler_request(json!({"Name": "orders"})));
        let first = handle(&ops, Action::Delete, request.clone(), None).await;
        assert!(first.is_in_progress());

        let second = handle(&ops, Action::Delete, request, first.callback_context).await;
        assert!(second.is_success());
        assert!(second.resource_model.is_none());
    }

    #[tokio::test]
    async fn missing_name_is_invalid() {
        let ops = MockEventsOperations::new();
        let event = handle(&ops, Action::Read, request(handler_request(json!({}))), None).await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::InvalidRequest));
    }

    #[tokio::test]
    async fn list_one_page() {
        let mut ops = MockEventsOperations::new();
        ops.expect_list_event_buses().times(1).returning(|_| {
            Ok(ListEventBusesOutput::builder()
                .event_buses(
                    types::EventBus::builder()
                        .name("default")
                        .arn(event_bus_arn(TEST_ACCOUNT_ID, "default"))
                        .build(),
                )
                .event_buses(
                    types::EventBus::builder()
                        .name("orders")
                        .arn(event_bus_arn(TEST_ACCOUNT_ID, "orders"))
                        .build(),
                )
                .build())
        });

        let event = handle(&ops, Action::List, request(list_request(json!({}), None)), None).await;
        let names: Vec<_> = event
            .resource_models
            .unwrap()
            .into_iter()
            .filter_map(|model| model.name)
            .collect();
        assert_eq!(names, vec!["default", "orders"]);
        assert_eq!(event.next_token, None);
    }
}
