//! `AWS::Events::Connection` handlers
//!
//! Connections report an enumerated state. Each mutation has a status table
//! saying which states mean done, which mean keep polling, and what a missing
//! connection means.

pub mod model;
pub mod translate;

pub use model::{
    ApiKeyAuthParameters, AuthParameters, BasicAuthParameters, ClientParameters, ConnectionModel,
    HttpParameters, OAuthParameters, Parameter,
};

use crate::aws::events::EventsOperations;
use crate::engine::{
    CallbackContext, Chain, ChainEvent, OnMissing, Stabilization, StabilizationPolicy,
    StatusPolicy, Step, StepFailure,
};
use crate::handlers::{assign_name, list_failed, missing_model};
use crate::identifier::generate_name;
use crate::request::HandlerRequest;
use eventbridge_cfn_common::{Action, HandlerErrorCode, ProgressEvent, ResourceKind};

const KIND: ResourceKind = ResourceKind::Connection;

const CREATE: StatusPolicy = StatusPolicy {
    converged: &["AUTHORIZED"],
    pending: &["CREATING", "AUTHORIZING"],
    on_missing: OnMissing::Wait,
};

const UPDATE: StatusPolicy = StatusPolicy {
    converged: &["AUTHORIZED"],
    pending: &["UPDATING", "AUTHORIZING"],
    on_missing: OnMissing::Fail,
};

/// Deleted once describe says not found
const DELETE: StatusPolicy = StatusPolicy {
    converged: &[],
    pending: &["DELETING"],
    on_missing: OnMissing::Converge,
};

/// Connections carry nothing between invocations beyond the cursor
type State = ();

pub type ConnectionEvent = ChainEvent<ConnectionModel, ()>;

pub async fn handle<O: EventsOperations>(
    ops: &O,
    action: Action,
    request: HandlerRequest<ConnectionModel>,
    context: Option<CallbackContext<State>>,
) -> ConnectionEvent {
    if action == Action::List {
        return list(ops, &request).await;
    }
    let Some(model) = request.desired_resource_state.clone() else {
        return missing_model(KIND);
    };
    let context = context.unwrap_or_default();

    let (identifier, steps) = match (action, model.name.clone()) {
        (Action::Create, name) => {
            let generated = generate_name(request.logical_id(), &request.client_request_token);
            (name.unwrap_or_else(|| generated.clone()), create_steps(ops, generated))
        }
        (_, None) => {
            return ProgressEvent::failed(
                HandlerErrorCode::InvalidRequest,
                format!("{KIND}: Name is required"),
            );
        }
        (Action::Update, Some(name)) => (name, update_steps(ops)),
        (Action::Delete, Some(name)) => (name, delete_steps(ops)),
        (_, Some(name)) => (name, read_steps(ops)),
    };

    let event = Chain::new(KIND, identifier, steps).run(model, context).await;
    if action == Action::Delete {
        event.without_model()
    } else {
        event
    }
}

fn name_slot(model: &mut ConnectionModel) -> &mut Option<String> {
    &mut model.name
}

fn schedule() -> StabilizationPolicy {
    StabilizationPolicy::for_kind(KIND)
}

fn create_steps<O: EventsOperations>(
    ops: &O,
    generated_name: String,
) -> Vec<Step<'_, ConnectionModel, State>> {
    let mut steps = vec![
        assign_name(name_slot, generated_name),
        Step::call(
            "create-connection",
            |model: &ConnectionModel, _: &State| translate::create_connection(model),
            move |input| ops.create_connection(input),
            |output, mut model: ConnectionModel, state| {
                model.arn = output.connection_arn().map(str::to_string);
                Ok((model, state))
            },
        )
        .stabilize(schedule(), move |model: &ConnectionModel, _: &State, _| {
            connection_status(ops, model.name.clone(), CREATE)
        }),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn update_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ConnectionModel, State>> {
    let mut steps = vec![
        describe_existing(ops),
        Step::call(
            "update-connection",
            |model: &ConnectionModel, _: &State| translate::update_connection(model),
            move |input| ops.update_connection(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(schedule(), move |model: &ConnectionModel, _: &State, _| {
            connection_status(ops, model.name.clone(), UPDATE)
        }),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn delete_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ConnectionModel, State>> {
    vec![
        describe_existing(ops),
        Step::call(
            "delete-connection",
            |model: &ConnectionModel, _: &State| translate::delete_connection(model),
            move |input| ops.delete_connection(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(schedule(), move |model: &ConnectionModel, _: &State, _| {
            connection_status(ops, model.name.clone(), DELETE)
        }),
    ]
}

fn read_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ConnectionModel, State>> {
    vec![Step::call(
        "describe-connection",
        |model: &ConnectionModel, _: &State| translate::describe_connection(model),
        move |input| ops.describe_connection(input),
        |output, mut model: ConnectionModel, state| {
            translate::apply_description(&mut model, &output);
            Ok((model, state))
        },
    )]
}

fn describe_existing<O: EventsOperations>(ops: &O) -> Step<'_, ConnectionModel, State> {
    Step::call(
        "describe-connection",
        |model: &ConnectionModel, _: &State| translate::describe_connection(model),
        move |input| ops.describe_connection(input),
        |_, model, state| Ok((model, state)),
    )
}

async fn connection_status<O: EventsOperations>(
    ops: &O,
    name: Option<String>,
    policy: StatusPolicy,
) -> Result<Stabilization, StepFailure> {
    let model = ConnectionModel {
        name,
        ..ConnectionModel::default()
    };
    match ops.describe_connection(translate::describe_connection(&model)?).await {
        Ok(output) => {
            let state = output.connection_state().map(|state| state.as_str());
            Ok(match policy.evaluate(state) {
                Stabilization::Diverged(reason) => match output.state_reason() {
                    Some(detail) => Stabilization::Diverged(format!("{reason}: {detail}")),
                    None => Stabilization::Diverged(reason),
                },
                outcome => outcome,
            })
        }
        Err(error) if error.is_not_found() => Ok(policy.evaluate(None)),
        Err(error) => Err(error.into()),
    }
}

async fn list<O: EventsOperations>(
    ops: &O,
    request: &HandlerRequest<ConnectionModel>,
) -> ConnectionEvent {
    let input = match translate::list_connections(request.next_token.clone()) {
        Ok(input) => input,
        Err(error) => {
            return ProgressEvent::failed(HandlerErrorCode::InvalidRequest, format!("{KIND}: {error}"));
        }
    };
    match ops.list_connections(input).await {
        Ok(output) => {
            let models = output
                .connections()
                .iter()
                .map(|connection| ConnectionModel {
                    name: connection.name().map(str::to_string),
                    arn: connection.connection_arn().map(str::to_string),
                    authorization_type: connection
                        .authorization_type()
                        .map(|kind| kind.as_str().to_string()),
                    ..ConnectionModel::default()
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
        create_connection::CreateConnectionOutput, delete_connection::DeleteConnectionOutput,
        describe_connection::DescribeConnectionOutput, list_connections::ListConnectionsOutput,
        update_connection::UpdateConnectionOutput,
    };
    use aws_sdk_eventbridge::types::{self, ConnectionState};
    use eventbridge_cfn_test_utils::{connection_arn, handler_request, list_request, update_request};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(value: Value) -> HandlerRequest<ConnectionModel> {
        serde_json::from_value(value).unwrap()
    }

    fn basic_auth(name: Option<&str>) -> Value {
        let mut model = json!({
            "AuthorizationType": "BASIC",
            "AuthParameters": {
                "BasicAuthParameters": {"Username": "user", "Password": "hunter2"}
            }
        });
        if let Some(name) = name {
            model["Name"] = json!(name);
        }
        model
    }

    fn described(name: &str, state: ConnectionState) -> DescribeConnectionOutput {
        DescribeConnectionOutput::builder()
            .name(name)
            .connection_arn(connection_arn(name))
            .connection_state(state)
            .authorization_type(types::ConnectionAuthorizationType::Basic)
            .build()
    }

    /// Describe answers with `states` in order, repeating the last one
    fn describe_sequence(
        ops: &mut MockEventsOperations,
        states: Vec<Option<ConnectionState>>,
    ) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        ops.expect_describe_connection().returning(move |input| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            let name = input.name().unwrap_or_default();
            match &states[call.min(states.len() - 1)] {
                Some(state) => Ok(described(name, state.clone())),
                None => Err(ServiceError::not_found("Connection does not exist")),
            }
        });
        calls
    }

    #[tokio::test]
    async fn create_polls_until_authorized() {
        let mut ops = MockEventsOperations::new();
        ops.expect_create_connection()
            .times(1)
            .withf(|input| {
                input.name().is_some_and(|name| name.starts_with("MyResource-"))
                    && input.authorization_type() == Some(&types::ConnectionAuthorizationType::Basic)
            })
            .returning(|input| {
                Ok(CreateConnectionOutput::builder()
                    .connection_arn(connection_arn(input.name().unwrap()))
                    .connection_state(ConnectionState::Creating)
                    .build())
            });
        let describes = describe_sequence(
            &mut ops,
            vec![
                None,
                Some(ConnectionState::Creating),
                Some(ConnectionState::Authorizing),
                Some(ConnectionState::Authorized),
            ],
        );

        let mut request = request(handler_request(basic_auth(None)));
        let mut context = None;
        let mut suspensions = 0;
        let event = loop {
            let event = handle(&ops, Action::Create, request.clone(), context.take()).await;
            if !event.is_in_progress() {
                break event;
            }
            suspensions += 1;
            request.desired_resource_state = event.resource_model;
            context = event.callback_context;
        };

        assert!(event.is_success(), "{:?}", event.message);
        assert_eq!(suspensions, 3);
        // three pending polls, the converged one and the read
        assert_eq!(describes.load(Ordering::SeqCst), 5);
        let model = event.resource_model.unwrap();
        assert!(model.name.unwrap().starts_with("MyResource-"));
        assert_eq!(model.authorization_type.as_deref(), Some("BASIC"));
        assert_eq!(model.auth_parameters, None);
    }

    #[tokio::test]
    async fn update_fails_fast_when_deauthorized() {
        let mut ops = MockEventsOperations::new();
        describe_sequence(
            &mut ops,
            vec![
                Some(ConnectionState::Authorized),
                Some(ConnectionState::Deauthorized),
            ],
        );
        ops.expect_update_connection()
            .times(1)
            .returning(|_| Ok(UpdateConnectionOutput::builder().build()));

        let event = handle(
            &ops,
            Action::Update,
            request(update_request(basic_auth(Some("partner")), basic_auth(Some("partner")))),
            None,
        )
        .await;

        assert!(event.is_failed());
        assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
        assert!(event.message.unwrap().contains("DEAUTHORIZED"));
    }

    #[tokio::test]
    async fn update_fails_when_connection_disappears() {
        let mut ops = MockEventsOperations::new();
        describe_sequence(&mut ops, vec![Some(ConnectionState::Authorized), None]);
        ops.expect_update_connection()
            .returning(|_| Ok(UpdateConnectionOutput::builder().build()));

        let event = handle(
            &ops,
            Action::Update,
            request(update_request(basic_auth(Some("partner")), basic_auth(Some("partner")))),
            None,
        )
        .await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
    }

    #[tokio::test]
    async fn delete_waits_until_not_found() {
        let mut ops = MockEventsOperations::new();
        describe_sequence(
            &mut ops,
            vec![
                Some(ConnectionState::Authorized),
                Some(ConnectionState::Deleting),
                None,
            ],
        );
        ops.expect_delete_connection()
            .times(1)
            .returning(|_| Ok(DeleteConnectionOutput::builder().build()));

        let request = request(handler_request(json!({"Name": "partner"})));
        let first = handle(&ops, Action::Delete, request.clone(), None).await;
        assert!(first.is_in_progress());
        assert_eq!(first.callback_delay_seconds, Some(KIND.poll_delay_secs()));

        let second = handle(&ops, Action::Delete, request, first.callback_context).await;
        assert!(second.is_success(), "{:?}", second.message);
        assert!(second.resource_model.is_none());
    }

    #[tokio::test]
    async fn delete_of_absent_connection_is_not_found() {
        let mut ops = MockEventsOperations::new();
        describe_sequence(&mut ops, vec![None]);
        ops.expect_delete_connection().never();

        let event = handle(
            &ops,
            Action::Delete,
            request(handler_request(json!({"Name": "partner"}))),
            None,
        )
        .await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
    }

    #[tokio::test]
    async fn create_without_auth_is_invalid_and_skips_the_call() {
        let mut ops = MockEventsOperations::new();
        ops.expect_create_connection().never();

        let event = handle(
            &ops,
            Action::Create,
            request(handler_request(json!({"Name": "partner", "AuthorizationType": "BASIC"}))),
            None,
        )
        .await;
        assert!(event.is_failed());
        assert!(event.message.unwrap().contains("AuthParameters"));
    }

    #[tokio::test]
    async fn list_one_page() {
        let mut ops = MockEventsOperations::new();
        ops.expect_list_connections()
            .withf(|input| input.next_token() == Some("page-2"))
            .returning(|_| {
                Ok(ListConnectionsOutput::builder()
                    .connections(
                        types::Connection::builder()
                            .name("partner")
                            .connection_arn(connection_arn("partner"))
                            .authorization_type(types::ConnectionAuthorizationType::ApiKey)
                            .build(),
                    )
                    .build())
            });

        let event = handle(
            &ops,
            Action::List,
            request(list_request(json!({}), Some("page-2"))),
            None,
        )
        .await;
        let models = event.resource_models.unwrap();
        assert_eq!(models[0].authorization_type.as_deref(), Some("API_KEY"));
        assert_eq!(models[0].arn, Some(connection_arn("partner")));
    }
}
