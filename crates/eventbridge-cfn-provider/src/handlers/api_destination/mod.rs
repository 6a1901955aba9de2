//! `AWS::Events::ApiDestination` handlers
//!
//! API destinations report `ACTIVE` or `INACTIVE`, and neither says whether a
//! create or update has landed. Those wait out one propagation delay; delete
//! polls until the destination is gone.

pub mod model;
pub mod translate;

pub use model::ApiDestinationModel;

use crate::aws::events::EventsOperations;
use crate::engine::{
    CallbackContext, Chain, ChainEvent, OnMissing, Stabilization, StabilizationPolicy, Step,
    StepFailure, propagation_delay,
};
use crate::handlers::{assign_name, list_failed, missing_model};
use crate::identifier::generate_name;
use crate::request::HandlerRequest;
use eventbridge_cfn_common::{Action, HandlerErrorCode, ProgressEvent, ResourceKind};
use futures::future;

const KIND: ResourceKind = ResourceKind::ApiDestination;

type State = ();

pub type ApiDestinationEvent = ChainEvent<ApiDestinationModel, ()>;

pub async fn handle<O: EventsOperations>(
    ops: &O,
    action: Action,
    request: HandlerRequest<ApiDestinationModel>,
    context: Option<CallbackContext<State>>,
) -> ApiDestinationEvent {
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

fn name_slot(model: &mut ApiDestinationModel) -> &mut Option<String> {
    &mut model.name
}

fn schedule() -> StabilizationPolicy {
    StabilizationPolicy::for_kind(KIND)
}

fn wait_for_propagation(
    _: &ApiDestinationModel,
    _: &State,
    polls: u32,
) -> future::Ready<Result<Stabilization, StepFailure>> {
    future::ready(Ok(propagation_delay(polls)))
}

fn create_steps<O: EventsOperations>(
    ops: &O,
    generated_name: String,
) -> Vec<Step<'_, ApiDestinationModel, State>> {
    let mut steps = vec![
        assign_name(name_slot, generated_name),
        Step::call(
            "create-api-destination",
            |model: &ApiDestinationModel, _: &State| translate::create_api_destination(model),
            move |input| ops.create_api_destination(input),
            |output, mut model: ApiDestinationModel, state| {
                model.arn = output.api_destination_arn().map(str::to_string);
                Ok((model, state))
            },
        )
        .stabilize(schedule(), wait_for_propagation),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn update_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ApiDestinationModel, State>> {
    let mut steps = vec![
        describe_existing(ops),
        Step::call(
            "update-api-destination",
            |model: &ApiDestinationModel, _: &State| translate::update_api_destination(model),
            move |input| ops.update_api_destination(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(schedule(), wait_for_propagation),
    ];
    steps.extend(read_steps(ops));
    steps
}

fn delete_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ApiDestinationModel, State>> {
    vec![
        describe_existing(ops),
        Step::call(
            "delete-api-destination",
            |model: &ApiDestinationModel, _: &State| translate::delete_api_destination(model),
            move |input| ops.delete_api_destination(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(schedule(), move |model: &ApiDestinationModel, _: &State, _| {
            destination_gone(ops, model.clone())
        }),
    ]
}

fn read_steps<O: EventsOperations>(ops: &O) -> Vec<Step<'_, ApiDestinationModel, State>> {
    vec![Step::call(
        "describe-api-destination",
        |model: &ApiDestinationModel, _: &State| translate::describe_api_destination(model),
        move |input| ops.describe_api_destination(input),
        |output, mut model: ApiDestinationModel, state| {
            translate::apply_description(&mut model, &output);
            Ok((model, state))
        },
    )]
}

fn describe_existing<O: EventsOperations>(ops: &O) -> Step<'_, ApiDestinationModel, State> {
    Step::call(
        "describe-api-destination",
        |model: &ApiDestinationModel, _: &State| translate::describe_api_destination(model),
        move |input| ops.describe_api_destination(input),
        |_, model, state| Ok((model, state)),
    )
}

async fn destination_gone<O: EventsOperations>(
    ops: &O,
    model: ApiDestinationModel,
) -> Result<Stabilization, StepFailure> {
    let input = translate::describe_api_destination(&model)?;
    match ops.describe_api_destination(input).await {
        Ok(_) => Ok(Stabilization::Pending),
        Err(error) if error.is_not_found() => Ok(OnMissing::Converge.outcome()),
        Err(error) => Err(error.into()),
    }
}

async fn list<O: EventsOperations>(
    ops: &O,
    request: &HandlerRequest<ApiDestinationModel>,
) -> ApiDestinationEvent {
    let input = match translate::list_api_destinations(request.next_token.clone()) {
        Ok(input) => input,
        Err(error) => {
            return ProgressEvent::failed(HandlerErrorCode::InvalidRequest, format!("{KIND}: {error}"));
        }
    };
    match ops.list_api_destinations(input).await {
        Ok(output) => {
            let models = output
                .api_destinations()
                .iter()
                .map(|destination| ApiDestinationModel {
                    name: destination.name().map(str::to_string),
                    arn: destination.api_destination_arn().map(str::to_string),
                    connection_arn: destination.connection_arn().map(str::to_string),
                    invocation_endpoint: destination.invocation_endpoint().map(str::to_string),
                    http_method: destination.http_method().map(|m| m.as_str().to_string()),
                    ..ApiDestinationModel::default()
                })
                .collect();
            ProgressEvent::listed(models, output.next_token().map(str::to_string))
        }
        Err(error) => list_failed(KIND, error),
    }
}
