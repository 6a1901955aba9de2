//! `AWS::Events::Rule` handlers
//!
//! Rules are addressed by name and event bus; see [`crate::identifier`].
//! Targets are sub-resources, written and removed in batches of
//! [`TARGET_BATCH_SIZE`] and confirmed by listing them back.

pub mod model;
pub mod translate;

pub use model::{RuleCallbackState, RuleModel, Target};

use crate::aws::events::EventsOperations;
use crate::aws::tags::{ResourceTag, TagDiff};
use crate::engine::{
    CallbackContext, Chain, ChainEvent, Membership, OnMissing, Stabilization,
    StabilizationPolicy, Step, StepFailure, list_convergence,
};
use crate::handlers::{
    assign_name, list_failed, list_tags, missing_model, tag_diff, tag_resource, untag_resource,
};
use crate::identifier::{DEFAULT_EVENT_BUS, IdentifierResolver, RuleIdentifier, generate_name};
use crate::request::HandlerRequest;
use aws_sdk_eventbridge::operation::put_rule::PutRuleOutput;
use aws_sdk_eventbridge::types;
use eventbridge_cfn_common::defaults::TARGET_BATCH_SIZE;
use eventbridge_cfn_common::{Action, HandlerErrorCode, ProgressEvent, ResourceKind};
use std::collections::BTreeSet;

const KIND: ResourceKind = ResourceKind::Rule;

type State = RuleCallbackState;

pub type RuleEvent = ChainEvent<RuleModel, RuleCallbackState>;

pub async fn handle<O: EventsOperations>(
    ops: &O,
    action: Action,
    request: HandlerRequest<RuleModel>,
    context: Option<CallbackContext<State>>,
) -> RuleEvent {
    if action == Action::List {
        return list(ops, &request).await;
    }
    let Some(model) = request.desired_resource_state.clone() else {
        return missing_model(KIND);
    };
    let context = context.unwrap_or_default();
    let resolver = request.resolver();

    if action == Action::Create {
        let generated = generate_name(request.logical_id(), &request.client_request_token);
        let name = model.name.clone().unwrap_or_else(|| generated.clone());
        let id = resolver.resolve(Some(&name), model.event_bus_name.as_deref(), None);
        let steps = create_steps(ops, &request, generated);
        return Chain::new(KIND, resolver.canonical_id(&id), steps)
            .run(model, context)
            .await;
    }

    let id = rule_id(resolver, &model);
    if id.name.is_empty() {
        return missing_identifier();
    }
    let identifier = resolver.canonical_id(&id);
    let diff = tag_diff(&request, tags_of);
    match action {
        Action::Update => {
            let chain = Chain::new(KIND, identifier, update_steps(ops, resolver, &diff));
            chain.run(model, context).await
        }
        Action::Delete => {
            let chain = Chain::new(KIND, identifier, delete_steps(ops, resolver));
            chain.run(model, context).await.without_model()
        }
        _ => {
            let chain = Chain::new(KIND, identifier, read_steps(ops, resolver));
            chain.run(model, context).await
        }
    }
}

fn missing_identifier() -> RuleEvent {
    ProgressEvent::failed(
        HandlerErrorCode::InvalidRequest,
        format!("{KIND}: Name or Id is required"),
    )
}

/// Name and bus from the model, falling back to its `Id` or `Arn`
fn rule_id(resolver: IdentifierResolver<'_>, model: &RuleModel) -> RuleIdentifier {
    resolver.resolve(
        model.name.as_deref(),
        model.event_bus_name.as_deref(),
        model.id.as_deref().or(model.arn.as_deref()),
    )
}

fn name_slot(model: &mut RuleModel) -> &mut Option<String> {
    &mut model.name
}

fn arn_of(model: &RuleModel) -> Option<&str> {
    model.arn.as_deref()
}

fn tags_of(model: &RuleModel) -> &[ResourceTag] {
    &model.tags
}

fn set_tags(model: &mut RuleModel, tags: Vec<ResourceTag>) {
    model.tags = tags;
}

fn create_steps<'a, O: EventsOperations>(
    ops: &'a O,
    request: &'a HandlerRequest<RuleModel>,
    generated_name: String,
) -> Vec<Step<'a, RuleModel, State>> {
    let resolver = request.resolver();
    let mut steps = vec![
        assign_name(name_slot, generated_name),
        check_absent(ops, resolver),
        put_rule(ops, resolver, Some(request)).stabilize(
            StabilizationPolicy::for_kind(KIND),
            move |model: &RuleModel, _: &State, _| rule_visible(ops, rule_id(resolver, model)),
        ),
        put_targets(ops, resolver, OnMissing::Wait),
    ];
    steps.extend(read_steps(ops, resolver));
    steps
}

fn update_steps<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
    diff: &'a TagDiff,
) -> Vec<Step<'a, RuleModel, State>> {
    let mut steps = vec![
        describe_existing(ops, resolver),
        snapshot_targets(ops, resolver),
        put_rule(ops, resolver, None),
        put_targets(ops, resolver, OnMissing::Fail),
        remove_targets(ops, resolver, stale_targets, OnMissing::Fail),
        tag_resource(ops, diff, arn_of),
        untag_resource(ops, diff, arn_of),
    ];
    steps.extend(read_steps(ops, resolver));
    steps
}

fn delete_steps<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
) -> Vec<Step<'a, RuleModel, State>> {
    vec![
        describe_existing(ops, resolver),
        snapshot_targets(ops, resolver),
        remove_targets(ops, resolver, existing_targets, OnMissing::Converge),
        Step::call(
            "delete-rule",
            move |model: &RuleModel, _: &State| translate::delete_rule(&rule_id(resolver, model)),
            move |input| ops.delete_rule(input),
            |_, model, state| Ok((model, state)),
        )
        .stabilize(
            StabilizationPolicy::for_kind(KIND),
            move |model: &RuleModel, _: &State, _| rule_gone(ops, rule_id(resolver, model)),
        ),
    ]
}

fn read_steps<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
) -> Vec<Step<'a, RuleModel, State>> {
    vec![
        Step::call(
            "describe-rule",
            move |model: &RuleModel, _: &State| translate::describe_rule(&rule_id(resolver, model)),
            move |input| ops.describe_rule(input),
            move |output, mut model: RuleModel, state| {
                let id = rule_id(resolver, &model);
                translate::apply_description(&mut model, &output);
                // keeps a cross-account bus addressed by ARN
                model.event_bus_name = Some(id.event_bus.clone());
                model.id = Some(resolver.canonical_id(&id));
                Ok((model, state))
            },
        ),
        Step::new("list-targets", move |mut model: RuleModel, state: State| async move {
            let id = rule_id(resolver, &model);
            let targets = list_all_targets(ops, &id).await?;
            model.targets = targets.iter().map(translate::from_sdk_target).collect();
            Ok((model, state))
        }),
        list_tags(ops, arn_of, set_tags),
    ]
}

/// Create must not adopt a rule someone else owns. Not-found is the
/// expected answer here.
fn check_absent<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
) -> Step<'a, RuleModel, State> {
    Step::new("check-absent", move |model: RuleModel, state: State| async move {
        let id = rule_id(resolver, &model);
        match ops.describe_rule(translate::describe_rule(&id)?).await {
            Ok(_) => Err(StepFailure::terminal(
                HandlerErrorCode::AlreadyExists,
                format!("{} already exists", resolver.canonical_id(&id)),
            )),
            Err(error) if error.is_not_found() => Ok((model, state)),
            Err(error) => Err(error.into()),
        }
    })
}

/// Update and delete need the rule to exist; not-found is terminal
fn describe_existing<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
) -> Step<'a, RuleModel, State> {
    Step::call(
        "describe-rule",
        move |model: &RuleModel, _: &State| translate::describe_rule(&rule_id(resolver, model)),
        move |input| ops.describe_rule(input),
        |_, model, state| Ok((model, state)),
    )
}

/// `create` carries the request whose tags go out with a new rule
fn put_rule<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
    create: Option<&'a HandlerRequest<RuleModel>>,
) -> Step<'a, RuleModel, State> {
    Step::call(
        "put-rule",
        move |model: &RuleModel, _: &State| {
            let tags = create.map(|request| request.create_tags(&model.tags));
            translate::put_rule(model, &rule_id(resolver, model), tags.as_ref())
        },
        move |input| ops.put_rule(input),
        move |output: PutRuleOutput, mut model: RuleModel, state| {
            let id = rule_id(resolver, &model);
            let arn = output
                .rule_arn()
                .map(str::to_string)
                .unwrap_or_else(|| resolver.rule_arn(&id));
            model.arn = Some(arn);
            model.id = Some(resolver.canonical_id(&id));
            Ok((model, state))
        },
    )
}

fn put_targets<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
    on_missing: OnMissing,
) -> Step<'a, RuleModel, State> {
    Step::new("put-targets", move |model: RuleModel, state: State| async move {
        let id = rule_id(resolver, &model);
        for batch in model.targets.chunks(TARGET_BATCH_SIZE) {
            let output = ops.put_targets(translate::put_targets(&id, batch)?).await?;
            if output.failed_entry_count() > 0 {
                let entries = output.failed_entries().iter().map(|entry| {
                    (entry.target_id(), entry.error_code(), entry.error_message())
                });
                return Err(failed_entries("PutTargets", entries));
            }
        }
        Ok((model, state))
    })
    .when(|model: &RuleModel, _: &State| !model.targets.is_empty())
    .stabilize(
        StabilizationPolicy::for_kind(KIND),
        move |model: &RuleModel, _: &State, _| {
            targets_settled(
                ops,
                rule_id(resolver, model),
                model.target_ids(),
                Membership::Present,
                on_missing,
            )
        },
    )
}

/// Existing ids the desired model no longer has
fn stale_targets(model: &RuleModel, state: &State) -> Vec<String> {
    let desired: BTreeSet<&str> = model.targets.iter().map(|t| t.id.as_str()).collect();
    state
        .existing_target_ids
        .iter()
        .filter(|id| !desired.contains(id.as_str()))
        .cloned()
        .collect()
}

fn existing_targets(_: &RuleModel, state: &State) -> Vec<String> {
    state.existing_target_ids.clone()
}

fn remove_targets<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
    select: fn(&RuleModel, &State) -> Vec<String>,
    on_missing: OnMissing,
) -> Step<'a, RuleModel, State> {
    Step::new("remove-targets", move |model: RuleModel, state: State| async move {
        let id = rule_id(resolver, &model);
        let ids = select(&model, &state);
        for batch in ids.chunks(TARGET_BATCH_SIZE) {
            let output = ops.remove_targets(translate::remove_targets(&id, batch)?).await?;
            if output.failed_entry_count() > 0 {
                let entries = output.failed_entries().iter().map(|entry| {
                    (entry.target_id(), entry.error_code(), entry.error_message())
                });
                return Err(failed_entries("RemoveTargets", entries));
            }
        }
        Ok((model, state))
    })
    .when(move |model: &RuleModel, state: &State| !select(model, state).is_empty())
    .stabilize(
        StabilizationPolicy::for_kind(KIND),
        move |model: &RuleModel, state: &State, _| {
            targets_settled(
                ops,
                rule_id(resolver, model),
                select(model, state),
                Membership::Absent,
                on_missing,
            )
        },
    )
}

/// Records the targets on the rule before anything changes them
fn snapshot_targets<'a, O: EventsOperations>(
    ops: &'a O,
    resolver: IdentifierResolver<'a>,
) -> Step<'a, RuleModel, State> {
    Step::new("list-targets", move |model: RuleModel, mut state: State| async move {
        let id = rule_id(resolver, &model);
        let targets = list_all_targets(ops, &id).await?;
        state.existing_target_ids = targets.iter().map(|t| t.id().to_string()).collect();
        Ok((model, state))
    })
}

fn failed_entries<'e>(
    call: &str,
    entries: impl Iterator<Item = (Option<&'e str>, Option<&'e str>, Option<&'e str>)>,
) -> StepFailure {
    let details = entries
        .map(|(id, code, message)| {
            format!(
                "{} ({}: {})",
                id.unwrap_or("?"),
                code.unwrap_or("unknown"),
                message.unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    StepFailure::terminal(
        HandlerErrorCode::GeneralServiceException,
        format!("{call} failed for targets {details}"),
    )
}

async fn list_all_targets<O: EventsOperations>(
    ops: &O,
    id: &RuleIdentifier,
) -> Result<Vec<types::Target>, StepFailure> {
    let mut targets = Vec::new();
    let mut next_token = None;
    loop {
        let output = ops
            .list_targets_by_rule(translate::list_targets(id, next_token)?)
            .await?;
        targets.extend_from_slice(output.targets());
        next_token = output.next_token().map(str::to_string);
        if next_token.is_none() {
            return Ok(targets);
        }
    }
}

async fn targets_settled<O: EventsOperations>(
    ops: &O,
    id: RuleIdentifier,
    expected: Vec<String>,
    membership: Membership,
    on_missing: OnMissing,
) -> Result<Stabilization, StepFailure> {
    let observed = match list_all_targets(ops, &id).await {
        Ok(targets) => Some(
            targets
                .iter()
                .map(|t| t.id().to_string())
                .collect::<BTreeSet<_>>(),
        ),
        Err(StepFailure::Service(error)) if error.is_not_found() => None,
        Err(failure) => return Err(failure),
    };
    Ok(list_convergence(&expected, observed.as_ref(), membership, on_missing))
}

/// Converged once describe reports the rule under its own name
async fn rule_visible<O: EventsOperations>(
    ops: &O,
    id: RuleIdentifier,
) -> Result<Stabilization, StepFailure> {
    match ops.describe_rule(translate::describe_rule(&id)?).await {
        Ok(output) if output.name() == Some(id.name.as_str()) => Ok(Stabilization::Converged),
        Ok(_) => Ok(Stabilization::Pending),
        Err(error) if error.is_not_found() => Ok(OnMissing::Wait.outcome()),
        Err(error) => Err(error.into()),
    }
}

async fn rule_gone<O: EventsOperations>(
    ops: &O,
    id: RuleIdentifier,
) -> Result<Stabilization, StepFailure> {
    match ops.describe_rule(translate::describe_rule(&id)?).await {
        Ok(_) => Ok(Stabilization::Pending),
        Err(error) if error.is_not_found() => Ok(OnMissing::Converge.outcome()),
        Err(error) => Err(error.into()),
    }
}

async fn list<O: EventsOperations>(ops: &O, request: &HandlerRequest<RuleModel>) -> RuleEvent {
    let resolver = request.resolver();
    let event_bus = request
        .desired_resource_state
        .as_ref()
        .and_then(|model| model.event_bus_name.as_deref())
        .unwrap_or(DEFAULT_EVENT_BUS);
    let input = match translate::list_rules(event_bus, request.next_token.clone()) {
        Ok(input) => input,
        Err(error) => {
            return ProgressEvent::failed(HandlerErrorCode::InvalidRequest, format!("{KIND}: {error}"));
        }
    };

    match ops.list_rules(input).await {
        Ok(output) => {
            let models = output
                .rules()
                .iter()
                .map(|rule| {
                    // ListRules reports a cross-account bus by its short name; the ARN doesn't
                    let id = match rule.arn() {
                        Some(arn) => resolver.resolve(rule.name(), None, Some(arn)),
                        None => resolver.resolve(rule.name(), Some(event_bus), None),
                    };
                    RuleModel {
                        arn: rule.arn().map(str::to_string),
                        id: Some(resolver.canonical_id(&id)),
                        event_bus_name: Some(id.event_bus.clone()),
                        name: Some(id.name),
                        ..RuleModel::default()
                    }
                })
                .collect();
            ProgressEvent::listed(models, output.next_token().map(str::to_string))
        }
        Err(error) => list_failed(KIND, error),
    }
}
