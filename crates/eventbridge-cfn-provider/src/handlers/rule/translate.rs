//! Rule model to EventBridge request mapping

use super::model::{DeadLetterConfig, InputTransformer, RetryPolicy, RuleModel, Target};
use crate::aws::error::TranslateError;
use crate::aws::tags;
use crate::handlers::{json_document, parse_document};
use crate::identifier::RuleIdentifier;
use aws_sdk_eventbridge::operation::{
    delete_rule::DeleteRuleInput,
    describe_rule::{DescribeRuleInput, DescribeRuleOutput},
    list_rules::ListRulesInput,
    list_targets_by_rule::ListTargetsByRuleInput,
    put_rule::PutRuleInput,
    put_targets::PutTargetsInput,
    remove_targets::RemoveTargetsInput,
};
use aws_sdk_eventbridge::types;
use std::collections::BTreeMap;

pub fn describe_rule(id: &RuleIdentifier) -> Result<DescribeRuleInput, TranslateError> {
    Ok(DescribeRuleInput::builder()
        .name(&id.name)
        .event_bus_name(&id.event_bus)
        .build()?)
}

pub fn delete_rule(id: &RuleIdentifier) -> Result<DeleteRuleInput, TranslateError> {
    Ok(DeleteRuleInput::builder()
        .name(&id.name)
        .event_bus_name(&id.event_bus)
        .build()?)
}

/// Tags are only sent on create; PutRule ignores them for existing rules
pub fn put_rule(
    model: &RuleModel,
    id: &RuleIdentifier,
    create_tags: Option<&BTreeMap<String, String>>,
) -> Result<PutRuleInput, TranslateError> {
    let pattern = model
        .event_pattern
        .as_ref()
        .map(|pattern| json_document("EventPattern", pattern))
        .transpose()?;
    let tags = create_tags
        .filter(|tags| !tags.is_empty())
        .map(tags::to_sdk)
        .transpose()?;

    Ok(PutRuleInput::builder()
        .name(&id.name)
        .event_bus_name(&id.event_bus)
        .set_description(model.description.clone())
        .set_event_pattern(pattern)
        .set_schedule_expression(model.schedule_expression.clone())
        .set_state(model.state.as_deref().map(types::RuleState::from))
        .set_role_arn(model.role_arn.clone())
        .set_tags(tags)
        .build()?)
}

fn target(target: &Target) -> Result<types::Target, TranslateError> {
    let transformer = target
        .input_transformer
        .as_ref()
        .map(|transformer| {
            types::InputTransformer::builder()
                .set_input_paths_map(
                    transformer
                        .input_paths_map
                        .as_ref()
                        .map(|paths| paths.clone().into_iter().collect()),
                )
                .input_template(&transformer.input_template)
                .build()
        })
        .transpose()?;
    let retry_policy = target.retry_policy.as_ref().map(|policy| {
        types::RetryPolicy::builder()
            .set_maximum_retry_attempts(policy.maximum_retry_attempts)
            .set_maximum_event_age_in_seconds(policy.maximum_event_age_in_seconds)
            .build()
    });
    let dead_letter_config = target.dead_letter_config.as_ref().map(|config| {
        types::DeadLetterConfig::builder()
            .set_arn(config.arn.clone())
            .build()
    });

    Ok(types::Target::builder()
        .id(&target.id)
        .arn(&target.arn)
        .set_role_arn(target.role_arn.clone())
        .set_input(target.input.clone())
        .set_input_path(target.input_path.clone())
        .set_input_transformer(transformer)
        .set_retry_policy(retry_policy)
        .set_dead_letter_config(dead_letter_config)
        .build()?)
}

pub fn put_targets(
    id: &RuleIdentifier,
    batch: &[Target],
) -> Result<PutTargetsInput, TranslateError> {
    let targets = batch.iter().map(target).collect::<Result<Vec<_>, _>>()?;
    Ok(PutTargetsInput::builder()
        .rule(&id.name)
        .event_bus_name(&id.event_bus)
        .set_targets(Some(targets))
        .build()?)
}

pub fn remove_targets(
    id: &RuleIdentifier,
    ids: &[String],
) -> Result<RemoveTargetsInput, TranslateError> {
    Ok(RemoveTargetsInput::builder()
        .rule(&id.name)
        .event_bus_name(&id.event_bus)
        .set_ids(Some(ids.to_vec()))
        .build()?)
}

pub fn list_targets(
    id: &RuleIdentifier,
    next_token: Option<String>,
) -> Result<ListTargetsByRuleInput, TranslateError> {
    Ok(ListTargetsByRuleInput::builder()
        .rule(&id.name)
        .event_bus_name(&id.event_bus)
        .set_next_token(next_token)
        .build()?)
}

pub fn list_rules(
    event_bus: &str,
    next_token: Option<String>,
) -> Result<ListRulesInput, TranslateError> {
    Ok(ListRulesInput::builder()
        .event_bus_name(event_bus)
        .set_next_token(next_token)
        .build()?)
}

/// Overwrite the described fields of `model`
pub fn apply_description(model: &mut RuleModel, output: &DescribeRuleOutput) {
    model.arn = output.arn().map(str::to_string);
    model.name = output.name().map(str::to_string);
    model.event_bus_name = output.event_bus_name().map(str::to_string);
    model.description = output.description().map(str::to_string);
    model.event_pattern = output.event_pattern().map(parse_document);
    model.schedule_expression = output.schedule_expression().map(str::to_string);
    model.state = output.state().map(|state| state.as_str().to_string());
    model.role_arn = output.role_arn().map(str::to_string);
}

pub fn from_sdk_target(target: &types::Target) -> Target {
    Target {
        id: target.id().to_string(),
        arn: target.arn().to_string(),
        role_arn: target.role_arn().map(str::to_string),
        input: target.input().map(str::to_string),
        input_path: target.input_path().map(str::to_string),
        input_transformer: target.input_transformer().map(|transformer| InputTransformer {
            input_paths_map: transformer
                .input_paths_map()
                .map(|paths| paths.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            input_template: transformer.input_template().to_string(),
        }),
        retry_policy: target.retry_policy().map(|policy| RetryPolicy {
            maximum_retry_attempts: policy.maximum_retry_attempts(),
            maximum_event_age_in_seconds: policy.maximum_event_age_in_seconds(),
        }),
        dead_letter_config: target.dead_letter_config().map(|config| DeadLetterConfig {
            arn: config.arn().map(str::to_string),
        }),
    }
}
