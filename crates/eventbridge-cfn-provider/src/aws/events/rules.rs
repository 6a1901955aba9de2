//! Rule, target and tag calls

use super::EventsClient;
use crate::aws::error::ServiceError;
use aws_sdk_eventbridge::operation::{
    delete_rule::{DeleteRuleInput, DeleteRuleOutput},
    describe_rule::{DescribeRuleInput, DescribeRuleOutput},
    list_rules::{ListRulesInput, ListRulesOutput},
    list_tags_for_resource::{ListTagsForResourceInput, ListTagsForResourceOutput},
    list_targets_by_rule::{ListTargetsByRuleInput, ListTargetsByRuleOutput},
    put_rule::{PutRuleInput, PutRuleOutput},
    put_targets::{PutTargetsInput, PutTargetsOutput},
    remove_targets::{RemoveTargetsInput, RemoveTargetsOutput},
    tag_resource::{TagResourceInput, TagResourceOutput},
    untag_resource::{UntagResourceInput, UntagResourceOutput},
};
use tracing::debug;

impl EventsClient {
    pub async fn describe_rule(
        &self,
        input: DescribeRuleInput,
    ) -> Result<DescribeRuleOutput, ServiceError> {
        self.client
            .describe_rule()
            .set_name(input.name)
            .set_event_bus_name(input.event_bus_name)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ServiceError> {
        debug!(rule = ?input.name, event_bus = ?input.event_bus_name, "PutRule");
        self.client
            .put_rule()
            .set_name(input.name)
            .set_event_bus_name(input.event_bus_name)
            .set_description(input.description)
            .set_event_pattern(input.event_pattern)
            .set_schedule_expression(input.schedule_expression)
            .set_state(input.state)
            .set_role_arn(input.role_arn)
            .set_tags(input.tags)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn delete_rule(
        &self,
        input: DeleteRuleInput,
    ) -> Result<DeleteRuleOutput, ServiceError> {
        debug!(rule = ?input.name, event_bus = ?input.event_bus_name, "DeleteRule");
        self.client
            .delete_rule()
            .set_name(input.name)
            .set_event_bus_name(input.event_bus_name)
            .set_force(input.force)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_rules(&self, input: ListRulesInput) -> Result<ListRulesOutput, ServiceError> {
        self.client
            .list_rules()
            .set_name_prefix(input.name_prefix)
            .set_event_bus_name(input.event_bus_name)
            .set_next_token(input.next_token)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn put_targets(
        &self,
        input: PutTargetsInput,
    ) -> Result<PutTargetsOutput, ServiceError> {
        debug!(
            rule = ?input.rule,
            count = input.targets.as_ref().map_or(0, Vec::len),
            "PutTargets"
        );
        self.client
            .put_targets()
            .set_rule(input.rule)
            .set_event_bus_name(input.event_bus_name)
            .set_targets(input.targets)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn remove_targets(
        &self,
        input: RemoveTargetsInput,
    ) -> Result<RemoveTargetsOutput, ServiceError> {
        debug!(rule = ?input.rule, ids = ?input.ids, "RemoveTargets");
        self.client
            .remove_targets()
            .set_rule(input.rule)
            .set_event_bus_name(input.event_bus_name)
            .set_ids(input.ids)
            .set_force(input.force)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_targets_by_rule(
        &self,
        input: ListTargetsByRuleInput,
    ) -> Result<ListTargetsByRuleOutput, ServiceError> {
        self.client
            .list_targets_by_rule()
            .set_rule(input.rule)
            .set_event_bus_name(input.event_bus_name)
            .set_next_token(input.next_token)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn tag_resource(
        &self,
        input: TagResourceInput,
    ) -> Result<TagResourceOutput, ServiceError> {
        debug!(resource = ?input.resource_arn, "TagResource");
        self.client
            .tag_resource()
            .set_resource_arn(input.resource_arn)
            .set_tags(input.tags)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn untag_resource(
        &self,
        input: UntagResourceInput,
    ) -> Result<UntagResourceOutput, ServiceError> {
        debug!(resource = ?input.resource_arn, keys = ?input.tag_keys, "UntagResource");
        self.client
            .untag_resource()
            .set_resource_arn(input.resource_arn)
            .set_tag_keys(input.tag_keys)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }

    pub async fn list_tags_for_resource(
        &self,
        input: ListTagsForResourceInput,
    ) -> Result<ListTagsForResourceOutput, ServiceError> {
        self.client
            .list_tags_for_resource()
            .set_resource_arn(input.resource_arn)
            .send()
            .await
            .map_err(ServiceError::from_sdk)
    }
}
