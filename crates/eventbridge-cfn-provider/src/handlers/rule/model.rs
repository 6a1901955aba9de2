//! `AWS::Events::Rule` resource model

use crate::aws::tags::ResourceTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Composite primary identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_bus_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Either a JSON object or a JSON document in a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_pattern: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ResourceTag>,
}

impl RuleModel {
    pub fn target_ids(&self) -> Vec<String> {
        self.targets.iter().map(|target| target.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Target {
    pub id: String,

    pub arn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_transformer: Option<InputTransformer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputTransformer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_paths_map: Option<BTreeMap<String, String>>,

    pub input_template: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetryPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_event_age_in_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeadLetterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

/// Carried between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCallbackState {
    /// Target ids on the rule before this update or delete touched it
    #[serde(default)]
    pub existing_target_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cloudformation_property_names() {
        let model: RuleModel = serde_json::from_value(json!({
            "Name": "on-order",
            "EventBusName": "orders",
            "EventPattern": {"source": ["shop"]},
            "State": "ENABLED",
            "Targets": [{
                "Id": "queue",
                "Arn": "arn:aws:sqs:us-east-1:123456789012:q",
                "InputTransformer": {
                    "InputPathsMap": {"id": "$.detail.id"},
                    "InputTemplate": "{\"id\": <id>}"
                },
                "RetryPolicy": {"MaximumRetryAttempts": 3}
            }],
            "Tags": [{"Key": "team", "Value": "shop"}]
        }))
        .unwrap();

        assert_eq!(model.name.as_deref(), Some("on-order"));
        assert_eq!(model.target_ids(), vec!["queue"]);
        let target = &model.targets[0];
        assert_eq!(
            target.retry_policy.as_ref().unwrap().maximum_retry_attempts,
            Some(3)
        );
        assert_eq!(model.tags, vec![ResourceTag::new("team", "shop")]);

        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("Arn").is_none());
        assert_eq!(value["Targets"][0]["InputTransformer"]["InputPathsMap"]["id"], "$.detail.id");
    }
}
