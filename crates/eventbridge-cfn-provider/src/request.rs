//! Handler request envelope

use crate::aws::AccountId;
use crate::aws::tags::{self, ResourceTag};
use crate::identifier::IdentifierResolver;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_partition() -> String {
    "aws".to_string()
}

/// One invocation's input, as sent by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest<M> {
    pub aws_account_id: AccountId,

    #[serde(default = "default_partition")]
    pub aws_partition: String,

    pub region: String,

    #[serde(default)]
    pub logical_resource_identifier: Option<String>,

    #[serde(default)]
    pub client_request_token: String,

    #[serde(default = "Option::default")]
    pub desired_resource_state: Option<M>,

    #[serde(default = "Option::default")]
    pub previous_resource_state: Option<M>,

    #[serde(default)]
    pub desired_resource_tags: BTreeMap<String, String>,

    #[serde(default)]
    pub previous_resource_tags: BTreeMap<String, String>,

    #[serde(default)]
    pub system_tags: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<M> HandlerRequest<M> {
    pub fn resolver(&self) -> IdentifierResolver<'_> {
        IdentifierResolver::new(self.aws_account_id.as_str(), &self.aws_partition, &self.region)
    }

    pub fn logical_id(&self) -> &str {
        self.logical_resource_identifier
            .as_deref()
            .unwrap_or("Resource")
    }

    /// Tags to send when the resource is created, system tags included
    pub fn create_tags(&self, model_tags: &[ResourceTag]) -> BTreeMap<String, String> {
        let mut merged = self.system_tags.clone();
        merged.extend(tags::merge(model_tags, &self.desired_resource_tags));
        merged
    }

    pub fn desired_tags(&self, model_tags: &[ResourceTag]) -> BTreeMap<String, String> {
        tags::merge(model_tags, &self.desired_resource_tags)
    }

    pub fn previous_tags(&self, model_tags: &[ResourceTag]) -> BTreeMap<String, String> {
        tags::merge(model_tags, &self.previous_resource_tags)
    }
}
