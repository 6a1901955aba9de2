//! `AWS::Events::ApiDestination` resource model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiDestinationModel {
    /// Primary identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_rate_limit_per_second: Option<i32>,
}
