//! `AWS::Events::Connection` resource model
//!
//! `AuthParameters` is write-only: secrets are stored in Secrets Manager by
//! the service and never read back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionModel {
    /// Primary identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `BASIC`, `API_KEY` or `OAUTH_CLIENT_CREDENTIALS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_parameters: Option<AuthParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_auth_parameters: Option<ApiKeyAuthParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_parameters: Option<BasicAuthParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o_auth_parameters: Option<OAuthParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_http_parameters: Option<HttpParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiKeyAuthParameters {
    pub api_key_name: String,
    pub api_key_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicAuthParameters {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OAuthParameters {
    pub client_parameters: ClientParameters,

    pub authorization_endpoint: String,

    /// `GET`, `POST` or `PUT`
    pub http_method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o_auth_http_parameters: Option<HttpParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientParameters {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub client_secret: String,
}

/// Extra headers, query string and body parameters sent with every request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_string_parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub key: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_value_secret: Option<bool>,
}
