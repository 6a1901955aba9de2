//! Connection model to EventBridge request mapping

use super::model::{AuthParameters, ConnectionModel, HttpParameters, OAuthParameters};
use crate::aws::error::TranslateError;
use aws_sdk_eventbridge::operation::{
    create_connection::CreateConnectionInput,
    delete_connection::DeleteConnectionInput,
    describe_connection::{DescribeConnectionInput, DescribeConnectionOutput},
    list_connections::ListConnectionsInput,
    update_connection::UpdateConnectionInput,
};
use aws_sdk_eventbridge::types;

fn name(model: &ConnectionModel) -> Result<&str, TranslateError> {
    model.name.as_deref().ok_or(TranslateError::MissingField("Name"))
}

fn present<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn http_parameters(parameters: &HttpParameters) -> types::ConnectionHttpParameters {
    let headers = parameters
        .header_parameters
        .iter()
        .map(|p| {
            types::ConnectionHeaderParameter::builder()
                .key(&p.key)
                .value(&p.value)
                .set_is_value_secret(p.is_value_secret)
                .build()
        })
        .collect();
    let query = parameters
        .query_string_parameters
        .iter()
        .map(|p| {
            types::ConnectionQueryStringParameter::builder()
                .key(&p.key)
                .value(&p.value)
                .set_is_value_secret(p.is_value_secret)
                .build()
        })
        .collect();
    let body = parameters
        .body_parameters
        .iter()
        .map(|p| {
            types::ConnectionBodyParameter::builder()
                .key(&p.key)
                .value(&p.value)
                .set_is_value_secret(p.is_value_secret)
                .build()
        })
        .collect();

    types::ConnectionHttpParameters::builder()
        .set_header_parameters(present(headers))
        .set_query_string_parameters(present(query))
        .set_body_parameters(present(body))
        .build()
}

fn create_oauth(
    oauth: &OAuthParameters,
) -> Result<types::CreateConnectionOAuthRequestParameters, TranslateError> {
    let client = types::CreateConnectionOAuthClientRequestParameters::builder()
        .client_id(&oauth.client_parameters.client_id)
        .client_secret(&oauth.client_parameters.client_secret)
        .build()?;
    Ok(types::CreateConnectionOAuthRequestParameters::builder()
        .client_parameters(client)
        .authorization_endpoint(&oauth.authorization_endpoint)
        .http_method(types::ConnectionOAuthHttpMethod::from(oauth.http_method.as_str()))
        .set_o_auth_http_parameters(oauth.o_auth_http_parameters.as_ref().map(http_parameters))
        .build()?)
}

fn create_auth(
    auth: &AuthParameters,
) -> Result<types::CreateConnectionAuthRequestParameters, TranslateError> {
    let basic = auth
        .basic_auth_parameters
        .as_ref()
        .map(|basic| {
            types::CreateConnectionBasicAuthRequestParameters::builder()
                .username(&basic.username)
                .password(&basic.password)
                .build()
        })
        .transpose()?;
    let api_key = auth
        .api_key_auth_parameters
        .as_ref()
        .map(|key| {
            types::CreateConnectionApiKeyAuthRequestParameters::builder()
                .api_key_name(&key.api_key_name)
                .api_key_value(&key.api_key_value)
                .build()
        })
        .transpose()?;
    let oauth = auth.o_auth_parameters.as_ref().map(create_oauth).transpose()?;

    Ok(types::CreateConnectionAuthRequestParameters::builder()
        .set_basic_auth_parameters(basic)
        .set_api_key_auth_parameters(api_key)
        .set_o_auth_parameters(oauth)
        .set_invocation_http_parameters(auth.invocation_http_parameters.as_ref().map(http_parameters))
        .build())
}

/// Update parameters are all optional; anything left out is unchanged
fn update_auth(auth: &AuthParameters) -> types::UpdateConnectionAuthRequestParameters {
    let basic = auth.basic_auth_parameters.as_ref().map(|basic| {
        types::UpdateConnectionBasicAuthRequestParameters::builder()
            .username(&basic.username)
            .password(&basic.password)
            .build()
    });
    let api_key = auth.api_key_auth_parameters.as_ref().map(|key| {
        types::UpdateConnectionApiKeyAuthRequestParameters::builder()
            .api_key_name(&key.api_key_name)
            .api_key_value(&key.api_key_value)
            .build()
    });
    let oauth = auth.o_auth_parameters.as_ref().map(|oauth| {
        let client = types::UpdateConnectionOAuthClientRequestParameters::builder()
            .client_id(&oauth.client_parameters.client_id)
            .client_secret(&oauth.client_parameters.client_secret)
            .build();
        types::UpdateConnectionOAuthRequestParameters::builder()
            .client_parameters(client)
            .authorization_endpoint(&oauth.authorization_endpoint)
            .http_method(types::ConnectionOAuthHttpMethod::from(oauth.http_method.as_str()))
            .set_o_auth_http_parameters(oauth.o_auth_http_parameters.as_ref().map(http_parameters))
            .build()
    });

    types::UpdateConnectionAuthRequestParameters::builder()
        .set_basic_auth_parameters(basic)
        .set_api_key_auth_parameters(api_key)
        .set_o_auth_parameters(oauth)
        .set_invocation_http_parameters(auth.invocation_http_parameters.as_ref().map(http_parameters))
        .build()
}

fn authorization_type(model: &ConnectionModel) -> Option<types::ConnectionAuthorizationType> {
    model
        .authorization_type
        .as_deref()
        .map(types::ConnectionAuthorizationType::from)
}

pub fn create_connection(model: &ConnectionModel) -> Result<CreateConnectionInput, TranslateError> {
    let auth = model
        .auth_parameters
        .as_ref()
        .ok_or(TranslateError::MissingField("AuthParameters"))?;
    let authorization_type =
        authorization_type(model).ok_or(TranslateError::MissingField("AuthorizationType"))?;

    Ok(CreateConnectionInput::builder()
        .name(name(model)?)
        .set_description(model.description.clone())
        .authorization_type(authorization_type)
        .auth_parameters(create_auth(auth)?)
        .build()?)
}

pub fn update_connection(model: &ConnectionModel) -> Result<UpdateConnectionInput, TranslateError> {
    Ok(UpdateConnectionInput::builder()
        .name(name(model)?)
        .set_description(model.description.clone())
        .set_authorization_type(authorization_type(model))
        .set_auth_parameters(model.auth_parameters.as_ref().map(update_auth))
        .build()?)
}

pub fn describe_connection(
    model: &ConnectionModel,
) -> Result<DescribeConnectionInput, TranslateError> {
    Ok(DescribeConnectionInput::builder().name(name(model)?).build()?)
}

pub fn delete_connection(model: &ConnectionModel) -> Result<DeleteConnectionInput, TranslateError> {
    Ok(DeleteConnectionInput::builder().name(name(model)?).build()?)
}

pub fn list_connections(next_token: Option<String>) -> Result<ListConnectionsInput, TranslateError> {
    Ok(ListConnectionsInput::builder()
        .set_next_token(next_token)
        .build()?)
}

/// Overwrite the described fields of `model` and drop the write-only ones
pub fn apply_description(model: &mut ConnectionModel, output: &DescribeConnectionOutput) {
    model.name = output.name().map(str::to_string);
    model.arn = output.connection_arn().map(str::to_string);
    model.secret_arn = output.secret_arn().map(str::to_string);
    model.description = output.description().map(str::to_string);
    model.authorization_type = output
        .authorization_type()
        .map(|kind| kind.as_str().to_string());
    model.auth_parameters = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::connection::model::{ApiKeyAuthParameters, ClientParameters, Parameter};

    fn api_key_model() -> ConnectionModel {
        ConnectionModel {
            name: Some("partner".to_string()),
            authorization_type: Some("API_KEY".to_string()),
            auth_parameters: Some(AuthParameters {
                api_key_auth_parameters: Some(ApiKeyAuthParameters {
                    api_key_name: "x-api-key".to_string(),
                    api_key_value: "secret".to_string(),
                }),
                invocation_http_parameters: Some(HttpParameters {
                    header_parameters: vec![Parameter {
                        key: "x-team".to_string(),
                        value: "shop".to_string(),
                        is_value_secret: Some(false),
                    }],
                    ..HttpParameters::default()
                }),
                ..AuthParameters::default()
            }),
            ..ConnectionModel::default()
        }
    }

    #[test]
    fn create_maps_api_key_and_invocation_parameters() {
        let input = create_connection(&api_key_model()).unwrap();
        assert_eq!(input.name(), Some("partner"));
        assert_eq!(
            input.authorization_type(),
            Some(&types::ConnectionAuthorizationType::ApiKey)
        );

        let auth = input.auth_parameters().unwrap();
        assert_eq!(auth.api_key_auth_parameters().unwrap().api_key_name(), "x-api-key");
        let http = auth.invocation_http_parameters().unwrap();
        assert_eq!(http.header_parameters().len(), 1);
        assert!(http.body_parameters().is_empty());
    }

    #[test]
    fn create_requires_auth() {
        let model = ConnectionModel {
            auth_parameters: None,
            ..api_key_model()
        };
        assert!(matches!(
            create_connection(&model),
            Err(TranslateError::MissingField("AuthParameters"))
        ));
    }

    #[test]
    fn update_passes_oauth_through() {
        let model = ConnectionModel {
            name: Some("partner".to_string()),
            auth_parameters: Some(AuthParameters {
                o_auth_parameters: Some(OAuthParameters {
                    client_parameters: ClientParameters {
                        client_id: "id".to_string(),
                        client_secret: "secret".to_string(),
                    },
                    authorization_endpoint: "https://auth.example.com/token".to_string(),
                    http_method: "POST".to_string(),
                    o_auth_http_parameters: None,
                }),
                ..AuthParameters::default()
            }),
            ..ConnectionModel::default()
        };
        let input = update_connection(&model).unwrap();
        assert_eq!(input.authorization_type(), None);

        let oauth = input.auth_parameters().unwrap().o_auth_parameters().unwrap();
        assert_eq!(oauth.http_method(), Some(&types::ConnectionOAuthHttpMethod::Post));
        assert_eq!(oauth.client_parameters().unwrap().client_id(), Some("id"));
    }

    #[test]
    fn description_drops_secrets() {
        let output = DescribeConnectionOutput::builder()
            .name("partner")
            .connection_arn("arn:aws:events:us-east-1:123456789012:connection/partner/abc")
            .authorization_type(types::ConnectionAuthorizationType::ApiKey)
            .secret_arn("arn:aws:secretsmanager:us-east-1:123456789012:secret:events!connection/partner")
            .build();
        let mut model = api_key_model();
        apply_description(&mut model, &output);

        assert_eq!(model.authorization_type.as_deref(), Some("API_KEY"));
        assert!(model.secret_arn.is_some());
        assert_eq!(model.auth_parameters, None);
    }
}
