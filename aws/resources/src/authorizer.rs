/*!

The API Gateway authorizer resource kind. Every attribute except `rest_api_id` can be changed in
place with a JSON patch. Authorizers carry no tags.

!*/

use crate::validation;
use aws_resource_types::{
    AuthorizerDesired, AuthorizerObserved, AuthorizerType, MAX_AUTHORIZER_TTL,
};
use reconciler_model::{Identity, Tags};
use resource_reconciler::provider::ValidationError;
use resource_reconciler::ResourceKind;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Authorizer;

/// The input of `CreateAuthorizer`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateAuthorizerRequest {
    pub rest_api_id: String,
    pub name: String,
    pub authorizer_type: AuthorizerType,
    pub authorizer_uri: Option<String>,
    pub identity_source: Option<String>,
    pub authorizer_credentials: Option<String>,
    /// `None` leaves the TTL to the service.
    pub authorizer_result_ttl_in_seconds: Option<i32>,
    pub identity_validation_expression: Option<String>,
    pub provider_arns: Vec<String>,
}

/// The output of `GetAuthorizer` together with the values the client derives from the request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthorizerDescription {
    pub rest_api_id: String,
    pub arn: String,
    pub id: String,
    pub name: String,
    pub authorizer_type: AuthorizerType,
    pub authorizer_uri: Option<String>,
    pub identity_source: Option<String>,
    pub authorizer_credentials: Option<String>,
    pub authorizer_result_ttl_in_seconds: Option<i32>,
    pub identity_validation_expression: Option<String>,
    pub provider_arns: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// One operation of an `UpdateAuthorizer` JSON patch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: Option<String>,
}

impl PatchOperation {
    fn replace<S>(path: &str, value: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            op: PatchOp::Replace,
            path: path.to_string(),
            value: Some(value.into()),
        }
    }
}

pub const PATH_NAME: &str = "/name";
pub const PATH_TYPE: &str = "/type";
pub const PATH_AUTHORIZER_URI: &str = "/authorizerUri";
pub const PATH_IDENTITY_SOURCE: &str = "/identitySource";
pub const PATH_AUTHORIZER_CREDENTIALS: &str = "/authorizerCredentials";
pub const PATH_TTL: &str = "/authorizerResultTtlInSeconds";
pub const PATH_IDENTITY_VALIDATION_EXPRESSION: &str = "/identityValidationExpression";
pub const PATH_PROVIDER_ARNS: &str = "/providerARNs";

/// The ARN of an authorizer. Authorizer ARNs carry no account id.
pub fn authorizer_arn(region: &str, rest_api_id: &str, id: &str) -> String {
    format!(
        "arn:{}:apigateway:{}::/restapis/{}/authorizers/{}",
        partition(region),
        region,
        rest_api_id,
        id
    )
}

fn partition(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else {
        "aws"
    }
}

impl ResourceKind for Authorizer {
    const NAME: &'static str = "API Gateway authorizer";

    type Desired = AuthorizerDesired;
    type Observed = AuthorizerObserved;
    type CreateRequest = CreateAuthorizerRequest;
    type Response = AuthorizerDescription;
    type Patch = Vec<PatchOperation>;

    fn validate(desired: &AuthorizerDesired) -> Result<(), ValidationError> {
        validation::not_empty("rest_api_id", &desired.rest_api_id)?;
        validation::not_empty("name", &desired.name)?;
        let authorizer_type = desired.authorizer_type;
        if authorizer_type.is_lambda()
            && desired
                .authorizer_uri
                .as_deref()
                .map(str::is_empty)
                .unwrap_or(true)
        {
            return Err(ValidationError::new(
                "authorizer_uri",
                format!(
                    "authorizer_uri must be set non-empty when authorizer type is {}",
                    authorizer_type
                ),
            ));
        }
        if authorizer_type == AuthorizerType::CognitoUserPools && desired.provider_arns.is_empty()
        {
            return Err(ValidationError::new(
                "provider_arns",
                format!(
                    "provider_arns must be set non-empty when authorizer type is {}",
                    authorizer_type
                ),
            ));
        }
        for arn in &desired.provider_arns {
            validation::arn("provider_arns", arn)?;
        }
        if let Some(credentials) = &desired.authorizer_credentials {
            validation::arn("authorizer_credentials", credentials)?;
        }
        if let Some(ttl) = desired.authorizer_result_ttl_in_seconds {
            if !(0..=MAX_AUTHORIZER_TTL).contains(&ttl) {
                return Err(ValidationError::new(
                    "authorizer_result_ttl_in_seconds",
                    format!(
                        "authorizer_result_ttl_in_seconds must be between 0 and {}, got {}",
                        MAX_AUTHORIZER_TTL, ttl
                    ),
                ));
            }
        }
        Ok(())
    }

    fn requested_name(desired: &AuthorizerDesired) -> Option<String> {
        Some(desired.name.clone())
    }

    fn encode(desired: &AuthorizerDesired, name: &str, _tags: &Tags) -> CreateAuthorizerRequest {
        CreateAuthorizerRequest {
            rest_api_id: desired.rest_api_id.clone(),
            name: name.to_string(),
            authorizer_type: desired.authorizer_type,
            authorizer_uri: desired.authorizer_uri.clone(),
            identity_source: Some(desired.effective_identity_source().to_string()),
            authorizer_credentials: desired.authorizer_credentials.clone(),
            authorizer_result_ttl_in_seconds: desired.authorizer_result_ttl_in_seconds,
            identity_validation_expression: desired.identity_validation_expression.clone(),
            provider_arns: desired.provider_arns.iter().cloned().collect(),
        }
    }

    fn decode(response: AuthorizerDescription) -> AuthorizerObserved {
        AuthorizerObserved {
            id: response.id,
            arn: response.arn,
            rest_api_id: response.rest_api_id,
            name: response.name,
            authorizer_type: response.authorizer_type,
            authorizer_uri: response.authorizer_uri,
            identity_source: response.identity_source,
            authorizer_credentials: response.authorizer_credentials,
            authorizer_result_ttl_in_seconds: response
                .authorizer_result_ttl_in_seconds
                .unwrap_or_default(),
            identity_validation_expression: response.identity_validation_expression,
            provider_arns: response.provider_arns.into_iter().collect(),
        }
    }

    fn replacement_attributes(
        observed: &AuthorizerObserved,
        desired: &AuthorizerDesired,
    ) -> Vec<&'static str> {
        if observed.rest_api_id != desired.rest_api_id {
            vec!["rest_api_id"]
        } else {
            Vec::new()
        }
    }

    fn to_desired(observed: &AuthorizerObserved) -> AuthorizerDesired {
        AuthorizerDesired {
            rest_api_id: observed.rest_api_id.clone(),
            name: observed.name.clone(),
            authorizer_type: observed.authorizer_type,
            authorizer_uri: observed.authorizer_uri.clone(),
            identity_source: observed.identity_source.clone(),
            authorizer_credentials: observed.authorizer_credentials.clone(),
            authorizer_result_ttl_in_seconds: Some(observed.authorizer_result_ttl_in_seconds),
            identity_validation_expression: observed.identity_validation_expression.clone(),
            provider_arns: observed.provider_arns.clone(),
        }
    }

    fn patch(
        observed: &AuthorizerObserved,
        desired: &AuthorizerDesired,
    ) -> Option<Vec<PatchOperation>> {
        let mut ops = Vec::new();
        if observed.name != desired.name {
            ops.push(PatchOperation::replace(PATH_NAME, &desired.name));
        }
        if observed.authorizer_type != desired.authorizer_type {
            ops.push(PatchOperation::replace(
                PATH_TYPE,
                desired.authorizer_type.to_string(),
            ));
        }
        replace_if_changed(
            &mut ops,
            PATH_AUTHORIZER_URI,
            &observed.authorizer_uri,
            &desired.authorizer_uri,
        );
        if observed.identity_source.as_deref().unwrap_or_default()
            != desired.effective_identity_source()
        {
            ops.push(PatchOperation::replace(
                PATH_IDENTITY_SOURCE,
                desired.effective_identity_source(),
            ));
        }
        replace_if_changed(
            &mut ops,
            PATH_AUTHORIZER_CREDENTIALS,
            &observed.authorizer_credentials,
            &desired.authorizer_credentials,
        );
        if observed.authorizer_result_ttl_in_seconds != desired.effective_ttl() {
            ops.push(PatchOperation::replace(
                PATH_TTL,
                desired.effective_ttl().to_string(),
            ));
        }
        replace_if_changed(
            &mut ops,
            PATH_IDENTITY_VALIDATION_EXPRESSION,
            &observed.identity_validation_expression,
            &desired.identity_validation_expression,
        );
        for removed in observed.provider_arns.difference(&desired.provider_arns) {
            ops.push(PatchOperation {
                op: PatchOp::Remove,
                path: format!("{}/{}", PATH_PROVIDER_ARNS, removed),
                value: None,
            });
        }
        for added in desired.provider_arns.difference(&observed.provider_arns) {
            ops.push(PatchOperation {
                op: PatchOp::Add,
                path: PATH_PROVIDER_ARNS.to_string(),
                value: Some(added.clone()),
            });
        }
        (!ops.is_empty()).then(|| ops)
    }

    /// Authorizers are imported as `{rest_api_id}/{authorizer_id}`.
    fn parse_import_id(key: &str) -> Result<Identity, ValidationError> {
        let invalid = || {
            ValidationError::new(
                "id",
                format!(
                    "Unexpected format of ID ('{}'), expected REST-API-ID/AUTHORIZER-ID",
                    key
                ),
            )
        };
        let identity = Identity::from_str(key).map_err(|_| invalid())?;
        if identity.parent().is_none() {
            return Err(invalid());
        }
        Ok(identity)
    }
}

/// Unset optional strings are replaced with an empty string.
fn replace_if_changed(
    ops: &mut Vec<PatchOperation>,
    path: &str,
    observed: &Option<String>,
    desired: &Option<String>,
) {
    let old = observed.as_deref().unwrap_or_default();
    let new = desired.as_deref().unwrap_or_default();
    if old != new {
        ops.push(PatchOperation::replace(path, new));
    }
}
