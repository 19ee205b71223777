use configuration_derive::Configuration;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::collections::BTreeSet;

/// The result TTL that API Gateway applies when none is given. `0` disables caching.
pub const DEFAULT_AUTHORIZER_TTL: i32 = 300;
pub const MAX_AUTHORIZER_TTL: i32 = 3600;
pub const DEFAULT_IDENTITY_SOURCE: &str = "method.request.header.Authorization";

/// How an API Gateway authorizer decides whether a caller is allowed in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizerType {
    /// A Lambda function that receives a single token from the request.
    Token,
    /// A Lambda function that receives request parameters.
    Request,
    /// An Amazon Cognito user pool.
    CognitoUserPools,
}

impl Default for AuthorizerType {
    fn default() -> Self {
        Self::Token
    }
}

derive_display_from_serialize!(AuthorizerType);
derive_fromstr_from_deserialize!(AuthorizerType);

impl AuthorizerType {
    /// Whether the authorizer calls a Lambda function through `authorizer_uri`.
    pub fn is_lambda(&self) -> bool {
        matches!(self, Self::Token | Self::Request)
    }
}

/// An API Gateway authorizer as declared by the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerDesired {
    /// The REST API the authorizer belongs to. Changing it replaces the authorizer.
    pub rest_api_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub authorizer_type: AuthorizerType,
    /// The Lambda invocation URI. Required for `TOKEN` and `REQUEST` authorizers.
    pub authorizer_uri: Option<String>,
    /// Defaults to `method.request.header.Authorization`.
    pub identity_source: Option<String>,
    /// The role API Gateway assumes to call the authorizer.
    pub authorizer_credentials: Option<String>,
    /// How long results are cached, `0..=3600`. Unset means the service default of 300 and `0`
    /// disables caching.
    pub authorizer_result_ttl_in_seconds: Option<i32>,
    pub identity_validation_expression: Option<String>,
    /// Cognito user pool ARNs. Required for `COGNITO_USER_POOLS` authorizers.
    #[serde(default)]
    pub provider_arns: BTreeSet<String>,
}

impl AuthorizerDesired {
    /// The TTL that the service will apply.
    pub fn effective_ttl(&self) -> i32 {
        self.authorizer_result_ttl_in_seconds
            .unwrap_or(DEFAULT_AUTHORIZER_TTL)
    }

    /// The identity source that the service will apply.
    pub fn effective_identity_source(&self) -> &str {
        self.identity_source
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_SOURCE)
    }
}

/// An API Gateway authorizer as reported by the service.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerObserved {
    pub id: String,
    pub arn: String,
    pub rest_api_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub authorizer_type: AuthorizerType,
    pub authorizer_uri: Option<String>,
    pub identity_source: Option<String>,
    pub authorizer_credentials: Option<String>,
    pub authorizer_result_ttl_in_seconds: i32,
    pub identity_validation_expression: Option<String>,
    #[serde(default)]
    pub provider_arns: BTreeSet<String>,
}
