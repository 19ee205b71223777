use crate::authorizer::{
    authorizer_arn, Authorizer, AuthorizerDescription, CreateAuthorizerRequest, PatchOp,
    PatchOperation,
};
use aws_resource_types::AuthorizerType;
use aws_sdk_apigateway::model::{AuthorizerType as SdkAuthorizerType, Op};
use aws_sdk_apigateway::output::GetAuthorizerOutput;
use aws_sdk_apigateway::types::SdkError;
use aws_smithy_types::retry::ProvideErrorKind;
use aws_types::SdkConfig;
use log::{debug, trace};
use reconciler_model::Identity;
use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult, IntoApiError};
use resource_reconciler::LifecycleClient;
use std::str::FromStr;

/// Decide how the reconciler treats an API Gateway error code. The classification is the same
/// for every call.
pub fn classify(code: Option<&str>) -> ApiErrorKind {
    match code {
        Some("NotFoundException") => ApiErrorKind::NotFound,
        Some("TooManyRequestsException") | Some("ConflictException") => ApiErrorKind::Transient,
        _ => ApiErrorKind::Fatal,
    }
}

fn api_error<E>(err: SdkError<E>) -> ApiError
where
    E: ProvideErrorKind + std::error::Error + Send + Sync + 'static,
{
    let code = match &err {
        SdkError::ServiceError(context) => context.err().code().map(str::to_string),
        _ => None,
    };
    ApiError::new(classify(code.as_deref()), code.as_deref(), err)
}

/// The `LifecycleClient` for API Gateway authorizers.
#[derive(Clone, Debug)]
pub struct ApiGatewayClient {
    client: aws_sdk_apigateway::Client,
    region: String,
}

impl ApiGatewayClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_apigateway::Client::new(config),
            region: config
                .region()
                .map(|region| region.to_string())
                .unwrap_or_default(),
        }
    }
}

fn rest_api_id(identity: &Identity) -> ApiResult<&str> {
    identity.parent().context(
        ApiErrorKind::Fatal,
        format!(
            "Authorizer identity '{}' does not include a REST API id",
            identity
        ),
    )
}

fn sdk_op(op: PatchOp) -> Op {
    match op {
        PatchOp::Add => Op::Add,
        PatchOp::Remove => Op::Remove,
        PatchOp::Replace => Op::Replace,
    }
}

fn sdk_patch(patch: Vec<PatchOperation>) -> Vec<aws_sdk_apigateway::model::PatchOperation> {
    patch
        .into_iter()
        .map(|operation| {
            aws_sdk_apigateway::model::PatchOperation::builder()
                .op(sdk_op(operation.op))
                .path(operation.path)
                .set_value(operation.value)
                .build()
        })
        .collect()
}

/// Convert a `GetAuthorizer` response. Fails only if the service returns an authorizer type that
/// this crate does not know.
fn describe_output(
    region: &str,
    rest_api_id: &str,
    id: &str,
    output: GetAuthorizerOutput,
) -> ApiResult<AuthorizerDescription> {
    let authorizer_type = match output.r#type() {
        Some(sdk_type) => AuthorizerType::from_str(sdk_type.as_str()).map_err(|e| {
            ApiError::new(
                ApiErrorKind::Fatal,
                None,
                format!("Unknown authorizer type '{}': {}", sdk_type.as_str(), e),
            )
        })?,
        None => AuthorizerType::default(),
    };
    Ok(AuthorizerDescription {
        rest_api_id: rest_api_id.to_string(),
        arn: authorizer_arn(region, rest_api_id, id),
        id: output.id().unwrap_or(id).to_string(),
        name: output.name().unwrap_or_default().to_string(),
        authorizer_type,
        authorizer_uri: output.authorizer_uri().map(str::to_string),
        identity_source: output.identity_source().map(str::to_string),
        authorizer_credentials: output.authorizer_credentials().map(str::to_string),
        authorizer_result_ttl_in_seconds: output.authorizer_result_ttl_in_seconds(),
        identity_validation_expression: output
            .identity_validation_expression()
            .map(str::to_string),
        provider_arns: output.provider_ar_ns().unwrap_or_default().to_vec(),
    })
}

#[async_trait::async_trait]
impl LifecycleClient<Authorizer> for ApiGatewayClient {
    async fn create(&self, request: CreateAuthorizerRequest) -> ApiResult<Identity> {
        let provider_arns = (!request.provider_arns.is_empty()).then(|| request.provider_arns);
        let output = self
            .client
            .create_authorizer()
            .rest_api_id(&request.rest_api_id)
            .name(request.name)
            .r#type(SdkAuthorizerType::from(
                request.authorizer_type.to_string().as_str(),
            ))
            .set_authorizer_uri(request.authorizer_uri)
            .set_identity_source(request.identity_source)
            .set_authorizer_credentials(request.authorizer_credentials)
            .set_authorizer_result_ttl_in_seconds(request.authorizer_result_ttl_in_seconds)
            .set_identity_validation_expression(request.identity_validation_expression)
            .set_provider_ar_ns(provider_arns)
            .send()
            .await
            .map_err(api_error)?;
        let id = output
            .id()
            .context(ApiErrorKind::Fatal, "CreateAuthorizer returned no id")?;
        debug!("Created authorizer '{}' in '{}'", id, request.rest_api_id);
        Ok(Identity::with_parent(request.rest_api_id, id))
    }

    async fn describe(&self, identity: &Identity) -> ApiResult<AuthorizerDescription> {
        let rest_api_id = rest_api_id(identity)?;
        let output = self
            .client
            .get_authorizer()
            .rest_api_id(rest_api_id)
            .authorizer_id(identity.id())
            .send()
            .await
            .map_err(api_error)?;
        trace!("GetAuthorizer output: {:?}", output);
        describe_output(&self.region, rest_api_id, identity.id(), output)
    }

    async fn update(&self, identity: &Identity, patch: Vec<PatchOperation>) -> ApiResult<()> {
        self.client
            .update_authorizer()
            .rest_api_id(rest_api_id(identity)?)
            .authorizer_id(identity.id())
            .set_patch_operations(Some(sdk_patch(patch)))
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> ApiResult<()> {
        self.client
            .delete_authorizer()
            .rest_api_id(rest_api_id(identity)?)
            .authorizer_id(identity.id())
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
