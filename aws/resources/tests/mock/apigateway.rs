use super::Recorder;
use aws_resource_types::{AuthorizerType, DEFAULT_AUTHORIZER_TTL};
use aws_resources::authorizer::{
    authorizer_arn, AuthorizerDescription, CreateAuthorizerRequest, PatchOp, PatchOperation,
    PATH_AUTHORIZER_CREDENTIALS, PATH_AUTHORIZER_URI, PATH_IDENTITY_SOURCE,
    PATH_IDENTITY_VALIDATION_EXPRESSION, PATH_NAME, PATH_PROVIDER_ARNS, PATH_TTL, PATH_TYPE,
};
use aws_resources::Authorizer;
use reconciler_model::Identity;
use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult};
use resource_reconciler::LifecycleClient;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const REGION: &str = "us-west-2";

#[derive(Default)]
struct GatewayState {
    /// Keyed by `(rest_api_id, authorizer_id)`.
    authorizers: BTreeMap<(String, String), AuthorizerDescription>,
    next_id: u32,
    recorder: Recorder,
    patches: Vec<Vec<PatchOperation>>,
}

/// An in-memory API Gateway. Clones share the same state.
#[derive(Clone, Default)]
pub(crate) struct MockApiGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl MockApiGateway {
    pub(crate) fn fail_next(&self, call: &'static str, kind: ApiErrorKind, times: usize) {
        let code = match kind {
            ApiErrorKind::NotFound => "NotFoundException",
            ApiErrorKind::Transient => "TooManyRequestsException",
            ApiErrorKind::Fatal => "BadRequestException",
        };
        self.state
            .lock()
            .unwrap()
            .recorder
            .fail_next(call, kind, code, times);
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().recorder.calls.clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.state.lock().unwrap().recorder.count(call)
    }

    /// The operations of every `UpdateAuthorizer` call, in order.
    pub(crate) fn patches(&self) -> Vec<Vec<PatchOperation>> {
        self.state.lock().unwrap().patches.clone()
    }

    /// Delete an authorizer behind the reconciler's back.
    pub(crate) fn remove(&self, identity: &Identity) {
        self.state
            .lock()
            .unwrap()
            .authorizers
            .remove(&key(identity));
    }
}

fn key(identity: &Identity) -> (String, String) {
    (
        identity.parent().unwrap_or_default().to_string(),
        identity.id().to_string(),
    )
}

fn not_found(identity: &Identity) -> ApiError {
    ApiError::new_with_message(
        ApiErrorKind::NotFound,
        Some("NotFoundException"),
        format!("Invalid authorizer identifier specified: {}", identity),
    )
}

fn bad_request<S: Into<String>>(message: S) -> ApiError {
    ApiError::new_with_message(ApiErrorKind::Fatal, Some("BadRequestException"), message)
}

/// The service clears optional strings that are replaced with an empty value.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn apply(authorizer: &mut AuthorizerDescription, op: PatchOperation) -> ApiResult<()> {
    let value = op.value.clone();
    match (op.op, op.path.as_str()) {
        (PatchOp::Replace, PATH_NAME) => authorizer.name = value.unwrap_or_default(),
        (PatchOp::Replace, PATH_TYPE) => {
            authorizer.authorizer_type = AuthorizerType::from_str(&value.unwrap_or_default())
                .map_err(|e| bad_request(e.to_string()))?
        }
        (PatchOp::Replace, PATH_AUTHORIZER_URI) => authorizer.authorizer_uri = optional(value),
        (PatchOp::Replace, PATH_IDENTITY_SOURCE) => authorizer.identity_source = optional(value),
        (PatchOp::Replace, PATH_AUTHORIZER_CREDENTIALS) => {
            authorizer.authorizer_credentials = optional(value)
        }
        (PatchOp::Replace, PATH_TTL) => {
            authorizer.authorizer_result_ttl_in_seconds = Some(
                value
                    .unwrap_or_default()
                    .parse()
                    .map_err(|_| bad_request("Invalid TTL"))?,
            )
        }
        (PatchOp::Replace, PATH_IDENTITY_VALIDATION_EXPRESSION) => {
            authorizer.identity_validation_expression = optional(value)
        }
        (PatchOp::Add, PATH_PROVIDER_ARNS) => {
            authorizer.provider_arns.push(value.unwrap_or_default())
        }
        (PatchOp::Remove, path) if path.starts_with(PATH_PROVIDER_ARNS) => {
            let arn = &path[PATH_PROVIDER_ARNS.len() + 1..];
            authorizer.provider_arns.retain(|existing| existing != arn)
        }
        _ => return Err(bad_request(format!("Invalid patch operation {:?}", op))),
    }
    Ok(())
}

#[async_trait::async_trait]
impl LifecycleClient<Authorizer> for MockApiGateway {
    async fn create(&self, request: CreateAuthorizerRequest) -> ApiResult<Identity> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("create")?;
        state.next_id += 1;
        let id = format!("auth{:04}", state.next_id);
        let description = AuthorizerDescription {
            arn: authorizer_arn(REGION, &request.rest_api_id, &id),
            rest_api_id: request.rest_api_id.clone(),
            id: id.clone(),
            name: request.name,
            authorizer_type: request.authorizer_type,
            authorizer_uri: request.authorizer_uri,
            identity_source: request.identity_source,
            authorizer_credentials: request.authorizer_credentials,
            authorizer_result_ttl_in_seconds: Some(
                request
                    .authorizer_result_ttl_in_seconds
                    .unwrap_or(DEFAULT_AUTHORIZER_TTL),
            ),
            identity_validation_expression: request.identity_validation_expression,
            provider_arns: request.provider_arns,
        };
        state
            .authorizers
            .insert((request.rest_api_id.clone(), id.clone()), description);
        Ok(Identity::with_parent(request.rest_api_id, id))
    }

    async fn describe(&self, identity: &Identity) -> ApiResult<AuthorizerDescription> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("describe")?;
        state
            .authorizers
            .get(&key(identity))
            .cloned()
            .ok_or_else(|| not_found(identity))
    }

    async fn update(&self, identity: &Identity, patch: Vec<PatchOperation>) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("update")?;
        state.patches.push(patch.clone());
        let authorizer = state
            .authorizers
            .get_mut(&key(identity))
            .ok_or_else(|| not_found(identity))?;
        // Operations are applied to a copy so a bad operation leaves the authorizer untouched.
        let mut updated = authorizer.clone();
        for op in patch {
            apply(&mut updated, op)?;
        }
        *authorizer = updated;
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("delete")?;
        state
            .authorizers
            .remove(&key(identity))
            .map(|_| ())
            .ok_or_else(|| not_found(identity))
    }
}
