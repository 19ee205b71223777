use super::Recorder;
use aws_resources::sagemaker_model::{CreateModelRequest, ModelDescription};
use aws_resources::SagemakerModel;
use reconciler_model::{Identity, TagDiff, Tags};
use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult};
use resource_reconciler::{LifecycleClient, TaggingClient};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SagemakerState {
    models: BTreeMap<String, ModelDescription>,
    tags: BTreeMap<String, Tags>,
    recorder: Recorder,
    tag_updates: Vec<TagDiff>,
}

/// An in-memory SageMaker. Clones share the same state.
#[derive(Clone, Default)]
pub(crate) struct MockSagemaker {
    state: Arc<Mutex<SagemakerState>>,
}

pub(crate) fn model_arn(name: &str) -> String {
    format!("arn:aws:sagemaker:us-west-2:123456789012:model/{}", name)
}

impl MockSagemaker {
    /// Make the next `times` calls to `call` fail. SageMaker reports IAM role propagation delays
    /// and missing models with the same code, so the code is given explicitly.
    pub(crate) fn fail_next(
        &self,
        call: &'static str,
        kind: ApiErrorKind,
        code: &'static str,
        times: usize,
    ) {
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

    pub(crate) fn tag_updates(&self) -> Vec<TagDiff> {
        self.state.lock().unwrap().tag_updates.clone()
    }

    /// The tags stored on a model, including any the service added itself.
    pub(crate) fn tags(&self, name: &str) -> Tags {
        self.state
            .lock()
            .unwrap()
            .tags
            .get(&model_arn(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Attach a tag behind the reconciler's back.
    pub(crate) fn add_tag(&self, name: &str, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .tags
            .entry(model_arn(name))
            .or_default()
            .insert(key, value);
    }

    pub(crate) fn remove(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.models.remove(name);
        state.tags.remove(&model_arn(name));
    }
}

fn missing(identity: &Identity) -> ApiError {
    ApiError::new_with_message(
        ApiErrorKind::NotFound,
        Some("ValidationException"),
        format!("Could not find model \"{}\".", model_arn(identity.id())),
    )
}

#[async_trait::async_trait]
impl LifecycleClient<SagemakerModel> for MockSagemaker {
    async fn create(&self, request: CreateModelRequest) -> ApiResult<Identity> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("create")?;
        if state.models.contains_key(&request.name) {
            return Err(ApiError::new_with_message(
                ApiErrorKind::Fatal,
                Some("ValidationException"),
                format!(
                    "Cannot create already existing model \"{}\".",
                    model_arn(&request.name)
                ),
            ));
        }
        let arn = model_arn(&request.name);
        state.tags.insert(arn.clone(), request.tags);
        state.models.insert(
            request.name.clone(),
            ModelDescription {
                arn,
                name: request.name.clone(),
                primary_container: request.primary_container,
                containers: request.containers,
                execution_role_arn: request.execution_role_arn,
                vpc_config: request.vpc_config,
                enable_network_isolation: request.enable_network_isolation,
            },
        );
        Ok(Identity::new(request.name))
    }

    async fn describe(&self, identity: &Identity) -> ApiResult<ModelDescription> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("describe")?;
        state
            .models
            .get(identity.id())
            .cloned()
            .ok_or_else(|| missing(identity))
    }

    async fn update(&self, identity: &Identity, _patch: ()) -> ApiResult<()> {
        self.state.lock().unwrap().recorder.record("update")?;
        Err(ApiError::new_with_message(
            ApiErrorKind::Fatal,
            None,
            format!("model '{}' cannot be updated in place", identity),
        ))
    }

    async fn delete(&self, identity: &Identity) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("delete")?;
        let model = state
            .models
            .remove(identity.id())
            .ok_or_else(|| missing(identity))?;
        state.tags.remove(&model.arn);
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaggingClient for MockSagemaker {
    async fn list_tags(&self, arn: &str) -> ApiResult<Tags> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("list_tags")?;
        Ok(state.tags.get(arn).cloned().unwrap_or_default())
    }

    async fn update_tags(&self, arn: &str, diff: &TagDiff) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.recorder.record("update_tags")?;
        state.tag_updates.push(diff.clone());
        let current = state.tags.entry(arn.to_string()).or_default();
        let mut updated: Tags = current
            .iter()
            .filter(|(k, _)| !diff.removed.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, v) in &diff.added {
            updated.insert(k.as_str(), v.as_str());
        }
        *current = updated;
        Ok(())
    }
}
