/*!

This test module provides a mock resource kind, `Widget`, and an in-memory cloud that implements
both [`LifecycleClient`] and [`TaggingClient`] so that the [`Reconciler`] can be tested without a
network.

The mock cloud records every call it receives and can be told to fail upcoming calls with an error
of a given kind.

!*/

use configuration_derive::Configuration;
use reconciler_model::{Identity, TagDiff, Tags};
use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult};
use resource_reconciler::provider::ValidationError;
use resource_reconciler::{LifecycleClient, ResourceKind, TaggingClient};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A pretend resource with a replace-only `name` and `color` and an updatable `size`.
#[derive(Clone, Debug)]
pub(crate) struct Widget;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WidgetDesired {
    pub(crate) name: Option<String>,
    pub(crate) color: String,
    pub(crate) size: u32,
    #[serde(default)]
    pub(crate) tags: Tags,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WidgetObserved {
    pub(crate) arn: String,
    pub(crate) name: String,
    pub(crate) color: String,
    pub(crate) size: u32,
    pub(crate) tags: Tags,
    pub(crate) tags_all: Tags,
}

#[derive(Clone, Debug)]
pub(crate) struct WidgetRequest {
    name: String,
    color: String,
    size: u32,
    tags: Tags,
}

#[derive(Clone, Debug)]
pub(crate) struct WidgetRecord {
    arn: String,
    name: String,
    color: String,
    size: u32,
}

impl ResourceKind for Widget {
    const NAME: &'static str = "widget";
    const TAGGABLE: bool = true;

    type Desired = WidgetDesired;
    type Observed = WidgetObserved;
    type CreateRequest = WidgetRequest;
    type Response = WidgetRecord;
    type Patch = u32;

    fn validate(desired: &WidgetDesired) -> Result<(), ValidationError> {
        if desired.color.is_empty() {
            return Err(ValidationError::new("color", "color must not be empty"));
        }
        if !(1..=100).contains(&desired.size) {
            return Err(ValidationError::new("size", "size must be between 1 and 100"));
        }
        Ok(())
    }

    fn requested_name(desired: &WidgetDesired) -> Option<String> {
        desired.name.clone()
    }

    fn encode(desired: &WidgetDesired, name: &str, tags: &Tags) -> WidgetRequest {
        WidgetRequest {
            name: name.to_string(),
            color: desired.color.clone(),
            size: desired.size,
            tags: tags.clone(),
        }
    }

    fn decode(response: WidgetRecord) -> WidgetObserved {
        WidgetObserved {
            arn: response.arn,
            name: response.name,
            color: response.color,
            size: response.size,
            ..Default::default()
        }
    }

    fn replacement_attributes(
        observed: &WidgetObserved,
        desired: &WidgetDesired,
    ) -> Vec<&'static str> {
        let mut replace = Vec::new();
        if let Some(name) = &desired.name {
            if name != &observed.name {
                replace.push("name");
            }
        }
        if desired.color != observed.color {
            replace.push("color");
        }
        replace
    }

    fn to_desired(observed: &WidgetObserved) -> WidgetDesired {
        WidgetDesired {
            name: Some(observed.name.clone()),
            color: observed.color.clone(),
            size: observed.size,
            tags: observed.tags.clone(),
        }
    }

    fn patch(observed: &WidgetObserved, desired: &WidgetDesired) -> Option<u32> {
        (observed.size != desired.size).then(|| desired.size)
    }

    fn arn(observed: &WidgetObserved) -> Option<String> {
        Some(observed.arn.clone())
    }

    fn desired_tags(desired: &WidgetDesired) -> Tags {
        desired.tags.clone()
    }

    fn observed_tags(observed: &WidgetObserved) -> Tags {
        observed.tags_all.clone()
    }

    fn set_tags(observed: &mut WidgetObserved, tags: Tags, tags_all: Tags) {
        observed.tags = tags;
        observed.tags_all = tags_all;
    }
}

#[derive(Default)]
struct CloudState {
    widgets: HashMap<String, WidgetRecord>,
    tags: HashMap<String, Tags>,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, VecDeque<ApiErrorKind>>,
    tag_updates: Vec<TagDiff>,
}

/// An in-memory widget service. Clones share the same state.
#[derive(Clone, Default)]
pub(crate) struct MockCloud {
    state: Arc<Mutex<CloudState>>,
}

impl MockCloud {
    /// Make the next `times` calls to `call` fail with an error of `kind`.
    pub(crate) fn fail_next(&self, call: &'static str, kind: ApiErrorKind, times: usize) {
        let mut state = self.state.lock().unwrap();
        let queue = state.failures.entry(call).or_default();
        queue.extend(std::iter::repeat(kind).take(times));
    }

    /// Every call received so far, in order.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    /// The diffs passed to `update_tags`, in order.
    pub(crate) fn tag_updates(&self) -> Vec<TagDiff> {
        self.state.lock().unwrap().tag_updates.clone()
    }

    /// Remove a widget behind the reconciler's back.
    pub(crate) fn remove(&self, name: &str) {
        self.state.lock().unwrap().widgets.remove(name);
    }

    /// Attach a tag behind the reconciler's back.
    pub(crate) fn add_tag(&self, name: &str, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        let arn = arn(name);
        state.tags.entry(arn).or_default().insert(key, value);
    }

    pub(crate) fn tags(&self, name: &str) -> Tags {
        self.state
            .lock()
            .unwrap()
            .tags
            .get(&arn(name))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: &'static str) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get_mut(call).and_then(VecDeque::pop_front) {
            Some(kind) => Err(ApiError::new_with_message(
                kind,
                Some("InjectedFailure"),
                format!("injected failure for {}", call),
            )),
            None => Ok(()),
        }
    }
}

fn arn(name: &str) -> String {
    format!("arn:aws:widgets:us-west-2:123456789012:widget/{}", name)
}

fn not_found(identity: &Identity) -> ApiError {
    ApiError::new_with_message(
        ApiErrorKind::NotFound,
        Some("ResourceNotFound"),
        format!("widget '{}' does not exist", identity),
    )
}

#[async_trait::async_trait]
impl LifecycleClient<Widget> for MockCloud {
    async fn create(&self, request: WidgetRequest) -> ApiResult<Identity> {
        self.record("create")?;
        let mut state = self.state.lock().unwrap();
        if state.widgets.contains_key(&request.name) {
            return Err(ApiError::new_with_message(
                ApiErrorKind::Fatal,
                Some("AlreadyExists"),
                format!("widget '{}' already exists", request.name),
            ));
        }
        let arn = arn(&request.name);
        state.tags.insert(arn.clone(), request.tags);
        state.widgets.insert(
            request.name.clone(),
            WidgetRecord {
                arn,
                name: request.name.clone(),
                color: request.color,
                size: request.size,
            },
        );
        Ok(Identity::new(request.name))
    }

    async fn describe(&self, identity: &Identity) -> ApiResult<WidgetRecord> {
        self.record("describe")?;
        self.state
            .lock()
            .unwrap()
            .widgets
            .get(identity.id())
            .cloned()
            .ok_or_else(|| not_found(identity))
    }

    async fn update(&self, identity: &Identity, patch: u32) -> ApiResult<()> {
        self.record("update")?;
        let mut state = self.state.lock().unwrap();
        let widget = state
            .widgets
            .get_mut(identity.id())
            .ok_or_else(|| not_found(identity))?;
        widget.size = patch;
        Ok(())
    }

    async fn delete(&self, identity: &Identity) -> ApiResult<()> {
        self.record("delete")?;
        let mut state = self.state.lock().unwrap();
        let widget = state
            .widgets
            .remove(identity.id())
            .ok_or_else(|| not_found(identity))?;
        state.tags.remove(&widget.arn);
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaggingClient for MockCloud {
    async fn list_tags(&self, arn: &str) -> ApiResult<Tags> {
        self.record("list_tags")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .tags
            .get(arn)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_tags(&self, arn: &str, diff: &TagDiff) -> ApiResult<()> {
        self.record("update_tags")?;
        let mut state = self.state.lock().unwrap();
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
