use configuration_derive::Configuration;
use reconciler_model::{IgnoreTags, Tags};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every resource that a provider reconciles.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// The AWS region. Defaults to `us-west-2`.
    pub region: Option<String>,

    /// The role that should be assumed for every call.
    pub assume_role: Option<String>,

    /// The session duration of the assumed role, in seconds.
    pub assume_role_session_duration: Option<i32>,

    /// Tags applied to every taggable resource. Resource-local tags take precedence.
    #[serde(default)]
    pub default_tags: Tags,

    /// Tags that are neither read back nor managed.
    #[serde(default)]
    pub ignore_tags: IgnoreTags,

    /// How long a create call is retried on transient errors, in seconds.
    pub create_timeout_seconds: Option<u64>,

    /// How long a delete call is retried on transient errors, in seconds.
    pub delete_timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    pub fn create_timeout(&self) -> Option<Duration> {
        self.create_timeout_seconds.map(Duration::from_secs)
    }

    pub fn delete_timeout(&self) -> Option<Duration> {
        self.delete_timeout_seconds.map(Duration::from_secs)
    }
}

#[test]
fn provider_config_from_yaml() {
    let config: ProviderConfig = serde_yaml::from_str(
        r#"
region: eu-central-1
defaultTags:
  team: ml
ignoreTags:
  keyPrefixes: ["kubernetes.io/"]
deleteTimeoutSeconds: 60
"#,
    )
    .unwrap();
    assert_eq!(config.region.as_deref(), Some("eu-central-1"));
    assert_eq!(config.default_tags.get("team"), Some("ml"));
    assert!(config.ignore_tags.key_prefixes.contains("kubernetes.io/"));
    assert!(config.ignore_tags.keys.is_empty());
    assert_eq!(config.create_timeout(), None);
    assert_eq!(config.delete_timeout(), Some(Duration::from_secs(60)));
}
