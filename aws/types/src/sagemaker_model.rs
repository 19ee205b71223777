use configuration_derive::Configuration;
use reconciler_model::Tags;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::collections::{BTreeMap, BTreeSet};

/// Whether a container hosts one model or many.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ContainerMode {
    SingleModel,
    MultiModel,
}

impl Default for ContainerMode {
    fn default() -> Self {
        Self::SingleModel
    }
}

derive_display_from_serialize!(ContainerMode);
derive_fromstr_from_deserialize!(ContainerMode);

/// Where the inference image is pulled from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RepositoryAccessMode {
    /// Amazon ECR.
    Platform,
    /// A private registry in the model's VPC.
    Vpc,
}

impl Default for RepositoryAccessMode {
    fn default() -> Self {
        Self::Platform
    }
}

derive_display_from_serialize!(RepositoryAccessMode);
derive_fromstr_from_deserialize!(RepositoryAccessMode);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ModelCacheSetting {
    Enabled,
    Disabled,
}

impl Default for ModelCacheSetting {
    fn default() -> Self {
        Self::Enabled
    }
}

derive_display_from_serialize!(ModelCacheSetting);
derive_fromstr_from_deserialize!(ModelCacheSetting);

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub repository_access_mode: RepositoryAccessMode,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiModelConfig {
    #[serde(default)]
    pub model_cache_setting: ModelCacheSetting,
}

/// A container in the model's inference pipeline.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub container_hostname: Option<String>,
    pub image: String,
    #[serde(default)]
    pub mode: ContainerMode,
    /// An `s3://` or `https://` URL of the model artifacts.
    pub model_data_url: Option<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    pub image_config: Option<ImageConfig>,
    pub multi_model_config: Option<MultiModelConfig>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    pub subnets: BTreeSet<String>,
    pub security_group_ids: BTreeSet<String>,
}

/// A SageMaker model as declared by the caller. Only `tags` can change without replacing the
/// model.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub struct ModelDesired {
    /// A unique name is generated when this is left out.
    pub name: Option<String>,
    pub primary_container: Option<ContainerDefinition>,
    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
    pub vpc_config: Option<VpcConfig>,
    pub execution_role_arn: String,
    #[serde(default)]
    pub enable_network_isolation: bool,
    #[serde(default)]
    pub tags: Tags,
}

/// A SageMaker model as reported by the service.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Configuration)]
#[serde(rename_all = "camelCase")]
pub struct ModelObserved {
    pub arn: String,
    pub name: String,
    pub primary_container: Option<ContainerDefinition>,
    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
    pub vpc_config: Option<VpcConfig>,
    pub execution_role_arn: String,
    #[serde(default)]
    pub enable_network_isolation: bool,
    /// Tags declared on the model itself.
    #[serde(default)]
    pub tags: Tags,
    /// Every tag on the model, including the provider's default tags.
    #[serde(default)]
    pub tags_all: Tags,
}
