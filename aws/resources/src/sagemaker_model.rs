/*!

The SageMaker model resource kind. A model cannot be changed after it is created except for its
tags, so every other attribute forces replacement.

!*/

use crate::validation;
use aws_resource_types::{ContainerDefinition, ModelDesired, ModelObserved, VpcConfig};
use reconciler_model::{Identity, Tags};
use resource_reconciler::provider::ValidationError;
use resource_reconciler::ResourceKind;

#[derive(Clone, Debug)]
pub struct SagemakerModel;

/// The input of `CreateModel`. Blocks that are `None` or empty are left out of the call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateModelRequest {
    pub name: String,
    pub primary_container: Option<ContainerDefinition>,
    pub containers: Vec<ContainerDefinition>,
    pub execution_role_arn: String,
    pub vpc_config: Option<VpcConfig>,
    pub enable_network_isolation: bool,
    pub tags: Tags,
}

/// The output of `DescribeModel`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModelDescription {
    pub arn: String,
    pub name: String,
    pub primary_container: Option<ContainerDefinition>,
    pub containers: Vec<ContainerDefinition>,
    pub execution_role_arn: String,
    pub vpc_config: Option<VpcConfig>,
    pub enable_network_isolation: bool,
}

fn validate_container(
    attribute: &str,
    container: &ContainerDefinition,
) -> Result<(), ValidationError> {
    if let Some(hostname) = &container.container_hostname {
        validation::sagemaker_name(&format!("{}.container_hostname", attribute), hostname)?;
    }
    validation::sagemaker_image(&format!("{}.image", attribute), &container.image)?;
    if let Some(url) = &container.model_data_url {
        validation::model_data_url(&format!("{}.model_data_url", attribute), url)?;
    }
    validation::environment(
        &format!("{}.environment", attribute),
        &container.environment,
    )
}

impl ResourceKind for SagemakerModel {
    const NAME: &'static str = "SageMaker model";
    const TAGGABLE: bool = true;

    type Desired = ModelDesired;
    type Observed = ModelObserved;
    type CreateRequest = CreateModelRequest;
    type Response = ModelDescription;
    type Patch = ();

    fn validate(desired: &ModelDesired) -> Result<(), ValidationError> {
        if let Some(name) = &desired.name {
            validation::sagemaker_name("name", name)?;
        }
        if let Some(container) = &desired.primary_container {
            validate_container("primary_container", container)?;
        }
        for (i, container) in desired.containers.iter().enumerate() {
            validate_container(&format!("containers[{}]", i), container)?;
        }
        validation::arn("execution_role_arn", &desired.execution_role_arn)
    }

    fn requested_name(desired: &ModelDesired) -> Option<String> {
        desired.name.clone()
    }

    fn encode(desired: &ModelDesired, name: &str, tags: &Tags) -> CreateModelRequest {
        CreateModelRequest {
            name: name.to_string(),
            primary_container: desired.primary_container.clone(),
            containers: desired.containers.clone(),
            execution_role_arn: desired.execution_role_arn.clone(),
            vpc_config: desired.vpc_config.clone(),
            enable_network_isolation: desired.enable_network_isolation,
            tags: tags.clone(),
        }
    }

    fn decode(response: ModelDescription) -> ModelObserved {
        ModelObserved {
            arn: response.arn,
            name: response.name,
            primary_container: response.primary_container,
            containers: response.containers,
            vpc_config: response.vpc_config,
            execution_role_arn: response.execution_role_arn,
            enable_network_isolation: response.enable_network_isolation,
            tags: Tags::default(),
            tags_all: Tags::default(),
        }
    }

    fn replacement_attributes(
        observed: &ModelObserved,
        desired: &ModelDesired,
    ) -> Vec<&'static str> {
        let mut replace = Vec::new();
        if let Some(name) = &desired.name {
            if name != &observed.name {
                replace.push("name");
            }
        }
        if desired.primary_container != observed.primary_container {
            replace.push("primary_container");
        }
        if desired.containers != observed.containers {
            replace.push("containers");
        }
        if desired.vpc_config != observed.vpc_config {
            replace.push("vpc_config");
        }
        if desired.execution_role_arn != observed.execution_role_arn {
            replace.push("execution_role_arn");
        }
        if desired.enable_network_isolation != observed.enable_network_isolation {
            replace.push("enable_network_isolation");
        }
        replace
    }

    fn to_desired(observed: &ModelObserved) -> ModelDesired {
        ModelDesired {
            name: Some(observed.name.clone()),
            primary_container: observed.primary_container.clone(),
            containers: observed.containers.clone(),
            vpc_config: observed.vpc_config.clone(),
            execution_role_arn: observed.execution_role_arn.clone(),
            enable_network_isolation: observed.enable_network_isolation,
            tags: observed.tags.clone(),
        }
    }

    fn arn(observed: &ModelObserved) -> Option<String> {
        Some(observed.arn.clone())
    }

    fn desired_tags(desired: &ModelDesired) -> Tags {
        desired.tags.clone()
    }

    fn observed_tags(observed: &ModelObserved) -> Tags {
        observed.tags_all.clone()
    }

    fn set_tags(observed: &mut ModelObserved, tags: Tags, tags_all: Tags) {
        observed.tags = tags;
        observed.tags_all = tags_all;
    }

    /// Models are imported by name.
    fn parse_import_id(key: &str) -> Result<Identity, ValidationError> {
        validation::sagemaker_name("id", key)?;
        Ok(Identity::new(key))
    }
}
