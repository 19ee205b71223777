use crate::sagemaker_model::{CreateModelRequest, ModelDescription, SagemakerModel};
use aws_resource_types::{
    ContainerDefinition, ContainerMode, ImageConfig, ModelCacheSetting, MultiModelConfig,
    RepositoryAccessMode, VpcConfig,
};
use aws_sdk_sagemaker::model as sdk;
use aws_sdk_sagemaker::output::DescribeModelOutput;
use aws_sdk_sagemaker::types::SdkError;
use aws_smithy_types::retry::ProvideErrorKind;
use aws_types::SdkConfig;
use log::{debug, trace};
use reconciler_model::{Identity, TagDiff, Tags};
use resource_reconciler::clients::{ApiError, ApiErrorKind, ApiResult};
use resource_reconciler::{LifecycleClient, TaggingClient};
use std::collections::HashMap;
use std::str::FromStr;

/// The SageMaker call that returned an error. The same error code means different things for
/// different calls.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SagemakerCall {
    CreateModel,
    DescribeModel,
    DeleteModel,
    Tags,
}

/// Decide how the reconciler treats a SageMaker error code.
pub fn classify(call: SagemakerCall, code: Option<&str>) -> ApiErrorKind {
    match (call, code) {
        (_, Some("ThrottlingException")) => ApiErrorKind::Transient,
        // The execution role may not have propagated through IAM yet.
        (SagemakerCall::CreateModel, Some("ValidationException")) => ApiErrorKind::Transient,
        (SagemakerCall::DescribeModel, Some("ValidationException")) => ApiErrorKind::NotFound,
        (SagemakerCall::DeleteModel, Some("ResourceNotFound")) => ApiErrorKind::Transient,
        (SagemakerCall::DeleteModel, Some("ValidationException")) => ApiErrorKind::NotFound,
        _ => ApiErrorKind::Fatal,
    }
}

fn api_error<E>(call: SagemakerCall) -> impl Fn(SdkError<E>) -> ApiError
where
    E: ProvideErrorKind + std::error::Error + Send + Sync + 'static,
{
    move |err| {
        let code = match &err {
            SdkError::ServiceError(context) => context.err().code().map(str::to_string),
            _ => None,
        };
        ApiError::new(classify(call, code.as_deref()), code.as_deref(), err)
    }
}

fn unknown_value<E>(what: &str, value: &str, e: E) -> ApiError
where
    E: std::fmt::Display,
{
    ApiError::new_with_message(
        ApiErrorKind::Fatal,
        None,
        format!("Unknown {} '{}': {}", what, value, e),
    )
}

/// Convert a container definition into its SDK shape. Absent nested blocks stay absent.
pub(crate) fn expand_container(container: ContainerDefinition) -> sdk::ContainerDefinition {
    let environment = (!container.environment.is_empty())
        .then(|| container.environment.into_iter().collect::<HashMap<_, _>>());
    sdk::ContainerDefinition::builder()
        .set_container_hostname(container.container_hostname)
        .image(container.image)
        .mode(sdk::ContainerMode::from(container.mode.to_string().as_str()))
        .set_model_data_url(container.model_data_url)
        .set_environment(environment)
        .set_image_config(container.image_config.map(|image_config| {
            sdk::ImageConfig::builder()
                .repository_access_mode(sdk::RepositoryAccessMode::from(
                    image_config.repository_access_mode.to_string().as_str(),
                ))
                .build()
        }))
        .set_multi_model_config(container.multi_model_config.map(|multi_model_config| {
            sdk::MultiModelConfig::builder()
                .model_cache_setting(sdk::ModelCacheSetting::from(
                    multi_model_config.model_cache_setting.to_string().as_str(),
                ))
                .build()
        }))
        .build()
}

pub(crate) fn expand_vpc_config(vpc_config: VpcConfig) -> sdk::VpcConfig {
    sdk::VpcConfig::builder()
        .set_security_group_ids(Some(vpc_config.security_group_ids.into_iter().collect()))
        .set_subnets(Some(vpc_config.subnets.into_iter().collect()))
        .build()
}

fn expand_tags(tags: Tags) -> Vec<sdk::Tag> {
    tags.into_iter()
        .map(|(key, value)| sdk::Tag::builder().key(key).value(value).build())
        .collect()
}

/// Convert a container definition returned by the service. Values the service leaves out take
/// their defaults, so that a container reads back the way it was declared.
pub(crate) fn flatten_container(
    container: &sdk::ContainerDefinition,
) -> ApiResult<ContainerDefinition> {
    let mode = match container.mode() {
        Some(mode) => ContainerMode::from_str(mode.as_str())
            .map_err(|e| unknown_value("container mode", mode.as_str(), e))?,
        None => ContainerMode::default(),
    };
    let image_config = match container.image_config() {
        Some(config) => Some(ImageConfig {
            repository_access_mode: match config.repository_access_mode() {
                Some(mode) => RepositoryAccessMode::from_str(mode.as_str())
                    .map_err(|e| unknown_value("repository access mode", mode.as_str(), e))?,
                None => RepositoryAccessMode::default(),
            },
        }),
        None => None,
    };
    let multi_model_config = match container.multi_model_config() {
        Some(config) => Some(MultiModelConfig {
            model_cache_setting: match config.model_cache_setting() {
                Some(setting) => ModelCacheSetting::from_str(setting.as_str())
                    .map_err(|e| unknown_value("model cache setting", setting.as_str(), e))?,
                None => ModelCacheSetting::default(),
            },
        }),
        None => None,
    };
    Ok(ContainerDefinition {
        container_hostname: container.container_hostname().map(str::to_string),
        image: container.image().unwrap_or_default().to_string(),
        mode,
        model_data_url: container.model_data_url().map(str::to_string),
        environment: container
            .environment()
            .map(|environment| {
                environment
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default(),
        image_config,
        multi_model_config,
    })
}

pub(crate) fn flatten_vpc_config(vpc_config: &sdk::VpcConfig) -> VpcConfig {
    VpcConfig {
        subnets: vpc_config
            .subnets()
            .unwrap_or_default()
            .iter()
            .cloned()
            .collect(),
        security_group_ids: vpc_config
            .security_group_ids()
            .unwrap_or_default()
            .iter()
            .cloned()
            .collect(),
    }
}

fn describe_output(output: DescribeModelOutput) -> ApiResult<ModelDescription> {
    Ok(ModelDescription {
        arn: output.model_arn().unwrap_or_default().to_string(),
        name: output.model_name().unwrap_or_default().to_string(),
        primary_container: output
            .primary_container()
            .map(flatten_container)
            .transpose()?,
        containers: output
            .containers()
            .unwrap_or_default()
            .iter()
            .map(flatten_container)
            .collect::<ApiResult<_>>()?,
        execution_role_arn: output.execution_role_arn().unwrap_or_default().to_string(),
        vpc_config: output.vpc_config().map(flatten_vpc_config),
        enable_network_isolation: output.enable_network_isolation(),
    })
}

/// The `LifecycleClient` and `TaggingClient` for SageMaker models.
#[derive(Clone, Debug)]
pub struct SagemakerClient {
    client: aws_sdk_sagemaker::Client,
}

impl SagemakerClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sagemaker::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl LifecycleClient<SagemakerModel> for SagemakerClient {
    async fn create(&self, request: CreateModelRequest) -> ApiResult<Identity> {
        let containers = (!request.containers.is_empty())
            .then(|| request.containers.into_iter().map(expand_container).collect());
        let tags = (!request.tags.is_empty()).then(|| expand_tags(request.tags));
        self.client
            .create_model()
            .model_name(&request.name)
            .set_primary_container(request.primary_container.map(expand_container))
            .set_containers(containers)
            .execution_role_arn(request.execution_role_arn)
            .set_vpc_config(request.vpc_config.map(expand_vpc_config))
            .set_enable_network_isolation(request.enable_network_isolation.then(|| true))
            .set_tags(tags)
            .send()
            .await
            .map_err(api_error(SagemakerCall::CreateModel))?;
        debug!("Created SageMaker model '{}'", request.name);
        Ok(Identity::new(request.name))
    }

    async fn describe(&self, identity: &Identity) -> ApiResult<ModelDescription> {
        let output = self
            .client
            .describe_model()
            .model_name(identity.id())
            .send()
            .await
            .map_err(api_error(SagemakerCall::DescribeModel))?;
        trace!("DescribeModel output: {:?}", output);
        describe_output(output)
    }

    /// Models have no in-place update path; only their tags change, through `TaggingClient`.
    async fn update(&self, identity: &Identity, _patch: ()) -> ApiResult<()> {
        Err(ApiError::new_with_message(
            ApiErrorKind::Fatal,
            None,
            format!(
                "SageMaker model '{}' cannot be updated in place, only its tags",
                identity
            ),
        ))
    }

    async fn delete(&self, identity: &Identity) -> ApiResult<()> {
        self.client
            .delete_model()
            .model_name(identity.id())
            .send()
            .await
            .map_err(api_error(SagemakerCall::DeleteModel))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaggingClient for SagemakerClient {
    async fn list_tags(&self, arn: &str) -> ApiResult<Tags> {
        let mut tags = Tags::new();
        let mut next_token = None;
        loop {
            let output = self
                .client
                .list_tags()
                .resource_arn(arn)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(api_error(SagemakerCall::Tags))?;
            for tag in output.tags().unwrap_or_default() {
                if let Some(key) = tag.key() {
                    tags.insert(key, tag.value().unwrap_or_default());
                }
            }
            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                return Ok(tags);
            }
        }
    }

    async fn update_tags(&self, arn: &str, diff: &TagDiff) -> ApiResult<()> {
        if !diff.removed.is_empty() {
            debug!("Removing tags {:?} from '{}'", diff.removed, arn);
            self.client
                .delete_tags()
                .resource_arn(arn)
                .set_tag_keys(Some(diff.removed.clone()))
                .send()
                .await
                .map_err(api_error(SagemakerCall::Tags))?;
        }
        if !diff.added.is_empty() {
            debug!("Adding tags {:?} to '{}'", diff.added, arn);
            self.client
                .add_tags()
                .resource_arn(arn)
                .set_tags(Some(expand_tags(diff.added.clone())))
                .send()
                .await
                .map_err(api_error(SagemakerCall::Tags))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::{btreemap, btreeset};

    #[test]
    fn error_classification() {
        use SagemakerCall::{CreateModel, DeleteModel, DescribeModel};
        assert_eq!(
            classify(CreateModel, Some("ValidationException")),
            ApiErrorKind::Transient
        );
        assert_eq!(
            classify(DescribeModel, Some("ValidationException")),
            ApiErrorKind::NotFound
        );
        assert_eq!(
            classify(DeleteModel, Some("ResourceNotFound")),
            ApiErrorKind::Transient
        );
        assert_eq!(
            classify(DeleteModel, Some("ValidationException")),
            ApiErrorKind::NotFound
        );
        assert_eq!(
            classify(SagemakerCall::Tags, Some("ThrottlingException")),
            ApiErrorKind::Transient
        );
        assert_eq!(
            classify(SagemakerCall::Tags, Some("ValidationException")),
            ApiErrorKind::Fatal
        );
        assert_eq!(classify(CreateModel, None), ApiErrorKind::Fatal);
    }

    #[test]
    fn absent_blocks_are_not_sent() {
        let expanded = expand_container(ContainerDefinition {
            image: "image:1".to_string(),
            ..Default::default()
        });
        assert_eq!(expanded.image(), Some("image:1"));
        assert_eq!(expanded.mode(), Some(&sdk::ContainerMode::SingleModel));
        assert!(expanded.environment().is_none());
        assert!(expanded.image_config().is_none());
        assert!(expanded.multi_model_config().is_none());
        assert!(expanded.container_hostname().is_none());
        assert!(expanded.model_data_url().is_none());
    }

    #[test]
    fn containers_read_back_as_declared() {
        let container = ContainerDefinition {
            container_hostname: Some("primary".to_string()),
            image: "image:1".to_string(),
            mode: ContainerMode::MultiModel,
            model_data_url: Some("s3://bucket/models/".to_string()),
            environment: btreemap! { "WORKERS".to_string() => "2".to_string() },
            image_config: Some(ImageConfig {
                repository_access_mode: RepositoryAccessMode::Vpc,
            }),
            multi_model_config: Some(MultiModelConfig {
                model_cache_setting: ModelCacheSetting::Disabled,
            }),
        };
        let flattened = flatten_container(&expand_container(container.clone())).unwrap();
        assert_eq!(flattened, container);
    }

    #[test]
    fn service_defaults_are_filled_in() {
        let sparse = sdk::ContainerDefinition::builder()
            .image("image:1")
            .multi_model_config(sdk::MultiModelConfig::builder().build())
            .build();
        let flattened = flatten_container(&sparse).unwrap();
        assert_eq!(flattened.mode, ContainerMode::SingleModel);
        assert_eq!(
            flattened.multi_model_config,
            Some(MultiModelConfig {
                model_cache_setting: ModelCacheSetting::Enabled
            })
        );
        assert!(flattened.environment.is_empty());
    }

    #[test]
    fn empty_image_config_reads_back_as_present() {
        let sparse = sdk::ContainerDefinition::builder()
            .image("image:1")
            .image_config(sdk::ImageConfig::builder().build())
            .build();
        let flattened = flatten_container(&sparse).unwrap();
        assert_eq!(
            flattened.image_config,
            Some(ImageConfig {
                repository_access_mode: RepositoryAccessMode::Platform
            })
        );
        assert_eq!(flattened.multi_model_config, None);
    }

    #[tokio::test]
    async fn models_refuse_in_place_updates() {
        let config = aws_types::SdkConfig::builder()
            .region(aws_types::region::Region::new("us-west-2"))
            .build();
        let client = SagemakerClient::new(&config);
        let identity = Identity::new("my-model");
        let err = LifecycleClient::<SagemakerModel>::update(&client, &identity, ())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Fatal);
        assert!(err.to_string().contains("only its tags"));
    }

    #[test]
    fn vpc_config_round_trip() {
        let vpc_config = VpcConfig {
            subnets: btreeset! { "subnet-2".to_string(), "subnet-1".to_string() },
            security_group_ids: btreeset! { "sg-1".to_string() },
        };
        assert_eq!(
            flatten_vpc_config(&expand_vpc_config(vpc_config.clone())),
            vpc_config
        );
    }

    #[test]
    fn describe_output_without_containers() {
        let output = DescribeModelOutput::builder()
            .model_name("my-model")
            .model_arn("arn:aws:sagemaker:us-west-2:123456789012:model/my-model")
            .execution_role_arn("arn:aws:iam::123456789012:role/sagemaker")
            .build();
        let description = describe_output(output).unwrap();
        assert_eq!(description.name, "my-model");
        assert_eq!(description.primary_container, None);
        assert!(description.containers.is_empty());
        assert_eq!(description.vpc_config, None);
        assert!(!description.enable_network_isolation);
    }
}
