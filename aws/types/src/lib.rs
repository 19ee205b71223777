/*!

Statically typed documents for the AWS resource kinds: what a caller declares (`*Desired`), what
the cloud reports back (`*Observed`), and the provider configuration shared by every resource.

!*/

mod authorizer;
mod provider_config;
mod sagemaker_model;

pub use authorizer::{
    AuthorizerDesired, AuthorizerObserved, AuthorizerType, DEFAULT_AUTHORIZER_TTL,
    DEFAULT_IDENTITY_SOURCE, MAX_AUTHORIZER_TTL,
};
pub use provider_config::ProviderConfig;
pub use sagemaker_model::{
    ContainerDefinition, ContainerMode, ImageConfig, ModelCacheSetting, ModelDesired,
    ModelObserved, MultiModelConfig, RepositoryAccessMode, VpcConfig,
};
