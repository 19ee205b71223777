/*!

Resource kinds for AWS, and the SDK clients that implement the reconciler's client traits for
them:

- [`Authorizer`]: an API Gateway authorizer, reconciled with [`ApiGatewayClient`].
- [`SagemakerModel`]: a SageMaker model, reconciled and tagged with [`SagemakerClient`].

!*/

mod apigateway_client;
pub mod authorizer;
pub mod error;
mod provider;
mod sagemaker_client;
pub mod sagemaker_model;
mod validation;

pub use apigateway_client::ApiGatewayClient;
pub use authorizer::Authorizer;
pub use error::{Error, Result};
pub use provider::{provider_context, KIND_AUTHORIZER, KIND_SAGEMAKER_MODEL, KNOWN_KINDS};
pub use sagemaker_client::SagemakerClient;
pub use sagemaker_model::SagemakerModel;
