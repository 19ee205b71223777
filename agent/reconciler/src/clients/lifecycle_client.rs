use super::error::ApiResult;
use crate::provider::ResourceKind;
use reconciler_model::Identity;

/// `LifecycleClient` is the reconciler's view of the external API for one kind of resource.
///
/// This is provided as a trait so that mock implementations can be injected into the
/// [`Reconciler`] for testing purposes. In practice you will use an implementation that wraps a
/// cloud SDK client.
///
/// Implementations classify every error they return (see [`ApiErrorKind`]); the same service
/// error code can mean "not found" for one call and "try again" for another.
#[async_trait::async_trait]
pub trait LifecycleClient<K>: Send + Sync
where
    K: ResourceKind,
{
    /// Create the resource and return the identity the external system knows it by.
    async fn create(&self, request: K::CreateRequest) -> ApiResult<Identity>;

    /// Describe the resource.
    async fn describe(&self, identity: &Identity) -> ApiResult<K::Response>;

    /// Apply in-place changes to the resource.
    async fn update(&self, identity: &Identity, patch: K::Patch) -> ApiResult<()>;

    /// Delete the resource.
    async fn delete(&self, identity: &Identity) -> ApiResult<()>;
}
