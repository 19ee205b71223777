use super::error::{ApiError, ApiErrorKind, ApiResult};
use reconciler_model::{TagDiff, Tags};

/// `TaggingClient` reads and writes the tags attached to a resource, addressed by its ARN.
///
/// This is provided as a trait so that mock implementations can be injected into the
/// [`Reconciler`] for testing purposes.
#[async_trait::async_trait]
pub trait TaggingClient: Send + Sync {
    /// Get every tag currently attached to the resource.
    async fn list_tags(&self, arn: &str) -> ApiResult<Tags>;

    /// Remove `diff.removed` and add (or overwrite) `diff.added`.
    async fn update_tags(&self, arn: &str, diff: &TagDiff) -> ApiResult<()>;
}

/// The [`TaggingClient`] for resource kinds that cannot be tagged. The reconciler never calls it
/// for such kinds, so any call is reported as a `Fatal` error.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTagging;

#[async_trait::async_trait]
impl TaggingClient for NoTagging {
    async fn list_tags(&self, arn: &str) -> ApiResult<Tags> {
        Err(ApiError::new_with_message(
            ApiErrorKind::Fatal,
            None,
            format!("'{}' does not support tags", arn),
        ))
    }

    async fn update_tags(&self, arn: &str, _diff: &TagDiff) -> ApiResult<()> {
        Err(ApiError::new_with_message(
            ApiErrorKind::Fatal,
            None,
            format!("'{}' does not support tags", arn),
        ))
    }
}
