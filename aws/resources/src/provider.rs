use aws_resource_types::ProviderConfig;
use resource_reconciler::{ProviderContext, RetryPolicy};

/// The resource kind names accepted by the `reconcile` program.
pub const KIND_AUTHORIZER: &str = "authorizer";
pub const KIND_SAGEMAKER_MODEL: &str = "sagemaker-model";
pub const KNOWN_KINDS: &[&str] = &[KIND_AUTHORIZER, KIND_SAGEMAKER_MODEL];

/// Build the context for every reconciler call from the provider configuration.
pub fn provider_context<L, T>(
    config: &ProviderConfig,
    lifecycle: L,
    tagging: T,
) -> ProviderContext<L, T> {
    let create_retry = config
        .create_timeout()
        .map(RetryPolicy::new)
        .unwrap_or_else(RetryPolicy::create_default);
    let delete_retry = config
        .delete_timeout()
        .map(RetryPolicy::new)
        .unwrap_or_else(RetryPolicy::delete_default);
    ProviderContext::new(lifecycle, tagging)
        .with_default_tags(config.default_tags.clone())
        .with_ignore_tags(config.ignore_tags.clone())
        .with_retry(create_retry, delete_retry)
}

#[test]
fn retry_policies_from_config() {
    use resource_reconciler::NoTagging;
    use std::time::Duration;

    let config = ProviderConfig {
        delete_timeout_seconds: Some(30),
        ..Default::default()
    };
    let ctx = provider_context(&config, (), NoTagging);
    assert_eq!(ctx.create_retry, RetryPolicy::create_default());
    assert_eq!(ctx.delete_retry.timeout, Duration::from_secs(30));
    assert!(ctx.default_tags.is_empty());
}
