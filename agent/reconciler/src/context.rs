use crate::retry::RetryPolicy;
use reconciler_model::{IgnoreTags, Tags};

/// Everything a [`Reconciler`] needs besides the resource's own documents: the clients for the
/// external API and the provider-wide settings. It is passed to every reconciler call.
pub struct ProviderContext<L, T> {
    /// The client for the kind's create, describe, update and delete calls.
    pub lifecycle: L,

    /// The client for the tagging API.
    pub tagging: T,

    /// Tags applied to every resource. Resource-local tags take precedence.
    pub default_tags: Tags,

    /// Tags that are neither read back nor managed.
    pub ignore_tags: IgnoreTags,

    /// Retry policy for create calls that fail with a transient error.
    pub create_retry: RetryPolicy,

    /// Retry policy for delete calls that fail with a transient error.
    pub delete_retry: RetryPolicy,
}

impl<L, T> ProviderContext<L, T> {
    pub fn new(lifecycle: L, tagging: T) -> Self {
        Self {
            lifecycle,
            tagging,
            default_tags: Tags::default(),
            ignore_tags: IgnoreTags::default(),
            create_retry: RetryPolicy::create_default(),
            delete_retry: RetryPolicy::delete_default(),
        }
    }

    pub fn with_default_tags(mut self, default_tags: Tags) -> Self {
        self.default_tags = default_tags;
        self
    }

    pub fn with_ignore_tags(mut self, ignore_tags: IgnoreTags) -> Self {
        self.ignore_tags = ignore_tags;
        self
    }

    pub fn with_retry(mut self, create_retry: RetryPolicy, delete_retry: RetryPolicy) -> Self {
        self.create_retry = create_retry;
        self.delete_retry = delete_retry;
        self
    }
}
