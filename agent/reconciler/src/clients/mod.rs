/*!

This module provides the client traits that the reconciler uses to talk to the external API.

!*/

mod error;
mod lifecycle_client;
mod tagging_client;

pub use error::{ApiError, ApiErrorKind, ApiResult, IntoApiError};
pub use lifecycle_client::LifecycleClient;
pub use tagging_client::{NoTagging, TaggingClient};
