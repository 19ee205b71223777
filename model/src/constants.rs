/// Tag keys with this prefix are reserved by AWS and are never managed by a reconciler.
pub const AWS_TAG_PREFIX: &str = "aws:";

/// The prefix given to names that are synthesized because the user did not supply one.
pub const UNIQUE_ID_PREFIX: &str = "terraform-";

// Environment variables
pub const ENV_RECONCILE_ACTION: &str = "RECONCILE_ACTION";
pub const ENV_RESOURCE_KIND: &str = "RECONCILE_RESOURCE_KIND";
pub const ENV_IDENTITY: &str = "RECONCILE_IDENTITY";
pub const ENV_DESIRED_PATH: &str = "RECONCILE_DESIRED_PATH";
pub const ENV_PROVIDER_CONFIG_PATH: &str = "RECONCILE_PROVIDER_CONFIG_PATH";
