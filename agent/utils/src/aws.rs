use crate::constants::{
    ASSUME_ROLE_SESSION_NAME, DEFAULT_ASSUME_ROLE_SESSION_DURATION, DEFAULT_REGION,
    SDK_MAX_ATTEMPTS,
};
use crate::error::{self, Error};
use aws_config::default_provider::credentials::default_provider;
use aws_config::sts::AssumeRoleProvider;
use aws_config::retry::RetryConfig;
use aws_smithy_types::retry::RetryMode;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_types::region::Region;
use aws_types::SdkConfig;
use log::info;
use snafu::ensure;
use std::time::Duration;

/// Set up the config for aws calls using the default credential chain, and `sts::assume_role` if a
/// role arn is provided. Calls are retried by the SDK with an adaptive backoff.
pub async fn aws_config(
    region: &Option<String>,
    assume_role: &Option<String>,
    assume_role_session_duration: &Option<i32>,
) -> Result<SdkConfig, Error> {
    let region = region
        .clone()
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    info!(
        "Creating a custom region provider for '{}' to be used in the aws config.",
        region
    );

    let config_loader = aws_config::from_env().retry_config(
        RetryConfig::standard()
            .with_retry_mode(RetryMode::Adaptive)
            .with_max_attempts(SDK_MAX_ATTEMPTS),
    );
    let base_provider = SharedCredentialsProvider::new(default_provider().await);

    let config_loader = match assume_role {
        Some(role_arn) => {
            let duration =
                assume_role_session_duration.unwrap_or(DEFAULT_ASSUME_ROLE_SESSION_DURATION);
            ensure!(duration > 0, error::SessionDurationSnafu { duration });
            info!("Assuming role '{}' for {}s.", role_arn, duration);
            config_loader.credentials_provider(SharedCredentialsProvider::new(
                AssumeRoleProvider::builder(role_arn)
                    .region(Region::new(region.clone()))
                    .session_name(ASSUME_ROLE_SESSION_NAME)
                    .session_length(Duration::from_secs(duration as u64))
                    .build(base_provider),
            ))
        }
        None => config_loader.credentials_provider(base_provider),
    };

    Ok(config_loader.region(Region::new(region)).load().await)
}
