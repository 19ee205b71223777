/*!

The `bootstrap` module defines a struct and function for getting the necessary information from the
process environment to decide which [`Reconciler`] operation to run and what to run it on.

!*/
use reconciler_model::constants::{
    ENV_DESIRED_PATH, ENV_IDENTITY, ENV_PROVIDER_CONFIG_PATH, ENV_RECONCILE_ACTION,
    ENV_RESOURCE_KIND,
};
use reconciler_model::{Identity, ReconcileAction};
use snafu::{ResultExt, Snafu};
use std::path::PathBuf;
use std::str::FromStr;

/// The public error type for [`BootstrapData::from_env`].
#[derive(Debug, Snafu)]
pub struct BootstrapError(InnerError);

/// The private error type for [`BootstrapData::from_env`].
#[derive(Debug, Snafu)]
pub(crate) enum InnerError {
    #[snafu(display("Unable to read environment variable: '{}': {}", key, source))]
    EnvRead {
        key: String,
        source: std::env::VarError,
    },

    #[snafu(display("Incorrect reconcile action '{}': {}", value, source))]
    ActionParse {
        value: String,
        source: reconciler_model::Error,
    },

    #[snafu(display("Incorrect identity '{}': {}", value, source))]
    IdentityParse {
        value: String,
        source: reconciler_model::Error,
    },
}

/// Data that is read from the environment of the `reconcile` process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BootstrapData {
    /// The action that we should take.
    pub action: ReconcileAction,
    /// The name of the resource kind, e.g. `sagemaker-model`.
    pub resource_kind: String,
    /// The identity of an existing resource, or the key of the resource to import.
    pub identity: Option<String>,
    /// A file holding the desired document.
    pub desired_path: Option<PathBuf>,
    /// A file holding the provider configuration.
    pub provider_config_path: Option<PathBuf>,
}

impl BootstrapData {
    pub fn from_env() -> Result<BootstrapData, BootstrapError> {
        let action_str = required(ENV_RECONCILE_ACTION)?;
        let action = ReconcileAction::from_str(&action_str)
            .context(ActionParseSnafu { value: action_str })?;
        Ok(BootstrapData {
            action,
            resource_kind: required(ENV_RESOURCE_KIND)?,
            identity: optional(ENV_IDENTITY),
            desired_path: optional(ENV_DESIRED_PATH).map(PathBuf::from),
            provider_config_path: optional(ENV_PROVIDER_CONFIG_PATH).map(PathBuf::from),
        })
    }

    /// The identity of the existing resource that the action applies to.
    pub fn parsed_identity(&self) -> Result<Option<Identity>, BootstrapError> {
        self.identity
            .as_deref()
            .map(|value| Identity::from_str(value).context(IdentityParseSnafu { value }))
            .transpose()
            .map_err(BootstrapError::from)
    }
}

fn required(key: &str) -> Result<String, InnerError> {
    std::env::var(key).context(EnvReadSnafu { key })
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
