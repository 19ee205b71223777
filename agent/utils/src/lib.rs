/*!

`agent-utils` is a collection of functions that may be used by reconciler programs.
`aws` contains a function that sets up the AWS SDK configuration shared by every client.

!*/

use constants::DEFAULT_AGENT_LEVEL_FILTER;
use env_logger::Builder;
pub use error::Error;
use log::LevelFilter;
use reconciler_model::Configuration;
use serde::Serialize;
use snafu::ResultExt;
use std::path::Path;
use std::{env, fs};

pub mod aws;
pub mod constants;
mod error;

/// Extract the value of `RUST_LOG` if it exists, otherwise log this application at
/// `DEFAULT_AGENT_LEVEL_FILTER`.
pub fn init_agent_logger(bin_crate: &str, log_level: Option<LevelFilter>) {
    match env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level except AWS SDK.
            let log_level = log_level.unwrap_or(DEFAULT_AGENT_LEVEL_FILTER);
            Builder::new()
                // Set log level to Error for crates other than our own.
                .filter_level(LevelFilter::Error)
                // Set all of our crates to the desired level.
                .filter(Some(bin_crate), log_level)
                .filter(Some("agent_utils"), log_level)
                .filter(Some("aws_resources"), log_level)
                .filter(Some("reconciler_model"), log_level)
                .filter(Some("resource_reconciler"), log_level)
                .init();
        }
    }
}

/// Load a provider configuration or resource document. Files ending in `.json` are parsed as JSON,
/// anything else as YAML.
pub fn read_config_file<C, P>(path: P) -> Result<C, Error>
where
    C: Configuration,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path).context(error::ReadFileSnafu { path })?;
    let is_json = path
        .extension()
        .map(|extension| extension.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(&contents).context(error::ParseJsonSnafu { path })
    } else {
        serde_yaml::from_str(&contents).context(error::ParseYamlSnafu { path })
    }
}

/// Print a value using `serde_json` `to_string_pretty` for types that implement Serialize.
pub fn json_display<T: Serialize>(object: T) -> String {
    serde_json::to_string_pretty(&object).unwrap_or_else(|e| format!("Serialization failed: {}", e))
}

/// Implement `Display` using `serde_json` `to_string_pretty` for types that implement Serialize.
#[macro_export]
macro_rules! impl_display_as_json {
    ($i:ident) => {
        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = serde_json::to_string_pretty(self)
                    .unwrap_or_else(|e| format!("Serialization failed: {}", e));
                std::fmt::Display::fmt(&s, f)
            }
        }
    };
}
