use resource_reconciler::provider::ReconcileError;
use resource_reconciler::BootstrapError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unable to configure the AWS SDK: {}", source))]
    AwsConfig { source: agent_utils::Error },

    #[snafu(display("Unable to read the environment: {}", source))]
    Bootstrap { source: BootstrapError },

    #[snafu(display("Unable to read the desired document: {}", source))]
    DesiredDocument { source: agent_utils::Error },

    #[snafu(display("{} was not found, it must be created again", identity))]
    Gone { identity: String },

    #[snafu(display("'{}' must be set for action '{}'", key, action))]
    MissingEnv { key: String, action: String },

    #[snafu(display("Unable to read the provider configuration: {}", source))]
    ProviderConfig { source: agent_utils::Error },

    #[snafu(display("{}", source))]
    Reconcile { source: ReconcileError },

    #[snafu(display("Unknown resource kind '{}', expected one of {:?}", kind, known))]
    UnknownKind {
        kind: String,
        known: &'static [&'static str],
    },
}

pub type Result<T> = std::result::Result<T, Error>;
