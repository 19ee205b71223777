/*!

`reconcile` runs one lifecycle action against one AWS resource and prints the result as JSON.

The action and its inputs are read from the environment:

- `RECONCILE_ACTION`: one of `create`, `read`, `update`, `delete` or `import`.
- `RECONCILE_RESOURCE_KIND`: `authorizer` or `sagemaker-model`.
- `RECONCILE_IDENTITY`: the identity of an existing resource, or the key of the resource to
  import. Authorizers are identified as `{rest_api_id}/{authorizer_id}`, models by their name.
- `RECONCILE_DESIRED_PATH`: a YAML or JSON file holding the desired document, needed by `create`
  and `update`.
- `RECONCILE_PROVIDER_CONFIG_PATH`: an optional YAML or JSON file holding the provider
  configuration.

Here is an example provider configuration:

```yaml
region: us-west-2
defaultTags:
  team: ml-platform
ignoreTags:
  keyPrefixes: ["kubernetes.io/"]
deleteTimeoutSeconds: 600
```

!*/

use agent_utils::aws::aws_config;
use agent_utils::{init_agent_logger, json_display, read_config_file};
use aws_resource_types::ProviderConfig;
use aws_resources::error::{self, Result};
use aws_resources::{
    provider_context, ApiGatewayClient, Authorizer, SagemakerClient, SagemakerModel,
    KIND_AUTHORIZER, KIND_SAGEMAKER_MODEL, KNOWN_KINDS,
};
use log::{error, info, warn};
use reconciler_model::constants::{ENV_DESIRED_PATH, ENV_IDENTITY};
use resource_reconciler::provider::ResourceKind;
use resource_reconciler::{
    BootstrapData, Identity, LifecycleClient, NoTagging, Plan, ProviderContext, ReconcileAction,
    Reconciler, TaggingClient,
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt};

/// What `reconcile` prints on success.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Outcome<O, D> {
    action: ReconcileAction,
    kind: &'static str,
    identity: Option<String>,
    /// `None` after a delete, or when the resource no longer exists.
    observed: Option<O>,
    /// Only set by an import.
    desired: Option<D>,
}

#[tokio::main]
async fn main() {
    init_agent_logger(env!("CARGO_CRATE_NAME"), None);
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let data = BootstrapData::from_env().context(error::BootstrapSnafu)?;
    let config = match &data.provider_config_path {
        Some(path) => {
            read_config_file::<ProviderConfig, _>(path).context(error::ProviderConfigSnafu)?
        }
        None => ProviderConfig::default(),
    };
    let sdk_config = aws_config(
        &config.region,
        &config.assume_role,
        &config.assume_role_session_duration,
    )
    .await
    .context(error::AwsConfigSnafu)?;

    match data.resource_kind.as_str() {
        KIND_AUTHORIZER => {
            let ctx = provider_context(&config, ApiGatewayClient::new(&sdk_config), NoTagging);
            reconcile::<Authorizer, _, _>(&data, &ctx).await
        }
        KIND_SAGEMAKER_MODEL => {
            let client = SagemakerClient::new(&sdk_config);
            let ctx = provider_context(&config, client.clone(), client);
            reconcile::<SagemakerModel, _, _>(&data, &ctx).await
        }
        kind => error::UnknownKindSnafu {
            kind,
            known: KNOWN_KINDS,
        }
        .fail(),
    }
}

async fn reconcile<K, L, T>(data: &BootstrapData, ctx: &ProviderContext<L, T>) -> Result<()>
where
    K: ResourceKind,
    L: LifecycleClient<K>,
    T: TaggingClient,
{
    let reconciler = Reconciler::<K>::new();
    let mut outcome = Outcome::<K::Observed, K::Desired> {
        action: data.action,
        kind: K::NAME,
        identity: data.identity.clone(),
        observed: None,
        desired: None,
    };

    match data.action {
        ReconcileAction::Create => {
            let desired = desired::<K>(data)?;
            let created = reconciler
                .create(ctx, &desired)
                .await
                .context(error::ReconcileSnafu)?;
            info!("Created {} '{}'", K::NAME, created.identity);
            outcome.identity = Some(created.identity.to_string());
            outcome.observed = Some(created.observed);
        }
        ReconcileAction::Read => {
            let identity = identity(data)?;
            outcome.observed = reconciler
                .read(ctx, &identity)
                .await
                .context(error::ReconcileSnafu)?;
            if outcome.observed.is_none() {
                warn!("{} '{}' no longer exists", K::NAME, identity);
            }
        }
        ReconcileAction::Update => {
            let identity = identity(data)?;
            let desired = desired::<K>(data)?;
            let observed = reconciler
                .read(ctx, &identity)
                .await
                .context(error::ReconcileSnafu)?
                .context(error::GoneSnafu {
                    identity: identity.to_string(),
                })?;
            let observed = match reconciler.plan(ctx, &observed, &desired) {
                Plan::NoChange => {
                    info!("{} '{}' is up to date", K::NAME, identity);
                    observed
                }
                // Replacement is refused by the update call itself, with the attributes named.
                Plan::Update | Plan::Replace(_) => reconciler
                    .update(ctx, &identity, &observed, &desired)
                    .await
                    .context(error::ReconcileSnafu)?,
            };
            outcome.observed = Some(observed);
        }
        ReconcileAction::Delete => {
            let identity = identity(data)?;
            reconciler
                .delete(ctx, &identity)
                .await
                .context(error::ReconcileSnafu)?;
        }
        ReconcileAction::Import => {
            let key = data.identity.as_deref().context(error::MissingEnvSnafu {
                key: ENV_IDENTITY,
                action: data.action.to_string(),
            })?;
            let imported = reconciler
                .import(ctx, key)
                .await
                .context(error::ReconcileSnafu)?
                .context(error::GoneSnafu { identity: key })?;
            outcome.identity = Some(imported.identity.to_string());
            outcome.observed = Some(imported.observed);
            outcome.desired = Some(imported.desired);
        }
    }

    println!("{}", json_display(&outcome));
    Ok(())
}

fn identity(data: &BootstrapData) -> Result<Identity> {
    data.parsed_identity()
        .context(error::BootstrapSnafu)?
        .context(error::MissingEnvSnafu {
            key: ENV_IDENTITY,
            action: data.action.to_string(),
        })
}

fn desired<K>(data: &BootstrapData) -> Result<K::Desired>
where
    K: ResourceKind,
{
    let path = data
        .desired_path
        .as_ref()
        .context(error::MissingEnvSnafu {
            key: ENV_DESIRED_PATH,
            action: data.action.to_string(),
        })?;
    read_config_file::<K::Desired, _>(path).context(error::DesiredDocumentSnafu)
}
