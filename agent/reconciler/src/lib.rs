/*!

The `resource-reconciler` library drives a cloud resource through its lifecycle: create, read,
update, delete and import. You describe a kind of resource by implementing the [`ResourceKind`]
trait, which says how a desired document is validated and encoded into a create request and how
a describe response is decoded back into an observed document. You then hand a [`Reconciler`] a
[`ProviderContext`] holding the [`LifecycleClient`] and [`TaggingClient`] that talk to the
external API.

The reconciler holds no shared mutable state. Distinct resource instances may be reconciled
concurrently, each against its own [`Identity`].

!*/

mod bootstrap;
pub mod clients;
mod context;
pub mod provider;
mod reconciler;
pub mod retry;

pub use bootstrap::{BootstrapData, BootstrapError};
pub use clients::{LifecycleClient, NoTagging, TaggingClient};
pub use context::ProviderContext;
pub use provider::{Created, Imported, Plan, ResourceKind};
pub use reconciler::Reconciler;
pub use reconciler_model::{Configuration, Identity, ReconcileAction, Tags};
pub use retry::RetryPolicy;
