/*!

The `reconciler` module defines the `Reconciler` object which moves a resource through create,
read, update, delete and import.

!*/

use crate::clients::{LifecycleClient, TaggingClient};
use crate::context::ProviderContext;
use crate::provider::{
    Created, ErrorKind, Imported, IntoReconcileError, Plan, ReconcileError, ReconcileResult,
    ResourceKind,
};
use crate::retry::{retry_transient, Retried};
use log::{debug, info, trace, warn};
use reconciler_model::constants::UNIQUE_ID_PREFIX;
use reconciler_model::{Identity, ReconcileAction, Tags};
use std::marker::PhantomData;
use uuid::Uuid;

/// The `Reconciler` converts desired documents of one [`ResourceKind`] into calls against the
/// external API and converts the API's responses back into observed documents.
///
/// It holds no state of its own. The clients and provider-wide settings are passed in with every
/// call as a [`ProviderContext`], so one `Reconciler` can serve any number of resources, including
/// concurrently.
#[derive(Debug)]
pub struct Reconciler<K>
where
    K: ResourceKind,
{
    _kind: PhantomData<fn() -> K>,
}

impl<K> Default for Reconciler<K>
where
    K: ResourceKind,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Reconciler<K>
where
    K: ResourceKind,
{
    pub fn new() -> Self {
        Self { _kind: PhantomData }
    }

    /// Create the resource. The desired state is validated before any call is made. A create call
    /// that fails with a transient error is retried according to `ctx.create_retry`. On success
    /// the resource is read back so that the returned observed state is authoritative.
    pub async fn create<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        desired: &K::Desired,
    ) -> ReconcileResult<Created<K>>
    where
        L: LifecycleClient<K>,
        T: TaggingClient,
    {
        K::validate(desired).map_err(|e| ReconcileError::validation(ReconcileAction::Create, e))?;

        let name = K::requested_name(desired).unwrap_or_else(unique_name);
        let tags = if K::TAGGABLE {
            K::desired_tags(desired)
                .merge(&ctx.default_tags)
                .ignore_aws()
        } else {
            Tags::default()
        };
        let request = K::encode(desired, &name, &tags);
        debug!("{} '{}' create request: {:?}", K::NAME, name, request);

        let identity = retry_transient(
            &ctx.create_retry,
            &format!("Create {} '{}'", K::NAME, name),
            || ctx.lifecycle.create(request.clone()),
        )
        .await
        .into_result()
        .map_err(|e| {
            ReconcileError::from_api(
                ReconcileAction::Create,
                format!("Unable to create {} '{}'", K::NAME, name),
                e,
            )
        })?;
        info!("Created {} '{}'", K::NAME, identity);

        match self.read(ctx, &identity).await? {
            Some(observed) => Ok(Created { identity, observed }),
            None => Err(ReconcileError::new_with_context(
                ErrorKind::NotFound,
                ReconcileAction::Create,
                format!("{} was not found immediately after it was created", K::NAME),
            )
            .with_identity(&identity)),
        }
    }

    /// Read the resource. `Ok(None)` means the external system has no record of it; the caller
    /// should forget the identity rather than treat this as a failure.
    pub async fn read<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        identity: &Identity,
    ) -> ReconcileResult<Option<K::Observed>>
    where
        L: LifecycleClient<K>,
        T: TaggingClient,
    {
        let response = match ctx.lifecycle.describe(identity).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                info!(
                    "Unable to find {} '{}', it no longer exists: {}",
                    K::NAME,
                    identity,
                    e
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(ReconcileError::from_api(
                    ReconcileAction::Read,
                    format!("Unable to describe {}", K::NAME),
                    e,
                )
                .with_identity(identity))
            }
        };
        let mut observed = K::decode(response);

        if K::TAGGABLE {
            match K::arn(&observed) {
                Some(arn) => {
                    let tags_all = ctx
                        .tagging
                        .list_tags(&arn)
                        .await
                        .map_err(|e| {
                            ReconcileError::from_api(
                                ReconcileAction::Read,
                                format!("Unable to list tags for '{}'", arn),
                                e,
                            )
                            .with_identity(identity)
                        })?
                        .ignore_aws()
                        .ignore_config(&ctx.ignore_tags);
                    let tags = tags_all.remove_defaults(&ctx.default_tags);
                    K::set_tags(&mut observed, tags, tags_all);
                }
                None => warn!(
                    "{} '{}' has no ARN, unable to read its tags",
                    K::NAME,
                    identity
                ),
            }
        }

        trace!("Observed {} '{}': {:?}", K::NAME, identity, observed);
        Ok(Some(observed))
    }

    /// Decide how to move the resource from `observed` to `desired`.
    pub fn plan<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        observed: &K::Observed,
        desired: &K::Desired,
    ) -> Plan {
        let replace = K::replacement_attributes(observed, desired);
        if !replace.is_empty() {
            Plan::Replace(replace)
        } else if K::patch(observed, desired).is_some()
            || (K::TAGGABLE && !self.tag_diff(ctx, observed, desired).is_empty())
        {
            Plan::Update
        } else {
            Plan::NoChange
        }
    }

    /// Update the resource in place and return its refreshed observed state. Attributes that
    /// force replacement must be routed to [`Reconciler::delete`] and [`Reconciler::create`] by
    /// the caller; an update that includes them is refused before any call is made.
    pub async fn update<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        identity: &Identity,
        observed: &K::Observed,
        desired: &K::Desired,
    ) -> ReconcileResult<K::Observed>
    where
        L: LifecycleClient<K>,
        T: TaggingClient,
    {
        K::validate(desired).map_err(|e| {
            ReconcileError::validation(ReconcileAction::Update, e).with_identity(identity)
        })?;
        let replace = K::replacement_attributes(observed, desired);
        if !replace.is_empty() {
            return Err(ReconcileError::new_with_context(
                ErrorKind::Validation,
                ReconcileAction::Update,
                format!(
                    "changing {} requires replacing the resource",
                    replace.join(", ")
                ),
            )
            .with_identity(identity));
        }

        if let Some(patch) = K::patch(observed, desired) {
            debug!("Updating {} '{}': {:?}", K::NAME, identity, patch);
            ctx.lifecycle.update(identity, patch).await.map_err(|e| {
                ReconcileError::from_api(
                    ReconcileAction::Update,
                    format!("Unable to update {}", K::NAME),
                    e,
                )
                .with_identity(identity)
            })?;
        }

        if K::TAGGABLE {
            let diff = self.tag_diff(ctx, observed, desired);
            if !diff.is_empty() {
                let arn = K::arn(observed)
                    .context(
                        ErrorKind::Fatal,
                        ReconcileAction::Update,
                        format!("{} has no ARN, unable to update its tags", K::NAME),
                    )
                    .map_err(|e| e.with_identity(identity))?;
                debug!(
                    "Updating tags of '{}': removing {:?}, adding {:?}",
                    arn, diff.removed, diff.added
                );
                ctx.tagging.update_tags(&arn, &diff).await.map_err(|e| {
                    ReconcileError::from_api(
                        ReconcileAction::Update,
                        format!("Unable to update tags for '{}'", arn),
                        e,
                    )
                    .with_identity(identity)
                })?;
            }
        }

        self.read(ctx, identity).await?.ok_or_else(|| {
            ReconcileError::new_with_context(
                ErrorKind::NotFound,
                ReconcileAction::Update,
                format!("{} disappeared while it was being updated", K::NAME),
            )
            .with_identity(identity)
        })
    }

    /// Delete the resource. Deleting a resource that no longer exists succeeds. A delete call that
    /// fails with a transient error is retried according to `ctx.delete_retry`; once the ceiling
    /// is reached one final attempt is made and its result is returned.
    pub async fn delete<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        identity: &Identity,
    ) -> ReconcileResult<()>
    where
        L: LifecycleClient<K>,
        T: TaggingClient,
    {
        info!("Deleting {} '{}'", K::NAME, identity);
        let what = format!("Delete {} '{}'", K::NAME, identity);
        let result = match retry_transient(&ctx.delete_retry, &what, || {
            ctx.lifecycle.delete(identity)
        })
        .await
        {
            Retried::Done(result) => result,
            Retried::TimedOut(e) => {
                warn!("{} timed out ({}), making a final attempt", what, e);
                ctx.lifecycle.delete(identity).await
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                info!("{} '{}' was already deleted", K::NAME, identity);
                Ok(())
            }
            Err(e) => Err(ReconcileError::from_api(
                ReconcileAction::Delete,
                format!("Unable to delete {}", K::NAME),
                e,
            )
            .with_identity(identity)),
        }
    }

    /// Parse an import key and read the resource it names. The returned desired document is
    /// bootstrapped from the observed one. `Ok(None)` means the resource does not exist.
    pub async fn import<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        key: &str,
    ) -> ReconcileResult<Option<Imported<K>>>
    where
        L: LifecycleClient<K>,
        T: TaggingClient,
    {
        let identity = K::parse_import_id(key)
            .map_err(|e| ReconcileError::validation(ReconcileAction::Import, e))?;
        Ok(self.read(ctx, &identity).await?.map(|observed| Imported {
            desired: K::to_desired(&observed),
            identity,
            observed,
        }))
    }

    fn tag_diff<L, T>(
        &self,
        ctx: &ProviderContext<L, T>,
        observed: &K::Observed,
        desired: &K::Desired,
    ) -> reconciler_model::TagDiff {
        let new = K::desired_tags(desired)
            .merge(&ctx.default_tags)
            .ignore_aws()
            .ignore_config(&ctx.ignore_tags);
        Tags::diff(&K::observed_tags(observed), &new)
    }
}

/// A name that is unique across resources, for kinds whose name the user may leave out.
fn unique_name() -> String {
    format!("{}{}", UNIQUE_ID_PREFIX, Uuid::new_v4().simple())
}
