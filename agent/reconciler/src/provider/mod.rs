mod error;

pub use self::error::{
    ErrorKind, IntoReconcileError, ReconcileError, ReconcileResult, ValidationError,
};
use reconciler_model::{Configuration, Identity, Tags};
use std::fmt::Debug;
use std::str::FromStr;

/// You implement the [`ResourceKind`] trait to describe one kind of cloud resource to the
/// [`Reconciler`]. The trait is never instantiated; it ties together the documents and request
/// shapes of the kind and the pure functions that convert between them.
///
/// ## Custom Types
///
/// - `Desired` is the configuration that a caller declares for the resource.
///
/// - `Observed` is the configuration as reported by the external system. It carries the same
///   attributes as `Desired` plus those computed by the server, such as an ARN.
///
/// - `CreateRequest` is the create call's input. It must be `Clone` because a create call that
///   fails with a transient error is sent again.
///
/// - `Response` is the describe call's output.
///
/// - `Patch` describes in-place changes to attributes other than tags. Kinds whose only
///   updatable attribute is their tag set use `()` and keep the default [`ResourceKind::patch`].
///
/// ## Encode and decode
///
/// `decode(encode(x))` must reproduce `x` for every attribute that the server echoes back. A
/// nested block that is absent from the desired document must be left out of the request
/// entirely, so that the server applies its own default.
///
pub trait ResourceKind: Sized + Send + Sync + 'static {
    /// The name of the resource kind, used in log and error messages.
    const NAME: &'static str;

    /// Whether resources of this kind carry tags. When `true`, [`ResourceKind::arn`] must return
    /// the ARN that the tagging API is addressed with.
    const TAGGABLE: bool = false;

    type Desired: Configuration;
    type Observed: Configuration;
    type CreateRequest: Clone + Debug + Send + Sync;
    type Response: Send;
    type Patch: Debug + Send + Sync;

    /// Check the constraints that cannot be expressed by the types of `Desired`: value formats,
    /// ranges, and attributes that are required only for certain values of a discriminant.
    fn validate(desired: &Self::Desired) -> Result<(), ValidationError>;

    /// The name the user supplied for the resource, if any. When `None`, the reconciler
    /// synthesizes a unique one.
    fn requested_name(desired: &Self::Desired) -> Option<String>;

    /// Build the create request. `tags` is the merged tag set (resource-local over defaults).
    fn encode(desired: &Self::Desired, name: &str, tags: &Tags) -> Self::CreateRequest;

    /// Build the observed document from a describe response. Tags are filled in separately.
    fn decode(response: Self::Response) -> Self::Observed;

    /// The names of attributes that differ between `observed` and `desired` and that cannot be
    /// changed without destroying and recreating the resource.
    fn replacement_attributes(observed: &Self::Observed, desired: &Self::Desired)
        -> Vec<&'static str>;

    /// Bootstrap a desired document from an observed one, e.g. after an import.
    fn to_desired(observed: &Self::Observed) -> Self::Desired;

    /// In-place changes needed to move `observed` to `desired`, if there are any.
    fn patch(_observed: &Self::Observed, _desired: &Self::Desired) -> Option<Self::Patch> {
        None
    }

    /// The ARN used to address the tagging API.
    fn arn(_observed: &Self::Observed) -> Option<String> {
        None
    }

    /// The resource-local tags of the desired document.
    fn desired_tags(_desired: &Self::Desired) -> Tags {
        Tags::default()
    }

    /// The merged tag set that was last observed on the resource.
    fn observed_tags(_observed: &Self::Observed) -> Tags {
        Tags::default()
    }

    /// Record the tags read from the tagging API. `tags` excludes the provider's default tags,
    /// `tags_all` includes them.
    fn set_tags(_observed: &mut Self::Observed, _tags: Tags, _tags_all: Tags) {}

    /// Parse the key given to an import. The default accepts a bare id or `{parent}/{id}`.
    fn parse_import_id(key: &str) -> Result<Identity, ValidationError> {
        Identity::from_str(key).map_err(|e| ValidationError::new("id", e.to_string()))
    }
}

/// The result of a successful create.
#[derive(Debug, Clone)]
pub struct Created<K>
where
    K: ResourceKind,
{
    pub identity: Identity,
    pub observed: K::Observed,
}

/// The result of a successful import.
#[derive(Debug, Clone)]
pub struct Imported<K>
where
    K: ResourceKind,
{
    pub identity: Identity,
    pub observed: K::Observed,
    pub desired: K::Desired,
}

/// What the caller has to do to move a resource from its observed state to a new desired state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Plan {
    /// Nothing differs.
    NoChange,

    /// The resource can be updated in place with [`Reconciler::update`].
    Update,

    /// The listed attributes changed and cannot be updated in place. The caller must delete the
    /// resource and create it again.
    Replace(Vec<&'static str>),
}
