use crate::clients::{ApiError, ApiErrorKind};
use reconciler_model::{Identity, ReconcileAction};
use std::fmt::{Display, Formatter};

/// When a reconciler operation fails it states what kind of failure occurred, so that the caller
/// knows whether to abort, recreate, or try again later.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The desired state failed a static or cross-field constraint. No network call was made.
    Validation,

    /// The external system has no record of the identity.
    NotFound,

    /// The external API kept returning an error that is expected to resolve itself, and the retry
    /// ceiling was reached.
    Transient,

    /// Any other error from the external API.
    Fatal,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Invalid desired state",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Transient => "Retries exhausted",
            ErrorKind::Fatal => "Request failed",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

impl From<ApiErrorKind> for ErrorKind {
    fn from(kind: ApiErrorKind) -> Self {
        match kind {
            ApiErrorKind::NotFound => ErrorKind::NotFound,
            ApiErrorKind::Transient => ErrorKind::Transient,
            ApiErrorKind::Fatal => ErrorKind::Fatal,
        }
    }
}

/// A desired state that breaks a constraint. `attribute` names the offending attribute.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidationError {
    attribute: String,
    message: String,
}

impl ValidationError {
    pub fn new<A, S>(attribute: A, message: S) -> Self
    where
        A: Into<String>,
        S: Into<String>,
    {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.message, f)
    }
}

impl std::error::Error for ValidationError {}

/// The error type returned by [`Reconciler`] operations.
#[derive(Debug)]
pub struct ReconcileError {
    kind: ErrorKind,

    /// The operation that failed.
    action: ReconcileAction,

    /// The identity of the resource, when one was known.
    identity: Option<String>,

    /// Any message to be included with the error. This will be included in the formatted display
    /// before `inner`.
    context: Option<String>,

    /// The error that caused this error.
    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

/// The result type returned by [`Reconciler`] operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

impl ReconcileError {
    pub fn new_with_source_and_context<S, E>(
        kind: ErrorKind,
        action: ReconcileAction,
        context: S,
        source: E,
    ) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            action,
            identity: None,
            context: Some(context.into()),
            inner: Some(source.into()),
        }
    }

    pub fn new_with_context<S>(kind: ErrorKind, action: ReconcileAction, context: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            kind,
            action,
            identity: None,
            context: Some(context.into()),
            inner: None,
        }
    }

    /// Wrap an error from the external API, keeping its classification.
    pub fn from_api<S>(action: ReconcileAction, context: S, source: ApiError) -> Self
    where
        S: Into<String>,
    {
        Self::new_with_source_and_context(source.kind().into(), action, context, source)
    }

    pub fn validation(action: ReconcileAction, source: ValidationError) -> Self {
        Self::new_with_source_and_context(
            ErrorKind::Validation,
            action,
            format!("invalid '{}'", source.attribute()),
            source,
        )
    }

    /// Attach the identity of the resource that the operation was working on.
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.identity = Some(identity.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn action(&self) -> ReconcileAction {
        self.action
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.as_ref().map(|some| some.as_ref())
    }

    /// The service error code of the underlying API error, if any.
    pub fn code(&self) -> Option<&str> {
        self.inner()
            .and_then(|inner| inner.downcast_ref::<ApiError>())
            .and_then(ApiError::code)
    }
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} during {}", self.kind, self.action)?;
        if let Some(identity) = self.identity() {
            write!(f, " of '{}'", identity)?;
        }
        if let Some(context) = self.context() {
            write!(f, ", {}", context)?;
        }
        if let Some(inner) = self.inner() {
            write!(f, ": {}", inner)?;
        }
        Ok(())
    }
}

// Make `ReconcileError` function as a standard error.
impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A trait that makes it possible to convert other errors and missing values into a
/// `ReconcileError` using a familiar `context` function.
pub trait IntoReconcileError<T> {
    /// Convert `self` into a `ReconcileError`.
    fn context<S>(self, kind: ErrorKind, action: ReconcileAction, message: S) -> ReconcileResult<T>
    where
        S: Into<String>;
}

// Implement `IntoReconcileError` for all standard `Error + Send + Sync + 'static` types.
impl<T, E> IntoReconcileError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S>(self, kind: ErrorKind, action: ReconcileAction, message: S) -> ReconcileResult<T>
    where
        S: Into<String>,
    {
        self.map_err(|e| ReconcileError::new_with_source_and_context(kind, action, message, e))
    }
}

// Implement `IntoReconcileError` for options where `None` is converted into an error.
impl<T> IntoReconcileError<T> for std::option::Option<T> {
    fn context<S>(self, kind: ErrorKind, action: ReconcileAction, message: S) -> ReconcileResult<T>
    where
        S: Into<String>,
    {
        self.ok_or_else(|| ReconcileError::new_with_context(kind, action, message))
    }
}

#[test]
fn display_names_operation_identity_and_code() {
    let e = ReconcileError::from_api(
        ReconcileAction::Delete,
        "Unable to delete model",
        ApiError::new_with_message(ApiErrorKind::Fatal, Some("AccessDenied"), "nope"),
    )
    .with_identity(&Identity::new("my-model"));
    assert_eq!(e.kind(), ErrorKind::Fatal);
    assert_eq!(e.code(), Some("AccessDenied"));
    assert_eq!(
        e.to_string(),
        "Request failed during delete of 'my-model', Unable to delete model: [AccessDenied] API error: nope"
    );
}
