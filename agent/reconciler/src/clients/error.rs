use std::error::Error;
use std::fmt::{Display, Formatter};

/// The result type returned by [`LifecycleClient`] and [`TaggingClient`] implementations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// How the reconciler should treat an error returned by the external API. Client implementations
/// decide this for every call, so the reconciler never has to look at service error codes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ApiErrorKind {
    /// The external system has no record of the resource.
    NotFound,

    /// The error is known to go away on its own, e.g. while a dependency propagates. The
    /// reconciler may retry the call.
    Transient,

    /// Any other error. The reconciler will not retry.
    Fatal,
}

impl ApiErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ApiErrorKind::NotFound => "Resource not found",
            ApiErrorKind::Transient => "Transient API error",
            ApiErrorKind::Fatal => "API error",
        }
    }
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

/// The error type returned by [`LifecycleClient`] and [`TaggingClient`] implementations.
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,

    /// The service error code, e.g. `ValidationException`, when the service returned one.
    code: Option<String>,

    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ApiError {
    pub fn new<E>(kind: ApiErrorKind, code: Option<&str>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            code: code.map(str::to_string),
            inner: Some(source.into()),
        }
    }

    /// Create an error from a message when there is no underlying error type.
    pub fn new_with_message<S>(kind: ApiErrorKind, code: Option<&str>, message: S) -> Self
    where
        S: Into<String>,
    {
        let message: String = message.into();
        Self::new(kind, code, message)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ApiErrorKind::Transient
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .as_ref()
            .map(|inner| inner.as_ref() as &(dyn Error + 'static))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = self.code() {
            write!(f, "[{}] ", code)?;
        }
        match &self.inner {
            None => Display::fmt(self.kind.message(), f),
            Some(inner) => write!(f, "{}: {}", self.kind.message(), inner),
        }
    }
}

/// A trait that makes it possible to convert missing response fields and other errors into an
/// `ApiError` using a familiar `context` function.
pub trait IntoApiError<T> {
    fn context<S>(self, kind: ApiErrorKind, message: S) -> ApiResult<T>
    where
        S: Into<String>;
}

// `None` is converted into an error carrying the message.
impl<T> IntoApiError<T> for std::option::Option<T> {
    fn context<S>(self, kind: ApiErrorKind, message: S) -> ApiResult<T>
    where
        S: Into<String>,
    {
        self.ok_or_else(|| ApiError::new_with_message(kind, None, message))
    }
}

#[test]
fn display_includes_code() {
    let e = ApiError::new_with_message(
        ApiErrorKind::NotFound,
        Some("NotFoundException"),
        "Invalid authorizer identifier specified",
    );
    assert_eq!(
        e.to_string(),
        "[NotFoundException] Resource not found: Invalid authorizer identifier specified"
    );
    assert!(e.is_not_found());
    assert!(!e.is_transient());
}

#[test]
fn source_is_the_wrapped_error() {
    let parse = "x".parse::<u32>().unwrap_err();
    let e = ApiError::new(ApiErrorKind::Fatal, None, parse.clone());
    assert_eq!(e.source().map(|s| s.to_string()), Some(parse.to_string()));
    assert_eq!(e.to_string(), format!("API error: {}", parse));
}
