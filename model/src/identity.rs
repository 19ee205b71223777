use crate::error::{self, Error};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The key that the external system uses for a resource instance. Some resources live inside a
/// parent (an API Gateway authorizer lives inside a REST API), in which case the parent's id is
/// needed alongside the resource's own id for every describe, update and delete call.
///
/// An `Identity` has no setters; once the external system assigns it, it does not change for the
/// lifetime of the resource.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    parent: Option<String>,
    id: String,
}

impl Identity {
    pub fn new<S>(id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            parent: None,
            id: id.into(),
        }
    }

    pub fn with_parent<P, S>(parent: P, id: S) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            parent: Some(parent.into()),
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}/{}", parent, self.id),
            None => Display::fmt(&self.id, f),
        }
    }
}

/// Parses the composite key used when importing: `{parentId}/{id}` or a bare `{id}`.
impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = |reason: &str| -> Error {
            error::IdentityParseSnafu {
                value: s,
                reason: reason.to_string(),
            }
            .build()
            .into()
        };
        match s.split_once('/') {
            None if s.is_empty() => Err(parse_error("the id is empty")),
            None => Ok(Identity::new(s)),
            Some((_, id)) if id.contains('/') => Err(parse_error("expected at most one '/'")),
            Some((parent, id)) if parent.is_empty() || id.is_empty() => {
                Err(parse_error("expected '{parent}/{id}' with both parts non-empty"))
            }
            Some((parent, id)) => Ok(Identity::with_parent(parent, id)),
        }
    }
}
