use serde::{Deserialize, Serialize};

/// The lifecycle action requested of a reconciler. This is populated in an environment variable
/// for the `reconcile` program and is useful for function parameters, log messages, etc.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileAction {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

serde_plain::derive_fromstr_from_deserialize!(ReconcileAction, |e| -> crate::Error {
    crate::error::OpaqueError::SerdePlain { source: e }.into()
});
serde_plain::derive_display_from_serialize!(ReconcileAction);

#[test]
fn action_from_str() {
    use std::str::FromStr;
    assert_eq!(
        ReconcileAction::from_str("delete").unwrap(),
        ReconcileAction::Delete
    );
    assert_eq!(ReconcileAction::Import.to_string(), "import");
    assert!(ReconcileAction::from_str("destroy").is_err());
}
