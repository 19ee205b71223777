/*!

This library provides the plain-data model shared by resource reconcilers: the `Configuration`
trait for desired and observed documents, resource identities, and tag sets.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use action::ReconcileAction;
pub use configuration::Configuration;
pub use error::{Error, Result};
pub use identity::Identity;
pub use tags::{IgnoreTags, TagDiff, Tags};

mod action;
mod configuration;
pub mod constants;
mod error;
mod identity;
mod tags;
