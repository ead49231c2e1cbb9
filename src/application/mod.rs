//! Application layer: use-case orchestration over port traits.
//!
//! Imports from `crate::domain` only. Infrastructure is injected through the
//! traits in [`ports`].

pub mod ports;
pub mod services;
