//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod carrier;
pub mod config;
pub mod error;
pub mod platform;
pub mod verification;

pub use carrier::{CarrierContext, dme_host, require_codes};
pub use config::{DmeVerifyConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, InputError, OsFailure, VerificationError, codes};
pub use verification::{Verified, VerifyOptions, validate_host};
