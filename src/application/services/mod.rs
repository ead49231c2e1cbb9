//! Application services: one module per use-case.

pub mod config_service;
pub mod host_verify;
