//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: DNS resolution, sockets,
//! platform queries, and configuration file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod carrier;
pub mod config;
pub mod network;
pub mod platform;
