//! Command handlers: one module per subcommand.

pub mod config;
pub mod host;
pub mod verify;
pub mod version;
