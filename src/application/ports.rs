//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{CarrierContext, DmeVerifyConfig, OsFailure};

// ── Platform Port ─────────────────────────────────────────────────────────────

/// Reports the running platform's version for the minimum-version gate.
pub trait PlatformInfo {
    /// The platform version, or `None` if it cannot be determined.
    fn os_version(&self) -> Option<semver::Version>;
}

// ── Carrier Port ──────────────────────────────────────────────────────────────

/// Telephony provider for the active cellular subscriber.
pub trait CarrierInfoProvider {
    /// Read the current subscriber's codes.
    ///
    /// `Ok(None)` means no subscriber info is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the telephony service cannot be queried at all.
    fn subscriber(&self) -> Result<Option<CarrierContext>>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts resolution and the socket/bind/connect sequence so the
/// verifier's ordering and error classification can be tested without real
/// network access.
///
/// Every step that can fail reports the originating OS code(s) as an
/// [`OsFailure`].
#[allow(async_fn_in_trait)] // Send bounds not required; the probe runs on the caller's task
pub trait NetworkProbe {
    /// Handle to an open socket, exclusively owned by one verification.
    type Socket;

    /// Resolve `host` to socket addresses on `port`.
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, OsFailure>;
    /// Create a socket suitable for connecting to `remote`.
    fn open(&self, remote: &SocketAddr) -> Result<Self::Socket, OsFailure>;
    /// Bind the socket to `local` before connecting.
    fn bind(&self, socket: &mut Self::Socket, local: &SocketAddr) -> Result<(), OsFailure>;
    /// Connect the socket to `remote`.
    async fn connect(&self, socket: &mut Self::Socket, remote: &SocketAddr)
    -> Result<(), OsFailure>;
    /// Release the socket. Must not fail, and must tolerate repeated calls.
    fn close(&self, socket: &mut Self::Socket);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored configuration cannot be read or parsed.
    fn load(&self) -> Result<DmeVerifyConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    fn save(&self, config: &DmeVerifyConfig) -> Result<()>;
    /// Path of the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
