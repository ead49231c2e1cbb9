//! Verification request and result types.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use semver::Version;
use serde::Serialize;

use crate::domain::error::InputError;
use crate::domain::platform::DEFAULT_MIN_VERSION;

/// Default DME port.
pub const DEFAULT_DME_PORT: u16 = 38001;

/// Caller-supplied knobs for a single verification.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// TCP port probed on every resolved address.
    pub port: u16,
    /// Upper bound on the connect step. `None` leaves it to the OS.
    pub timeout: Option<Duration>,
    /// Local address to bind before connecting, e.g. the cellular interface.
    pub bind_address: Option<IpAddr>,
    /// Minimum platform version required to attempt verification.
    pub min_platform_version: Version,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_DME_PORT,
            timeout: None,
            bind_address: None,
            min_platform_version: DEFAULT_MIN_VERSION,
        }
    }
}

impl VerifyOptions {
    /// The local address to bind for a connection to `remote`.
    ///
    /// Uses the configured bind address, or the unspecified address of the
    /// same family with an ephemeral port.
    #[must_use]
    pub fn local_addr_for(&self, remote: &SocketAddr) -> SocketAddr {
        let ip = self.bind_address.unwrap_or(match remote {
            SocketAddr::V4(_) => IpAddr::from([0, 0, 0, 0]),
            SocketAddr::V6(_) => IpAddr::from([0u16; 8]),
        });
        SocketAddr::new(ip, 0)
    }
}

/// A host that accepted a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verified {
    /// Host as supplied by the caller.
    pub host: String,
    /// Address that accepted the connection.
    pub address: SocketAddr,
    /// Time spent from resolution to connect.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Reject an empty or blank host argument.
///
/// # Errors
///
/// Returns `InputError::EmptyHost` if `host` is empty after trimming.
pub fn validate_host(host: &str) -> Result<&str, InputError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(InputError::EmptyHost);
    }
    Ok(host)
}
