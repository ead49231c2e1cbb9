//! Application service: host verification use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};

use tokio::time::Instant;

use crate::application::ports::{
    CarrierInfoProvider, NetworkProbe, PlatformInfo, ProgressReporter,
};
use crate::domain::platform::check_version;
use crate::domain::{
    CarrierContext, OsFailure, VerificationError, Verified, VerifyOptions, codes, dme_host,
    require_codes,
};

/// Generate the carrier-specific DME host, e.g. `310-260.dme.mobiledgex.net`.
///
/// # Errors
///
/// Returns `MissingCarrierInfo`, `MissingCountryCode` or `MissingNetworkCode`
/// with the same precedence as [`verify_host`].
pub fn generate_dme_host(
    carrier: &impl CarrierInfoProvider,
    domain: &str,
) -> Result<String, VerificationError> {
    dme_host(read_subscriber(carrier, |_| {}).as_ref(), domain)
}

/// Verify that `host` is reachable from the current network attachment.
///
/// Steps run strictly in order and stop at the first failure: platform
/// version gate, carrier metadata, resolution, then socket/bind/connect for
/// each resolved address. The first address that accepts a connection
/// verifies the host; if none does, the failure of the last address tried
/// is returned. Nothing is retried.
///
/// Every socket opened is closed before this function returns, and also when
/// the returned future is dropped mid-connect.
///
/// # Errors
///
/// Returns exactly one [`VerificationError`] describing why the host could
/// not be verified.
pub async fn verify_host<N: NetworkProbe>(
    platform: &impl PlatformInfo,
    carrier: &impl CarrierInfoProvider,
    network: &N,
    reporter: &impl ProgressReporter,
    host: &str,
    options: &VerifyOptions,
) -> Result<Verified, VerificationError> {
    reporter.step("checking platform version...");
    let version = platform.os_version();
    tracing::debug!(?version, required = %options.min_platform_version, "platform gate");
    check_version(version.as_ref(), &options.min_platform_version)?;

    reporter.step("reading carrier info...");
    let subscriber = read_subscriber(carrier, |e| {
        reporter.warn(&format!("carrier info unavailable: {e:#}"));
    });
    let carrier_codes = require_codes(subscriber.as_ref())?;
    tracing::debug!(mcc = carrier_codes.mcc, mnc = carrier_codes.mnc, "carrier codes");

    reporter.step(&format!("resolving {host}..."));
    let started = Instant::now();
    let addresses = network
        .resolve(host, options.port)
        .await
        .map_err(|failure| VerificationError::resolution(host, failure))?;
    tracing::debug!(host, count = addresses.len(), "resolved");
    if addresses.is_empty() {
        return Err(VerificationError::resolution(
            host,
            OsFailure::new(codes::NO_ADDRESSES),
        ));
    }

    let mut last_error = None;
    for remote in &addresses {
        reporter.step(&format!("connecting to {remote}..."));
        match probe_address(network, remote, options).await {
            Ok(()) => {
                reporter.success(&format!("{host} reachable at {remote}"));
                return Ok(Verified {
                    host: host.to_string(),
                    address: *remote,
                    elapsed: started.elapsed(),
                });
            }
            Err(e) => {
                tracing::debug!(%remote, error = %e, "probe failed");
                last_error = Some(e);
            }
        }
    }

    // `addresses` is non-empty, so at least one probe ran.
    Err(last_error.unwrap_or_else(|| {
        VerificationError::resolution(host, OsFailure::new(codes::NO_ADDRESSES))
    }))
}

/// Read the subscriber snapshot; a provider fault counts as no subscriber
/// and is handed to `on_fault`.
fn read_subscriber(
    carrier: &impl CarrierInfoProvider,
    on_fault: impl FnOnce(&anyhow::Error),
) -> Option<CarrierContext> {
    match carrier.subscriber() {
        Ok(subscriber) => subscriber,
        Err(e) => {
            tracing::warn!(error = %e, "telephony provider fault, treating as no subscriber");
            on_fault(&e);
            None
        }
    }
}

/// Open, bind and connect one socket to `remote`.
async fn probe_address<N: NetworkProbe>(
    network: &N,
    remote: &SocketAddr,
    options: &VerifyOptions,
) -> Result<(), VerificationError> {
    let socket = network.open(remote).map_err(VerificationError::socket)?;
    let mut socket = SocketGuard::new(network, socket);

    let local = options.local_addr_for(remote);
    network
        .bind(&mut *socket, &local)
        .map_err(VerificationError::bind)?;

    let connect = network.connect(&mut *socket, remote);
    let result = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, connect)
            .await
            .unwrap_or_else(|_| Err(OsFailure::timed_out())),
        None => connect.await,
    };
    result.map_err(VerificationError::connect)
}

// ── Socket guard ──────────────────────────────────────────────────────────────

/// Closes the wrapped socket through its probe when dropped.
struct SocketGuard<'a, N: NetworkProbe> {
    network: &'a N,
    socket: N::Socket,
}

impl<'a, N: NetworkProbe> SocketGuard<'a, N> {
    fn new(network: &'a N, socket: N::Socket) -> Self {
        Self { network, socket }
    }
}

impl<N: NetworkProbe> Deref for SocketGuard<'_, N> {
    type Target = N::Socket;

    fn deref(&self) -> &Self::Target {
        &self.socket
    }
}

impl<N: NetworkProbe> DerefMut for SocketGuard<'_, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.socket
    }
}

impl<N: NetworkProbe> Drop for SocketGuard<'_, N> {
    fn drop(&mut self) {
        self.network.close(&mut self.socket);
    }
}
