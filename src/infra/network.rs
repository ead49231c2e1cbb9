//! Network infrastructure: implements `NetworkProbe` with tokio sockets and
//! the C library resolver.

use std::io;
use std::net::SocketAddr;

use dns_lookup::{LookupError, LookupErrorKind, getaddrinfo};
use tokio::net::{TcpSocket, TcpStream};

use crate::application::ports::NetworkProbe;
use crate::domain::{OsFailure, codes};

/// Production implementation that performs real resolution and TCP probes.
pub struct TokioNetworkProbe;

/// Socket lifecycle as driven by the verifier.
#[derive(Debug)]
pub enum ProbeSocket {
    /// Created (and possibly bound), not yet connected.
    Open(TcpSocket),
    /// Connected to the remote host.
    Connected(TcpStream),
    /// Released, or consumed by a connect that did not complete.
    Closed,
}

impl NetworkProbe for TokioNetworkProbe {
    type Socket = ProbeSocket;

    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, OsFailure> {
        let name = host.to_string();
        let lookup = tokio::task::spawn_blocking(move || lookup_addrs(&name, port))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "resolver task did not complete");
                OsFailure::new(codes::UNKNOWN)
            })?;
        lookup.map_err(resolver_failure)
    }

    fn open(&self, remote: &SocketAddr) -> Result<ProbeSocket, OsFailure> {
        let socket = match remote {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(|e| os_failure("socket", &e))?;
        Ok(ProbeSocket::Open(socket))
    }

    fn bind(&self, socket: &mut ProbeSocket, local: &SocketAddr) -> Result<(), OsFailure> {
        let ProbeSocket::Open(inner) = socket else {
            return Err(OsFailure::new(codes::UNKNOWN));
        };
        inner.bind(*local).map_err(|e| os_failure("bind", &e))
    }

    async fn connect(&self, socket: &mut ProbeSocket, remote: &SocketAddr) -> Result<(), OsFailure> {
        let ProbeSocket::Open(inner) = std::mem::replace(socket, ProbeSocket::Closed) else {
            return Err(OsFailure::new(codes::UNKNOWN));
        };
        let stream = inner
            .connect(*remote)
            .await
            .map_err(|e| os_failure("connect", &e))?;
        *socket = ProbeSocket::Connected(stream);
        Ok(())
    }

    fn close(&self, socket: &mut ProbeSocket) {
        *socket = ProbeSocket::Closed;
    }
}

/// Blocking `getaddrinfo` for `name`, stamped with `port`.
///
/// No hints are passed, so the C library returns one entry per socket type;
/// duplicates are dropped while keeping resolver order.
fn lookup_addrs(name: &str, port: u16) -> Result<Vec<SocketAddr>, LookupError> {
    let mut addrs: Vec<SocketAddr> = Vec::new();
    for entry in getaddrinfo(Some(name), None, None)? {
        match entry {
            Ok(info) => {
                let mut addr = info.sockaddr;
                addr.set_port(port);
                if !addrs.contains(&addr) {
                    addrs.push(addr);
                }
            }
            Err(e) => tracing::debug!(error = %e, "skipping unusable resolver entry"),
        }
    }
    Ok(addrs)
}

/// Keep the resolver's own code; `EAI_SYSTEM` carries the OS errno as well.
fn resolver_failure(e: LookupError) -> OsFailure {
    let errno = e.error_num();
    tracing::debug!(step = "resolve", errno, error = ?e, "resolver call failed");
    let sub_errno = match e.kind() {
        LookupErrorKind::System => io::Error::from(e).raw_os_error(),
        _ => None,
    };
    OsFailure { errno, sub_errno }
}

/// Extract the OS code(s) from an I/O error.
///
/// The secondary code is taken from a wrapped inner `io::Error`, if any.
fn os_failure(step: &str, e: &io::Error) -> OsFailure {
    tracing::debug!(step, error = %e, kind = ?e.kind(), "platform call failed");
    OsFailure {
        errno: e.raw_os_error().unwrap_or(codes::UNKNOWN),
        sub_errno: e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<io::Error>())
            .and_then(io::Error::raw_os_error),
    }
}
