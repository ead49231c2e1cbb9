//! `TokioNetworkProbe` against real loopback sockets.

#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use dme_verify::application::ports::{
    CarrierInfoProvider, NetworkProbe, PlatformInfo, ProgressReporter,
};
use dme_verify::application::services::host_verify::verify_host;
use dme_verify::domain::{CarrierContext, VerificationError, VerifyOptions, codes};
use dme_verify::infra::network::{ProbeSocket, TokioNetworkProbe};
use semver::Version;
use tokio::net::TcpListener;

struct Platform;

impl PlatformInfo for Platform {
    fn os_version(&self) -> Option<Version> {
        Some(Version::new(6, 1, 0))
    }
}

struct Carrier;

impl CarrierInfoProvider for Carrier {
    fn subscriber(&self) -> anyhow::Result<Option<CarrierContext>> {
        Ok(Some(CarrierContext::new("310", "260")))
    }
}

struct Quiet;

impl ProgressReporter for Quiet {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

fn options(port: u16) -> VerifyOptions {
    VerifyOptions {
        port,
        timeout: Some(Duration::from_secs(5)),
        ..VerifyOptions::default()
    }
}

/// A loopback port with nothing listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("addr").port()
}

/// Wait for the stream to become readable and read once.
async fn read_once(stream: &tokio::net::TcpStream) -> usize {
    let mut buf = [0u8; 1];
    loop {
        stream.readable().await.expect("readable");
        match stream.try_read(&mut buf) {
            Ok(n) => return n,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => panic!("read failed: {e}"),
        }
    }
}

#[tokio::test]
async fn test_verifies_listening_loopback_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let verified = verify_host(
        &Platform,
        &Carrier,
        &TokioNetworkProbe,
        &Quiet,
        "127.0.0.1",
        &options(port),
    )
    .await
    .expect("verified");

    assert_eq!(verified.address, SocketAddr::from(([127, 0, 0, 1], port)));
    // The accepted connection is closed by the time the verifier returns.
    let (stream, _) = listener.accept().await.expect("accept");
    assert_eq!(read_once(&stream).await, 0, "peer should observe EOF");
}

#[tokio::test]
async fn test_refused_port_reports_connect_failed_with_os_code() {
    let port = closed_port().await;
    let err = verify_host(
        &Platform,
        &Carrier,
        &TokioNetworkProbe,
        &Quiet,
        "127.0.0.1",
        &options(port),
    )
    .await
    .expect_err("nothing listening");

    let VerificationError::ConnectFailed { errno, .. } = err else {
        panic!("expected ConnectFailed, got {err:?}");
    };
    assert!(errno > 0, "expected a real OS errno, got {errno}");
}

#[tokio::test]
async fn test_bind_to_foreign_address_reports_bind_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let opts = VerifyOptions {
        // TEST-NET-1 is never assigned to a local interface.
        bind_address: Some("192.0.2.1".parse().expect("ip")),
        ..options(port)
    };

    let err = verify_host(
        &Platform,
        &Carrier,
        &TokioNetworkProbe,
        &Quiet,
        "127.0.0.1",
        &opts,
    )
    .await
    .expect_err("cannot bind a foreign address");
    assert_eq!(err.code(), "bind_failed");
}

#[tokio::test]
async fn test_resolves_localhost_to_loopback() {
    let addrs = TokioNetworkProbe
        .resolve("localhost", 38001)
        .await
        .expect("localhost resolves");
    assert!(!addrs.is_empty());
    assert!(addrs.iter().all(|a| a.ip().is_loopback() && a.port() == 38001));
}

#[tokio::test]
async fn test_connect_moves_socket_to_connected_then_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let remote = listener.local_addr().expect("addr");
    let probe = TokioNetworkProbe;

    let mut socket = probe.open(&remote).expect("open");
    probe
        .bind(&mut socket, &"127.0.0.1:0".parse().expect("addr"))
        .expect("bind");
    probe.connect(&mut socket, &remote).await.expect("connect");
    assert!(matches!(socket, ProbeSocket::Connected(_)));

    probe.close(&mut socket);
    assert!(matches!(socket, ProbeSocket::Closed));
}

#[tokio::test]
async fn test_unresolvable_name_keeps_resolver_code() {
    let failure = TokioNetworkProbe
        .resolve("bad.invalid", 38001)
        .await
        .expect_err(".invalid never resolves");
    assert_ne!(failure.errno, codes::UNKNOWN, "resolver code lost: {failure:?}");
    assert_ne!(failure.errno, codes::NO_ADDRESSES);

    let err = verify_host(
        &Platform,
        &Carrier,
        &TokioNetworkProbe,
        &Quiet,
        "bad.invalid",
        &options(38001),
    )
    .await
    .expect_err("resolution fails");
    let VerificationError::AddressResolutionFailed { host, errno, .. } = err else {
        panic!("expected AddressResolutionFailed, got {err:?}");
    };
    assert_eq!(host, "bad.invalid");
    assert_ne!(errno, codes::UNKNOWN);
}
