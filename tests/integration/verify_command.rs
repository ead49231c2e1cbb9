//! End-to-end tests for `dme-verify verify` and `dme-verify host`.
//!
//! Each test points `DME_VERIFY_CONFIG` at a temp path, pins the platform
//! version, and supplies carrier codes through the environment.

#![allow(clippy::expect_used)]

use std::net::TcpListener;

use assert_cmd::Command;
use dme_verify::domain::codes;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    _dir: TempDir,
    config: String,
}

fn env() -> Env {
    let dir = TempDir::new().expect("temp dir");
    let config = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    Env { _dir: dir, config }
}

/// Command with an isolated config, a supported platform, and no carrier.
fn dme_verify(env: &Env) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dme-verify"));
    cmd.env("NO_COLOR", "1")
        .env("DME_VERIFY_CONFIG", &env.config)
        .env("DME_VERIFY_PLATFORM_VERSION", "6.1.0")
        .env_remove("DME_VERIFY_MCC")
        .env_remove("DME_VERIFY_MNC");
    cmd
}

fn with_carrier(mut cmd: Command) -> Command {
    cmd.env("DME_VERIFY_MCC", "310").env("DME_VERIFY_MNC", "260");
    cmd
}

fn json_of(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

#[test]
fn test_verify_loopback_listener_succeeds() {
    let env = env();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let output = with_carrier(dme_verify(&env))
        .args(["verify", "127.0.0.1", "--port", &port.to_string(), "--json"])
        .output()
        .expect("run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let v = json_of(&output);
    assert_eq!(v["verified"], true);
    assert_eq!(v["address"], format!("127.0.0.1:{port}"));
}

#[test]
fn test_verify_closed_port_is_connect_failed() {
    let env = env();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let output = with_carrier(dme_verify(&env))
        .args(["verify", "127.0.0.1", "--port", &port.to_string(), "--json"])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let v = json_of(&output);
    assert_eq!(v["code"], "connect_failed");
    assert!(v["errno"].as_i64().is_some_and(|e| e > 0), "real OS errno expected: {v}");
    assert_eq!(v["timed_out"], false);
}

#[test]
fn test_verify_without_carrier_is_missing_carrier_info() {
    let env = env();
    let output = dme_verify(&env)
        .args(["verify", "127.0.0.1", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_of(&output)["code"], "missing_carrier_info");
}

#[test]
fn test_verify_with_only_mnc_is_missing_mcc() {
    let env = env();
    let output = dme_verify(&env)
        .env("DME_VERIFY_MNC", "260")
        .args(["verify", "127.0.0.1", "--json"])
        .output()
        .expect("run");
    assert_eq!(json_of(&output)["code"], "missing_mcc");
}

#[test]
fn test_verify_old_platform_is_unsupported() {
    let env = env();
    let output = with_carrier(dme_verify(&env))
        .env("DME_VERIFY_PLATFORM_VERSION", "3.2")
        .args(["verify", "127.0.0.1", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_of(&output)["code"], "unsupported_platform_version");
}

#[cfg(unix)]
#[test]
fn test_unreadable_carrier_env_is_missing_carrier_info() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let env = env();
    let output = dme_verify(&env)
        .env("DME_VERIFY_MCC", OsStr::from_bytes(&[0xff, 0xfe]))
        .args(["verify", "127.0.0.1", "--json"])
        .output()
        .expect("run");
    assert_eq!(json_of(&output)["code"], "missing_carrier_info");
}

#[test]
fn test_verify_empty_host_is_rejected() {
    let env = env();
    with_carrier(dme_verify(&env))
        .args(["verify", "  "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Host must not be empty"));
}

#[test]
fn test_verify_human_failure_goes_to_stderr() {
    let env = env();
    dme_verify(&env)
        .args(["verify", "127.0.0.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No cellular subscriber info"))
        .stderr(predicate::str::contains("config set carrier.mcc"));
}

#[test]
fn test_host_prints_generated_dme_host() {
    let env = env();
    with_carrier(dme_verify(&env))
        .arg("host")
        .assert()
        .success()
        .stdout(predicate::str::diff("310-260.dme.mobiledgex.net\n"));
}

#[test]
fn test_host_uses_configured_carrier_and_domain() {
    let env = env();
    std::fs::write(
        &env.config,
        "carrier:\n  mcc: \"262\"\n  mnc: \"01\"\ndme:\n  domain: edge.example.net\n",
    )
    .expect("write config");
    let output = dme_verify(&env)
        .args(["host", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(json_of(&output)["host"], "262-01.edge.example.net");
}

#[test]
fn test_host_env_overrides_configured_code() {
    let env = env();
    std::fs::write(&env.config, "carrier:\n  mcc: \"262\"\n  mnc: \"01\"\n").expect("write config");
    dme_verify(&env)
        .env("DME_VERIFY_MNC", "02")
        .arg("host")
        .assert()
        .success()
        .stdout(predicate::str::contains("262-02.dme.mobiledgex.net"));
}

#[test]
fn test_verify_without_host_uses_generated_host() {
    let env = env();
    // `.invalid` never resolves, so the generated name shows up in the failure.
    std::fs::write(
        &env.config,
        "carrier:\n  mcc: \"001\"\n  mnc: \"01\"\ndme:\n  domain: dme.invalid\n",
    )
    .expect("write config");
    let output = dme_verify(&env)
        .args(["verify", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v = json_of(&output);
    assert_eq!(v["code"], "address_resolution_failed");
    assert!(
        v["message"]
            .as_str()
            .is_some_and(|m| m.contains("001-01.dme.invalid")),
        "{v}"
    );
    assert_ne!(v["errno"], i64::from(codes::UNKNOWN), "resolver code lost: {v}");
}

#[test]
fn test_hand_edited_zero_timeout_is_refused_before_probing() {
    let env = env();
    std::fs::write(&env.config, "probe:\n  timeout_ms: 0\n").expect("write config");
    with_carrier(dme_verify(&env))
        .args(["verify", "127.0.0.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("probe.timeout_ms"))
        .stderr(predicate::str::contains("connect_failed").not());
}
