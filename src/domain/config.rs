//! Domain types and validators for dme-verify configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::Result;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::domain::carrier::{CarrierContext, DEFAULT_DME_DOMAIN, is_valid_mcc, is_valid_mnc};
use crate::domain::error::ConfigError;
use crate::domain::platform::{DEFAULT_MIN_VERSION, parse_os_release};
use crate::domain::verification::{DEFAULT_DME_PORT, VerifyOptions};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "carrier.mcc",
    "carrier.mnc",
    "probe.port",
    "probe.timeout_ms",
    "probe.bind_address",
    "platform.min_version",
    "dme.domain",
];

/// Keys that always hold a value and cannot be unset.
const REQUIRED_KEYS: &[&str] = &["probe.port", "platform.min_version", "dme.domain"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dme-verify/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DmeVerifyConfig {
    /// Subscriber codes. Absent means no subscriber info is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<CarrierConfig>,
    /// Socket probe settings.
    pub probe: ProbeConfig,
    /// Platform gate settings.
    pub platform: PlatformConfig,
    /// DME host naming.
    pub dme: DmeConfig,
}

/// Carrier codes, as a telephony provider would report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CarrierConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<IpAddr>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout_ms: None,
            bind_address: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Minimum platform version, e.g. `"4.0.0"`.
    #[serde(default = "default_min_version")]
    pub min_version: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            min_version: default_min_version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmeConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl Default for DmeConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_DME_PORT
}

fn default_min_version() -> String {
    DEFAULT_MIN_VERSION.to_string()
}

fn default_domain() -> String {
    DEFAULT_DME_DOMAIN.to_string()
}

impl DmeVerifyConfig {
    /// Carrier snapshot described by the `carrier` section.
    #[must_use]
    pub fn carrier_context(&self) -> Option<CarrierContext> {
        self.carrier.as_ref().map(|c| CarrierContext {
            mcc: c.mcc.clone(),
            mnc: c.mnc.clone(),
        })
    }

    /// Build verification options from the stored settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file was hand-edited into values `set` would
    /// refuse: an unparseable `platform.min_version`, or a zero
    /// `probe.port` or `probe.timeout_ms`.
    pub fn verify_options(&self) -> Result<VerifyOptions> {
        let min_platform_version = parse_min_version(&self.platform.min_version)?;
        validate_config_value("probe.port", &self.probe.port.to_string())?;
        if let Some(ms) = self.probe.timeout_ms {
            validate_config_value("probe.timeout_ms", &ms.to_string())?;
        }
        Ok(VerifyOptions {
            port: self.probe.port,
            timeout: self.probe.timeout_ms.map(Duration::from_millis),
            bind_address: self.probe.bind_address,
            min_platform_version,
        })
    }

    /// Current value of `key` for display, or `None` when unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let carrier = self.carrier.as_ref();
        match key {
            "carrier.mcc" => carrier.and_then(|c| c.mcc.clone()),
            "carrier.mnc" => carrier.and_then(|c| c.mnc.clone()),
            "probe.port" => Some(self.probe.port.to_string()),
            "probe.timeout_ms" => self.probe.timeout_ms.map(|t| t.to_string()),
            "probe.bind_address" => self.probe.bind_address.map(|a| a.to_string()),
            "platform.min_version" => Some(self.platform.min_version.clone()),
            "dme.domain" => Some(self.dme.domain.clone()),
            _ => None,
        }
    }

    /// Validate and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "carrier.mcc" => self.carrier.get_or_insert_default().mcc = Some(value.to_string()),
            "carrier.mnc" => self.carrier.get_or_insert_default().mnc = Some(value.to_string()),
            "probe.port" => self.probe.port = value.parse()?,
            "probe.timeout_ms" => self.probe.timeout_ms = Some(value.parse()?),
            "probe.bind_address" => self.probe.bind_address = Some(value.parse()?),
            "platform.min_version" => {
                self.platform.min_version = parse_min_version(value)?.to_string();
            }
            "dme.domain" => self.dme.domain = value.to_string(),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }

    /// Clear an optional setting. Clearing the last carrier code removes the
    /// carrier section entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or required.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        validate_config_key(key)?;
        if REQUIRED_KEYS.contains(&key) {
            return Err(ConfigError::Required(key.to_string()).into());
        }
        match key {
            "carrier.mcc" | "carrier.mnc" => {
                if let Some(carrier) = self.carrier.as_mut() {
                    if key == "carrier.mcc" {
                        carrier.mcc = None;
                    } else {
                        carrier.mnc = None;
                    }
                    if carrier.mcc.is_none() && carrier.mnc.is_none() {
                        self.carrier = None;
                    }
                }
            }
            "probe.timeout_ms" => self.probe.timeout_ms = None,
            "probe.bind_address" => self.probe.bind_address = None,
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

fn parse_min_version(value: &str) -> Result<Version> {
    parse_os_release(value).ok_or_else(|| {
        ConfigError::InvalidValue {
            key: "platform.min_version".to_string(),
            value: value.to_string(),
            expected: "a dotted version such as 4.0.0".to_string(),
        }
        .into()
    })
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let expected = match key {
        "carrier.mcc" if !is_valid_mcc(value) => "exactly 3 digits",
        "carrier.mnc" if !is_valid_mnc(value) => "2 or 3 digits",
        "probe.port" if !matches!(value.parse::<u16>(), Ok(p) if p > 0) => "a port in 1-65535",
        "probe.timeout_ms" if !matches!(value.parse::<u64>(), Ok(t) if t > 0) => {
            "a positive number of milliseconds"
        }
        "probe.bind_address" if value.parse::<IpAddr>().is_err() => "an IPv4 or IPv6 address",
        "platform.min_version" if parse_os_release(value).is_none() => {
            "a dotted version such as 4.0.0"
        }
        "dme.domain" if !is_valid_domain(value) => "a DNS domain such as dme.mobiledgex.net",
        _ => return Ok(()),
    };
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into())
}

fn is_valid_domain(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}
