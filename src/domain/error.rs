//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;

use thiserror::Error;

// ── Low-level failure codes ───────────────────────────────────────────────────

/// Sentinel codes reported in place of an OS errno.
///
/// Kept far below zero so they collide neither with errno values nor with
/// resolver (`EAI_*`) codes, which are small negatives on glibc.
pub mod codes {
    /// The caller-specified connect timeout elapsed.
    pub const TIMED_OUT: i32 = -10_001;
    /// The resolver succeeded but returned no addresses.
    pub const NO_ADDRESSES: i32 = -10_002;
    /// The platform reported a failure without a numeric code.
    pub const UNKNOWN: i32 = -10_003;
}

/// The `(errno, secondary code)` pair reported by a failed platform primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsFailure {
    /// Originating OS error code, or one of [`codes`].
    pub errno: i32,
    /// Optional chained code from an underlying error.
    pub sub_errno: Option<i32>,
}

impl OsFailure {
    #[must_use]
    pub fn new(errno: i32) -> Self {
        Self {
            errno,
            sub_errno: None,
        }
    }

    #[must_use]
    pub fn with_sub(errno: i32, sub_errno: i32) -> Self {
        Self {
            errno,
            sub_errno: Some(sub_errno),
        }
    }

    #[must_use]
    pub fn timed_out() -> Self {
        Self::new(codes::TIMED_OUT)
    }
}

/// Renders `errno N` plus ` (sub N)` when a secondary code is present.
struct Codes(i32, Option<i32>);

impl Codes {
    #[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
    fn of(errno: &i32, sub_errno: &Option<i32>) -> Self {
        Self(*errno, *sub_errno)
    }
}

impl fmt::Display for Codes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            codes::TIMED_OUT => f.write_str("timed out")?,
            codes::NO_ADDRESSES => f.write_str("no addresses")?,
            codes::UNKNOWN => f.write_str("unknown error")?,
            errno => write!(f, "errno {errno}")?,
        }
        if let Some(sub) = self.1 {
            write!(f, " (sub {sub})")?;
        }
        Ok(())
    }
}

// ── Verification errors ───────────────────────────────────────────────────────

/// Why a host could not be verified. Exactly one is produced per failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Cannot resolve {host}: {}", Codes::of(.errno, .sub_errno))]
    AddressResolutionFailed {
        host: String,
        errno: i32,
        sub_errno: Option<i32>,
    },

    #[error("Cannot open socket: {}", Codes::of(.errno, .sub_errno))]
    SocketFailed { errno: i32, sub_errno: Option<i32> },

    #[error("Cannot bind socket: {}", Codes::of(.errno, .sub_errno))]
    BindFailed { errno: i32, sub_errno: Option<i32> },

    #[error("Cannot connect: {}", Codes::of(.errno, .sub_errno))]
    ConnectFailed { errno: i32, sub_errno: Option<i32> },

    #[error("No Mobile Country Code (MCC) for the active subscriber.")]
    MissingCountryCode,

    #[error("No Mobile Network Code (MNC) for the active subscriber.")]
    MissingNetworkCode,

    #[error("No cellular subscriber info available.")]
    MissingCarrierInfo,

    #[error("Platform version {found} is older than the required {required}.")]
    UnsupportedPlatformVersion { found: String, required: String },
}

impl VerificationError {
    #[must_use]
    pub fn resolution(host: &str, failure: OsFailure) -> Self {
        Self::AddressResolutionFailed {
            host: host.to_string(),
            errno: failure.errno,
            sub_errno: failure.sub_errno,
        }
    }

    #[must_use]
    pub fn socket(failure: OsFailure) -> Self {
        Self::SocketFailed {
            errno: failure.errno,
            sub_errno: failure.sub_errno,
        }
    }

    #[must_use]
    pub fn bind(failure: OsFailure) -> Self {
        Self::BindFailed {
            errno: failure.errno,
            sub_errno: failure.sub_errno,
        }
    }

    #[must_use]
    pub fn connect(failure: OsFailure) -> Self {
        Self::ConnectFailed {
            errno: failure.errno,
            sub_errno: failure.sub_errno,
        }
    }

    /// Stable machine-readable identifier, used as the JSON `code`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AddressResolutionFailed { .. } => "address_resolution_failed",
            Self::SocketFailed { .. } => "socket_failed",
            Self::BindFailed { .. } => "bind_failed",
            Self::ConnectFailed { .. } => "connect_failed",
            Self::MissingCountryCode => "missing_mcc",
            Self::MissingNetworkCode => "missing_mnc",
            Self::MissingCarrierInfo => "missing_carrier_info",
            Self::UnsupportedPlatformVersion { .. } => "unsupported_platform_version",
        }
    }

    /// The low-level failure carried by network-probe variants.
    #[must_use]
    pub fn os_failure(&self) -> Option<OsFailure> {
        match *self {
            Self::AddressResolutionFailed {
                errno, sub_errno, ..
            }
            | Self::SocketFailed { errno, sub_errno }
            | Self::BindFailed { errno, sub_errno }
            | Self::ConnectFailed { errno, sub_errno } => Some(OsFailure { errno, sub_errno }),
            _ => None,
        }
    }

    /// `true` when the connect step hit the caller's timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed {
                errno: codes::TIMED_OUT,
                ..
            }
        )
    }
}

// ── Input errors ──────────────────────────────────────────────────────────────

/// Errors in caller-supplied arguments.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Host must not be empty.")]
    EmptyHost,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Setting {0} is required and cannot be unset.")]
    Required(String),
}
