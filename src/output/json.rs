//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object on
//! stdout, both on success and on failure.

use anyhow::{Context, Result};

use crate::domain::config::{DmeVerifyConfig, VALID_CONFIG_KEYS};
use crate::domain::{VerificationError, Verified};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a failed verification, including the low-level codes if any.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_verification_error(err: &VerificationError) -> Result<String> {
    let mut obj = serde_json::json!({
        "error": true,
        "verified": false,
        "message": err.to_string(),
        "code": err.code(),
    });
    if let Some(failure) = err.os_failure() {
        obj["errno"] = failure.errno.into();
        obj["sub_errno"] = failure.sub_errno.into();
        obj["timed_out"] = err.is_timeout().into();
    }
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a successful verification.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_verified(verified: &Verified) -> Result<String> {
    let mut obj = serde_json::to_value(verified).context("JSON serialization failed")?;
    obj["verified"] = true.into();
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the effective configuration as a flat key/value object.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_config(config: &DmeVerifyConfig, path: &std::path::Path) -> Result<String> {
    let settings: serde_json::Map<String, serde_json::Value> = VALID_CONFIG_KEYS
        .iter()
        .map(|key| ((*key).to_string(), config.get(key).into()))
        .collect();
    let obj = serde_json::json!({
        "path": path.display().to_string(),
        "settings": settings,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
