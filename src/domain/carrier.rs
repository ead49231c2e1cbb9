//! Carrier metadata and DME host naming.
//!
//! Pure functions only: no I/O, no async, no platform telephony access.

use crate::domain::error::VerificationError;

/// Domain appended to `{mcc}-{mnc}` when generating a DME host.
pub const DEFAULT_DME_DOMAIN: &str = "dme.mobiledgex.net";

/// Snapshot of the active cellular subscriber, read once per verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierContext {
    /// Mobile Country Code.
    pub mcc: Option<String>,
    /// Mobile Network Code.
    pub mnc: Option<String>,
}

/// Both carrier codes, present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierCodes<'a> {
    pub mcc: &'a str,
    pub mnc: &'a str,
}

impl CarrierContext {
    #[must_use]
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: Some(mcc.into()),
            mnc: Some(mnc.into()),
        }
    }
}

/// Classify a carrier snapshot.
///
/// No subscriber at all is reported before any missing individual code, and a
/// missing MCC is reported before a missing MNC. Blank codes count as missing.
///
/// # Errors
///
/// Returns `MissingCarrierInfo`, `MissingCountryCode` or `MissingNetworkCode`.
pub fn require_codes(
    subscriber: Option<&CarrierContext>,
) -> Result<CarrierCodes<'_>, VerificationError> {
    let ctx = subscriber.ok_or(VerificationError::MissingCarrierInfo)?;
    let mcc = non_blank(ctx.mcc.as_deref()).ok_or(VerificationError::MissingCountryCode)?;
    let mnc = non_blank(ctx.mnc.as_deref()).ok_or(VerificationError::MissingNetworkCode)?;
    Ok(CarrierCodes { mcc, mnc })
}

/// Build the carrier-specific DME host, e.g. `310-260.dme.mobiledgex.net`.
///
/// # Errors
///
/// Returns the same carrier errors as [`require_codes`].
pub fn dme_host(
    subscriber: Option<&CarrierContext>,
    domain: &str,
) -> Result<String, VerificationError> {
    let codes = require_codes(subscriber)?;
    Ok(format!("{}-{}.{domain}", codes.mcc, codes.mnc))
}

/// `true` if `value` is a valid Mobile Country Code (exactly 3 digits).
#[must_use]
pub fn is_valid_mcc(value: &str) -> bool {
    value.len() == 3 && value.bytes().all(|b| b.is_ascii_digit())
}

/// `true` if `value` is a valid Mobile Network Code (2 or 3 digits).
#[must_use]
pub fn is_valid_mnc(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

fn non_blank(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}
