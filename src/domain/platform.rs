//! Platform version gate.

use semver::Version;

use crate::domain::error::VerificationError;

/// Default minimum platform (kernel) version.
pub const DEFAULT_MIN_VERSION: Version = Version::new(4, 0, 0);

/// Parse an OS release string leniently.
///
/// Takes the leading dotted numeric components and ignores any suffix, so
/// `"6.18.44-fc-v130"` parses as `6.18.44` and `"4.19"` as `4.19.0`.
#[must_use]
pub fn parse_os_release(release: &str) -> Option<Version> {
    let numeric: &str = release
        .trim()
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()?;
    let mut parts = numeric.split('.').filter(|p| !p.is_empty());
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    let patch = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    Some(Version::new(major, minor, patch))
}

/// Check `found` against `required`. An unknown version passes.
///
/// # Errors
///
/// Returns `UnsupportedPlatformVersion` when `found` is older than `required`.
pub fn check_version(found: Option<&Version>, required: &Version) -> Result<(), VerificationError> {
    match found {
        Some(v) if v < required => Err(VerificationError::UnsupportedPlatformVersion {
            found: v.to_string(),
            required: required.to_string(),
        }),
        _ => Ok(()),
    }
}
