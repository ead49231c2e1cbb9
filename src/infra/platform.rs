//! Platform infrastructure: implements `PlatformInfo`.

use semver::Version;

use crate::application::ports::PlatformInfo;
use crate::domain::platform::parse_os_release;

/// Environment variable that overrides the detected platform version.
pub const PLATFORM_VERSION_ENV: &str = "DME_VERIFY_PLATFORM_VERSION";

/// Production implementation that reads the running kernel release.
pub struct SystemPlatformInfo;

impl PlatformInfo for SystemPlatformInfo {
    fn os_version(&self) -> Option<Version> {
        if let Ok(val) = std::env::var(PLATFORM_VERSION_ENV) {
            return parse_os_release(&val);
        }
        kernel_release().as_deref().and_then(parse_os_release)
    }
}

#[cfg(target_os = "linux")]
fn kernel_release() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease").ok()
}

#[cfg(not(target_os = "linux"))]
fn kernel_release() -> Option<String> {
    None
}
