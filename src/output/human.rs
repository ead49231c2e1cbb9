//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::config::{DmeVerifyConfig, VALID_CONFIG_KEYS};
use crate::domain::{VerificationError, Verified};
use crate::infra::carrier::{MCC_ENV, MNC_ENV};
use crate::infra::config::CONFIG_ENV;
use crate::infra::platform::PLATFORM_VERSION_ENV;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render a verified host.
    pub fn render_verified(&self, verified: &Verified) {
        self.ctx.success(&format!(
            "{} is reachable ({} in {} ms)",
            verified.host.style(self.ctx.styles.target),
            verified.address.style(self.ctx.styles.target),
            verified.elapsed.as_millis()
        ));
    }

    /// Render a verification failure. Always printed, even when quiet.
    pub fn render_failure(&self, host: Option<&str>, err: &VerificationError) {
        match host {
            Some(host) => self.ctx.error(&format!("{host} could not be verified: {err}")),
            None => self.ctx.error(&err.to_string()),
        }
        if let Some(hint) = hint(err) {
            if !self.ctx.quiet {
                eprintln!("    {}", hint.style(self.ctx.styles.dim));
            }
        }
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &DmeVerifyConfig, path: &std::path::Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
            println!("  {:<22} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [CONFIG_ENV, MCC_ENV, MNC_ENV, PLATFORM_VERSION_ENV, "NO_COLOR"] {
            println!(
                "    {:<30} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

fn hint(err: &VerificationError) -> Option<&'static str> {
    match err {
        VerificationError::MissingCarrierInfo => {
            Some("Set carrier codes with: dme-verify config set carrier.mcc <MCC>")
        }
        VerificationError::MissingCountryCode => {
            Some("Set it with: dme-verify config set carrier.mcc <MCC>")
        }
        VerificationError::MissingNetworkCode => {
            Some("Set it with: dme-verify config set carrier.mnc <MNC>")
        }
        VerificationError::ConnectFailed { .. } if err.is_timeout() => {
            Some("Increase the limit with --timeout-ms or probe.timeout_ms")
        }
        _ => None,
    }
}
