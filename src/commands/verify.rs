//! `dme-verify verify`: probe a host over the current network attachment.

use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{CarrierInfoProvider, NetworkProbe, PlatformInfo};
use crate::application::services::config_service;
use crate::application::services::host_verify::{generate_dme_host, verify_host};
use crate::domain::{VerificationError, Verified, VerifyOptions, validate_host};
use crate::infra::carrier::ConfiguredCarrierProvider;
use crate::infra::network::TokioNetworkProbe;
use crate::infra::platform::SystemPlatformInfo;
use crate::output::reporter::{SilentReporter, SpinnerReporter};
use crate::output::{Renderer, json, progress};

/// Exit code reported when the user interrupts a verification.
const INTERRUPTED: u8 = 130;

/// Arguments for `dme-verify verify`.
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Host name or IP literal (defaults to the carrier-generated DME host)
    pub host: Option<String>,

    /// TCP port to probe [default: probe.port]
    #[arg(long)]
    pub port: Option<u16>,

    /// Connect timeout in milliseconds [default: probe.timeout_ms, else none]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Local address to bind before connecting [default: probe.bind_address]
    #[arg(long)]
    pub bind: Option<IpAddr>,
}

impl VerifyArgs {
    /// Apply command-line overrides on top of configured options.
    fn apply(&self, options: &mut VerifyOptions) {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(ms) = self.timeout_ms {
            options.timeout = Some(Duration::from_millis(ms));
        }
        if let Some(bind) = self.bind {
            options.bind_address = Some(bind);
        }
    }
}

/// Run `dme-verify verify`.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or output fails.
pub async fn run(app: &AppContext, args: VerifyArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let mut options = config.verify_options()?;
    args.apply(&mut options);
    let carrier = ConfiguredCarrierProvider::new(config.carrier_context());

    let host = match args.host.as_deref() {
        Some(host) => validate_host(host)?.to_string(),
        None => match generate_dme_host(&carrier, &config.dme.domain) {
            Ok(host) => host,
            Err(e) => return report(app, None, Err(e)),
        },
    };

    tokio::select! {
        code = run_with(app, &SystemPlatformInfo, &carrier, &TokioNetworkProbe, &host, &options) => code,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!(host = %host, "verification interrupted");
            app.output.warn("Interrupted");
            Ok(ExitCode::from(INTERRUPTED))
        }
    }
}

/// Verify `host` with injected ports and render the outcome.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn run_with<N: NetworkProbe>(
    app: &AppContext,
    platform: &impl PlatformInfo,
    carrier: &impl CarrierInfoProvider,
    network: &N,
    host: &str,
    options: &VerifyOptions,
) -> Result<ExitCode> {
    let outcome = if app.is_json() || !app.output.show_progress() {
        verify_host(platform, carrier, network, &SilentReporter, host, options).await
    } else {
        let reporter = SpinnerReporter::new(progress::spinner(&format!("verifying {host}...")));
        let outcome = verify_host(platform, carrier, network, &reporter, host, options).await;
        progress::finish_clear(reporter.bar());
        outcome
    };
    report(app, Some(host), outcome)
}

fn report(
    app: &AppContext,
    host: Option<&str>,
    outcome: Result<Verified, VerificationError>,
) -> Result<ExitCode> {
    match (&outcome, app.renderer()) {
        (Ok(verified), Renderer::Json) => println!("{}", json::format_verified(verified)?),
        (Ok(verified), Renderer::Human(r)) => r.render_verified(verified),
        (Err(e), Renderer::Json) => println!("{}", json::format_verification_error(e)?),
        (Err(e), Renderer::Human(r)) => r.render_failure(host, e),
    }
    if let Err(e) = &outcome {
        tracing::info!(code = e.code(), error = %e, "verification failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
