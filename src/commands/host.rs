//! `dme-verify host`: print the carrier-generated DME host.

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::CarrierInfoProvider;
use crate::application::services::config_service;
use crate::application::services::host_verify::generate_dme_host;
use crate::infra::carrier::ConfiguredCarrierProvider;
use crate::output::{Renderer, json};

/// Run `dme-verify host`.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or output fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let carrier = ConfiguredCarrierProvider::new(config.carrier_context());
    run_with(app, &carrier, &config.dme.domain)
}

/// Generate and print the host using an injected carrier provider.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn run_with(
    app: &AppContext,
    carrier: &impl CarrierInfoProvider,
    domain: &str,
) -> Result<ExitCode> {
    match (generate_dme_host(carrier, domain), app.renderer()) {
        (Ok(host), Renderer::Json) => {
            let out = serde_json::json!({ "host": host });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).context("JSON serialization")?
            );
            Ok(ExitCode::SUCCESS)
        }
        (Ok(host), Renderer::Human(_)) => {
            println!("{host}");
            Ok(ExitCode::SUCCESS)
        }
        (Err(e), Renderer::Json) => {
            println!("{}", json::format_verification_error(&e)?);
            Ok(ExitCode::FAILURE)
        }
        (Err(e), Renderer::Human(r)) => {
            r.render_failure(None, &e);
            Ok(ExitCode::FAILURE)
        }
    }
}
