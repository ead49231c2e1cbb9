//! `dme-verify version`

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::output::Renderer;

/// Print the crate version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    match app.renderer() {
        Renderer::Json => println!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "version": version }))
                .context("JSON serialization")?
        ),
        Renderer::Human(_) => println!("dme-verify {version}"),
    }
    Ok(())
}
