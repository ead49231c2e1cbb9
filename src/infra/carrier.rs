//! Carrier infrastructure: implements `CarrierInfoProvider`.
//!
//! Without a telephony service on the host, subscriber codes come from the
//! config file's `carrier` section, with per-code environment overrides.

use std::env::VarError;

use anyhow::{Context, Result};

use crate::application::ports::CarrierInfoProvider;
use crate::domain::CarrierContext;

pub const MCC_ENV: &str = "DME_VERIFY_MCC";
pub const MNC_ENV: &str = "DME_VERIFY_MNC";

/// Subscriber codes from configuration and environment.
pub struct ConfiguredCarrierProvider {
    configured: Option<CarrierContext>,
}

impl ConfiguredCarrierProvider {
    #[must_use]
    pub fn new(configured: Option<CarrierContext>) -> Self {
        Self { configured }
    }
}

impl CarrierInfoProvider for ConfiguredCarrierProvider {
    fn subscriber(&self) -> Result<Option<CarrierContext>> {
        let mcc = env_code(MCC_ENV)?;
        let mnc = env_code(MNC_ENV)?;
        if mcc.is_none() && mnc.is_none() {
            return Ok(self.configured.clone());
        }
        let mut ctx = self.configured.clone().unwrap_or_default();
        if mcc.is_some() {
            ctx.mcc = mcc;
        }
        if mnc.is_some() {
            ctx.mnc = mnc;
        }
        Ok(Some(ctx))
    }
}

fn env_code(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e @ VarError::NotUnicode(_)) => Err(e).with_context(|| format!("cannot read {name}")),
    }
}
