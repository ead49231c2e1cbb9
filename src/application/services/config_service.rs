//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::DmeVerifyConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored configuration cannot be read.
pub fn load_config(store: &impl ConfigStore) -> Result<DmeVerifyConfig> {
    store.load()
}

/// Validate and persist a single setting, returning the updated config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the store fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<DmeVerifyConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// Clear a single optional setting, returning the updated config.
///
/// # Errors
///
/// Returns an error if the key is unknown or required, or the store fails.
pub fn unset_value(store: &impl ConfigStore, key: &str) -> Result<DmeVerifyConfig> {
    let mut config = store.load()?;
    config.unset(key)?;
    store.save(&config)?;
    Ok(config)
}
