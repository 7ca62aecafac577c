//! Configuration loading.

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use locker_core::config::AppConfig;
use std::path::Path;

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "LOCKER_";

/// Load configuration from an optional TOML file, then `LOCKER_*`
/// environment variables (`LOCKER_FILES__MAX_FILE_SIZE=1024`).
///
/// Every setting has a default, so neither source is required.
pub fn load_config(path: &Path) -> Result<AppConfig, figment::Error> {
    let mut figment = Figment::new();
    if path.exists() {
        tracing::info!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!(config_path = %path.display(), "No config file found, using defaults");
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"))
        .extract()
}
