//! Site configuration bundled into the wasm module.
//!
//! The embedded `static/site.json` is the source of truth. When `PUBLIC_URL`
//! is set at compile time (e.g. `/portal` for a sub-directory deploy) it
//! overrides the configured base path.

use sitekit_core::{ConfigError, SiteConfig};

const EMBEDDED_CONFIG: &str = include_str!("../static/site.json");

/// Parse the embedded config, falling back to defaults when it is invalid.
#[must_use]
pub fn load() -> SiteConfig {
    match load_embedded() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("embedded site config rejected, using defaults: {err}");
            with_public_url(SiteConfig::default(), option_env!("PUBLIC_URL"))
        }
    }
}

/// Parse the embedded config.
///
/// # Errors
///
/// Returns an error if `static/site.json` is malformed or out of range.
pub fn load_embedded() -> Result<SiteConfig, ConfigError> {
    let config = SiteConfig::from_json(EMBEDDED_CONFIG)?;
    Ok(with_public_url(config, option_env!("PUBLIC_URL")))
}

fn with_public_url(mut config: SiteConfig, public_url: Option<&str>) -> SiteConfig {
    if let Some(base) = public_url.map(str::trim).filter(|base| !base.is_empty()) {
        config.base_path = base.trim_end_matches('/').to_string();
    }
    config
}
