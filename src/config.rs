//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Stock
//! defaults are overridden by the content root's `config.toml`, which in turn
//! can be overridden per collection:
//!
//! ```text
//! content/
//! ├── config.toml              # Root config (overrides stock defaults)
//! ├── blog/
//! │   ├── config.toml          # Blog overrides (e.g. forms.source = "blog")
//! │   └── ...
//! └── guides/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Marketing Insights"
//! tagline = "Practical guides for local businesses"
//! base_url = "http://localhost:8000"   # Canonical origin, used in share links
//! base_path = "/"                      # Prefix for root-relative links
//!
//! [forms]
//! endpoint = "https://formspree.io/f/your-form-id"
//! source = "website"        # `source` field sent with every lead
//! timeout_secs = 15         # Per-request timeout for lead submissions
//!
//! [scroll_spy]
//! band_top = 0.2            # Trigger band, as fractions of viewport height
//! band_bottom = 0.8
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::scroll_spy::TriggerBand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and URLs.
    pub site: SiteSection,
    /// Lead-capture form backend.
    pub forms: FormsConfig,
    /// Outline highlighting band.
    pub scroll_spy: TriggerBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub tagline: String,
    /// Canonical origin, e.g. `https://example.com`.
    pub base_url: String,
    /// Path prefix the site is served under; starts and ends with `/`.
    pub base_path: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Marketing Insights".to_string(),
            tagline: "Practical guides for local businesses".to_string(),
            base_url: "http://localhost:8000".to_string(),
            base_path: "/".to_string(),
        }
    }
}

impl SiteSection {
    /// Absolute URL of a site-relative path (`blog/a/` → `https://x.com/blog/a/`).
    pub fn canonical_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.base_path,
            path.trim_start_matches('/')
        )
    }

    /// Root-relative href of a site-relative path.
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormsConfig {
    /// Form backend URL leads are POSTed to.
    pub endpoint: String,
    /// Value of the `source` field sent with each lead.
    pub source: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://formspree.io/f/your-form-id".to_string(),
            source: "website".to_string(),
            timeout_secs: 15,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if !is_http_url(&self.site.base_url) {
            return Err(ConfigError::Validation(
                "site.base_url must be an http(s) URL".into(),
            ));
        }
        if !self.site.base_path.starts_with('/') || !self.site.base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_path must start and end with '/'".into(),
            ));
        }
        if !is_http_url(&self.forms.endpoint) {
            return Err(ConfigError::Validation(
                "forms.endpoint must be an http(s) URL".into(),
            ));
        }
        if self.forms.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "forms.timeout_secs must be greater than 0".into(),
            ));
        }
        let band = &self.scroll_spy;
        if !(0.0..=1.0).contains(&band.top)
            || !(0.0..=1.0).contains(&band.bottom)
            || band.top >= band.bottom
        {
            return Err(ConfigError::Validation(
                "scroll_spy band must satisfy 0 <= band_top < band_bottom <= 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of stock
/// defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Config files can be placed at two levels:
#   content/config.toml          -> root (overrides stock defaults)
#   content/blog/config.toml     -> blog collection (overrides root)
#   content/guides/config.toml   -> guides collection (overrides root)
#
# Each level only needs the keys it wants to override.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Marketing Insights"
tagline = "Practical guides for local businesses"

# Canonical origin of the published site. Share links point here.
base_url = "http://localhost:8000"

# Path the site is served under. Root-relative links in articles
# ("/services/") are prefixed with it. Must start and end with "/".
base_path = "/"

# ---------------------------------------------------------------------------
# Lead-capture form
# ---------------------------------------------------------------------------
[forms]
# Form backend that receives submissions (Formspree-compatible).
endpoint = "https://formspree.io/f/your-form-id"

# Sent as the "source" field with every submission.
source = "website"

# Lead submission timeout, in seconds (CLI and browser form).
timeout_secs = 15

# ---------------------------------------------------------------------------
# Scroll-spy
# ---------------------------------------------------------------------------
[scroll_spy]
# A heading becomes the active outline entry when it enters the band
# between these two fractions of the viewport height.
band_top = 0.2
band_bottom = 0.8
"##
}
