//! Resolver configuration.
//!
//! Handles loading, validating, and merging `sanity-image.toml`. Stock
//! defaults are the base layer; a user config file overrides any subset of
//! keys, and CLI flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [project]
//! project_id = ""            # Required before resolving (file or --project-id)
//! dataset = "production"
//!
//! [cdn]
//! base_url = "https://cdn.sanity.io"
//!
//! [images]
//! auto_format = false        # Append auto=format to every URL
//! # quality = 80             # Lossy quality 0-100 (omit for CDN default)
//! # fit = "max"              # clip|crop|fill|fillmax|max|scale|min
//!
//! [sizing]
//! debounce_ms = 1000         # Quiet period for `hint --measured` samples
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::resolve::VariantOptions;
use crate::types::ProjectDetails;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "sanity-image.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolver configuration loaded from `sanity-image.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Which project and dataset assets are served from.
    pub project: ProjectConfig,
    /// CDN host settings.
    pub cdn: CdnConfig,
    /// URL options applied to every resolved variant.
    pub images: VariantOptions,
    /// Presentation sizing settings.
    pub sizing: SizingConfig,
}

/// Project identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub project_id: String,
    pub dataset: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
        }
    }
}

/// CDN settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnConfig {
    pub base_url: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: crate::types::DEFAULT_CDN_URL.to_string(),
        }
    }
}

/// Size measurement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConfig {
    /// Quiet period in milliseconds before a measured size is used.
    pub debounce_ms: u64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

impl SizingConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ResolverConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// An empty `project_id` is allowed here (it may come from the CLI);
    /// [`project_details`](Self::project_details) rejects it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dataset = &self.project.dataset;
        if dataset.is_empty() || dataset.len() > 64 {
            return Err(ConfigError::Validation(
                "project.dataset must be 1-64 characters".into(),
            ));
        }
        if !dataset
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(ConfigError::Validation(format!(
                "project.dataset {dataset:?} may only contain a-z, 0-9, '_' and '-'"
            )));
        }
        if self.images.quality.is_some_and(|q| q > 100) {
            return Err(ConfigError::Validation(
                "images.quality must be 0-100".into(),
            ));
        }
        let url = url::Url::parse(&self.cdn.base_url).map_err(|e| {
            ConfigError::Validation(format!("cdn.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "cdn.base_url must use http or https".into(),
            ));
        }
        Ok(())
    }

    /// Project details for the resolver.
    pub fn project_details(&self) -> Result<ProjectDetails, ConfigError> {
        let id = &self.project.project_id;
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "project.project_id is not set (config file or --project-id)".into(),
            ));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(ConfigError::Validation(format!(
                "project.project_id {id:?} may only contain a-z, 0-9 and '-'"
            )));
        }
        let details = ProjectDetails::new(id.clone(), self.project.dataset.clone());
        if self.cdn.base_url == crate::types::DEFAULT_CDN_URL {
            Ok(details)
        } else {
            Ok(details.with_base_url(self.cdn.base_url.clone()))
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResolverConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResolverConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResolverConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
pub fn load_config(path: &Path) -> Result<ResolverConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `sanity-image.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sanity-image Configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Project
# ---------------------------------------------------------------------------
[project]
# Project id (lowercase letters, digits, '-'). Required before resolving;
# may also be passed as --project-id.
project_id = ""

# Dataset the assets live in (a-z, 0-9, '_', '-').
dataset = "production"

# ---------------------------------------------------------------------------
# CDN
# ---------------------------------------------------------------------------
[cdn]
# Image CDN host. Change only for a custom domain or proxy.
base_url = "https://cdn.sanity.io"

# ---------------------------------------------------------------------------
# URL options applied to every variant
# ---------------------------------------------------------------------------
[images]
# Let the CDN pick WebP/AVIF based on the client's Accept header.
auto_format = false

# Lossy encoding quality (0-100). Omit to use the CDN default.
# quality = 80

# How the variant fits the requested box:
# clip | crop | fill | fillmax | max | scale | min
# fit = "max"

# ---------------------------------------------------------------------------
# Sizing
# ---------------------------------------------------------------------------
[sizing]
# Quiet period (milliseconds) before a measured element size is used for
# the sizes hint. `hint` debounces its --measured samples with it.
debounce_ms = 1000
"##
}
