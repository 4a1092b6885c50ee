//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file, which is in turn overridden by any
//! `[environments.<name>]` tables matching the active environment.
//!
//! ## Config File Location
//!
//! `config.toml` lives in the config folder (`<base>/config/` unless
//! `--config-path` says otherwise; see [`crate::paths`]).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [general]
//! dev_mode = false          # Verbose diagnostics
//!
//! [thumbnails]
//! max_width = 125           # Thumbnail bounding box
//! max_height = 125
//!
//! [urls]
//! resource_base = "/resources/"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [transforms.thumb]
//! mode = "scaleAndCrop"     # stretchToFit | scaleToFit | scaleAndCrop
//! width = 200
//! height = 200
//! ```
//!
//! ## Environment Overrides
//!
//! ```toml
//! [environments."*"]                  # always applied
//! urls = { resource_base = "/r/" }
//!
//! [environments."staging"]            # applied when the environment name contains "staging"
//! general = { dev_mode = true }
//! ```
//!
//! Matching tables are merged in file order, each on top of the last. Unknown
//! keys are rejected to catch typos early.

use crate::imaging::{TransformDescriptor, TransformRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
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

/// Key of the environment table that applies to every environment.
pub const ALL_ENVIRONMENTS: &str = "*";

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Environment-independent switches.
    pub general: GeneralConfig,
    /// Default thumbnail bounding box.
    pub thumbnails: ThumbnailsConfig,
    /// URL prefixes for generated links.
    pub urls: UrlsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Named image transforms, keyed by handle.
    pub transforms: BTreeMap<String, TransformDescriptor>,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.max_width == 0 || self.thumbnails.max_height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_width and thumbnails.max_height must be non-zero".into(),
            ));
        }
        for (handle, transform) in &self.transforms {
            if handle.is_empty() {
                return Err(ConfigError::Validation(
                    "transform handles must not be empty".into(),
                ));
            }
            if transform.width == 0 || transform.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "transforms.{handle}: width and height must be non-zero"
                )));
            }
        }
        Ok(())
    }

    /// Build the transform lookup table from the `[transforms.*]` tables.
    pub fn transform_registry(&self) -> TransformRegistry {
        self.transforms
            .iter()
            .map(|(handle, transform)| (handle.clone(), *transform))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Turns on debug-level diagnostics.
    pub dev_mode: bool,
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_width: crate::asset::DEFAULT_THUMB_SIZE,
            max_height: crate::asset::DEFAULT_THUMB_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Prefix for resource URLs such as `assetthumbs/...`.
    pub resource_base: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            resource_base: "/resources/".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
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

/// Whether an `[environments.<key>]` table applies to `environment`.
///
/// `"*"` always applies; any other key applies when it occurs in the
/// environment name (`"staging"` matches `"eu.staging.example.com"`).
pub fn environment_matches(key: &str, environment: &str) -> bool {
    key == ALL_ENVIRONMENTS || (!key.is_empty() && environment.contains(key))
}

/// Strip the `environments` table from a raw config and fold the matching
/// entries on top of the rest, in file order.
pub fn apply_environments(raw: toml::Value, environment: &str) -> Result<toml::Value, ConfigError> {
    let mut table = match raw {
        toml::Value::Table(table) => table,
        other => return Ok(other),
    };
    let Some(environments) = table.remove("environments") else {
        return Ok(toml::Value::Table(table));
    };
    let toml::Value::Table(environments) = environments else {
        return Err(ConfigError::Validation(
            "environments must be a table of tables".into(),
        ));
    };

    let mut merged = toml::Value::Table(table);
    for (key, overlay) in environments {
        if !overlay.is_table() {
            return Err(ConfigError::Validation(format!(
                "environments.{key} must be a table"
            )));
        }
        if environment_matches(&key, environment) {
            tracing::debug!(key = %key, environment, "applying environment overrides");
            merged = merge_toml(merged, overlay);
        }
    }
    Ok(merged)
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
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
///
/// The overlay's environment tables are resolved against `environment`
/// before merging.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
    environment: &str,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, apply_environments(ov, environment)?),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, applies environment
/// overrides, rejects unknown keys, and validates the result.
pub fn load_config(config_dir: &Path, environment: &str) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(config_dir)?;
    resolve_config(base, overlay, environment)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# asset-dims Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# General
# ---------------------------------------------------------------------------
[general]
# Verbose (debug-level) diagnostics on stderr.
dev_mode = false

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding box for asset thumbnails. The image is scaled so one side
# matches the box exactly and the other keeps the aspect ratio.
max_width = 125
max_height = 125

# ---------------------------------------------------------------------------
# URLs
# ---------------------------------------------------------------------------
[urls]
# Prefix for thumbnail resource URLs (…/assetthumbs/<id>/<w>x<h>).
resource_base = "/resources/"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Transforms
# ---------------------------------------------------------------------------
# Each [transforms.<handle>] table defines a named resize policy.
#   mode = "stretchToFit"  exactly width x height, aspect ratio ignored
#   mode = "scaleToFit"    shrink to fit inside the box, never enlarge
#   mode = "scaleAndCrop"  shrink and crop to fill the box, never enlarge
#
# [transforms.thumb]
# mode = "scaleAndCrop"
# width = 200
# height = 200

# ---------------------------------------------------------------------------
# Environments
# ---------------------------------------------------------------------------
# Tables merged on top of this file when the active environment name
# (--environment or ASSET_DIMS_ENV) contains the key. "*" always applies.
#
# [environments."staging"]
# general = { dev_mode = true }
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{TransformMode, TransformResolver};
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join("config.toml"), content).unwrap();
    }

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert!(!config.general.dev_mode);
        assert_eq!(config.thumbnails.max_width, 125);
        assert_eq!(config.thumbnails.max_height, 125);
        assert_eq!(config.urls.resource_base, "/resources/");
        assert!(config.transforms.is_empty());
    }

    #[test]
    fn parse_transforms() {
        let toml = r#"
[transforms.thumb]
mode = "scaleAndCrop"
width = 200
height = 200

[transforms.hero]
mode = "scaleToFit"
width = 1600
height = 900
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.transforms.len(), 2);
        assert_eq!(config.transforms["hero"].mode, TransformMode::ScaleToFit);

        let registry = config.transform_registry();
        assert_eq!(registry.resolve("thumb").unwrap().width, 200);
    }

    #[test]
    fn unknown_transform_mode_rejected() {
        let toml = r#"
[transforms.thumb]
mode = "squash"
width = 200
height = 200
"#;
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[thumbnails]
max_widht = 90
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), "").unwrap();
        assert_eq!(config.thumbnails.max_width, 125);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            &tmp,
            r#"
[thumbnails]
max_width = 300
"#,
        );
        let config = load_config(tmp.path(), "").unwrap();
        assert_eq!(config.thumbnails.max_width, 300);
        // Unspecified values should be defaults
        assert_eq!(config.thumbnails.max_height, 125);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, "this is not valid toml [[[");
        let result = load_config(tmp.path(), "");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_zero_transform_box_fails_validation() {
        let tmp = TempDir::new().unwrap();
        write_config(
            &tmp,
            r#"
[transforms.broken]
mode = "stretchToFit"
width = 0
height = 100
"#,
        );
        let result = load_config(tmp.path(), "");
        assert!(matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("broken")));
    }

    #[test]
    fn load_config_zero_thumbnail_box_fails_validation() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, "[thumbnails]\nmax_height = 0\n");
        assert!(matches!(
            load_config(tmp.path(), ""),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Environment override tests
    // =========================================================================

    #[test]
    fn environment_key_matching() {
        assert!(environment_matches("*", ""));
        assert!(environment_matches("*", "prod"));
        assert!(environment_matches("staging", "eu.staging.example.com"));
        assert!(!environment_matches("staging", "prod.example.com"));
        assert!(!environment_matches("", "prod"));
    }

    #[test]
    fn environment_overrides_apply_in_order() {
        let tmp = TempDir::new().unwrap();
        write_config(
            &tmp,
            r#"
[urls]
resource_base = "/base/"

[environments."*"]
urls = { resource_base = "/all/" }

[environments."staging"]
general = { dev_mode = true }
urls = { resource_base = "/staging/" }
"#,
        );

        let prod = load_config(tmp.path(), "prod.example.com").unwrap();
        assert!(!prod.general.dev_mode);
        assert_eq!(prod.urls.resource_base, "/all/");

        let staging = load_config(tmp.path(), "staging.example.com").unwrap();
        assert!(staging.general.dev_mode);
        assert_eq!(staging.urls.resource_base, "/staging/");
    }

    #[test]
    fn environment_can_add_transforms() {
        let tmp = TempDir::new().unwrap();
        write_config(
            &tmp,
            r#"
[transforms.thumb]
mode = "scaleAndCrop"
width = 200
height = 200

[environments."retina"]
transforms.thumb = { width = 400, height = 400 }
"#,
        );
        let config = load_config(tmp.path(), "retina").unwrap();
        let thumb = config.transforms["thumb"];
        assert_eq!(thumb.mode, TransformMode::ScaleAndCrop);
        assert_eq!((thumb.width, thumb.height), (400, 400));
    }

    #[test]
    fn environment_entry_must_be_table() {
        let raw: toml::Value = toml::from_str("[environments]\nstaging = 3\n").unwrap();
        assert!(matches!(
            apply_environments(raw, "staging"),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[thumbnails]
max_width = 125
max_height = 125
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[thumbnails]
max_width = 300
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let thumbs = merged.get("thumbnails").unwrap();
        assert_eq!(thumbs.get("max_width").unwrap().as_integer(), Some(300));
        assert_eq!(thumbs.get("max_height").unwrap().as_integer(), Some(125));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let threads = effective_threads(&ProcessingConfig::default());
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.thumbnails.max_width, 125);
        assert_eq!(config.urls.resource_base, "/resources/");
        config.validate().unwrap();
    }
}
