//! Intermask configuration system.
//!
//! Provides TOML-based configuration for the initial window settings and
//! logging. All sections use sensible defaults so partial configs work
//! out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use intermask_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{IntermaskConfig, LogLevel, LoggingConfig, WindowConfig, CONFIG_SCHEMA_VERSION};

use intermask_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default location when
/// `path` is `None`, and validate the result.
///
/// An explicit path must exist; the default location is created with a
/// commented template on first use.
pub fn load_config(path: Option<&Path>) -> Result<IntermaskConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &IntermaskConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = IntermaskConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"Intermask\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_rejects_invalid_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\nheight = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_missing_explicit_file_is_not_found() {
        let err = load_config(Some(Path::new("/tmp/does-not-exist/intermask.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = IntermaskConfig::default();
        let json = config_to_json(&config);
        let parsed: IntermaskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.window.title, "Intermask");
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
