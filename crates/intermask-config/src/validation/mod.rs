//! Full configuration validation.
//!
//! Validates numeric ranges and string formats, collecting every error
//! into a single `ConfigError`.

mod helpers;
mod window;


use crate::schema::IntermaskConfig;
use intermask_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &IntermaskConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    window::validate_window(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
