//! Configuration schema types for Intermask.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod window;

pub use logging::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct IntermaskConfig {
    pub window: WindowConfig,
    pub logging: LoggingConfig,
}
