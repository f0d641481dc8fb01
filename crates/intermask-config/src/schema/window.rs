//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Initial window settings, applied through the binding right after the
/// window is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window title.
    pub title: String,
    /// Initial inner width in logical pixels (valid range: 1-16384).
    pub width: u32,
    /// Initial inner height in logical pixels (valid range: 1-16384).
    pub height: u32,
    /// Page to load when none is given on the command line.
    pub url: Option<String>,
    /// Webview background colour (`#rrggbb`, `#rrggbbaa` or `rgba(r,g,b,a)`).
    pub background: Option<String>,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Intermask".into(),
            width: 800,
            height: 600,
            url: None,
            background: None,
            user_agent: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
