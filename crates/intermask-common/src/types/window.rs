use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle tag of a binding's window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    /// No native window has been created yet.
    Uninitialized,
    /// A native window exists and accepts calls.
    Live,
    /// The native window was torn down; the handle is gone for good.
    Destroyed,
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Live => "live",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}
