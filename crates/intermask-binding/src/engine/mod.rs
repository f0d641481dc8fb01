//! The native engine contract consumed by the binding.
//!
//! An engine creates windows; a window is the opaque handle the binding
//! owns exclusively. Both are object-safe so the binding can hold any
//! backend behind a `Box`.

use intermask_common::{Color, EngineError};

use crate::events::NativeEvent;

pub mod headless;
#[cfg(feature = "native")]
pub mod native;

pub use headless::{CallJournal, HeadlessEngine, HeadlessWindow, NativeCall};
#[cfg(feature = "native")]
pub use native::{WryEngine, WryWindow};

/// Opaque handle of a parent window a new window should be embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentHandle(pub usize);

/// Options for [`NativeEngine::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    /// Enable developer tools / inspector.
    pub debug: bool,
    /// `None` creates a top-level window.
    pub parent: Option<ParentHandle>,
}

/// Sizing policy for [`NativeWindow::set_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeHint {
    /// Plain resize; the user may still resize the window.
    #[default]
    None,
    /// The size becomes the minimum size.
    Min,
    /// The size becomes the maximum size.
    Max,
    /// The window is resized and can no longer be resized by the user.
    Fixed,
}

/// What `navigate` should load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Url(String),
    Html(String),
}

/// Schemes that make a navigation target a URL rather than a document.
const URL_SCHEMES: &[&str] = &["https://", "http://", "file://", "data:", "about:"];

impl NavigationTarget {
    /// Classify a host-supplied navigation string.
    ///
    /// Strings starting with a known scheme load as URLs; everything else
    /// is treated as an inline HTML document.
    pub fn classify(target: &str) -> Self {
        let trimmed = target.trim_start();
        let lower = trimmed
            .get(..8)
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        if URL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            Self::Url(trimmed.to_string())
        } else {
            Self::Html(target.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Html(s) => s,
        }
    }
}

/// Window factory.
pub trait NativeEngine {
    fn create(&mut self, options: CreateOptions) -> Result<Box<dyn NativeWindow>, EngineError>;
}

/// One live native window.
///
/// Every method is synchronous. `next_event` blocks until the native loop
/// has something to report and is the only place the engine runs its own
/// message loop.
pub trait NativeWindow {
    fn set_title(&mut self, title: &str) -> Result<(), EngineError>;
    fn title(&self) -> Result<String, EngineError>;
    fn navigate(&mut self, target: &NavigationTarget) -> Result<(), EngineError>;
    fn set_size(&mut self, width: i32, height: i32, hint: SizeHint) -> Result<(), EngineError>;
    /// Inner size in logical pixels.
    fn size(&self) -> Result<(i32, i32), EngineError>;
    /// Fire-and-forget script execution.
    fn eval(&mut self, script: &str) -> Result<(), EngineError>;
    fn set_background_color(&mut self, color: Color) -> Result<(), EngineError>;
    fn set_user_agent(&mut self, agent: &str) -> Result<(), EngineError>;
    fn is_document_ready(&self) -> bool;
    /// Block until the next event. `Ok(None)` means the loop has ended
    /// because the window was closed.
    fn next_event(&mut self) -> Result<Option<NativeEvent>, EngineError>;
    fn destroy(&mut self) -> Result<(), EngineError>;
}
