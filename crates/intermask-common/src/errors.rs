use std::path::PathBuf;

use crate::types::WindowState;
use crate::value::ValueKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A host call was rejected before reaching the native engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{method}: expected {expected} argument(s), got {found}")]
    Arity {
        method: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{method}: argument at index {index} should be {expected}, got {found}")]
    Kind {
        method: &'static str,
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("{method}: argument at index {index} is invalid: {reason}")]
    Invalid {
        method: &'static str,
        index: usize,
        reason: String,
    },

    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

/// A method was invoked in the wrong window lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("{method}: window is {state}")]
    NotLive {
        method: &'static str,
        state: WindowState,
    },

    #[error("construct: window was already constructed")]
    AlreadyConstructed,

    #[error("destroy: window was already destroyed")]
    AlreadyDestroyed,

    #[error("run: the run loop is already active")]
    AlreadyRunning,
}

/// The native engine itself failed. Propagated to the host unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("window creation failed: {0}")]
    Create(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("{0}")]
    Other(String),
}

/// Every failure a binding method can surface to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{event} callback failed: {message}")]
    Callback { event: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IntermaskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("script error: {0}")]
    Script(String),
}
