pub mod errors;
pub mod types;
pub mod value;

pub use errors::{
    ArgumentError, BindingError, ConfigError, EngineError, IntermaskError, LifecycleError,
};
pub use types::{Color, WindowState};
pub use value::{HostError, HostFunction, HostValue, ValueKind};

pub type Result<T> = std::result::Result<T, IntermaskError>;
