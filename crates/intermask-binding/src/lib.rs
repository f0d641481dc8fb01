//! Host binding for one native webview window.
//!
//! Provides:
//! - A [`Binding`] facade with the host-visible methods (`setTitle`,
//!   `navigate`, `run`, `onEvent`, ...) and name-based dispatch
//! - A declarative argument schema checked before any native call
//! - The native engine contract, with an in-memory headless engine and a
//!   `wry`/`winit` engine behind the `native` feature
//! - JSON call scripts for driving a binding without a host runtime

pub mod binding;
pub mod engine;
pub mod events;
pub mod ipc;
pub mod schema;
pub mod script;

pub use binding::{Binding, WeakBinding, WindowInfo};
pub use engine::{
    CallJournal, CreateOptions, HeadlessEngine, NativeCall, NativeEngine, NativeWindow,
    NavigationTarget, SizeHint,
};
#[cfg(feature = "native")]
pub use engine::{WryEngine, WryWindow};
pub use events::{EventSlot, NativeEvent, PageLoadState};
pub use ipc::{IpcMessage, IpcPayload};
pub use script::{CallScript, CallbackAction, ScriptCall};
