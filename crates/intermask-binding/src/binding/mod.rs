//! The binding facade: one host-visible object owning one native window.
//!
//! `Binding` is a cheap, single-threaded handle (`Rc`) so a host object
//! and the run loop can share it. Callbacks should capture a
//! [`WeakBinding`] rather than a `Binding`; a callback never keeps its
//! own window alive.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use intermask_common::{BindingError, EngineError, HostFunction, LifecycleError, WindowState};

use crate::engine::{NativeEngine, NativeWindow};
use crate::events::EventSlot;

mod dispatch;
mod lifecycle;
mod methods;

#[cfg(test)]
mod tests;

pub use methods::WindowInfo;

/// State-tagged owner of the native window handle.
enum WindowSlot {
    Uninitialized,
    Live(Box<dyn NativeWindow>),
    Destroyed,
}

impl WindowSlot {
    fn state(&self) -> WindowState {
        match self {
            Self::Uninitialized => WindowState::Uninitialized,
            Self::Live(_) => WindowState::Live,
            Self::Destroyed => WindowState::Destroyed,
        }
    }

    /// The live window, or the lifecycle error for calling `method` now.
    fn live_mut(&mut self, method: &'static str) -> Result<&mut dyn NativeWindow, LifecycleError> {
        match self {
            Self::Live(window) => Ok(window.as_mut()),
            other => Err(LifecycleError::NotLive {
                method,
                state: other.state(),
            }),
        }
    }
}

/// At most one host callback per event name. Kept until the binding
/// itself is dropped.
#[derive(Default)]
struct CallbackSlots {
    event: Option<HostFunction>,
    resize: Option<HostFunction>,
}

impl CallbackSlots {
    /// Store `callback`, returning the one it replaced.
    fn set(&mut self, slot: EventSlot, callback: HostFunction) -> Option<HostFunction> {
        let entry = match slot {
            EventSlot::Event => &mut self.event,
            EventSlot::Resize => &mut self.resize,
        };
        entry.replace(callback)
    }

    fn get(&self, slot: EventSlot) -> Option<HostFunction> {
        match slot {
            EventSlot::Event => self.event.clone(),
            EventSlot::Resize => self.resize.clone(),
        }
    }
}

struct Inner {
    engine: Box<dyn NativeEngine>,
    slot: WindowSlot,
    callbacks: CallbackSlots,
    running: bool,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let WindowSlot::Live(mut window) =
            std::mem::replace(&mut self.slot, WindowSlot::Destroyed)
        {
            if let Err(e) = window.destroy() {
                tracing::warn!(error = %e, "failed to destroy window on teardown");
            } else {
                tracing::debug!("window destroyed on teardown");
            }
        }
    }
}

/// Host-facing facade over one native window.
#[derive(Clone)]
pub struct Binding {
    inner: Rc<RefCell<Inner>>,
}

/// Non-owning handle to a [`Binding`].
#[derive(Clone)]
pub struct WeakBinding {
    inner: Weak<RefCell<Inner>>,
}

impl WeakBinding {
    /// The binding, if it is still alive.
    pub fn upgrade(&self) -> Option<Binding> {
        self.inner.upgrade().map(|inner| Binding { inner })
    }
}

impl fmt::Debug for WeakBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakBinding")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Binding");
        match self.inner.try_borrow() {
            Ok(inner) => s
                .field("state", &inner.slot.state())
                .field("running", &inner.running),
            Err(_) => s.field("state", &"<borrowed>"),
        };
        s.finish()
    }
}

impl Binding {
    /// Wrap an engine without creating a window yet.
    pub fn new(engine: impl NativeEngine + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                engine: Box::new(engine),
                slot: WindowSlot::Uninitialized,
                callbacks: CallbackSlots::default(),
                running: false,
            })),
        }
    }

    pub fn downgrade(&self) -> WeakBinding {
        WeakBinding {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn state(&self) -> WindowState {
        self.inner.borrow().slot.state()
    }

    /// Whether `run` is currently blocked in the native loop.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Run `f` against the live window. The `RefCell` borrow ends before
    /// this returns, so host code never runs while the window is borrowed.
    fn with_window<T>(
        &self,
        method: &'static str,
        f: impl FnOnce(&mut dyn NativeWindow) -> Result<T, EngineError>,
    ) -> Result<T, BindingError> {
        let mut inner = self.inner.borrow_mut();
        let window = inner.slot.live_mut(method)?;
        Ok(f(window)?)
    }

    /// Fail with a lifecycle error unless the window is live.
    fn require_live(&self, method: &'static str) -> Result<(), LifecycleError> {
        self.inner.borrow_mut().slot.live_mut(method).map(|_| ())
    }
}
