use std::cell::RefCell;

use tracing::{debug, info};

use intermask_common::{BindingError, HostValue, LifecycleError};

use crate::engine::{CreateOptions, NativeEngine};
use crate::events::NativeEvent;
use crate::schema::{self, Method};

use super::{Binding, Inner, WindowSlot};

/// Clears the running flag however `run` exits.
struct RunGuard<'a>(&'a RefCell<Inner>);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.running = false;
        }
    }
}

impl Binding {
    /// Wrap `engine` and construct the window in one step, as a host
    /// `new` expression does.
    pub fn create(
        engine: impl NativeEngine + 'static,
        args: &[HostValue],
    ) -> Result<Self, BindingError> {
        let binding = Self::new(engine);
        binding.construct(args)?;
        Ok(binding)
    }

    /// Create the native window: debug-visible, top-level, no content yet.
    ///
    /// Takes no arguments. Allowed once per binding.
    pub fn construct(&self, args: &[HostValue]) -> Result<(), BindingError> {
        schema::spec(Method::Construct).validate(args)?;

        let mut inner = self.inner.borrow_mut();
        if !matches!(inner.slot, WindowSlot::Uninitialized) {
            return Err(LifecycleError::AlreadyConstructed.into());
        }

        let window = inner.engine.create(CreateOptions {
            debug: true,
            parent: None,
        })?;
        inner.slot = WindowSlot::Live(window);
        info!("window constructed");
        Ok(())
    }

    /// Tear down the native window.
    ///
    /// Safe to call from a callback while `run` is active; the loop
    /// returns once that callback completes. A second call fails with
    /// [`LifecycleError::AlreadyDestroyed`].
    ///
    /// The handle is released before the engine tears the window down, so
    /// an engine failure is returned with the binding already `Destroyed`.
    pub fn destroy(&self) -> Result<(), BindingError> {
        let mut inner = self.inner.borrow_mut();
        match std::mem::replace(&mut inner.slot, WindowSlot::Destroyed) {
            WindowSlot::Live(mut window) => {
                let running = inner.running;
                drop(inner);
                window.destroy()?;
                info!(running, "window destroyed");
                Ok(())
            }
            WindowSlot::Destroyed => Err(LifecycleError::AlreadyDestroyed.into()),
            WindowSlot::Uninitialized => {
                inner.slot = WindowSlot::Uninitialized;
                Err(LifecycleError::NotLive {
                    method: "destroy",
                    state: intermask_common::WindowState::Uninitialized,
                }
                .into())
            }
        }
    }

    /// Block in the native run loop, delivering events to the registered
    /// callbacks one at a time.
    ///
    /// Returns when the window is closed or destroyed. A failing callback
    /// ends the loop and its error is returned.
    pub fn run(&self) -> Result<(), BindingError> {
        {
            let mut inner = self.inner.borrow_mut();
            inner.slot.live_mut("run")?;
            if inner.running {
                return Err(LifecycleError::AlreadyRunning.into());
            }
            inner.running = true;
        }
        let _guard = RunGuard(&self.inner);
        debug!("run loop entered");

        loop {
            let event = {
                let mut inner = self.inner.borrow_mut();
                match &mut inner.slot {
                    WindowSlot::Live(window) => window.next_event()?,
                    _ => {
                        debug!("run loop ended: window destroyed");
                        break;
                    }
                }
            };

            let Some(event) = event else {
                debug!("run loop ended: window closed");
                break;
            };
            self.deliver(&event)?;
        }
        Ok(())
    }

    /// Hand one event to its callback slot. The window is not borrowed
    /// while the callback runs.
    fn deliver(&self, event: &NativeEvent) -> Result<(), BindingError> {
        let slot = event.slot();
        let callback = self.inner.borrow().callbacks.get(slot);
        let Some(callback) = callback else {
            debug!(slot = slot.name(), ?event, "no callback registered, event dropped");
            return Ok(());
        };

        callback
            .call(&event.to_host_args())
            .map(|_| ())
            .map_err(|message| BindingError::Callback {
                event: slot.name().to_string(),
                message,
            })
    }
}
