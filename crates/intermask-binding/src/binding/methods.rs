use serde::Serialize;
use tracing::debug;

use intermask_common::{BindingError, Color, HostFunction, HostValue};

use crate::engine::{NavigationTarget, SizeHint};
use crate::events::EventSlot;

use super::Binding;

/// Extra window details reported by `getAdditionalInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub width: i32,
    pub height: i32,
}

impl WindowInfo {
    pub fn to_host_value(self) -> HostValue {
        HostValue::object([
            ("width", HostValue::from(self.width)),
            ("height", HostValue::from(self.height)),
        ])
    }
}

impl Binding {
    pub fn set_title(&self, title: &str) -> Result<(), BindingError> {
        debug!(title, "setTitle");
        self.with_window("setTitle", |w| w.set_title(title))
    }

    pub fn title(&self) -> Result<String, BindingError> {
        self.with_window("getTitle", |w| w.title())
    }

    pub fn set_size(&self, width: i32, height: i32) -> Result<(), BindingError> {
        self.set_size_with_hint(width, height, SizeHint::None)
    }

    pub fn set_size_with_hint(
        &self,
        width: i32,
        height: i32,
        hint: SizeHint,
    ) -> Result<(), BindingError> {
        debug!(width, height, ?hint, "setSize");
        self.with_window("setSize", |w| w.set_size(width, height, hint))
    }

    /// Load a URL, or an inline document when `target` has no known scheme.
    pub fn navigate(&self, target: &str) -> Result<(), BindingError> {
        let target = NavigationTarget::classify(target);
        match &target {
            NavigationTarget::Url(url) => debug!(url = %url, "navigate"),
            NavigationTarget::Html(html) => debug!(bytes = html.len(), "navigate to inline document"),
        }
        self.with_window("navigate", |w| w.navigate(&target))
    }

    /// Queue `script` in the page. No result comes back.
    pub fn evaluate(&self, script: &str) -> Result<(), BindingError> {
        debug!(bytes = script.len(), "evaluate");
        self.with_window("evaluate", |w| w.eval(script))
    }

    /// Register the general event callback, replacing any previous one.
    pub fn on_event(&self, callback: HostFunction) -> Result<(), BindingError> {
        self.register("onEvent", EventSlot::Event, callback)
    }

    /// Register the resize callback, replacing any previous one.
    pub fn on_resize(&self, callback: HostFunction) -> Result<(), BindingError> {
        self.register("onResize", EventSlot::Resize, callback)
    }

    fn register(
        &self,
        method: &'static str,
        slot: EventSlot,
        callback: HostFunction,
    ) -> Result<(), BindingError> {
        self.require_live(method)?;
        let replaced = self.inner.borrow_mut().callbacks.set(slot, callback);
        debug!(slot = slot.name(), replaced = replaced.is_some(), "callback registered");
        // `replaced` drops here, after the borrow is released.
        drop(replaced);
        Ok(())
    }

    pub fn set_background_color(&self, color: Color) -> Result<(), BindingError> {
        debug!(color = %color.to_hex(), "setBackgroundColor");
        self.with_window("setBackgroundColor", |w| w.set_background_color(color))
    }

    pub fn set_custom_user_agent(&self, agent: &str) -> Result<(), BindingError> {
        debug!(agent, "setCustomUserAgent");
        self.with_window("setCustomUserAgent", |w| w.set_user_agent(agent))
    }

    pub fn additional_info(&self) -> Result<WindowInfo, BindingError> {
        let (width, height) = self.with_window("getAdditionalInfo", |w| w.size())?;
        Ok(WindowInfo { width, height })
    }

    pub fn is_document_ready(&self) -> Result<bool, BindingError> {
        self.with_window("isDocumentReady", |w| Ok(w.is_document_ready()))
    }
}
