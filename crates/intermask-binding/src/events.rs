//! Native window events and their routing to host callbacks.

use serde::{Deserialize, Serialize};

use intermask_common::HostValue;

use crate::ipc::IpcMessage;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl PageLoadState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Finished => "finished",
        }
    }
}

#[cfg(feature = "native")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events produced by a native window while its run loop is active.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// Page load state changed. Carries the URL.
    PageLoad { state: PageLoadState, url: String },
    /// Document title changed.
    TitleChanged { title: String },
    /// A message posted from script running in the document.
    Message { body: String },
    /// The window's inner size changed (logical pixels).
    Resized { width: i32, height: i32 },
    /// The user asked to close the window. The run loop ends after this.
    CloseRequested,
}

/// Callback slot names a host can register against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSlot {
    /// Catch-all slot for page, title, message and close events.
    Event,
    /// Resize notifications.
    Resize,
}

impl EventSlot {
    pub fn name(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Resize => "resize",
        }
    }
}

impl NativeEvent {
    /// Which callback slot receives this event.
    pub fn slot(&self) -> EventSlot {
        match self {
            Self::Resized { .. } => EventSlot::Resize,
            _ => EventSlot::Event,
        }
    }

    /// Arguments passed to the host callback for this event.
    ///
    /// Resize callbacks receive `(width, height)`; every other event is a
    /// single object tagged with a `type` property.
    pub fn to_host_args(&self) -> Vec<HostValue> {
        match self {
            Self::Resized { width, height } => {
                vec![HostValue::from(*width), HostValue::from(*height)]
            }
            Self::PageLoad { state, url } => vec![HostValue::object([
                ("type", HostValue::from("pageLoad")),
                ("state", HostValue::from(state.as_str())),
                ("url", HostValue::from(url.as_str())),
            ])],
            Self::TitleChanged { title } => vec![HostValue::object([
                ("type", HostValue::from("titleChanged")),
                ("title", HostValue::from(title.as_str())),
            ])],
            Self::Message { body } => vec![HostValue::object([
                ("type", HostValue::from("message")),
                ("body", message_body(body)),
            ])],
            Self::CloseRequested => vec![HostValue::object([(
                "type",
                HostValue::from("closeRequested"),
            )])],
        }
    }
}

/// Decode a posted message. Structured IPC messages become objects,
/// any other JSON is passed through, plain text stays a string.
fn message_body(body: &str) -> HostValue {
    if let Some(msg) = IpcMessage::from_json(body) {
        return msg.to_host_value();
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => HostValue::from_json(json),
        Err(_) => HostValue::from(body),
    }
}
