//! Messaging between script in the document and the host.
//!
//! - **Document -> host**: script calls `window.intermask.send(kind, payload)`,
//!   which posts JSON through the engine's IPC channel. The run loop turns
//!   it into an `event` callback with `{ type: "message", body }`.
//! - **Host -> document**: the host calls `evaluate(script)`.

use serde::{Deserialize, Serialize};

use intermask_common::HostValue;

/// A typed message posted by script in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// The message type / command name.
    pub kind: String,
    /// The message payload (arbitrary JSON). Missing means `null`.
    #[serde(default)]
    pub payload: IpcPayload,
}

/// Payload of an IPC message: a plain string or structured JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
}

impl Default for IpcPayload {
    fn default() -> Self {
        Self::Json(serde_json::Value::Null)
    }
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Convert into the object handed to host callbacks.
    pub fn to_host_value(&self) -> HostValue {
        let payload = match &self.payload {
            IpcPayload::Text(text) => HostValue::from(text.as_str()),
            IpcPayload::Json(json) => HostValue::from_json(json.clone()),
        };
        HostValue::object([
            ("kind", HostValue::from(self.kind.as_str())),
            ("payload", payload),
        ])
    }
}

/// Script that sets up the messaging bridge in every document.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.intermask = window.intermask || {};
    window.intermask.send = function(kind, payload) {
        window.ipc.postMessage(JSON.stringify({
            kind: kind,
            payload: payload === undefined ? null : payload
        }));
    };
    window.intermask.postMessage = function(msg) {
        window.ipc.postMessage(typeof msg === 'string' ? msg : JSON.stringify(msg));
    };
})();
"#;
