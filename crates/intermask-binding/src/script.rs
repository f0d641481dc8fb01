//! JSON call scripts: a list of binding calls replayed in order.
//!
//! ```json
//! [
//!   { "method": "setTitle", "args": ["Hello"] },
//!   { "method": "onEvent", "args": [{ "$callback": "destroyOnLoad" }] },
//!   { "method": "navigate", "args": ["https://example.com"] },
//!   { "method": "run" }
//! ]
//! ```
//!
//! Plain JSON arguments become host values. An object with a `$callback`
//! key becomes a host function with one of the built-in behaviours in
//! [`CallbackAction`].

use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use intermask_common::{HostFunction, HostValue, IntermaskError, Result};

use crate::binding::{Binding, WeakBinding};

const CALLBACK_KEY: &str = "$callback";

/// One step of a call script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptCall {
    pub method: String,
    #[serde(default)]
    pub args: Vec<JsonValue>,
}

/// Built-in callback behaviours a script can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Log every invocation's arguments.
    Log,
    /// Destroy the window on the first invocation.
    Destroy,
    /// Destroy the window once a page has finished loading.
    DestroyOnLoad,
}

impl CallbackAction {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Self::Log),
            "destroy" => Some(Self::Destroy),
            "destroyOnLoad" => Some(Self::DestroyOnLoad),
            _ => None,
        }
    }

    /// Build the host function for this action, bound to `binding` without
    /// keeping it alive.
    pub fn into_function(self, binding: WeakBinding) -> HostFunction {
        HostFunction::new(move |args| {
            let rendered = args
                .iter()
                .map(|a| a.to_json().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            info!(action = ?self, args = %rendered, "callback");

            let destroy = match self {
                Self::Log => false,
                Self::Destroy => true,
                Self::DestroyOnLoad => is_finished_load(args),
            };
            if destroy {
                if let Some(binding) = binding.upgrade() {
                    binding.destroy().map_err(|e| e.to_string())?;
                }
            }
            Ok(HostValue::Undefined)
        })
    }
}

fn is_finished_load(args: &[HostValue]) -> bool {
    args.first().is_some_and(|event| {
        event.get("type").and_then(HostValue::as_str) == Some("pageLoad")
            && event.get("state").and_then(HostValue::as_str) == Some("finished")
    })
}

/// A parsed call script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallScript {
    pub calls: Vec<ScriptCall>,
}

impl CallScript {
    pub fn from_json(text: &str) -> Result<Self> {
        let calls: Vec<ScriptCall> = serde_json::from_str(text)
            .map_err(|e| IntermaskError::Script(format!("invalid call script: {e}")))?;
        Ok(Self { calls })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Run every call against `binding`, stopping at the first failure.
    /// Returns each call's result in order.
    pub fn run(&self, binding: &Binding) -> Result<Vec<HostValue>> {
        let mut results = Vec::with_capacity(self.calls.len());
        for (step, call) in self.calls.iter().enumerate() {
            let args = call
                .args
                .iter()
                .map(|arg| to_host_arg(arg, binding))
                .collect::<Result<Vec<_>>>()?;
            debug!(step, method = %call.method, "script call");
            results.push(binding.call(&call.method, &args)?);
        }
        Ok(results)
    }
}

fn to_host_arg(arg: &JsonValue, binding: &Binding) -> Result<HostValue> {
    let Some(name) = arg.get(CALLBACK_KEY) else {
        return Ok(HostValue::from_json(arg.clone()));
    };
    let action = name
        .as_str()
        .and_then(CallbackAction::parse)
        .ok_or_else(|| IntermaskError::Script(format!("unknown callback action {name}")))?;
    Ok(HostValue::Function(action.into_function(binding.downgrade())))
}
