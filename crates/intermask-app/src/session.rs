//! One window session: construct, apply settings, then either replay a
//! call script or navigate and run with logging callbacks.

use std::path::PathBuf;

use tracing::{info, warn};

use intermask_binding::{Binding, CallScript, CallbackAction, NativeEngine};
use intermask_common::{Color, ConfigError, HostValue, Result};
use intermask_config::WindowConfig;

use crate::cli::Args;

/// What the session should do once the window is set up.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Replay a call script.
    Script(PathBuf),
    /// Optionally navigate, then run until the window closes.
    Run { target: Option<String> },
}

/// Merge command-line overrides into the configured window settings.
pub fn apply_overrides(window: &mut WindowConfig, args: &Args) {
    if let Some(title) = &args.title {
        window.title = title.clone();
    }
    if let Some(width) = args.width {
        window.width = width;
    }
    if let Some(height) = args.height {
        window.height = height;
    }
    if let Some(target) = &args.target {
        window.url = Some(target.clone());
    }
}

pub fn plan(window: &WindowConfig, args: &Args) -> Plan {
    match &args.script {
        Some(path) => Plan::Script(path.clone()),
        None => Plan::Run {
            target: window.url.clone(),
        },
    }
}

/// Construct the window and apply the initial settings.
pub fn open(engine: impl NativeEngine + 'static, window: &WindowConfig) -> Result<Binding> {
    let binding = Binding::create(engine, &[])?;

    if let Some(agent) = &window.user_agent {
        binding.set_custom_user_agent(agent)?;
    }
    binding.set_title(&window.title)?;
    binding.set_size(to_i32(window.width)?, to_i32(window.height)?)?;
    if let Some(background) = &window.background {
        match Color::parse(background) {
            Some(color) => binding.set_background_color(color)?,
            None => warn!(background = %background, "ignoring unparseable background colour"),
        }
    }

    info!(title = %window.title, width = window.width, height = window.height, "window ready");
    Ok(binding)
}

fn to_i32(n: u32) -> Result<i32> {
    i32::try_from(n)
        .map_err(|_| ConfigError::ValidationError(format!("window dimension {n} is too large")).into())
}

/// Carry out `plan` against an open binding. Returns the script's results
/// (empty for a plain run).
pub fn execute(binding: &Binding, plan: &Plan) -> Result<Vec<HostValue>> {
    match plan {
        Plan::Script(path) => {
            info!(path = %path.display(), "running call script");
            CallScript::load(path)?.run(binding)
        }
        Plan::Run { target } => {
            let log = CallbackAction::Log.into_function(binding.downgrade());
            binding.on_event(log.clone())?;
            binding.on_resize(log)?;
            if let Some(target) = target {
                binding.navigate(target)?;
            }
            info!("entering run loop");
            binding.run()?;
            Ok(Vec::new())
        }
    }
}
