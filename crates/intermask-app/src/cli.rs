use std::path::PathBuf;

use clap::Parser;

/// Intermask: open a webview window and drive it from the command line
/// or a JSON call script.
#[derive(Parser, Debug, Default)]
#[command(name = "intermask", version, about)]
pub struct Args {
    /// Page to open: a URL (https:, http:, file:, data:, about:) or inline HTML.
    pub target: Option<String>,

    /// Window title override.
    #[arg(long)]
    pub title: Option<String>,

    /// Window width override (logical pixels).
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height override (logical pixels).
    #[arg(long)]
    pub height: Option<u32>,

    /// JSON call script to run instead of the default session.
    #[arg(short = 's', long)]
    pub script: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use the in-memory engine; no window is shown.
    #[arg(long)]
    pub headless: bool,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
