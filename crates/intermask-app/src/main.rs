mod cli;
mod session;

use std::process::ExitCode;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use intermask_binding::HeadlessEngine;
use intermask_common::Result;
use intermask_config::IntermaskConfig;

use crate::cli::Args;
use crate::session::Plan;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        default_hook(info);
    }));
}

fn init_logging(directive: &str) {
    let directive: std::result::Result<Directive, _> = directive
        .parse()
        .or_else(|_| "intermask=info".parse());
    let filter = match directive {
        Ok(d) => EnvFilter::from_default_env().add_directive(d),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    install_panic_hook();
    let args = cli::parse();

    // Logging needs the config's level, so load first and report after.
    let loaded = intermask_config::load_config(args.config.as_deref());
    let directive = match (&args.log_level, &loaded) {
        (Some(level), _) => format!("intermask={level}"),
        (None, Ok(config)) => config.logging.directive(),
        (None, Err(_)) => "intermask=info".to_string(),
    };
    init_logging(&directive);

    tracing::info!("Intermask v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("Config load failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            IntermaskConfig::default()
        }
    };
    session::apply_overrides(&mut config.window, &args);

    if args.print_config {
        println!("{}", intermask_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    match run(&args, &config) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &IntermaskConfig) -> Result<()> {
    let plan = session::plan(&config.window, args);

    #[cfg(feature = "native")]
    {
        if !args.headless {
            let engine = intermask_binding::WryEngine::new()
                .map_err(intermask_common::BindingError::from)?;
            return drive(engine, config, &plan);
        }
    }
    #[cfg(not(feature = "native"))]
    {
        if !args.headless {
            tracing::warn!("built without the `native` feature; using the headless engine");
        }
    }

    drive(HeadlessEngine::new(), config, &plan)
}

fn drive(
    engine: impl intermask_binding::NativeEngine + 'static,
    config: &IntermaskConfig,
    plan: &Plan,
) -> Result<()> {
    let binding = session::open(engine, &config.window)?;
    let results = session::execute(&binding, plan)?;
    for (step, result) in results.iter().enumerate() {
        println!("{step}: {}", result.to_json());
    }
    Ok(())
}
