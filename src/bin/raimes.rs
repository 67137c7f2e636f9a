use clap::Parser;
use log::LevelFilter;

use raimes::app::App;
use raimes::cli::Cli;
use raimes::llm::{LlmConfig, LlmProvider};

fn main() {
    // Load .env before reading any configuration from the environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("Ignoring unreadable .env file: {}", err),
    }

    // Build LLM config from environment, then apply CLI overrides
    let provider = match cli.llm.provider.as_deref().map(str::parse::<LlmProvider>) {
        Some(Ok(provider)) => Some(provider),
        Some(Err(err)) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
        None => None,
    };
    let llm_config = LlmConfig::from_env().with_overrides(provider, cli.llm.model.clone());
    log::debug!("Using LLM provider: {}", llm_config.provider);

    let app = App::new(llm_config.create_client());
    if let Err(err) = app.run(cli.command) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
