use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    // Initialize tracing with appropriate verbosity
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        2.. => "trace",
    };

    // Logs go to stderr so stdout carries only the suggestion
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Suggest(args) => {
            info!("Suggest command: {:?}", args);
            runtime.block_on(cli::commands::suggest::execute(args, config_path))?;
        }
        Commands::History(args) => {
            info!("History command: {:?}", args);
            runtime.block_on(cli::commands::history::execute(args, config_path))?;
        }
        Commands::Check => {
            info!("Check command");
            runtime.block_on(cli::commands::check::execute(config_path))?;
        }
        Commands::Init(args) => {
            info!("Init command: {:?}", args);
            runtime.block_on(cli::commands::init::execute(args, config_path))?;
        }
    }

    Ok(())
}
