use clap::Parser;

use junkyard_cli::cli::{Cli, Commands};
use junkyard_cli::commands;
use junkyard_cli::error::CliError;
use junkyard_cli::logging::init_tracing;
use junkyard_cli::output::OutputWriter;
use junkyard_cli::state::{AppState, load_config};
use junkyard_core::config::GeneralConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let (config_path, explicit) = cli.config_source();
    let config_path = config_path.to_path_buf();

    // `config` must report a broken file instead of failing to start
    if let Commands::Config(args) = cli.command {
        let general = GeneralConfig {
            log_level: cli.log_level.unwrap_or_else(|| "warn".to_owned()),
            ..GeneralConfig::default()
        };
        init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
        return commands::config::execute(args, &config_path, explicit, &writer).await;
    }

    let config = load_config(&config_path, explicit, cli.log_level.as_deref()).await?;
    init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    let state = AppState::new(config);
    match cli.command {
        Commands::Add(args) => commands::add::execute(args, &state, &writer).await,
        Commands::List(args) => commands::list::execute(args, &state, &writer).await,
        Commands::Delete(args) => commands::delete::execute(args, &state, &writer).await,
        Commands::PartStatus(args) => {
            commands::part_status::execute(args, &state, &writer).await
        }
        Commands::Decode(args) => commands::decode::execute(args, &state, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &state, &writer).await,
        Commands::Catalog(args) => commands::catalog::execute(args, &state, &writer).await,
        Commands::Dashboard => commands::dashboard::execute(&state, &writer).await,
        // handled before config loading
        Commands::Config(_) => Ok(()),
    }
}
