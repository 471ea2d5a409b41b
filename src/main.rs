//! multivac - CLI entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use std::io;
use tracing_subscriber::EnvFilter;

use cli::{build_cli_styles, Cli, Commands, ConfigCommands};

/// Environment variable holding the log filter (e.g. `debug`, `multivac::status=trace`).
const LOG_ENV: &str = "MULTIVAC_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let matches = Cli::command()
        .version(cli::version())
        .styles(build_cli_styles())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Status {
            log,
            raw,
            json,
            cache,
        } => commands::status::handle(&config, &log, raw, json, cache.resolve()),
        Commands::Classify {
            log,
            catalogue,
            json,
        } => commands::classify::handle(&config, &log, catalogue.path.as_deref(), json),
        Commands::Batch {
            inputs,
            catalogue,
            workers,
            failure_stats,
            watch_failure,
            cache,
        } => commands::batch::handle(
            &config,
            commands::batch::BatchArgs {
                inputs,
                catalogue: catalogue.path,
                workers,
                failure_stats,
                watch_failure,
                use_cache: cache.resolve(),
            },
        ),
        Commands::Catalogue { catalogue } => {
            commands::catalogue::handle(&config, catalogue.path.as_deref())
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Init => commands::config::handle_init(&config, cli.config.as_deref()),
        },
    }
}
