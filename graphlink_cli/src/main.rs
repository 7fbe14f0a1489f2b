use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --debug-logs widens the default filter to the core's request traces;
    // RUST_LOG still wins when set.
    let default_filter = match &cli.command {
        Commands::Call(args) if args.debug_logs => "graphlink_cli=info,graphlink_core=debug",
        _ => "graphlink_cli=info",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Operations => commands::run_operations(),
        Commands::Call(args) => {
            if let Err(e) = commands::run_call(args).await {
                if !e.is_empty() {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                }
                process::exit(1);
            }
        }
    }
}
