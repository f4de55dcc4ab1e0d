mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    handle_delete, handle_index, handle_ingest, handle_list, handle_search, handle_status, Cli,
    Commands,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Ingest { dir, name, index } => {
            handle_ingest(config_path, &dir, name, index)?;
        }
        Commands::Index {
            project,
            background,
        } => {
            handle_index(config_path, &project, background)?;
        }
        Commands::Search {
            project,
            query,
            top,
            json,
        } => {
            handle_search(config_path, &project, &query, top, json)?;
        }
        Commands::Status { project, json } => {
            handle_status(config_path, &project, json)?;
        }
        Commands::List => {
            handle_list(config_path)?;
        }
        Commands::Delete { project } => {
            handle_delete(config_path, &project)?;
        }
    }

    Ok(())
}
