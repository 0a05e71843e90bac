//! Shelf CLI - Command-line interface for a Shelf document store
//!
//! Write documents from the terminal and keep them in sync with the store.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::config::run_config;
use crate::commands::docs::{run_delete, run_get, run_list, run_slug, run_submit, run_whoami};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Whoami => run_whoami(&global).await?,
        Commands::List { json } => run_list(&global, json).await?,
        Commands::Get { id, json } => run_get(&global, &id, json).await?,
        Commands::Submit {
            title,
            path,
            content,
            retry,
            json,
        } => run_submit(&global, &title, path, content, retry, json).await?,
        Commands::Delete { id } => run_delete(&global, &id).await?,
        Commands::Slug { title } => run_slug(&title),
        Commands::Config { command } => run_config(command, global.profile.as_deref())?,
    }

    Ok(())
}
