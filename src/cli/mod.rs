pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Estate CLI - server and database management")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve,

    #[command(about = "Apply the database schema (idempotent)")]
    Init,

    #[command(about = "Seed demo data for local development")]
    Fixture,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Init => commands::init::handle().await,
        Commands::Fixture => commands::fixture::handle().await,
    }
}
