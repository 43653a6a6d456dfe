pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::config;

#[derive(Parser)]
#[command(name = "protocol-admin-api")]
#[command(about = "Administration backend for protocols, organizations and platform users")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,

        #[arg(long, help = "Load the demo data set before serving")]
        seed: bool,
    },

    #[command(about = "Apply the database schema and exit")]
    Migrate,

    #[command(about = "Apply the database schema and load the demo data set")]
    Seed,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting Protocol Admin API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None, seed: false }) {
        Commands::Serve { port, seed } => commands::serve::handle(config, port, seed).await,
        Commands::Migrate => commands::database::migrate(config).await,
        Commands::Seed => commands::database::seed(config).await,
    }
}
