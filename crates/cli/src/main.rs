//! Command Line Interface for the DEX transaction orchestrator.
mod config;
mod output;
mod provision;
mod quote;
mod store;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dexflow_api::{ApiServer, AppState, ServerConfig};
use dexflow_data::Database;
use dexflow_domain::prelude::*;
use dexflow_execution::prelude::*;
use dotenv::dotenv;
use quote::{QuoteCommand, Units};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dexflow")]
#[command(about = "Plans EVM DEX operations as signable transaction sessions", long_about = None)]
struct Cli {
    /// JSON fixture seeding the in-memory store (ignored with DATABASE_URL)
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Constant-product quotes without touching any store
    Quote {
        /// Treat amounts as whole tokens with this many decimals instead of base units
        #[arg(long, global = true)]
        decimals: Option<u8>,

        #[command(subcommand)]
        command: QuoteCommand,
    },
    /// Plan an operation from a JSON file and store it as a session
    Plan {
        /// File holding one tagged operation, e.g. {"operation": "swap", ...}
        file: PathBuf,

        /// Target chain; the active chain when omitted
        #[arg(long)]
        chain_id: Option<Uuid>,
    },
    /// Show a stored session
    Session { id: SessionId },
    /// Write a fixture's chains, deployments and pools to PostgreSQL
    Provision {
        /// Fixture file in the same format as --fixture
        file: PathBuf,
    },
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Quote { decimals, command } => {
            let rows = quote::run(&command, Units(decimals))?;
            output::print_rows(&rows);
        }
        Commands::Plan { file, chain_id } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let operation: Operation = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid operation", file.display()))?;

            let orchestrator = orchestrator(&config, cli.fixture.as_deref()).await?;
            let ticket = orchestrator
                .execute(operation, chain_id)
                .await
                .context("failed to plan operation")?;
            output::print_ticket(&ticket);
        }
        Commands::Session { id } => {
            let orchestrator = orchestrator(&config, cli.fixture.as_deref()).await?;
            let sessions = orchestrator.sessions();
            let session = sessions.get_session(id).await?;
            output::print_session(&session, &sessions.signing_url(id));
        }
        Commands::Provision { file } => {
            let Some(url) = &config.database_url else {
                bail!("provision writes to PostgreSQL; set DATABASE_URL");
            };
            let fixture = store::load_fixture(&file).await?;
            let db = Database::connect(url)
                .await
                .context("failed to connect to PostgreSQL")?;
            db.migrate().await.context("failed to apply schema")?;
            let summary = provision::provision(&db, &fixture).await?;
            output::print_rows(&summary.rows());
        }
        Commands::Serve => {
            let orchestrator = orchestrator(&config, cli.fixture.as_deref()).await?;
            let server = ApiServer::new(
                ServerConfig {
                    host: config.api_host.clone(),
                    port: config.api_port,
                    ..ServerConfig::default()
                },
                AppState::new(orchestrator),
            );
            server.run().await.context("API server failed")?;
        }
    }

    Ok(())
}

async fn orchestrator(config: &AppConfig, fixture: Option<&Path>) -> Result<Orchestrator> {
    let ports = store::connect(config, fixture).await?;
    Ok(Orchestrator::new(
        ports,
        Arc::new(EthabiEncoder::new()),
        config.planner.clone(),
    ))
}
