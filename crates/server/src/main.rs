//! SiteCrew Server
//!
//! Axum server exposing the four-agent webpage crew over HTTP, plus a
//! one-shot CLI mode for running the crew without a server.

mod api;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::{Args, CliCommand, CrewArgs};

/// Log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "sitecrew_server=info,sitecrew_core=info";

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Invalid log filter")?;
    // JSON logs in production (SITECREW_LOG_JSON=1), human-readable otherwise
    let json_logs = std::env::var("SITECREW_LOG_JSON").unwrap_or_default() == "1";
    if json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

// === Server Entry ===

pub async fn run_server(crew: &CrewArgs, host: IpAddr, port: u16) -> Result<()> {
    let facade = crew.build_facade().await?;
    let state = AppState::new(facade, crew.model_config());
    let app = api::router(state);

    let addr = SocketAddr::new(host, port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("SiteCrew server running at http://{}", addr);
    tracing::info!("   Crew:    POST /crewai");
    tracing::info!("   Agents:  GET /agents, POST /agent/task");
    tracing::info!("   Health:  GET /health");
    tracing::info!("   OpenAPI: GET /openapi.json");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run_once(crew: &CrewArgs, prompt: Option<String>) -> Result<()> {
    let facade = crew.build_facade().await?;
    let output = facade.kickoff(prompt).await.context("Crew run failed")?;
    println!("{}", output.raw);
    Ok(())
}

async fn print_agents(crew: &CrewArgs) -> Result<()> {
    let definition = crew.load_definition().await?;
    for (task, (id, persona)) in definition.tasks.iter().zip(definition.roster()) {
        println!("{:<11} {:<14} {}", id, task.kind, persona.role);
        println!("{:<26} goal: {}", "", persona.goal);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let args = Args::parse();
    match args.command.clone().unwrap_or_default() {
        CliCommand::Serve { host, port } => run_server(&args.crew, host, port).await,
        CliCommand::Run { prompt } => run_once(&args.crew, prompt).await,
        CliCommand::Agents => print_agents(&args.crew).await,
    }
}
