use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use route_server::config::ServerConfig;
use route_server::network::load_network;
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let graph = load_network(&config.station_map_path)?;
    let rules = config.load_rules()?;
    match &config.rules_path {
        Some(path) => info!(path = %path.display(), "loaded rule table"),
        None => info!("using built-in rule table"),
    }

    let app = create_router(AppState::new(graph, rules));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "route server listening");
    info!("  GET /health");
    info!("  GET /routes?source=&destination=&startTime=");

    axum::serve(listener, app).await?;
    Ok(())
}
