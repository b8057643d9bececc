//! ViCare gateway (v1)
//!
//! REST façade over the ViCare cloud API plus a Loxone Miniserver bridge.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────▶ http server ──▶ tracking middleware ──▶ api / health handlers
//!                                        │                       │
//!                                        ▼                       ▼
//!                                 RequestRecorder         ViCareClient / LoxoneClient
//!                                        │
//!                                        ▼
//!                                  GET /health (status code 1..8)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use vicare_gateway::config::load_config;
use vicare_gateway::http::{AppState, HttpServer};
use vicare_gateway::lifecycle::{wait_for_signal, Shutdown};
use vicare_gateway::loxone::LoxoneClient;
use vicare_gateway::observability::{init_logging, init_metrics};
use vicare_gateway::tracking::{Clock, RequestRecorder, SystemClock};
use vicare_gateway::vendor::ViCareClient;

#[derive(Parser)]
#[command(name = "vicare-gateway")]
#[command(about = "REST gateway for the ViCare cloud API", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let started_at = clock.now();
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!("vicare-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        health_path = %config.health.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let vicare = Arc::new(ViCareClient::new(config.vicare.clone(), clock.clone())?);
    vicare.initialize().await;
    let loxone = Arc::new(LoxoneClient::new(config.loxone.clone())?);
    let recorder = Arc::new(RequestRecorder::new(
        clock.clone(),
        config.tracking.failure_replacement_secs,
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let state = AppState::new(
        Arc::new(config),
        recorder,
        vicare.clone(),
        vicare,
        loxone,
        clock,
        started_at,
    );

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    tokio::spawn(async move { wait_for_signal(&shutdown).await });

    HttpServer::new(state).run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
