//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with device, Loxone and health handlers
//! - Wire up middleware (tracing, request ID, outcome tracking, timeout)
//! - Bind server to listener and drain on shutdown

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::GatewayConfig;
use crate::health::health_handler;
use crate::http::middleware::track_outcome;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::loxone::LoxoneClient;
use crate::tracking::{Clock, RequestRecorder};
use crate::vendor::{DeviceAccessor, VendorStatus};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub recorder: Arc<RequestRecorder>,
    pub vendor: Arc<dyn VendorStatus>,
    pub devices: Arc<dyn DeviceAccessor>,
    pub loxone: Arc<LoxoneClient>,
    pub clock: Arc<dyn Clock>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Assemble the state. `started_at` is the process start, taken before
    /// any startup I/O so uptime covers vendor initialization.
    pub fn new(
        config: Arc<GatewayConfig>,
        recorder: Arc<RequestRecorder>,
        vendor: Arc<dyn VendorStatus>,
        devices: Arc<dyn DeviceAccessor>,
        loxone: Arc<LoxoneClient>,
        clock: Arc<dyn Clock>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            recorder,
            vendor,
            devices,
            loxone,
            clock,
            started_at,
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: request ID, trace, ID propagation, outcome tracking,
    /// timeout. Timeouts therefore show up in the recorded outcomes.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

        let health = Router::new()
            .route(state.config.health.path.as_str(), get(health_handler))
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache"),
            ));

        Router::new()
            .merge(api::router())
            .merge(health)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(middleware::from_fn_with_state(state.clone(), track_outcome))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
            .with_state(state)
    }

    /// The assembled router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
