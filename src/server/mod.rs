//! Server Implementation Module
//!
//! HTTP front end that hands each WebSocket connection its own [`Session`].
//!
//! # Architecture
//!
//! ```text
//! PointerServer
//!   ├─> axum Router
//!   │     ├─> GET /ws      → upgrade → Session (one per connection)
//!   │     └─> GET /health  → {"status", "active_connections", "uptime_secs"}
//!   └─> AppState
//!         ├─> SessionContext (PlatformCursor + ConnectionTracker + settings)
//!         └─> start time, connection limit
//! ```
//!
//! # Threading Model
//!
//! Every connection runs on the tokio runtime as its own task. Frames are
//! handled one at a time per connection; across connections, pointer calls are
//! serialized by the cursor lock and nothing else is shared.
//!
//! # Example
//!
//! ```no_run
//! use remote_pointer_server::config::Config;
//! use remote_pointer_server::server::PointerServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let server = PointerServer::new(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! [`Session`]: crate::session::Session

mod ws;

use anyhow::{Context, Result};
use axum::extract::State as AxumState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::cursor::{self, PlatformCursor};
use crate::session::{ConnectionTracker, SessionContext, SessionSettings};
use crate::utils::RuntimeStats;

/// Shared state handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Template every new session is built from
    pub context: SessionContext,
    /// Upgrade limit (0 = unlimited)
    pub max_connections: usize,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Current uptime and connection counts
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats::capture(self.start_time, &self.context.tracker)
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the server is up
    pub status: String,
    /// Sessions currently open
    pub active_connections: usize,
    /// Seconds since start
    pub uptime_secs: u64,
}

/// Build the HTTP routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

async fn health(AxumState(state): AxumState<AppState>) -> impl IntoResponse {
    Json(health_report(&state))
}

fn health_report(state: &AppState) -> HealthResponse {
    let stats = state.stats();
    HealthResponse {
        status: "ok".to_string(),
        active_connections: stats.active_connections,
        uptime_secs: stats.uptime.as_secs(),
    }
}

/// Remote pointer server
#[derive(Debug)]
pub struct PointerServer {
    config: Arc<Config>,
    state: AppState,
}

impl PointerServer {
    /// Create a server using the pointer backend named in `config`
    pub fn new(config: Config) -> Result<Self> {
        let cursor = cursor::open_backend(&config.pointer).context("Failed to open pointer backend")?;
        Ok(Self::with_cursor(config, cursor))
    }

    /// Create a server driving an existing cursor
    pub fn with_cursor(config: Config, cursor: PlatformCursor) -> Self {
        let context = SessionContext::new(
            cursor,
            ConnectionTracker::new(),
            SessionSettings::from(&config),
        );

        let state = AppState {
            context,
            max_connections: config.server.max_connections,
            start_time: Instant::now(),
        };

        Self {
            config: Arc::new(config),
            state,
        }
    }

    /// Shared request state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes served by this instance
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .server
            .listen_addr
            .parse()
            .context("Invalid listen address")?;

        info!("Listening on ws://{}/ws", addr);

        let server = axum::Server::try_bind(&addr)
            .with_context(|| format!("Failed to bind {}", addr))?
            .serve(
                self.router()
                    .into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal());

        server.await.context("Server error")?;

        info!("Server stopped");
        self.state.stats().log_status();
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VirtualPointer;

    fn server() -> PointerServer {
        let config = Config::default_config().unwrap();
        PointerServer::with_cursor(config, PlatformCursor::new(VirtualPointer::new(800, 600)))
    }

    #[test]
    fn test_health_report_counts_sessions() {
        let server = server();
        let guard = server.state().context.tracker.acquire();

        let report = health_report(server.state());
        assert_eq!(report.status, "ok");
        assert_eq!(report.active_connections, 1);

        drop(guard);
        assert_eq!(health_report(server.state()).active_connections, 0);
    }

    #[test]
    fn test_health_json_shape() {
        let report = HealthResponse {
            status: "ok".to_string(),
            active_connections: 2,
            uptime_secs: 30,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "ok", "active_connections": 2, "uptime_secs": 30})
        );
    }

    #[test]
    fn test_state_carries_config() {
        let mut config = Config::default_config().unwrap();
        config.server.max_connections = 3;
        config.stabilization.enabled = false;

        let server = PointerServer::with_cursor(config, PlatformCursor::new(VirtualPointer::new(800, 600)));
        assert_eq!(server.state().max_connections, 3);
        assert!(!server.state().context.settings.stabilization_enabled);
    }

    #[test]
    fn test_new_opens_configured_backend() {
        let server = PointerServer::new(Config::default_config().unwrap()).unwrap();
        let cursor = &server.state().context.cursor;
        assert_eq!(cursor.screen_size().unwrap(), (1920, 1080));
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _router = server().router();
    }
}
