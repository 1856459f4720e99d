//! Dashboard HTTP server.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

use fintel_core::{Analysis, FintelConfig};

use crate::routes;

/// Progress of the in-flight analyze action, for the UI's indicator.
#[derive(Debug, Default)]
pub struct BatchProgress {
    pub done: AtomicUsize,
    pub total: AtomicUsize,
}

/// Application state shared across routes.
///
/// The session table is replaced wholesale on each analysis run, never
/// merged across document-type switches.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FintelConfig>,
    pub session: Arc<RwLock<Option<Analysis>>>,
    pub progress: Arc<BatchProgress>,
}

impl AppState {
    pub fn new(config: FintelConfig) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
            progress: Arc::new(BatchProgress::default()),
        }
    }
}

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    Router::new()
        .route("/", get(routes::index))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/schemas", get(routes::schemas))
        .route("/api/analyze", post(routes::analyze))
        .route("/api/progress", get(routes::progress))
        .route("/api/table", get(routes::table))
        .route("/api/report.csv", get(routes::report_csv))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}

/// Start the dashboard HTTP server.
pub async fn start_server(addr: SocketAddr, config: FintelConfig) -> Result<()> {
    let state = AppState::new(config);
    let app = router(state);

    info!("fintel dashboard listening on http://{}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
