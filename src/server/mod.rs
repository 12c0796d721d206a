// HTTP server module
// One request/response operation: free-text search in, ordered movies out


use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::database::{Movie, MovieStore};
use crate::recommend::{DEFAULT_LIMIT, RecommendationService};
use crate::{RecsError, Result};

pub struct AppState<S: MovieStore> {
    service: RecommendationService<S>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub search: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Map error kinds to HTTP statuses at the boundary, with a structured body
/// instead of a leaked driver error.
impl IntoResponse for RecsError {
    #[inline]
    fn into_response(self) -> Response {
        let status = match &self {
            RecsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RecsError::StoreConnect(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[inline]
pub fn router<S: MovieStore + 'static>(service: RecommendationService<S>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/api/recommendations", post(recommendations::<S>))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serve the recommendation API until interrupted.
#[inline]
pub async fn serve<S: MovieStore + 'static>(
    service: RecommendationService<S>,
    port: u16,
) -> Result<()> {
    let app = router(service);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Recommendation API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn recommendations<S: MovieStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<Vec<Movie>>> {
    let movies = state
        .service
        .recommend(&request.search, request.limit)
        .await?;
    Ok(Json(movies))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt signal, shutting down"),
        Err(e) => error!("Failed to install shutdown signal handler: {e}"),
    }
}
