use crate::app::engine::DocpackEngine;
use crate::domain::classifier::VisualizationRole;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct HttpState {
    pub engine: DocpackEngine,
}

#[derive(Debug, Clone, Deserialize)]
struct TopQuery {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchQuery {
    pattern: String,
    limit: Option<usize>,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiErrorBody { error: msg.into() })).into_response()
}

/// Runs a blocking engine call off the async runtime and maps its outcome to a response.
/// Engine errors use `failure`; a panicked task is always a 500.
async fn run_blocking<T, F>(failure: StatusCode, f: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match spawn_blocking(f).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => api_error(failure, format!("{e:#}")),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        ),
    }
}

pub fn build_router(engine: DocpackEngine) -> Router {
    let state = Arc::new(HttpState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/visualization", get(visualization))
        .route("/stats", get(stats))
        .route("/top", get(top))
        .route("/search", get(search))
        .route("/symbols/{id}", get(symbol))
        .route("/connectivity", get(connectivity))
        .route("/reload", post(reload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: DocpackEngine, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> Response {
    match state.engine.health() {
        Ok(res) => Json(res).into_response(),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn reload(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::INTERNAL_SERVER_ERROR, move || engine.reload()).await
}

async fn visualization(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::INTERNAL_SERVER_ERROR, move || {
        engine.visualization()
    })
    .await
}

async fn stats(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::INTERNAL_SERVER_ERROR, move || engine.stats()).await
}

async fn top(State(state): State<Arc<HttpState>>, Query(q): Query<TopQuery>) -> Response {
    let role = match q.role.as_deref().map(str::parse::<VisualizationRole>) {
        Some(Err(e)) => return api_error(StatusCode::BAD_REQUEST, e),
        Some(Ok(role)) => Some(role),
        None => None,
    };

    let engine = state.engine.clone();
    run_blocking(StatusCode::BAD_REQUEST, move || {
        engine.top(q.limit, q.kind.as_deref(), role)
    })
    .await
}

async fn search(State(state): State<Arc<HttpState>>, Query(q): Query<SearchQuery>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::BAD_REQUEST, move || {
        engine.search(&q.pattern, q.limit)
    })
    .await
}

async fn symbol(State(state): State<Arc<HttpState>>, Path(id): Path<String>) -> Response {
    let engine = state.engine.clone();
    let lookup = id.clone();
    match spawn_blocking(move || engine.symbol(&lookup)).await {
        Ok(Ok(Some(res))) => Json(res).into_response(),
        Ok(Ok(None)) => api_error(StatusCode::NOT_FOUND, format!("Symbol not found: {id}")),
        Ok(Err(e)) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        ),
    }
}

async fn connectivity(State(state): State<Arc<HttpState>>) -> Response {
    let engine = state.engine.clone();
    run_blocking(StatusCode::INTERNAL_SERVER_ERROR, move || {
        engine.connectivity()
    })
    .await
}
