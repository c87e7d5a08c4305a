use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use clap::Parser;
use server_api::{liveness, set_target_status, target_status, wake_target, ApiContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{alive_route, status_route, wake_route, AliveResponse, TargetSnapshot},
};
use targets::Registry;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wol::UdpWakeSender;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Cli};

/// Path segment of `GET /status/{mode}/{id}` that reads instead of asserts.
const READ_MODE: &str = "get";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let registry = Registry::from_path(&settings.targets_path).with_context(|| {
        format!(
            "failed to load targets from '{}'",
            settings.targets_path.display()
        )
    })?;

    let addr = settings.listen_addr();
    info!(
        config = %settings.targets_path.display(),
        %addr,
        broadcast = %settings.broadcast_addr,
        targets = registry.len(),
        "configuration loaded"
    );
    for target in registry.iter() {
        info!(
            target_id = %target.id(),
            mac = %target.mac(),
            timeout_secs = target.settle().as_secs(),
            "target registered"
        );
    }
    if registry.is_empty() {
        warn!("no targets configured, every target request will return not found");
    }

    let waker = Arc::new(UdpWakeSender::new(settings.broadcast_addr));
    let state = AppState {
        api: ApiContext::new(registry, waker),
    };
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "sidecar listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("sidecar stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(wake_route(), get(http_wake))
        .route(status_route(), get(http_get_status).post(http_set_status))
        .route(alive_route(), get(alive))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn alive() -> Json<AliveResponse> {
    Json(liveness())
}

async fn http_wake(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TargetSnapshot> {
    let snapshot = wake_target(&state.api, &id).await.map_err(reject)?;
    Ok(Json(snapshot))
}

async fn http_get_status(
    State(state): State<Arc<AppState>>,
    Path((mode, id)): Path<(String, String)>,
) -> ApiResult<TargetSnapshot> {
    if mode != READ_MODE {
        return Err(reject(ApiError::not_found("not found")));
    }
    let snapshot = target_status(&state.api, &id).await.map_err(reject)?;
    Ok(Json(snapshot))
}

async fn http_set_status(
    State(state): State<Arc<AppState>>,
    Path((mode, id)): Path<(String, String)>,
) -> ApiResult<TargetSnapshot> {
    let snapshot = set_target_status(&state.api, &id, &mode)
        .await
        .map_err(reject)?;
    Ok(Json(snapshot))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiError>) {
    reject(ApiError::not_found(format!("no route for {}", uri.path())))
}

fn reject(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
