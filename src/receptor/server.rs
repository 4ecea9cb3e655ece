//! HTTP server for the actual LRP API.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use tokio::net::TcpListener;
use tracing::info;

use super::error::ReceptorError;
use super::handlers::ActualLrpHandler;
use super::params::RequestParams;
use super::serialization::ActualLrpResponse;
use super::types::{HealthResponse, ReceptorConfig};
use crate::backends::ActualLrpBackend;

/// Receptor server handle.
pub struct ReceptorServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl ReceptorServer {
    pub async fn start(config: ReceptorConfig, backend: Arc<dyn ActualLrpBackend>) -> Result<Self> {
        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind receptor listener on {bind_addr}"))?;

        let actual_addr = listener.local_addr()?;
        let app = build_router(backend);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(run_server(listener, app, shutdown_rx));

        info!(addr = %actual_addr, "receptor server started");

        Ok(Self {
            addr: actual_addr,
            shutdown_tx,
        })
    }

    /// Get the address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Clone)]
struct ReceptorState {
    handler: ActualLrpHandler,
}

async fn run_server(
    listener: TcpListener,
    app: Router,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .ok();
}

pub fn build_router(backend: Arc<dyn ActualLrpBackend>) -> Router {
    let state = ReceptorState {
        handler: ActualLrpHandler::new(backend),
    };

    Router::new()
        .route("/v1/actual_lrps", get(get_all))
        .route("/v1/actual_lrps/{process_guid}", get(get_all_by_process_guid))
        .route(
            "/v1/actual_lrps/{process_guid}/index/{index}",
            get(get_by_process_guid_and_index).delete(kill_by_process_guid_and_index),
        )
        .route("/healthz", get(healthz))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "receptor".to_string(),
    })
}

const DOMAIN_QUERY_PARAM: &str = "domain";

/// Query pairs are taken raw so a repeated `domain` resolves to its first
/// value instead of failing extraction.
async fn get_all(
    State(state): State<ReceptorState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<ActualLrpResponse>>, ReceptorError> {
    let domain = query
        .iter()
        .find(|(name, _)| name == DOMAIN_QUERY_PARAM)
        .map(|(_, value)| value.as_str())
        .filter(|domain| !domain.is_empty());
    state.handler.get_all(domain).await.map(Json)
}

async fn get_all_by_process_guid(
    State(state): State<ReceptorState>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<Vec<ActualLrpResponse>>, ReceptorError> {
    state
        .handler
        .get_all_by_process_guid(&RequestParams::from(params))
        .await
        .map(Json)
}

async fn get_by_process_guid_and_index(
    State(state): State<ReceptorState>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<ActualLrpResponse>, ReceptorError> {
    state
        .handler
        .get_by_process_guid_and_index(&RequestParams::from(params))
        .await
        .map(Json)
}

async fn kill_by_process_guid_and_index(
    State(state): State<ReceptorState>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<StatusCode, ReceptorError> {
    state
        .handler
        .kill_by_process_guid_and_index(&RequestParams::from(params))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
