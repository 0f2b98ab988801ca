use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Body;
use axum::http::header;
use axum::response::{Redirect, Response};
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{questoes_router, status_router, usuarios_router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{DbStatus, QuestaoStore, UsuarioStore};

pub type Questoes = Arc<dyn QuestaoStore>;
pub type Usuarios = Arc<dyn UsuarioStore>;

#[derive(FromRef, Clone)]
pub struct AppState {
    questoes: Questoes,
    usuarios: Usuarios,
    db_status: DbStatus,
}

impl AppState {
    pub fn new(questoes: Questoes, usuarios: Usuarios, db_status: DbStatus) -> Self {
        Self {
            questoes,
            usuarios,
            db_status,
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics))
        .merge(status_router(state.clone()))
        .merge(questoes_router(state.clone()))
        .merge(usuarios_router(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, addr: &str, static_dir: &Path) -> anyhow::Result<()> {
    let app = build_router(state, static_dir);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    tracing::info!("Front-end served from {}", static_dir.display());
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Redirect {
    Redirect::to("/index.html")
}

async fn metrics() -> Result<Response, StatusCode> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).map_err(|e| {
        tracing::error!("Failed to encode metrics: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
