use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::db::DbStatus;
use crate::server::app::AppState;

const STATUS_MESSAGE: &str = "API para a atividade (CRUD Usuários)";

async fn api_status(State(db_status): State<DbStatus>) -> Json<Value> {
    Json(json!({
        "message": STATUS_MESSAGE,
        "version": env!("CARGO_PKG_VERSION"),
        "statusBD": db_status,
    }))
}

pub fn status_router(state: AppState) -> Router {
    Router::new()
        .route("/api-status", get(api_status))
        .with_state(state)
}
