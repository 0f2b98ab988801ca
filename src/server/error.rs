use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StorageError;

/// Failure of a single request, mapped to a status code and JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// A required field is missing or empty (400). Carries the list of
    /// required fields shown to the client.
    Validation(&'static str),

    /// No row for the requested id (404).
    NotFound(&'static str),

    /// The email is already used by another user (409).
    Conflict(&'static str),

    /// Any other database failure (500). Only the log sees the detail.
    Storage {
        action: &'static str,
        source: StorageError,
    },
}

impl ApiError {
    pub fn storage(action: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { action, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(mensagem) => (
                StatusCode::BAD_REQUEST,
                json!({ "erro": "Dados inválidos", "mensagem": mensagem }),
            ),
            Self::NotFound(mensagem) => (StatusCode::NOT_FOUND, json!({ "mensagem": mensagem })),
            Self::Conflict(mensagem) => (
                StatusCode::CONFLICT,
                json!({ "erro": "Conflito de dados", "mensagem": mensagem }),
            ),
            Self::Storage { action, source } => {
                tracing::error!(
                    code = source.code.as_deref().unwrap_or("-"),
                    "Error while {action}: {source}"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "erro": "Erro interno do servidor" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
