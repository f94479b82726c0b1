use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Failure taxonomy surfaced over HTTP: 400 for malformed input, 404 for
/// unresolved ids, 500 for anything the store throws back.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("faltan campos obligatorios: {}", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error("id inválido")]
    InvalidId,
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("documento inválido: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("campo inaccesible: {0}")]
    Access(#[from] mongodb::bson::document::ValueAccessError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(missing) => (
                StatusCode::BAD_REQUEST,
                json!({"message": "faltan campos obligatorios", "missing": missing}),
            ),
            ApiError::InvalidId => (
                StatusCode::BAD_REQUEST,
                json!({"message": "id inválido"}),
            ),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({"message": message}))
            }
            ApiError::Store(StoreError::NotFound) => (
                StatusCode::NOT_FOUND,
                json!({"message": "documento referenciado no encontrado"}),
            ),
            ApiError::Store(error) => {
                tracing::error!(%error, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "error de almacenamiento", "error": error.to_string()}),
                )
            }
            ApiError::Decode(error) => {
                tracing::error!(%error, "malformed document");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "documento inválido", "error": error.to_string()}),
                )
            }
            ApiError::Access(error) => {
                tracing::error!(%error, "malformed document");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "documento inválido", "error": error.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
