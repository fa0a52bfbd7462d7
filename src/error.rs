use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{entity} with {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} with {field} `{value}` already registered")]
    Duplicate { entity: &'static str, field: &'static str, value: String },

    #[error("payload id {body} does not match path id {path}")]
    IdMismatch { path: i32, body: i32 },

    #[error("{entity} {id} is not linked to this {owner}")]
    UnknownLink { owner: &'static str, entity: &'static str, id: i32 },

    #[error("{entity} {id} does not exist")]
    BadReference { entity: &'static str, id: i32 },

    #[error("{0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("database error")]
    Db(#[from] sea_orm::DbErr),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, key: format!("id {id}") }
    }

    pub fn not_found_by(entity: &'static str, field: &'static str, value: &str) -> Self {
        Self::NotFound { entity, key: format!("{field} `{value}`") }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Duplicate { .. } => (StatusCode::BAD_REQUEST, "ALREADY_REGISTERED"),
            AppError::IdMismatch { .. } => (StatusCode::BAD_REQUEST, "ID_MISMATCH"),
            AppError::UnknownLink { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_LINK"),
            AppError::BadReference { .. } => (StatusCode::BAD_REQUEST, "BAD_REFERENCE"),
            AppError::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            // Driver details stay out of client responses.
            AppError::Db(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
