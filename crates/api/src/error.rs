use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qrstudio_core::error::{CoreError, RenderError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `qrstudio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Too many renders queued or the render pool is closed.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map an engine error onto an HTTP status, error code, and message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Structural(e) => (StatusCode::BAD_REQUEST, "INVALID_DEFINITION", e.to_string()),
        CoreError::Data(e) => (StatusCode::BAD_REQUEST, "INVALID_DATA", e.to_string()),
        CoreError::Resolution(e) => (StatusCode::BAD_REQUEST, "INVALID_STYLE", e.to_string()),
        CoreError::Render(render) => match render {
            RenderError::UnsupportedShape { .. } => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_SHAPE", render.to_string())
            }
            RenderError::LogoUnavailable { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LOGO_UNAVAILABLE",
                render.to_string(),
            ),
            RenderError::EncodeFailure(msg) => {
                tracing::error!(error = %msg, "QR encode failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ENCODE_FAILURE",
                    render.to_string(),
                )
            }
        },
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
