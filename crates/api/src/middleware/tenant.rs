//! Tenant identification from the `x-client-app-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use qrstudio_core::error::CoreError;

use crate::error::AppError;

/// Header carrying the calling client app's id.
pub const CLIENT_APP_HEADER: &str = "x-client-app-id";

/// The client app a request acts on behalf of.
///
/// ```ignore
/// async fn my_handler(ClientApp(client_app_id): ClientApp) -> AppResult<Json<()>> {
///     tracing::info!(%client_app_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientApp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientApp {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CLIENT_APP_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| ClientApp(v.to_string()))
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "clientAppId is required in the header".into(),
                ))
            })
    }
}
