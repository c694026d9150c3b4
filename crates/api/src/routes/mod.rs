pub mod health;
pub mod qr_codes;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates/validate                 structural dry-run of an inline template
/// /templates/{id}                     catalog template (tenant scoped)
/// /templates/{id}/style               resolved style
///
/// /qr-codes                           issue (returns base64 PNG)
/// /qr-codes/validate                  payload dry-run
/// /qr-codes/preview                   render without issuing (PNG download)
/// ```
///
/// Tenant-scoped routes require the `x-client-app-id` header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/qr-codes", qr_codes::router())
}
