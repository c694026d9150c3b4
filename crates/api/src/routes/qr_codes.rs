//! Route definitions for the `/qr-codes` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::qr_codes;
use crate::state::AppState;

/// Routes mounted at `/qr-codes`.
///
/// ```text
/// POST   /               -> create_qr_code
/// POST   /validate       -> validate_data
/// POST   /preview        -> preview_qr_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(qr_codes::create_qr_code))
        .route("/validate", post(qr_codes::validate_data))
        .route("/preview", post(qr_codes::preview_qr_code))
}
