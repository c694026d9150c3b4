//! Route definitions for the `/templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// POST   /validate       -> validate
/// GET    /{id}           -> get_template
/// GET    /{id}/style     -> get_template_style
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(templates::validate))
        .route("/{id}", get(templates::get_template))
        .route("/{id}/style", get(templates::get_template_style))
}
