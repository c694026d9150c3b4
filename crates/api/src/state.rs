use std::sync::Arc;

use qrstudio_core::template::TemplateSource;

use crate::config::ServerConfig;
use crate::render_pool::RenderPool;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read-only template catalog.
    pub templates: Arc<dyn TemplateSource>,
    /// Bounded executor for CPU-bound renders; owns the logo asset source.
    pub renderer: RenderPool,
}
