//! Bounded execution of CPU-bound renders.
//!
//! Rendering runs on the blocking thread pool; a semaphore caps how many run
//! at once so a burst of large codes cannot starve the runtime.

use std::sync::Arc;
use std::time::Instant;

use qrstudio_core::error::{CoreError, ResolutionError};
use qrstudio_core::render::{render, AssetSource, RenderedImage};
use qrstudio_core::style::StyleSpec;
use tokio::sync::Semaphore;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RenderPool {
    permits: Arc<Semaphore>,
    assets: Arc<dyn AssetSource>,
    max_size: u32,
}

impl RenderPool {
    pub fn new(concurrency: usize, max_size: u32, assets: Arc<dyn AssetSource>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(concurrency)),
            assets,
            max_size,
        }
    }

    /// Renders that could start right now without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Render `content` with `style` once a permit is free.
    pub async fn render(&self, content: String, style: StyleSpec) -> AppResult<RenderedImage> {
        if style.size > self.max_size {
            return Err(CoreError::Resolution(ResolutionError::InvalidStyleValue(format!(
                "size {} exceeds the maximum of {}",
                style.size, self.max_size
            )))
            .into());
        }

        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| AppError::Unavailable("Render pool is closed".into()))?;
        let assets = Arc::clone(&self.assets);
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            render(&content, &style, assets.as_ref())
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Render task failed: {e}")))?;

        let image = result.map_err(CoreError::from)?;
        tracing::debug!(
            bytes = image.png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Render complete"
        );
        Ok(image)
    }
}
