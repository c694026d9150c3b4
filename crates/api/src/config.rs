use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum number of renders running at once (default: available cores).
    pub render_concurrency: usize,
    /// Largest canvas edge, in pixels, a template may request (default: `2048`).
    pub max_render_size: u32,
    /// Directory logo references are resolved against (default: `./uploads`).
    pub asset_root: PathBuf,
    /// JSON file holding the template catalog. Unset means an empty catalog.
    pub template_catalog_path: Option<PathBuf>,
    /// Base URL encoded into codes without a deep link.
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `RENDER_CONCURRENCY`    | number of CPUs             |
    /// | `MAX_RENDER_SIZE`       | `2048`                     |
    /// | `ASSET_ROOT`            | `./uploads`                |
    /// | `TEMPLATE_CATALOG_PATH` | unset                      |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:3000`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let render_concurrency: usize = match std::env::var("RENDER_CONCURRENCY") {
            Ok(v) => v
                .parse()
                .expect("RENDER_CONCURRENCY must be a valid usize"),
            Err(_) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        };
        assert!(render_concurrency > 0, "RENDER_CONCURRENCY must be at least 1");

        let max_render_size: u32 = std::env::var("MAX_RENDER_SIZE")
            .unwrap_or_else(|_| "2048".into())
            .parse()
            .expect("MAX_RENDER_SIZE must be a valid u32");

        let asset_root = std::env::var("ASSET_ROOT")
            .unwrap_or_else(|_| "./uploads".into())
            .into();

        let template_catalog_path = std::env::var("TEMPLATE_CATALOG_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            render_concurrency,
            max_render_size,
            asset_root,
            template_catalog_path,
            public_base_url,
        }
    }
}
