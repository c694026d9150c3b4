#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use qrstudio_core::render::MemoryAssetSource;
use qrstudio_core::template::InMemoryTemplateSource;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use qrstudio_api::config::ServerConfig;
use qrstudio_api::middleware::tenant::CLIENT_APP_HEADER;
use qrstudio_api::render_pool::RenderPool;
use qrstudio_api::routes;
use qrstudio_api::state::AppState;

/// Tenant owning most fixture templates.
pub const APP: &str = "app-1";

/// Tenant owning `tpl-foreign`.
pub const OTHER_APP: &str = "app-2";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        render_concurrency: 2,
        max_render_size: 1024,
        asset_root: "./uploads".into(),
        template_catalog_path: None,
        public_base_url: "https://qr.test".to_string(),
    }
}

/// A small solid-color PNG used as the fixture logo.
pub fn logo_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(32, 32, image::Rgba([200, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn square_style() -> Value {
    json!({
        "shape": "square",
        "foregroundColor": "#000000",
        "backgroundColor": "#FFFFFF",
        "size": 256
    })
}

/// Fixture catalog covering every style shape and the failure cases.
pub fn fixture_catalog() -> InMemoryTemplateSource {
    let url_field = json!([
        {"name": "url", "type": "Text", "validations": {"required": true, "maxLength": 200}}
    ]);
    let mut triangle = square_style();
    triangle["shape"] = json!("triangle");
    let mut missing_logo = square_style();
    missing_logo["logoRef"] = json!("logos/missing.png");

    let templates = json!([
        {
            "id": "tpl-menu",
            "name": "Menu",
            "clientAppId": APP,
            "definition": url_field,
            "style": square_style()
        },
        {
            "id": "tpl-flat",
            "name": "Flat",
            "clientAppId": APP,
            "definition": url_field,
            "shape": "square",
            "foregroundColor": "#000000",
            "backgroundColor": "#FFFFFF",
            "size": 256
        },
        {
            "id": "tpl-event",
            "name": "Event",
            "clientAppId": APP,
            "metadata": [
                {"kind": "Content", "fields": [
                    {"name": "ticket", "type": "Text", "validations": {"required": true}},
                    {"name": "seats", "type": "Number", "validations": {"min": 1, "max": 10}}
                ]},
                {"kind": "Style", "fields": [
                    {"name": "style", "type": "Style", "validations": {
                        "shape": "circle",
                        "foregroundColor": "#112233",
                        "backgroundColor": "#FFFFFF",
                        "size": 300,
                        "logoRef": "logos/acme.png",
                        "errorCorrection": "H"
                    }}
                ]}
            ]
        },
        {
            "id": "tpl-inactive",
            "name": "Retired",
            "clientAppId": APP,
            "definition": url_field,
            "style": square_style(),
            "active": false
        },
        {
            "id": "tpl-foreign",
            "name": "Foreign",
            "clientAppId": OTHER_APP,
            "definition": url_field,
            "style": square_style()
        },
        {
            "id": "tpl-triangle",
            "name": "Triangle",
            "clientAppId": APP,
            "definition": url_field,
            "style": triangle
        },
        {
            "id": "tpl-missing-logo",
            "name": "Missing logo",
            "clientAppId": APP,
            "definition": url_field,
            "style": missing_logo
        }
    ]);
    InMemoryTemplateSource::from_json(&templates.to_string()).unwrap()
}

/// Build the full application router with all middleware layers over the
/// fixture catalog and an in-memory logo store.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app() -> Router {
    let config = test_config();
    let assets = MemoryAssetSource::new().with_asset("logos/acme.png", logo_png());
    let renderer = RenderPool::new(
        config.render_concurrency,
        config.max_render_size,
        Arc::new(assets),
    );

    let state = AppState {
        config: Arc::new(config),
        templates: Arc::new(fixture_catalog()),
        renderer,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(CLIENT_APP_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without a tenant header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request on behalf of `client_app_id`.
pub async fn get_as(app: Router, uri: &str, client_app_id: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(CLIENT_APP_HEADER, client_app_id)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON POST, with the tenant header when `client_app_id` is set.
pub async fn post_json(
    app: Router,
    uri: &str,
    client_app_id: Option<&str>,
    body: Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(id) = client_app_id {
        builder = builder.header(CLIENT_APP_HEADER, id);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
