//! Integration tests for the `/api/v1/qr-codes` endpoints.

mod common;

use axum::http::StatusCode;
use base64::Engine as _;
use common::{body_bytes, body_json, post_json, APP};
use serde_json::{json, Value};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn create_body(template_id: &str, data: Value) -> Value {
    json!({
        "type": "STABLE",
        "templateId": template_id,
        "thirdPartyRef": "order-1001",
        "data": data
    })
}

// ---------------------------------------------------------------------------
// Test: payload dry-run accepts conforming data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_accepts_conforming_payload() {
    let app = common::build_test_app();
    let body = json!({"templateId": "tpl-menu", "data": {"url": "https://example.com"}});

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["valid"], true);
}

// ---------------------------------------------------------------------------
// Test: missing required field is INVALID_DATA
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_reports_missing_required_field() {
    let app = common::build_test_app();
    let body = json!({"templateId": "tpl-menu", "data": {}});

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_DATA");
    assert_eq!(json["error"], "missing required field in data: url");
}

// ---------------------------------------------------------------------------
// Test: a required field sent as null is missing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_rejects_null_required_field() {
    let app = common::build_test_app();
    let body = json!({"templateId": "tpl-menu", "data": {"url": null}});

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_DATA");
    assert_eq!(json["error"], "missing required field in data: url");
}

// ---------------------------------------------------------------------------
// Test: undeclared keys are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_rejects_undeclared_key() {
    let app = common::build_test_app();
    let body = json!({
        "templateId": "tpl-menu",
        "data": {"url": "https://example.com", "promo": "x"}
    });

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_DATA");
    assert_eq!(json["error"], "invalid key in data: promo");
}

// ---------------------------------------------------------------------------
// Test: numeric range constraints from a metadata template apply
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_checks_number_range() {
    let app = common::build_test_app();
    let body = json!({"templateId": "tpl-event", "data": {"ticket": "A-1", "seats": 11}});

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_DATA");
}

// ---------------------------------------------------------------------------
// Test: empty templateId is caught by request validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_data_requires_template_id() {
    let app = common::build_test_app();
    let body = json!({"templateId": "", "data": {}});

    let response = post_json(app, "/api/v1/qr-codes/validate", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: issuing a code returns 201 with the record and a PNG
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_returns_record_and_png() {
    let app = common::build_test_app();
    let body = create_body("tpl-menu", json!({"url": "https://example.com/menu"}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    let id = data["id"].as_str().unwrap();
    assert_eq!(data["type"], "STABLE");
    assert_eq!(data["status"], "ACTIVE");
    assert_eq!(data["clientAppId"], APP);
    assert_eq!(data["templateId"], "tpl-menu");
    assert_eq!(data["scanCount"], 0);
    assert_eq!(data["content"], format!("https://qr.test/qrcode/{id}"));

    let image = &data["image"];
    assert_eq!(image["contentType"], "image/png");
    assert_eq!(image["width"], 256);
    assert_eq!(image["height"], 256);
    let png = base64::engine::general_purpose::STANDARD
        .decode(image["base64"].as_str().unwrap())
        .unwrap();
    assert!(png.starts_with(PNG_MAGIC));
}

// ---------------------------------------------------------------------------
// Test: a deep link is encoded verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_encodes_deep_link() {
    let app = common::build_test_app();
    let mut body = create_body("tpl-menu", json!({"url": "https://example.com"}));
    body["deepLinkUrl"] = json!("myapp://menu/42");

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "myapp://menu/42");
    assert_eq!(json["data"]["deepLinkUrl"], "myapp://menu/42");
}

// ---------------------------------------------------------------------------
// Test: metadata templates render with their logo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_from_metadata_template_with_logo() {
    let app = common::build_test_app();
    let body = create_body("tpl-event", json!({"ticket": "A-1", "seats": 2}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["image"]["width"], 300);
}

// ---------------------------------------------------------------------------
// Test: unknown type is a validation error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_rejects_unknown_type() {
    let app = common::build_test_app();
    let mut body = create_body("tpl-menu", json!({"url": "https://example.com"}));
    body["type"] = json!("PERMANENT");

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("invalid type"));
}

// ---------------------------------------------------------------------------
// Test: expiry in the past is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_rejects_past_expiry() {
    let app = common::build_test_app();
    let mut body = create_body("tpl-menu", json!({"url": "https://example.com"}));
    body["expiresAt"] = json!("2001-01-01T00:00:00Z");

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "expiresAt cannot be in the past");
}

// ---------------------------------------------------------------------------
// Test: inactive templates cannot issue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_from_inactive_template_fails() {
    let app = common::build_test_app();
    let body = create_body("tpl-inactive", json!({"url": "https://example.com"}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: issuing against another tenant's template is forbidden
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_for_foreign_template_is_forbidden() {
    let app = common::build_test_app();
    let body = create_body("tpl-foreign", json!({"url": "https://example.com"}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: unsupported shapes fail at render time
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_with_unsupported_shape() {
    let app = common::build_test_app();
    let body = create_body("tpl-triangle", json!({"url": "https://example.com"}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_SHAPE");
    assert!(json["error"].as_str().unwrap().contains("triangle"));
}

// ---------------------------------------------------------------------------
// Test: a logo that cannot be read is 422
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_with_missing_logo() {
    let app = common::build_test_app();
    let body = create_body("tpl-missing-logo", json!({"url": "https://example.com"}));

    let response = post_json(app, "/api/v1/qr-codes", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "LOGO_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Test: preview responds with a PNG download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_returns_png_attachment() {
    let app = common::build_test_app();
    let body = json!({
        "templateId": "tpl-menu",
        "data": {"url": "https://example.com"},
        "content": "https://example.com"
    });

    let response = post_json(app, "/api/v1/qr-codes/preview", Some(APP), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "image/png");
    assert_eq!(
        headers.get("content-disposition").unwrap(),
        "attachment; filename=\"qrcode.png\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(PNG_MAGIC));
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 256);
}

// ---------------------------------------------------------------------------
// Test: preview still validates the payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_rejects_invalid_payload() {
    let app = common::build_test_app();
    let body = json!({"templateId": "tpl-menu", "data": {"url": 42, "extra": true}});

    let response = post_json(app, "/api/v1/qr-codes/preview", Some(APP), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_DATA");
}

// ---------------------------------------------------------------------------
// Test: QR endpoints require the tenant header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_qr_code_requires_tenant_header() {
    let app = common::build_test_app();
    let body = create_body("tpl-menu", json!({"url": "https://example.com"}));

    let response = post_json(app, "/api/v1/qr-codes", None, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
