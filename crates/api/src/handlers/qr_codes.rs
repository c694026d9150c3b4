//! Handlers for the `/qr-codes` resource.
//!
//! Issuance validates the request, checks the payload against the template,
//! resolves the style and renders through the bounded [`RenderPool`]. Codes
//! are returned to the caller; storing them is the caller's concern.
//!
//! [`RenderPool`]: crate::render_pool::RenderPool

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use qrstudio_core::issuance::{check_payload, prepare};
use qrstudio_core::qr_code::{validate_create, CreateQrCode, QrCode, QR_CODE_PATH};
use qrstudio_core::render::PNG_CONTENT_TYPE;
use qrstudio_core::types::Payload;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::templates::owned_template;
use crate::middleware::tenant::ClientApp;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest text accepted for a preview; larger payloads exceed QR capacity anyway.
const MAX_PREVIEW_CONTENT: u64 = 2953;

/// Request body for `POST /qr-codes/validate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDataRequest {
    #[validate(length(min = 1, message = "templateId is required"))]
    pub template_id: String,
    #[serde(default)]
    pub data: Payload,
}

/// Request body for `POST /qr-codes/preview`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[validate(length(min = 1, message = "templateId is required"))]
    pub template_id: String,
    #[serde(default)]
    pub data: Payload,
    /// Text to encode; defaults to a placeholder resolver URL.
    #[validate(length(min = 1, max = MAX_PREVIEW_CONTENT))]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DataValidation {
    pub valid: bool,
}

/// Rendered image in text-safe form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub base64: String,
}

/// An issued code together with what was encoded and the rendered image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedQrCode {
    #[serde(flatten)]
    pub qr_code: QrCode,
    pub content: String,
    pub image: EncodedImage,
}

/// POST /api/v1/qr-codes/validate
///
/// Dry-run: check `data` against the template's content schema.
pub async fn validate_data(
    State(state): State<AppState>,
    ClientApp(client_app_id): ClientApp,
    Json(input): Json<ValidateDataRequest>,
) -> AppResult<Json<DataResponse<DataValidation>>> {
    input.validate()?;
    let template = owned_template(&state, &input.template_id, &client_app_id)?;
    check_payload(&template, &client_app_id, &input.data)?;
    Ok(Json(DataResponse {
        data: DataValidation { valid: true },
    }))
}

/// POST /api/v1/qr-codes
///
/// Issue a code: validates the request and payload, renders the image and
/// returns the record with the PNG as base64. Returns HTTP 201.
pub async fn create_qr_code(
    State(state): State<AppState>,
    ClientApp(client_app_id): ClientApp,
    Json(input): Json<CreateQrCode>,
) -> AppResult<(StatusCode, Json<DataResponse<IssuedQrCode>>)> {
    let now = chrono::Utc::now();
    let qr_type = validate_create(&input, &client_app_id, now)?;
    let template = owned_template(&state, &input.template_id, &client_app_id)?;

    let id = uuid::Uuid::now_v7().to_string();
    let qr_code = QrCode::issue(id, qr_type, &client_app_id, input, now);
    let style = prepare(&template, &client_app_id, &qr_code.data)?;
    let content = qr_code.content(&state.config.public_base_url);

    let image = state.renderer.render(content.clone(), style).await?;
    tracing::info!(
        qr_code_id = %qr_code.id,
        template_id = %template.id,
        client_app_id = %client_app_id,
        "QR code issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IssuedQrCode {
                qr_code,
                content,
                image: EncodedImage {
                    content_type: PNG_CONTENT_TYPE,
                    width: image.width,
                    height: image.height,
                    base64: image.base64(),
                },
            },
        }),
    ))
}

/// POST /api/v1/qr-codes/preview
///
/// Render a code for `data` without issuing it. Responds with the PNG as a
/// file download.
pub async fn preview_qr_code(
    State(state): State<AppState>,
    ClientApp(client_app_id): ClientApp,
    Json(input): Json<PreviewRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let template = owned_template(&state, &input.template_id, &client_app_id)?;
    let style = prepare(&template, &client_app_id, &input.data)?;
    let content = input.content.unwrap_or_else(|| {
        format!(
            "{}/{QR_CODE_PATH}/preview",
            state.config.public_base_url.trim_end_matches('/')
        )
    });

    let image = state.renderer.render(content, style).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PNG_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"qrcode.png\"",
            ),
        ],
        image.into_bytes(),
    ))
}
