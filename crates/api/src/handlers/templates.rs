//! Handlers for the `/templates` resource.
//!
//! Templates are read from the catalog; the only write-shaped endpoint is a
//! dry-run structural check of an inline template.

use axum::extract::{Path, State};
use axum::Json;
use qrstudio_core::error::CoreError;
use qrstudio_core::style::{resolve_style, StyleSpec};
use qrstudio_core::template::Template;
use qrstudio_core::validation::validate_template;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::tenant::ClientApp;
use crate::response::DataResponse;
use crate::state::AppState;

/// Summary of one compiled content field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub required: bool,
}

/// Outcome of a successful structural check.
#[derive(Debug, Serialize)]
pub struct TemplateValidation {
    pub valid: bool,
    pub fields: Vec<FieldSummary>,
    pub style: StyleSpec,
}

/// POST /api/v1/templates/validate
///
/// Check an inline template's schema and style without storing it.
/// Returns the compiled fields and the resolved style.
pub async fn validate(Json(template): Json<Template>) -> AppResult<Json<DataResponse<TemplateValidation>>> {
    let validated = validate_template(&template).map_err(CoreError::from)?;
    let fields = validated
        .content
        .fields()
        .iter()
        .map(|f| FieldSummary {
            name: f.name.clone(),
            field_type: f.field_type().as_str(),
            required: f.required,
        })
        .collect();
    tracing::debug!(name = %template.name, "Template validated");
    Ok(Json(DataResponse {
        data: TemplateValidation {
            valid: true,
            fields,
            style: validated.style,
        },
    }))
}

/// Load a catalog template and check it belongs to the caller.
pub(crate) fn owned_template(state: &AppState, id: &str, client_app_id: &str) -> AppResult<Template> {
    let template = state.templates.template(id)?;
    template.ensure_owned_by(client_app_id)?;
    Ok(template)
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    ClientApp(client_app_id): ClientApp,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Template>>> {
    let template = owned_template(&state, &id, &client_app_id)?;
    Ok(Json(DataResponse { data: template }))
}

/// GET /api/v1/templates/{id}/style
///
/// The template's style resolved to its canonical form.
pub async fn get_template_style(
    State(state): State<AppState>,
    ClientApp(client_app_id): ClientApp,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<StyleSpec>>> {
    let template = owned_template(&state, &id, &client_app_id)?;
    let style = resolve_style(&template).map_err(CoreError::from)?;
    Ok(Json(DataResponse { data: style }))
}
