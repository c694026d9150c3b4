//! End-to-end QR issuance: payload check → style resolution → render.

use crate::error::CoreError;
use crate::render::{render, AssetSource, RenderedImage};
use crate::schema::Definition;
use crate::style::{resolve_style, StyleSpec};
use crate::template::Template;
use crate::types::Payload;
use crate::validation::{validate_definition, validate_payload};

/// Check `data` against the content schema of `template`.
///
/// Ownership and the template's active flag are checked first.
pub fn check_payload(template: &Template, client_app_id: &str, data: &Payload) -> Result<(), CoreError> {
    template.ensure_owned_by(client_app_id)?;
    template.ensure_can_issue()?;
    let definition = Definition::new(template.content_fields()?.to_vec());
    let compiled = validate_definition(&definition)?;
    validate_payload(data, &compiled)?;
    Ok(())
}

/// Everything up to rendering: payload check plus style resolution.
pub fn prepare(template: &Template, client_app_id: &str, data: &Payload) -> Result<StyleSpec, CoreError> {
    check_payload(template, client_app_id, data)?;
    Ok(resolve_style(template)?)
}

/// Validate `data`, resolve the template's style and render `content`.
pub fn issue(
    template: &Template,
    client_app_id: &str,
    data: &Payload,
    content: &str,
    assets: &dyn AssetSource,
) -> Result<RenderedImage, CoreError> {
    let style = prepare(template, client_app_id, data)?;
    let image = render(content, &style, assets)?;
    tracing::debug!(
        template_id = %template.id,
        client_app_id,
        bytes = image.png.len(),
        "QR code rendered"
    );
    Ok(image)
}
