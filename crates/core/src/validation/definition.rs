//! Structural validation of template schemas (authoring time).

use std::collections::HashSet;

use crate::error::StructuralError;
use crate::schema::{
    find_entry, CompiledDefinition, Definition, Field, MetadataDefinition, MetadataKind,
    MetadataPair,
};
use crate::style::{merge_style_fields, StyleSource, StyleSpec};
use crate::template::Template;

/// Number of entries a metadata-shaped template must carry.
pub const METADATA_ENTRY_COUNT: usize = 2;

/// A template whose schema and style both passed structural validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTemplate {
    pub content: CompiledDefinition,
    pub style: StyleSpec,
}

/// Check a payload definition and compile its constraints.
///
/// Fails on the first empty name, unrecognized type, malformed constraint or
/// duplicate name.
pub fn validate_definition(def: &Definition) -> Result<CompiledDefinition, StructuralError> {
    let mut seen = HashSet::with_capacity(def.fields().len());
    let mut fields = Vec::with_capacity(def.fields().len());
    for (index, authored) in def.fields().iter().enumerate() {
        let field = Field::compile(authored, index)?;
        if !seen.insert(field.name.clone()) {
            return Err(StructuralError::DuplicateField { name: field.name });
        }
        fields.push(field);
    }
    Ok(CompiledDefinition::from_unique(fields))
}

/// Check that a metadata-shaped schema has exactly one entry per kind.
///
/// The count is checked before any entry content is inspected.
pub fn validate_definition_count(
    entries: &[MetadataDefinition],
) -> Result<MetadataPair<'_>, StructuralError> {
    if entries.len() != METADATA_ENTRY_COUNT {
        return Err(StructuralError::MetadataCount {
            found: entries.len(),
        });
    }
    for kind in [MetadataKind::Content, MetadataKind::Style] {
        if entries.iter().filter(|e| e.kind == kind).count() > 1 {
            return Err(StructuralError::DuplicateMetadataKind {
                kind: kind.as_str(),
            });
        }
    }
    let lookup = |kind: MetadataKind| {
        find_entry(entries, kind).ok_or(StructuralError::MissingMetadataKind {
            kind: kind.as_str(),
        })
    };
    Ok(MetadataPair {
        content: lookup(MetadataKind::Content)?,
        style: lookup(MetadataKind::Style)?,
    })
}

/// Validate both metadata entries: count, content fields and style values.
pub fn validate_metadata(
    entries: &[MetadataDefinition],
) -> Result<ValidatedTemplate, StructuralError> {
    let pair = validate_definition_count(entries)?;
    let content = validate_definition(&pair.content.as_definition())?;
    let style = validate_style_fields(pair.style)?;
    Ok(ValidatedTemplate { content, style })
}

/// Coerce a Style entry into a [`StyleSpec`], reporting failures as
/// structural errors.
pub fn validate_style_fields(entry: &MetadataDefinition) -> Result<StyleSpec, StructuralError> {
    let map = merge_style_fields(&entry.fields)?;
    Ok(StyleSpec::from_map(&map)?)
}

/// Full authoring-time check of a template.
///
/// Name and owning client app are required. The schema is validated in
/// whichever shape the template uses, and the style must resolve.
pub fn validate_template(template: &Template) -> Result<ValidatedTemplate, StructuralError> {
    if template.name.trim().is_empty() {
        return Err(StructuralError::MissingTemplateField { field: "name" });
    }
    if template.client_app_id.trim().is_empty() {
        return Err(StructuralError::MissingTemplateField {
            field: "clientAppId",
        });
    }

    if template.uses_metadata() {
        return validate_metadata(&template.metadata);
    }

    let content = validate_definition(&template.definition)?;
    let source = StyleSource::of(template).map_err(|_| StructuralError::MissingStyle)?;
    let style = StyleSpec::from_map(&source.to_map()?)?;
    Ok(ValidatedTemplate { content, style })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
