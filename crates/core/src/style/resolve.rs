//! Style resolution: template → [`StyleSpec`].
//!
//! Each historical storage shape has an adapter that produces the same
//! camelCase key/value map; [`StyleSpec::from_map`] then applies one set of
//! coercion and invariant checks regardless of where the data came from.

use serde_json::{Map, Value};

use super::spec::StyleSpec;
use crate::error::{ResolutionError, StructuralError};
use crate::schema::{find_entry, FieldDefinition, FieldType, MetadataDefinition, MetadataKind};
use crate::template::{FlatStyle, Template};
use crate::validation::validate_definition_count;

/// Where a template keeps its style.
#[derive(Debug, Clone, Copy)]
pub enum StyleSource<'a> {
    /// Individual template columns.
    Flat(&'a FlatStyle),
    /// A single generic JSON object.
    Object(&'a Map<String, Value>),
    /// A Style-kind metadata entry whose fields' validations carry the keys.
    Metadata(&'a MetadataDefinition),
}

impl<'a> StyleSource<'a> {
    /// Pick the style source of `template` by explicit lookup.
    ///
    /// Metadata-shaped templates must carry exactly one Content and one Style
    /// entry. Other templates use the style object when present, then the
    /// flat columns.
    pub fn of(template: &'a Template) -> Result<Self, ResolutionError> {
        if template.uses_metadata() {
            if find_entry(&template.metadata, MetadataKind::Style).is_none() {
                return Err(ResolutionError::MissingStyle);
            }
            return validate_definition_count(&template.metadata)
                .map(|pair| Self::Metadata(pair.style))
                .map_err(|e| ResolutionError::InvalidStyleValue(e.to_string()));
        }
        if let Some(object) = &template.style {
            return Ok(Self::Object(object));
        }
        if template.flat_style.is_empty() {
            return Err(ResolutionError::MissingStyle);
        }
        Ok(Self::Flat(&template.flat_style))
    }

    /// Reduce the source to the canonical style map.
    pub fn to_map(&self) -> Result<Map<String, Value>, StructuralError> {
        match self {
            Self::Flat(flat) => Ok(flat.to_map()),
            Self::Object(object) => Ok((*object).clone()),
            Self::Metadata(entry) => merge_style_fields(&entry.fields),
        }
    }
}

/// Merge the validations maps of a Style entry's fields into one style map.
///
/// Fields must be typed `Style` and carry disjoint keys.
pub fn merge_style_fields(fields: &[FieldDefinition]) -> Result<Map<String, Value>, StructuralError> {
    if fields.is_empty() {
        return Err(StructuralError::EmptyStyle);
    }
    let mut merged = Map::new();
    for (index, field) in fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(StructuralError::EmptyFieldName { index });
        }
        match FieldType::from_name(&field.field_type) {
            Some(FieldType::Style) => {}
            Some(_) => {
                return Err(StructuralError::MisplacedFieldType {
                    field: field.name.clone(),
                    type_name: field.field_type.clone(),
                    kind: MetadataKind::Style.as_str(),
                })
            }
            None => {
                return Err(StructuralError::UnknownFieldType {
                    field: field.name.clone(),
                    type_name: field.field_type.clone(),
                })
            }
        }
        for (key, value) in &field.validations {
            if merged.insert(key.clone(), value.clone()).is_some() {
                return Err(StructuralError::DuplicateStyleKey { key: key.clone() });
            }
        }
    }
    Ok(merged)
}

/// Extract a validated [`StyleSpec`] from `template`.
pub fn resolve_style(template: &Template) -> Result<StyleSpec, ResolutionError> {
    let source = StyleSource::of(template)?;
    let map = source
        .to_map()
        .map_err(|e| ResolutionError::InvalidStyleValue(e.to_string()))?;
    Ok(StyleSpec::from_map(&map)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
