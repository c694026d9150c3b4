//! Tenant-owned templates and the read-only accessor the engine consumes.
//!
//! A template stores its payload schema either as a flat `definition` list or
//! as a pair of metadata entries, and its style in one of three historical
//! shapes (flat fields, a `style` object, or a Style metadata entry). The
//! engine never writes templates back; hosts hand them in through
//! [`TemplateSource`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, StructuralError};
use crate::schema::{Definition, FieldDefinition, MetadataDefinition};
use crate::types::{EntityId, Timestamp};
use crate::validation::validate_definition_count;

// ---------------------------------------------------------------------------
// Flat style columns
// ---------------------------------------------------------------------------

/// Style stored as individual template columns.
///
/// Every column is optional so templates using another style shape simply
/// leave them empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_angle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, alias = "logoRef", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_correction: Option<String>,
}

impl FlatStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The populated columns as a camelCase style map.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

fn default_active() -> bool {
    true
}

/// Schema + style bundle owned by one tenant (client app).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub client_app_id: EntityId,

    /// Flat payload schema. Ignored when `metadata` is non-empty.
    #[serde(default, skip_serializing_if = "Definition::is_empty")]
    pub definition: Definition,

    /// Metadata-shaped schema: one Content and one Style entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataDefinition>,

    /// Generic JSON style object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub flat_style: FlatStyle,

    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Template {
    pub fn uses_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }

    /// Authored fields describing the payload, from whichever schema shape
    /// the template uses. Metadata must hold exactly one entry per kind.
    pub fn content_fields(&self) -> Result<&[FieldDefinition], StructuralError> {
        if self.uses_metadata() {
            validate_definition_count(&self.metadata).map(|pair| pair.content.fields.as_slice())
        } else {
            Ok(self.definition.fields())
        }
    }

    /// Logically delete the template. Existing codes keep referencing it.
    pub fn deactivate(&mut self, now: Timestamp) {
        self.active = false;
        self.updated_at = Some(now);
    }

    /// Inactive templates remain readable but cannot issue new codes.
    pub fn ensure_can_issue(&self) -> Result<(), CoreError> {
        if self.active {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Template {} is inactive and cannot issue QR codes",
                self.id
            )))
        }
    }

    /// A tenant may only use its own templates.
    pub fn ensure_owned_by(&self, client_app_id: &str) -> Result<(), CoreError> {
        if client_app_id.is_empty() {
            return Err(CoreError::Validation(
                "clientAppId is required".to_string(),
            ));
        }
        if self.client_app_id == client_app_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "You do not have permission to access this template".to_string(),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Template source
// ---------------------------------------------------------------------------

/// Read accessor for templates. The engine never writes back.
pub trait TemplateSource: Send + Sync {
    /// Fetch the current state of the template `id`.
    fn template(&self, id: &str) -> Result<Template, CoreError>;
}

/// Template source backed by a fixed map, e.g. a catalog file loaded at
/// startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    templates: HashMap<EntityId, Template>,
}

impl InMemoryTemplateSource {
    pub fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
        }
    }

    /// Parse a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let templates: Vec<Template> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid template catalog: {e}")))?;
        Ok(Self::new(templates))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for InMemoryTemplateSource {
    fn template(&self, id: &str) -> Result<Template, CoreError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Template",
                id: id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn flat_template() -> Template {
        serde_json::from_value(json!({
            "id": "tpl-1",
            "name": "Menu",
            "clientAppId": "app-1",
            "definition": [
                {"name": "url", "type": "Text", "validations": {"required": true}}
            ],
            "shape": "square",
            "foregroundColor": "#000000",
            "backgroundColor": "#FFFFFF",
            "size": 256,
            "logoUrl": "logos/menu.png",
            "errorCorrection": "Q"
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_flat_columns() {
        let t = flat_template();
        assert!(t.active);
        assert_eq!(t.flat_style.size, Some(256));
        assert_eq!(t.flat_style.logo_url.as_deref(), Some("logos/menu.png"));
        assert!(!t.uses_metadata());
        assert_eq!(t.content_fields().unwrap().len(), 1);
    }

    #[test]
    fn flat_style_map_uses_camel_case_keys() {
        let map = flat_template().flat_style.to_map();
        assert_eq!(map["foregroundColor"], "#000000");
        assert_eq!(map["logoUrl"], "logos/menu.png");
        assert!(!map.contains_key("margin"));
    }

    #[test]
    fn flat_logo_accepts_logo_ref_key() {
        let t: Template = serde_json::from_value(json!({
            "name": "Menu",
            "clientAppId": "app-1",
            "shape": "square",
            "logoRef": "logos/menu.png"
        }))
        .unwrap();
        assert_eq!(t.flat_style.logo_url.as_deref(), Some("logos/menu.png"));
        assert_eq!(t.flat_style.to_map()["logoUrl"], "logos/menu.png");
    }

    #[test]
    fn empty_flat_style() {
        assert!(FlatStyle::default().is_empty());
        assert!(!flat_template().flat_style.is_empty());
    }

    #[test]
    fn metadata_template_reads_content_entry() {
        let t: Template = serde_json::from_value(json!({
            "name": "Event",
            "clientAppId": "app-1",
            "metadata": [
                {"kind": "Style", "fields": []},
                {"kind": "Content", "fields": [{"name": "ticket", "type": "Text"}]}
            ]
        }))
        .unwrap();
        let fields = t.content_fields().unwrap();
        assert_eq!(fields[0].name, "ticket");
    }

    #[test]
    fn metadata_template_without_content_entry() {
        let t: Template = serde_json::from_value(json!({
            "name": "Event",
            "clientAppId": "app-1",
            "metadata": [{"kind": "Style", "fields": []}]
        }))
        .unwrap();
        assert_eq!(
            t.content_fields().unwrap_err(),
            StructuralError::MetadataCount { found: 1 }
        );
    }

    #[test]
    fn metadata_template_with_duplicate_content_entries() {
        let t: Template = serde_json::from_value(json!({
            "name": "Event",
            "clientAppId": "app-1",
            "metadata": [
                {"kind": "Content", "fields": [{"name": "a", "type": "Text"}]},
                {"kind": "Content", "fields": [{"name": "b", "type": "Text"}]}
            ]
        }))
        .unwrap();
        assert_eq!(
            t.content_fields().unwrap_err(),
            StructuralError::DuplicateMetadataKind { kind: "Content" }
        );
    }

    #[test]
    fn deactivated_template_cannot_issue() {
        let mut t = flat_template();
        assert!(t.ensure_can_issue().is_ok());
        let now = chrono::Utc::now();
        t.deactivate(now);
        assert!(!t.active);
        assert_eq!(t.updated_at, Some(now));
        assert_matches!(t.ensure_can_issue(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn ownership_is_checked() {
        let t = flat_template();
        assert!(t.ensure_owned_by("app-1").is_ok());
        assert_matches!(t.ensure_owned_by("app-2"), Err(CoreError::Forbidden(_)));
        assert_matches!(t.ensure_owned_by(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn in_memory_source_lookup() {
        let source = InMemoryTemplateSource::new([flat_template()]);
        assert_eq!(source.len(), 1);
        assert_eq!(source.template("tpl-1").unwrap().name, "Menu");
        assert_matches!(
            source.template("missing"),
            Err(CoreError::NotFound { entity: "Template", .. })
        );
    }

    #[test]
    fn catalog_from_json() {
        let source = InMemoryTemplateSource::from_json(
            r#"[{"id": "a", "name": "A", "clientAppId": "app"}]"#,
        )
        .unwrap();
        assert!(source.template("a").is_ok());
        assert!(InMemoryTemplateSource::from_json("{").is_err());
    }
}
