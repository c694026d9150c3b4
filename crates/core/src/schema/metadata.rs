//! Metadata-shaped schemas: one Content entry plus one Style entry.

use serde::{Deserialize, Serialize};

use super::field::FieldDefinition;
use super::Definition;

/// What a metadata entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKind {
    /// Payload shape.
    Content,
    /// Rendering parameters.
    Style,
}

impl MetadataKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "Content",
            Self::Style => "Style",
        }
    }
}

/// One metadata entry of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDefinition {
    #[serde(alias = "type")]
    pub kind: MetadataKind,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl MetadataDefinition {
    pub fn content(fields: Vec<FieldDefinition>) -> Self {
        Self {
            kind: MetadataKind::Content,
            fields,
        }
    }

    pub fn style(fields: Vec<FieldDefinition>) -> Self {
        Self {
            kind: MetadataKind::Style,
            fields,
        }
    }

    /// View the entry's fields as a payload definition.
    pub fn as_definition(&self) -> Definition {
        Definition::new(self.fields.clone())
    }
}

/// Look up the entry of `kind`, regardless of position.
pub fn find_entry(entries: &[MetadataDefinition], kind: MetadataKind) -> Option<&MetadataDefinition> {
    entries.iter().find(|e| e.kind == kind)
}

/// The two entries of a metadata-shaped template, addressed by kind.
#[derive(Debug, Clone, Copy)]
pub struct MetadataPair<'a> {
    pub content: &'a MetadataDefinition,
    pub style: &'a MetadataDefinition,
}
