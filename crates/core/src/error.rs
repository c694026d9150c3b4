//! Error taxonomy for the template engine.
//!
//! Each stage of the pipeline has its own error type so callers can tell an
//! authoring mistake (`StructuralError`) from bad payload data (`DataError`),
//! a template whose style cannot be extracted (`ResolutionError`) and a
//! failure while producing pixels (`RenderError`). All of them fold into
//! [`CoreError`] for hosts that only need one error type.

use crate::types::EntityId;

/// Top-level error returned by the engine's public operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// The schema itself is malformed. Raised at template-authoring time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("field at position {index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("field '{field}' has unrecognized type '{type_name}'")]
    UnknownFieldType { field: String, type_name: String },

    #[error("field '{field}' of type '{type_name}' is not allowed in a {kind} definition")]
    MisplacedFieldType {
        field: String,
        type_name: String,
        kind: &'static str,
    },

    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    #[error("field '{field}' has invalid constraint '{key}': {reason}")]
    InvalidConstraint {
        field: String,
        key: &'static str,
        reason: String,
    },

    #[error("metadata must contain exactly two entries, found {found}")]
    MetadataCount { found: usize },

    #[error("metadata contains more than one {kind} entry")]
    DuplicateMetadataKind { kind: &'static str },

    #[error("metadata has no {kind} entry")]
    MissingMetadataKind { kind: &'static str },

    #[error("template has no style")]
    MissingStyle,

    #[error("style definition has no fields")]
    EmptyStyle,

    #[error("style key '{key}' is declared by more than one style field")]
    DuplicateStyleKey { key: String },

    #[error("style object could not be read: {reason}")]
    StyleCoercion { reason: String },

    #[error("invalid style: {0}")]
    InvalidStyle(StyleViolation),

    #[error("{field} is required")]
    MissingTemplateField { field: &'static str },
}

/// The payload does not satisfy the definition. Raised at QR-creation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("missing required field in data: {field}")]
    MissingRequired { field: String },

    #[error("invalid key in data: {key}")]
    UnknownKey { key: String },

    #[error("field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field '{field}' {reason}")]
    ConstraintViolation { field: String, reason: String },
}

/// A concrete style could not be extracted from a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("style metadata not found in template")]
    MissingStyle,

    #[error("invalid style value: {0}")]
    InvalidStyleValue(String),
}

/// The resolved style could not be turned into an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported shape: {shape}")]
    UnsupportedShape { shape: String },

    #[error("logo '{reference}' unavailable: {reason}")]
    LogoUnavailable { reference: String, reason: String },

    #[error("failed to encode QR code: {0}")]
    EncodeFailure(String),
}

/// A single broken style invariant, reported with the offending key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct StyleViolation {
    pub field: &'static str,
    pub reason: String,
}

impl StyleViolation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
