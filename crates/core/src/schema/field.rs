//! Field declarations and their typed constraints.
//!
//! A [`FieldDefinition`] is the authored, untyped form stored with a template.
//! [`Field`] is the compiled form: the `validations` map has been parsed once
//! into a [`Constraints`] value matching the field's type, so payload
//! validation never performs untyped lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StructuralError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Validation key marking a field as mandatory in the payload.
pub const KEY_REQUIRED: &str = "required";

/// Minimum string length for Text fields.
pub const KEY_MIN_LENGTH: &str = "minLength";

/// Maximum string length for Text fields.
pub const KEY_MAX_LENGTH: &str = "maxLength";

/// Inclusive lower bound for Number fields.
pub const KEY_MIN: &str = "min";

/// Inclusive upper bound for Number fields.
pub const KEY_MAX: &str = "max";

/// Accepted media types for Media fields.
pub const KEY_ALLOWED_TYPES: &str = "allowedTypes";

/// Maximum media size in bytes for Media fields.
pub const KEY_MAX_SIZE: &str = "maxSize";

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// Recognized field kinds.
///
/// `Style` is only meaningful inside a Style-kind metadata entry, where the
/// field's validations carry rendering parameters instead of constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
    Media,
    Style,
}

impl FieldType {
    /// Parse the authored type name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Text" => Some(Self::Text),
            "Number" => Some(Self::Number),
            "Media" => Some(Self::Media),
            "Style" => Some(Self::Style),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Media => "Media",
            Self::Style => "Style",
        }
    }
}

// ---------------------------------------------------------------------------
// Authored form
// ---------------------------------------------------------------------------

/// A field exactly as authored: name, type name and an open validations map.
///
/// The type is kept as a string so an unrecognized type surfaces as a
/// [`StructuralError`] instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub validations: Map<String, Value>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType, validations: Value) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.as_str().to_string(),
            validations: match validations {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// A content field with its constraints parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub required: bool,
    pub constraints: Constraints,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        match self.constraints {
            Constraints::Text(_) => FieldType::Text,
            Constraints::Number(_) => FieldType::Number,
            Constraints::Media(_) => FieldType::Media,
        }
    }
}

/// Per-type constraints. A missing bound means "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub enum Constraints {
    Text(TextConstraints),
    Number(NumberConstraints),
    Media(MediaConstraints),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaConstraints {
    /// Lower-cased media types; either full MIME types or bare subtypes.
    pub allowed_types: Option<Vec<String>>,
    pub max_size: Option<u64>,
}

impl Field {
    /// Compile an authored content field.
    ///
    /// `Style` fields are rejected here; they belong to Style metadata entries
    /// and are handled by the style coercion path.
    pub fn compile(def: &FieldDefinition, index: usize) -> Result<Self, StructuralError> {
        if def.name.trim().is_empty() {
            return Err(StructuralError::EmptyFieldName { index });
        }
        let field_type =
            FieldType::from_name(&def.field_type).ok_or_else(|| StructuralError::UnknownFieldType {
                field: def.name.clone(),
                type_name: def.field_type.clone(),
            })?;

        let parser = ConstraintParser {
            field: &def.name,
            validations: &def.validations,
        };
        let required = parser.bool(KEY_REQUIRED)?.unwrap_or(false);

        let constraints = match field_type {
            FieldType::Text => Constraints::Text(parser.text()?),
            FieldType::Number => Constraints::Number(parser.number()?),
            FieldType::Media => Constraints::Media(parser.media()?),
            FieldType::Style => {
                return Err(StructuralError::MisplacedFieldType {
                    field: def.name.clone(),
                    type_name: def.field_type.clone(),
                    kind: "Content",
                })
            }
        };

        Ok(Self {
            name: def.name.clone(),
            required,
            constraints,
        })
    }
}

// ---------------------------------------------------------------------------
// Constraint parsing
// ---------------------------------------------------------------------------

/// Reads typed values out of a validations map, naming the field in errors.
struct ConstraintParser<'a> {
    field: &'a str,
    validations: &'a Map<String, Value>,
}

impl ConstraintParser<'_> {
    fn invalid(&self, key: &'static str, reason: impl Into<String>) -> StructuralError {
        StructuralError::InvalidConstraint {
            field: self.field.to_string(),
            key,
            reason: reason.into(),
        }
    }

    /// `null` is treated the same as an absent key.
    fn get(&self, key: &str) -> Option<&Value> {
        self.validations.get(key).filter(|v| !v.is_null())
    }

    fn bool(&self, key: &'static str) -> Result<Option<bool>, StructuralError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "must be a boolean")),
        }
    }

    fn count(&self, key: &'static str) -> Result<Option<u64>, StructuralError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => {
                if let Some(n) = v.as_u64() {
                    return Ok(Some(n));
                }
                // JSON clients frequently send whole numbers as floats.
                match v.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(Some(f as u64))
                    }
                    _ => Err(self.invalid(key, "must be a non-negative integer")),
                }
            }
        }
    }

    fn number(&self) -> Result<NumberConstraints, StructuralError> {
        let bound = |key: &'static str| -> Result<Option<f64>, StructuralError> {
            match self.get(key) {
                None => Ok(None),
                Some(v) => v
                    .as_f64()
                    .map(Some)
                    .ok_or_else(|| self.invalid(key, "must be a number")),
            }
        };
        let min = bound(KEY_MIN)?;
        let max = bound(KEY_MAX)?;
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(self.invalid(KEY_MIN, format!("{lo} is greater than max {hi}")));
            }
        }
        Ok(NumberConstraints { min, max })
    }

    fn text(&self) -> Result<TextConstraints, StructuralError> {
        let min_length = self.count(KEY_MIN_LENGTH)?.map(|n| n as usize);
        let max_length = self.count(KEY_MAX_LENGTH)?.map(|n| n as usize);
        if let (Some(lo), Some(hi)) = (min_length, max_length) {
            if lo > hi {
                return Err(self.invalid(
                    KEY_MIN_LENGTH,
                    format!("{lo} is greater than maxLength {hi}"),
                ));
            }
        }
        Ok(TextConstraints {
            min_length,
            max_length,
        })
    }

    fn media(&self) -> Result<MediaConstraints, StructuralError> {
        let allowed_types = match self.get(KEY_ALLOWED_TYPES) {
            None => None,
            Some(Value::Array(items)) => {
                if items.is_empty() {
                    return Err(self.invalid(KEY_ALLOWED_TYPES, "must not be empty"));
                }
                let mut types = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str().map(str::trim) {
                        Some(s) if !s.is_empty() => types.push(s.to_ascii_lowercase()),
                        _ => {
                            return Err(
                                self.invalid(KEY_ALLOWED_TYPES, "entries must be non-empty strings")
                            )
                        }
                    }
                }
                Some(types)
            }
            Some(_) => return Err(self.invalid(KEY_ALLOWED_TYPES, "must be a list of strings")),
        };
        let max_size = self.count(KEY_MAX_SIZE)?;
        if max_size == Some(0) {
            return Err(self.invalid(KEY_MAX_SIZE, "must be greater than 0"));
        }
        Ok(MediaConstraints {
            allowed_types,
            max_size,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
