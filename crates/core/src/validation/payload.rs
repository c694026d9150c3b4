//! Payload validation against a compiled definition (QR-creation time).
//!
//! Three fail-fast passes: completeness, closure, then per-type constraints.

use serde_json::Value;

use crate::error::DataError;
use crate::schema::{
    CompiledDefinition, Constraints, MediaConstraints, NumberConstraints, TextConstraints,
};
use crate::types::Payload;

/// Validate `payload` against `definition`, returning the first violation.
pub fn validate_payload(payload: &Payload, definition: &CompiledDefinition) -> Result<(), DataError> {
    check_completeness(payload, definition)?;
    check_closure(payload, definition)?;
    check_types(payload, definition)
}

/// Every required field must be present with a non-null value.
fn check_completeness(payload: &Payload, definition: &CompiledDefinition) -> Result<(), DataError> {
    match definition
        .fields()
        .iter()
        .find(|f| f.required && payload.get(&f.name).map_or(true, Value::is_null))
    {
        Some(field) => Err(DataError::MissingRequired {
            field: field.name.clone(),
        }),
        None => Ok(()),
    }
}

/// The schema is closed: undeclared keys are rejected.
fn check_closure(payload: &Payload, definition: &CompiledDefinition) -> Result<(), DataError> {
    match payload.keys().find(|k| !definition.contains(k)) {
        Some(key) => Err(DataError::UnknownKey { key: key.clone() }),
        None => Ok(()),
    }
}

fn check_types(payload: &Payload, definition: &CompiledDefinition) -> Result<(), DataError> {
    for field in definition.fields() {
        let value = match payload.get(&field.name) {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        match &field.constraints {
            Constraints::Text(c) => check_text(&field.name, value, c)?,
            Constraints::Number(c) => check_number(&field.name, value, c)?,
            Constraints::Media(c) => check_media(&field.name, value, c)?,
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-type checks
// ---------------------------------------------------------------------------

fn violation(field: &str, reason: String) -> DataError {
    DataError::ConstraintViolation {
        field: field.to_string(),
        reason,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_text(field: &str, value: &Value, c: &TextConstraints) -> Result<(), DataError> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    };
    if let Some(min) = c.min_length {
        if len < min {
            return Err(violation(
                field,
                format!("must be at least {min} characters, got {len}"),
            ));
        }
    }
    if let Some(max) = c.max_length {
        if len > max {
            return Err(violation(
                field,
                format!("must be at most {max} characters, got {len}"),
            ));
        }
    }
    Ok(())
}

fn check_number(field: &str, value: &Value, c: &NumberConstraints) -> Result<(), DataError> {
    let n = value.as_f64().ok_or_else(|| DataError::TypeMismatch {
        field: field.to_string(),
        expected: "number",
        actual: json_kind(value),
    })?;
    if let Some(min) = c.min {
        if n < min {
            return Err(violation(field, format!("must be at least {min}, got {n}")));
        }
    }
    if let Some(max) = c.max {
        if n > max {
            return Err(violation(field, format!("must be at most {max}, got {n}")));
        }
    }
    Ok(())
}

/// A media value as it may appear in a payload.
struct MediaRef<'a> {
    reference: &'a str,
    content_type: Option<&'a str>,
    size: Option<u64>,
}

impl<'a> MediaRef<'a> {
    fn parse(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self {
                reference: s,
                content_type: None,
                size: None,
            }),
            Value::Object(map) => {
                let reference = map
                    .get("ref")
                    .or_else(|| map.get("url"))
                    .and_then(Value::as_str)?;
                Some(Self {
                    reference,
                    content_type: map.get("contentType").and_then(Value::as_str),
                    size: map.get("size").and_then(Value::as_u64),
                })
            }
            _ => None,
        }
    }

    /// Normalized subtype from the declared content type, else the file
    /// extension of the reference (query and fragment stripped).
    fn subtype(&self) -> Option<String> {
        if let Some(ct) = self.content_type.filter(|ct| !ct.trim().is_empty()) {
            return Some(normalize_subtype(ct));
        }
        let path = self
            .reference
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        let (_, ext) = file.rsplit_once('.')?;
        (!ext.is_empty()).then(|| normalize_subtype(ext))
    }
}

fn normalize_subtype(media_type: &str) -> String {
    let lower = media_type.trim().to_ascii_lowercase();
    let subtype = lower.rsplit('/').next().unwrap_or_default();
    let subtype = subtype.split(';').next().unwrap_or_default().trim();
    match subtype {
        "jpg" => "jpeg".to_string(),
        other => other.to_string(),
    }
}

fn check_media(field: &str, value: &Value, c: &MediaConstraints) -> Result<(), DataError> {
    let media = MediaRef::parse(value).ok_or_else(|| DataError::TypeMismatch {
        field: field.to_string(),
        expected: "media reference",
        actual: json_kind(value),
    })?;
    if media.reference.trim().is_empty() {
        return Err(violation(field, "must reference a media asset".to_string()));
    }

    if let Some(allowed) = &c.allowed_types {
        let subtype = media.subtype().ok_or_else(|| {
            violation(
                field,
                format!("media type of '{}' cannot be determined", media.reference),
            )
        })?;
        if !allowed.iter().any(|t| normalize_subtype(t) == subtype) {
            return Err(violation(
                field,
                format!("media type '{subtype}' is not one of {}", allowed.join(", ")),
            ));
        }
    }

    if let (Some(max), Some(size)) = (c.max_size, media.size) {
        if size > max {
            return Err(violation(
                field,
                format!("media size {size} exceeds maximum of {max} bytes"),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
