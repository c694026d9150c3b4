//! Payload definitions: the authored field list and its compiled form.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldDefinition};

/// Ordered list of authored fields.
///
/// Order is irrelevant for validation but preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definition(pub Vec<FieldDefinition>);

impl Definition {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FieldDefinition>> for Definition {
    fn from(fields: Vec<FieldDefinition>) -> Self {
        Self(fields)
    }
}

/// A definition that passed structural validation.
///
/// Only obtainable through
/// [`validate_definition`](crate::validation::definition::validate_definition),
/// so holding one proves names are unique and constraints are well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefinition {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl CompiledDefinition {
    /// Callers must have checked name uniqueness.
    pub(crate) fn from_unique(fields: Vec<Field>) -> Self {
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self { fields, by_name }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
