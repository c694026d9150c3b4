//! Schema validation: structural checks on templates and data checks on
//! payloads. Pure logic, no I/O.

pub mod definition;
pub mod payload;

pub use definition::{
    validate_definition, validate_definition_count, validate_metadata, validate_style_fields,
    validate_template, ValidatedTemplate,
};
pub use payload::validate_payload;
