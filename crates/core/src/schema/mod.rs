//! Schema model: fields, definitions and metadata entries.
//!
//! These are value objects only; structural checks live in
//! [`crate::validation`].

pub mod definition;
pub mod field;
pub mod metadata;

pub use definition::{CompiledDefinition, Definition};
pub use field::{
    Constraints, Field, FieldDefinition, FieldType, MediaConstraints, NumberConstraints,
    TextConstraints,
};
pub use metadata::{find_entry, MetadataDefinition, MetadataKind, MetadataPair};
