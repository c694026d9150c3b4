//! Style specification, hex colors and style resolution.

pub mod color;
pub mod resolve;
pub mod spec;

pub use color::HexColor;
pub use resolve::{merge_style_fields, resolve_style, StyleSource};
pub use spec::{ErrorCorrection, Shape, StyleError, StyleSpec};
