//! QR Studio template engine.
//!
//! Pure domain logic with no HTTP or storage concerns: template schemas and
//! their structural validation, payload validation, style resolution and
//! image rendering. Hosts supply templates through
//! [`template::TemplateSource`] and logo bytes through
//! [`render::AssetSource`].

pub mod error;
pub mod issuance;
pub mod qr_code;
pub mod render;
pub mod schema;
pub mod style;
pub mod template;
pub mod types;
pub mod validation;
