//! The canonical, validated style specification.
//!
//! Every style source (flat template fields, a JSON style object, a Style
//! metadata entry) is reduced to a camelCase key/value map and passed through
//! [`StyleSpec::from_map`]. That single path performs coercion and invariant
//! checks, so equivalent data always yields an identical `StyleSpec`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::color::HexColor;
use crate::error::{ResolutionError, StructuralError, StyleViolation};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Module shape requested by a template.
///
/// Shapes the renderer does not know are carried through resolution as
/// [`Shape::Other`] and rejected at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shape {
    Square,
    Circle,
    Other(String),
}

impl Shape {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Shape {
    fn from(name: String) -> Self {
        match name.as_str() {
            "square" => Self::Square,
            "circle" => Self::Circle,
            _ => Self::Other(name),
        }
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.as_str().to_string()
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    /// Strongest level; used when a template does not specify one.
    #[default]
    H,
}

impl ErrorCorrection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// StyleSpec
// ---------------------------------------------------------------------------

/// Resolved rendering parameters for a QR code image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    pub shape: Shape,
    pub foreground_color: HexColor,
    pub background_color: HexColor,
    /// Canvas edge length in pixels.
    pub size: u32,
    /// Quiet zone between the border and the symbol, in pixels.
    pub margin: u32,
    pub corner_radius: u32,
    pub gradient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_color: Option<HexColor>,
    /// Degrees, measured clockwise from the positive x axis.
    pub gradient_angle: i32,
    /// Frame width in pixels.
    pub border: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_ref: Option<String>,
    pub error_correction: ErrorCorrection,
}

/// Why a key/value map could not become a [`StyleSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// A value had the wrong JSON type (e.g. `"size": "big"`).
    Coercion(String),
    /// Values were well-typed but broke an invariant.
    Invalid(StyleViolation),
}

impl From<StyleViolation> for StyleError {
    fn from(v: StyleViolation) -> Self {
        Self::Invalid(v)
    }
}

impl From<StyleError> for StructuralError {
    fn from(err: StyleError) -> Self {
        match err {
            StyleError::Coercion(reason) => StructuralError::StyleCoercion { reason },
            StyleError::Invalid(v) => StructuralError::InvalidStyle(v),
        }
    }
}

impl From<StyleError> for ResolutionError {
    fn from(err: StyleError) -> Self {
        match err {
            StyleError::Coercion(reason) => ResolutionError::InvalidStyleValue(reason),
            StyleError::Invalid(v) => ResolutionError::InvalidStyleValue(v.to_string()),
        }
    }
}

/// Untyped view of a style map. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStyle {
    shape: Option<String>,
    foreground_color: Option<String>,
    background_color: Option<String>,
    size: Option<i64>,
    margin: Option<i64>,
    corner_radius: Option<i64>,
    gradient: Option<bool>,
    gradient_color: Option<String>,
    gradient_angle: Option<i64>,
    border: Option<i64>,
    border_color: Option<String>,
    #[serde(alias = "logoUrl")]
    logo_ref: Option<String>,
    error_correction: Option<String>,
}

impl StyleSpec {
    /// Coerce an untyped style map and check every invariant.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, StyleError> {
        let raw: RawStyle = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| StyleError::Coercion(e.to_string()))?;
        Ok(Self::from_raw(raw)?)
    }

    fn from_raw(raw: RawStyle) -> Result<Self, StyleViolation> {
        let shape = non_empty(raw.shape)
            .map(Shape::from)
            .ok_or_else(|| StyleViolation::new("shape", "is required"))?;
        let foreground_color = required_color("foregroundColor", raw.foreground_color)?;
        let background_color = required_color("backgroundColor", raw.background_color)?;

        let size = match raw.size {
            Some(n) if n > 0 => to_u32("size", n)?,
            _ => return Err(StyleViolation::new("size", "must be greater than 0")),
        };
        let margin = non_negative("margin", raw.margin)?;
        let corner_radius = non_negative("cornerRadius", raw.corner_radius)?;

        let gradient = raw.gradient.unwrap_or(false);
        let gradient_color = optional_color("gradientColor", raw.gradient_color)?;
        if gradient && gradient_color.is_none() {
            return Err(StyleViolation::new(
                "gradientColor",
                "is required when gradient is true",
            ));
        }
        let gradient_angle = match raw.gradient_angle {
            None => 0,
            Some(deg) => i32::try_from(deg.rem_euclid(360)).unwrap_or(0),
        };

        let border = non_negative("border", raw.border)?;
        let border_color = optional_color("borderColor", raw.border_color)?;
        if border > 0 && border_color.is_none() {
            return Err(StyleViolation::new(
                "borderColor",
                "is required when border is greater than 0",
            ));
        }

        let error_correction = match non_empty(raw.error_correction) {
            None => ErrorCorrection::default(),
            Some(name) => ErrorCorrection::from_name(&name).ok_or_else(|| {
                StyleViolation::new(
                    "errorCorrection",
                    format!("'{name}' is not one of L, M, Q, H"),
                )
            })?,
        };

        Ok(Self {
            shape,
            foreground_color,
            background_color,
            size,
            margin,
            corner_radius,
            gradient,
            gradient_color,
            gradient_angle,
            border,
            border_color,
            logo_ref: non_empty(raw.logo_ref),
            error_correction,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Empty or whitespace-only strings count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn required_color(field: &'static str, value: Option<String>) -> Result<HexColor, StyleViolation> {
    optional_color(field, value)?.ok_or_else(|| StyleViolation::new(field, "is required"))
}

fn optional_color(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<HexColor>, StyleViolation> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => HexColor::parse(&s)
            .map(Some)
            .ok_or_else(|| StyleViolation::new(field, format!("'{s}' is not a valid hex color"))),
    }
}

fn non_negative(field: &'static str, value: Option<i64>) -> Result<u32, StyleViolation> {
    match value {
        None => Ok(0),
        Some(n) if n < 0 => Err(StyleViolation::new(field, "cannot be negative")),
        Some(n) => to_u32(field, n),
    }
}

fn to_u32(field: &'static str, n: i64) -> Result<u32, StyleViolation> {
    u32::try_from(n).map_err(|_| StyleViolation::new(field, format!("{n} is too large")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
