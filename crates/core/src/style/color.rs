//! Hex color values used by style specifications.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted color syntax: `#RGB` or `#RRGGBB`.
pub const HEX_COLOR_PATTERN: &str = r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEX_COLOR_PATTERN).expect("valid regex"));

/// A validated hex color. Keeps the authored text for display and the
/// expanded RGB triple for painting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    text: String,
    rgb: [u8; 3],
}

impl HexColor {
    /// Parse `#RGB` or `#RRGGBB`. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        if !HEX_COLOR_RE.is_match(s) {
            return None;
        }
        let digits = &s[1..];
        let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();
        let rgb = if digits.len() == 3 {
            let mut out = [0u8; 3];
            for (slot, c) in out.iter_mut().zip(digits.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            out
        } else {
            [
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ]
        };
        Some(Self {
            text: s.to_string(),
            rgb,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// Opaque RGBA pixel for this color.
    pub fn rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.rgb;
        [r, g, b, 255]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("'{value}' is not a valid hex color"))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.text
    }
}
