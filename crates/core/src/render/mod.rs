//! QR image rendering: resolved style + payload string → PNG bytes.
//!
//! Symbol construction is delegated to the `qrcode` crate; everything after
//! the module matrix (layout, colors, shapes, logo, corners) happens here on
//! an `image::RgbaImage`.

pub mod assets;
pub mod canvas;

use std::io::Cursor;

use base64::Engine as _;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::RenderError;
use crate::style::{ErrorCorrection, Shape, StyleSpec};

pub use assets::{AssetError, AssetSource, FsAssetSource, MemoryAssetSource};
use canvas::{Ink, Layout};

/// MIME type of every rendered image.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Largest canvas edge the renderer will allocate, in pixels.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Encoded output of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    /// Text-safe form for JSON responses.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

/// Render `content` as a QR code image styled by `style`.
///
/// Pure apart from reading the logo through `assets`.
pub fn render(
    content: &str,
    style: &StyleSpec,
    assets: &dyn AssetSource,
) -> Result<RenderedImage, RenderError> {
    if let Shape::Other(name) = &style.shape {
        return Err(RenderError::UnsupportedShape {
            shape: name.clone(),
        });
    }

    if style.size > MAX_CANVAS_EDGE {
        return Err(RenderError::EncodeFailure(format!(
            "{}px canvas exceeds the maximum edge of {MAX_CANVAS_EDGE}px",
            style.size
        )));
    }

    // Fail on a bad logo before spending time on the symbol.
    let logo = style.logo_ref.as_deref().map(|r| load_logo(r, assets)).transpose()?;

    let code = QrCode::with_error_correction_level(content.as_bytes(), ec_level(style.error_correction))
        .map_err(|e| RenderError::EncodeFailure(e.to_string()))?;
    let modules = u32::try_from(code.width())
        .map_err(|_| RenderError::EncodeFailure("symbol too large".to_string()))?;
    let dark: Vec<bool> = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();

    let layout = Layout::fit(style.size, style.border, style.margin, modules).ok_or_else(|| {
        RenderError::EncodeFailure(format!(
            "{modules}x{modules} symbol does not fit a {}px canvas with border {} and margin {}",
            style.size, style.border, style.margin
        ))
    })?;

    tracing::debug!(
        modules,
        module_px = layout.module_px,
        size = style.size,
        shape = style.shape.as_str(),
        "Rendering QR code"
    );

    let mut img = RgbaImage::from_pixel(style.size, style.size, Rgba(style.background_color.rgba()));
    if let Some(border_color) = &style.border_color {
        canvas::paint_border(&mut img, style.border, border_color);
    }

    let ink = match (&style.gradient_color, style.gradient) {
        (Some(to), true) => Ink::linear(&style.foreground_color, to, style.gradient_angle),
        _ => Ink::solid(&style.foreground_color),
    };
    canvas::paint_modules(&mut img, &layout, &dark, &style.shape, &ink);

    if let Some(logo) = &logo {
        canvas::overlay_logo(&mut img, &layout, logo, &style.background_color);
    }
    canvas::round_corners(&mut img, style.corner_radius);

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RenderError::EncodeFailure(e.to_string()))?;

    Ok(RenderedImage {
        png,
        width: style.size,
        height: style.size,
    })
}

fn load_logo(reference: &str, assets: &dyn AssetSource) -> Result<RgbaImage, RenderError> {
    let unavailable = |reason: String| RenderError::LogoUnavailable {
        reference: reference.to_string(),
        reason,
    };
    let bytes = assets.read_asset(reference).map_err(|e| unavailable(e.to_string()))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| unavailable(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
