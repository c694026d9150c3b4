//! Pixel-level painting on an RGBA canvas.

use image::{imageops, Rgba, RgbaImage};

use crate::style::{HexColor, Shape};

/// Placement of the QR symbol inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Canvas edge length.
    pub size: u32,
    /// Modules per symbol edge.
    pub modules: u32,
    /// Pixels per module edge.
    pub module_px: u32,
    /// Top-left corner of the symbol.
    pub origin: u32,
}

impl Layout {
    /// Fit `modules` into a `size` canvas after removing border and margin.
    ///
    /// Returns `None` when fewer than one pixel per module remains.
    pub fn fit(size: u32, border: u32, margin: u32, modules: u32) -> Option<Self> {
        let frame = border.checked_add(margin)?.checked_mul(2)?;
        let inner = size.checked_sub(frame)?;
        let module_px = inner.checked_div(modules)?;
        if module_px == 0 {
            return None;
        }
        let extent = module_px * modules;
        Some(Self {
            size,
            modules,
            module_px,
            origin: border + margin + (inner - extent) / 2,
        })
    }

    /// Edge length of the painted symbol.
    pub fn extent(&self) -> u32 {
        self.module_px * self.modules
    }
}

/// Colors dark modules, either uniformly or along a linear gradient.
#[derive(Debug, Clone)]
pub enum Ink {
    Solid(Rgba<u8>),
    Linear {
        from: [u8; 4],
        to: [u8; 4],
        /// Unit direction of the gradient axis.
        dir: (f64, f64),
    },
}

impl Ink {
    pub fn solid(color: &HexColor) -> Self {
        Self::Solid(Rgba(color.rgba()))
    }

    pub fn linear(from: &HexColor, to: &HexColor, angle_deg: i32) -> Self {
        let rad = f64::from(angle_deg).to_radians();
        Self::Linear {
            from: from.rgba(),
            to: to.rgba(),
            dir: (rad.cos(), rad.sin()),
        }
    }

    /// Color at normalized symbol coordinates, both in `0.0..=1.0`.
    fn at(&self, u: f64, v: f64) -> Rgba<u8> {
        match self {
            Self::Solid(c) => *c,
            Self::Linear { from, to, dir } => {
                let span = dir.0.abs() + dir.1.abs();
                let proj = (u - 0.5) * dir.0 + (v - 0.5) * dir.1;
                let t = if span > 0.0 {
                    (0.5 + proj / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let mut out = [0u8; 4];
                for i in 0..4 {
                    let a = f64::from(from[i]);
                    let b = f64::from(to[i]);
                    out[i] = (a + (b - a) * t).round() as u8;
                }
                Rgba(out)
            }
        }
    }
}

/// Paint the `border`-wide frame around the canvas edge.
pub fn paint_border(canvas: &mut RgbaImage, border: u32, color: &HexColor) {
    if border == 0 {
        return;
    }
    let size = canvas.width();
    let px = Rgba(color.rgba());
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        if x < border || y < border || x >= size - border || y >= size - border {
            *pixel = px;
        }
    }
}

/// Paint dark modules. `dark` is row-major, `layout.modules` squared.
pub fn paint_modules(canvas: &mut RgbaImage, layout: &Layout, dark: &[bool], shape: &Shape, ink: &Ink) {
    let n = layout.modules;
    let m = layout.module_px;
    let radius = f64::from(m) / 2.0;
    for my in 0..n {
        for mx in 0..n {
            if !dark[(my * n + mx) as usize] {
                continue;
            }
            let color = ink.at(
                (f64::from(mx) + 0.5) / f64::from(n),
                (f64::from(my) + 0.5) / f64::from(n),
            );
            let x0 = layout.origin + mx * m;
            let y0 = layout.origin + my * m;
            for dy in 0..m {
                for dx in 0..m {
                    let inside = match shape {
                        Shape::Circle => {
                            let cx = f64::from(dx) + 0.5 - radius;
                            let cy = f64::from(dy) + 0.5 - radius;
                            cx * cx + cy * cy <= radius * radius
                        }
                        _ => true,
                    };
                    if inside {
                        canvas.put_pixel(x0 + dx, y0 + dy, color);
                    }
                }
            }
        }
    }
}

/// Scale `logo` to fit a box one fifth of the symbol edge and paste it
/// centered on a pad of `background`.
pub fn overlay_logo(canvas: &mut RgbaImage, layout: &Layout, logo: &RgbaImage, background: &HexColor) {
    let max_edge = (layout.extent() / 5).max(1);
    let (w, h) = logo.dimensions();
    let scale = f64::from(max_edge) / f64::from(w.max(h).max(1));
    let lw = ((f64::from(w) * scale).round() as u32).clamp(1, max_edge);
    let lh = ((f64::from(h) * scale).round() as u32).clamp(1, max_edge);
    let scaled = imageops::resize(logo, lw, lh, imageops::FilterType::Lanczos3);

    let center = layout.origin + layout.extent() / 2;
    let pad = layout.module_px;
    let pad_w = lw + 2 * pad;
    let pad_h = lh + 2 * pad;
    let pad_x = center.saturating_sub(pad_w / 2);
    let pad_y = center.saturating_sub(pad_h / 2);
    let bg = Rgba(background.rgba());
    for y in pad_y..(pad_y + pad_h).min(canvas.height()) {
        for x in pad_x..(pad_x + pad_w).min(canvas.width()) {
            canvas.put_pixel(x, y, bg);
        }
    }

    imageops::overlay(
        canvas,
        &scaled,
        i64::from(center.saturating_sub(lw / 2)),
        i64::from(center.saturating_sub(lh / 2)),
    );
}

/// Make pixels outside a rounded rectangle of `radius` transparent.
pub fn round_corners(canvas: &mut RgbaImage, radius: u32) {
    let size = canvas.width();
    let r = radius.min(size / 2);
    if r == 0 {
        return;
    }
    let rf = f64::from(r);
    let far = f64::from(size - r);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        let cx = if px < rf {
            rf
        } else if px > far {
            far
        } else {
            continue;
        };
        let cy = if py < rf {
            rf
        } else if py > far {
            far
        } else {
            continue;
        };
        let (dx, dy) = (px - cx, py - cy);
        if dx * dx + dy * dy > rf * rf {
            pixel.0[3] = 0;
        }
    }
}
