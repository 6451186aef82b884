//! Rasterises templates into RGBA images.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::error::Error;
use crate::template::{Point, Template};

/// Largest canvas side, in pixels, that will be rasterised.
pub const MAX_SIDE: u32 = 16_384;

/// Outline drawn along the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Stroke width in pixels.
    pub width: u32,
    /// Stroke colour.
    pub color: Rgba<u8>,
}

/// How a template is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Curve colour.
    pub line_color: Rgba<u8>,
    /// Curve width in pixels.
    pub line_width: u32,
    /// Optional canvas outline.
    pub border: Option<Border>,
    /// Fill colour behind everything.
    pub background: Rgba<u8>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_color: Rgba([255, 0, 0, 255]),
            line_width: 2,
            border: Some(Border { width: 4, color: Rgba([0, 0, 0, 255]) }),
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Draw `template` at one pixel per canvas unit.
///
/// # Errors
///
/// Returns [`Error::Render`] if the canvas is empty, not finite, or larger
/// than [`MAX_SIDE`] on either axis.
pub fn render(template: &Template, style: &RenderStyle) -> Result<RgbaImage, Error> {
    let width = pixel_extent(template.canvas.width, "width")?;
    let height = pixel_extent(template.canvas.height, "height")?;

    let mut img = RgbaImage::from_pixel(width, height, style.background);

    let to_pixel = |p: &Point| (p.x as f32, (f64::from(height) - p.y) as f32);
    let pixels: Vec<(f32, f32)> = template.points.iter().map(to_pixel).collect();
    draw_polyline(&mut img, &pixels, style.line_width, style.line_color);

    if let Some(border) = style.border {
        draw_border(&mut img, border);
    }

    Ok(img)
}

fn pixel_extent(value: f64, axis: &str) -> Result<u32, Error> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Render(format!("canvas {axis} must be positive, got {value}")));
    }
    let px = value.ceil();
    if px > f64::from(MAX_SIDE) {
        return Err(Error::Render(format!("canvas {axis} {px} exceeds {MAX_SIDE} pixels")));
    }
    Ok(px as u32)
}

/// Stroke a polyline by drawing parallel offset segments plus round joins.
fn draw_polyline(img: &mut RgbaImage, pixels: &[(f32, f32)], width: u32, color: Rgba<u8>) {
    if width == 0 {
        return;
    }
    if let [only] = pixels {
        draw_filled_circle_mut(img, (only.0 as i32, only.1 as i32), (width / 2) as i32, color);
        return;
    }

    let half = (width as f32 - 1.0) / 2.0;
    for pair in pixels.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len = dx.hypot(dy);
        let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

        for k in 0..width {
            let off = k as f32 - half;
            draw_line_segment_mut(
                img,
                (a.0 + nx * off, a.1 + ny * off),
                (b.0 + nx * off, b.1 + ny * off),
                color,
            );
        }
        if width > 2 {
            draw_filled_circle_mut(img, (b.0 as i32, b.1 as i32), (width / 2) as i32, color);
        }
    }
}

fn draw_border(img: &mut RgbaImage, border: Border) {
    let (w, h) = img.dimensions();
    let t = border.width.min(w).min(h);
    if t == 0 {
        return;
    }
    let edges = [
        Rect::at(0, 0).of_size(w, t),
        Rect::at(0, (h - t) as i32).of_size(w, t),
        Rect::at(0, 0).of_size(t, h),
        Rect::at((w - t) as i32, 0).of_size(t, h),
    ];
    for edge in edges {
        draw_filled_rect_mut(img, edge, border.color);
    }
}
