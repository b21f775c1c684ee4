//! Rasterisation: draw stroke groups onto a tight, padded PNG canvas.
//!
//! ## Geometry
//!
//! The ink's bounding box is scaled uniformly (1:1 aspect) to fit the
//! configured content box, then the canvas is cropped to the scaled ink plus
//! half a line width on each side and a uniform padding margin. Ink
//! coordinates grow downward, so `y` maps to pixel rows without flipping.
//! There are no axes, ticks or borders.
//!
//! ## Resource scope
//!
//! The drawing surface lives inside a `Canvas` that is created per
//! document and dropped at the end of [`render_groups`], on success and on
//! every error path alike. Nothing outlives one document.

use crate::config::{RenderStyle, Rgba8};
use crate::error::Ink2ImgError;
use crate::pipeline::group::StrokeGroup;
use crate::pipeline::trace::{Point, Stroke};
use image::{ImageFormat, RgbaImage};
use std::path::Path;
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke as Pen, Transform,
};
use tracing::debug;

/// Pixel geometry for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    /// Pixels per document unit.
    pub scale: f64,
    pub min_x: f64,
    pub min_y: f64,
    /// Distance from the canvas edge to the ink's bounding box, in pixels.
    pub inset: f64,
    pub line_width: f64,
}

impl CanvasLayout {
    /// Compute the layout for the drawable strokes of `groups`.
    pub fn fit(groups: &[StrokeGroup<'_>], style: &RenderStyle) -> Self {
        let line_width = style.line_width_px();
        let pad = style.pad_px();
        let inset = pad + line_width / 2.0;

        let Some(bounds) = Bounds::of(drawable_strokes(groups)) else {
            let side = (2.0 * pad).ceil().max(1.0) as u32;
            return Self {
                width: side,
                height: side,
                scale: 1.0,
                min_x: 0.0,
                min_y: 0.0,
                inset,
                line_width,
            };
        };

        let dpi = f64::from(style.dpi);
        let box_w = style.content_width_in * dpi;
        let box_h = style.content_height_in * dpi;
        let (span_x, span_y) = (bounds.max_x - bounds.min_x, bounds.max_y - bounds.min_y);

        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (box_w / span_x).min(box_h / span_y),
            (true, false) => box_w / span_x,
            (false, true) => box_h / span_y,
            (false, false) => 1.0,
        };

        let extent = |span: f64| (span * scale + line_width + 2.0 * pad).ceil().max(1.0) as u32;

        Self {
            width: extent(span_x),
            height: extent(span_y),
            scale,
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            inset,
            line_width,
        }
    }

    /// Map a document point to pixel coordinates.
    pub fn map(&self, p: Point) -> (f32, f32) {
        (
            (self.inset + (p.x - self.min_x) * self.scale) as f32,
            (self.inset + (p.y - self.min_y) * self.scale) as f32,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn of<'a>(strokes: impl Iterator<Item = &'a Stroke>) -> Option<Self> {
        strokes
            .flat_map(|s| s.points.iter())
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    None => Bounds {
                        min_x: p.x,
                        min_y: p.y,
                        max_x: p.x,
                        max_y: p.y,
                    },
                    Some(b) => Bounds {
                        min_x: b.min_x.min(p.x),
                        min_y: b.min_y.min(p.y),
                        max_x: b.max_x.max(p.x),
                        max_y: b.max_y.max(p.y),
                    },
                })
            })
    }
}

/// Strokes that can be drawn as a polyline (two or more points).
fn drawable_strokes<'g, 'a: 'g>(
    groups: &'g [StrokeGroup<'a>],
) -> impl Iterator<Item = &'a Stroke> + 'g {
    groups
        .iter()
        .flat_map(|g| g.strokes.iter().copied())
        .filter(|s| s.points.len() >= 2)
}

/// A drawing surface scoped to one document.
struct Canvas {
    pixmap: Pixmap,
    layout: CanvasLayout,
}

impl Canvas {
    fn new(layout: CanvasLayout, background: Option<Rgba8>) -> Result<Self, Ink2ImgError> {
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(|| {
            Ink2ImgError::RasterisationFailed {
                detail: format!(
                    "cannot allocate a {}x{} canvas",
                    layout.width, layout.height
                ),
            }
        })?;
        if let Some(bg) = background {
            pixmap.fill(Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        }
        Ok(Self { pixmap, layout })
    }

    /// Draw one stroke; returns false if it was skipped.
    fn draw_stroke(&mut self, stroke: &Stroke, paint: &Paint<'_>, pen: &Pen) -> bool {
        let Some((first, rest)) = stroke.points.split_first() else {
            return false;
        };
        if rest.is_empty() {
            return false;
        }

        let mut pb = PathBuilder::new();
        let (x, y) = self.layout.map(*first);
        pb.move_to(x, y);
        for p in rest {
            let (x, y) = self.layout.map(*p);
            pb.line_to(x, y);
        }

        match pb.finish() {
            Some(path) => {
                self.pixmap
                    .stroke_path(&path, paint, pen, Transform::identity(), None);
                true
            }
            None => false,
        }
    }

    /// Consume the canvas, un-premultiplying its pixels into an `RgbaImage`.
    fn into_image(self) -> Result<RgbaImage, Ink2ImgError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut raw = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
            Ink2ImgError::Internal(format!("pixel buffer does not match {width}x{height}"))
        })
    }
}

/// Render every stroke of every group with the same colour and width.
///
/// Group labels play no part in rendering. Strokes with fewer than two points
/// are skipped without affecting the others.
pub fn render_groups(
    groups: &[StrokeGroup<'_>],
    style: &RenderStyle,
) -> Result<RgbaImage, Ink2ImgError> {
    let layout = CanvasLayout::fit(groups, style);
    let mut canvas = Canvas::new(layout, style.background)?;

    let mut paint = Paint::default();
    let c = style.color;
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;

    let pen = Pen {
        width: layout.line_width as f32,
        line_cap: LineCap::Square,
        line_join: LineJoin::Round,
        ..Pen::default()
    };

    let (mut drawn, mut skipped) = (0usize, 0usize);
    for stroke in groups.iter().flat_map(|g| g.strokes.iter()) {
        if canvas.draw_stroke(stroke, &paint, &pen) {
            drawn += 1;
        } else {
            skipped += 1;
        }
    }

    debug!(
        "Rendered {} strokes ({} skipped) → {}x{} px",
        drawn, skipped, layout.width, layout.height
    );

    canvas.into_image()
}

/// Render `groups` and write a PNG to `path`.
pub fn rasterize_to_file(
    groups: &[StrokeGroup<'_>],
    path: &Path,
    style: &RenderStyle,
) -> Result<(), Ink2ImgError> {
    let image = render_groups(groups, style)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| Ink2ImgError::ImageWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
}
