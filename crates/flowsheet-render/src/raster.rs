//! Raster export surface.
//!
//! Implements the core paint primitives over a tiny-skia pixmap. Text is
//! laid out with the shared wrap helper and rasterized glyph by glyph with
//! rusttype; when no system font resolves, text is skipped (with a logged
//! warning) rather than failing the export.

use crate::font;
use crate::{ExportError, ExportResult};
use flowsheet_core::Document;
use flowsheet_core::paint::{self, Painter, Pen, StrokeStyle};
use flowsheet_core::shapes::{FontSpec, Rgba};
use kurbo::{Point, Rect};
use rusttype::{Font, Scale, point as rt_point};
use std::path::Path;
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, StrokeDash,
    Transform,
};

/// A [`Painter`] that rasterizes into a pixmap.
pub struct RasterPainter {
    pixmap: Pixmap,
}

impl RasterPainter {
    /// A painter over a fresh transparent pixmap. `None` when either
    /// dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn paint_for(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(color.r, color.g, color.b, color.a));
        paint.anti_alias = true;
        paint
    }

    fn stroke_for(pen: &Pen) -> Stroke {
        Stroke {
            width: pen.width as f32,
            dash: match pen.style {
                StrokeStyle::Solid => None,
                StrokeStyle::Dashed => StrokeDash::new(vec![4.0, 4.0], 0.0),
            },
            ..Stroke::default()
        }
    }

    fn draw_path(
        &mut self,
        path: Option<tiny_skia::Path>,
        stroke: Option<&Pen>,
        fill: Option<Rgba>,
    ) {
        let Some(path) = path else { return };
        if let Some(color) = fill {
            if color.a > 0 {
                self.pixmap.fill_path(
                    &path,
                    &Self::paint_for(color),
                    FillRule::EvenOdd,
                    Transform::identity(),
                    None,
                );
            }
        }
        if let Some(pen) = stroke {
            self.pixmap.stroke_path(
                &path,
                &Self::paint_for(pen.color),
                &Self::stroke_for(pen),
                Transform::identity(),
                None,
            );
        }
    }

    /// Source-over blend of a glyph coverage sample, in premultiplied
    /// space.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        let alpha = (coverage * color.a as f32 / 255.0).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let index = (y * width + x) as usize;
        let pixels = self.pixmap.pixels_mut();
        let dst = pixels[index];
        let inv = 1.0 - alpha;
        let out_a = (255.0 * alpha + dst.alpha() as f32 * inv).round() as u8;
        let channel = |src: u8, dst: u8| -> u8 {
            ((src as f32 * alpha + dst as f32 * inv).round() as u8).min(out_a)
        };
        let blended = PremultipliedColorU8::from_rgba(
            channel(color.r, dst.red()),
            channel(color.g, dst.green()),
            channel(color.b, dst.blue()),
            out_a,
        );
        if let Some(blended) = blended {
            pixels[index] = blended;
        }
    }
}

fn line_advance(font: &Font<'_>, line: &str, scale: Scale) -> f32 {
    font.layout(line, scale, rt_point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

impl Painter for RasterPainter {
    fn line(&mut self, a: Point, b: Point, pen: &Pen) {
        let mut pb = PathBuilder::new();
        pb.move_to(a.x as f32, a.y as f32);
        pb.line_to(b.x as f32, b.y as f32);
        self.draw_path(pb.finish(), Some(pen), None);
    }

    fn rect(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let path = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        )
        .map(PathBuilder::from_rect);
        self.draw_path(path, stroke, fill);
    }

    fn ellipse(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let path = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        )
        .and_then(PathBuilder::from_oval);
        self.draw_path(path, stroke, fill);
    }

    fn polygon(&mut self, points: &[Point], stroke: Option<&Pen>, fill: Option<Rgba>) {
        if points.len() < 2 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for point in &points[1..] {
            pb.line_to(point.x as f32, point.y as f32);
        }
        pb.close();
        self.draw_path(pb.finish(), stroke, fill);
    }

    fn text_block(&mut self, rect: Rect, text: &str, font_spec: &FontSpec, color: Rgba) {
        let Some(font) = font::font_for(font_spec) else {
            log::warn!(
                "skipping text {:?}: no font for family {:?}",
                text,
                font_spec.family
            );
            return;
        };

        let lines = paint::wrap_text(text, font_spec, rect.width());
        let scale = Scale::uniform(font_spec.point_size as f32);
        let line_height = paint::line_height(font_spec) as f32;
        let ascent = font.v_metrics(scale).ascent;

        let block_top = rect.center().y as f32 - lines.len() as f32 * line_height / 2.0;
        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let advance = line_advance(font, line, scale);
            let start_x = rect.center().x as f32 - advance / 2.0;
            let baseline = block_top + index as f32 * line_height + ascent;
            for glyph in font.layout(line, scale, rt_point(start_x, baseline)) {
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, coverage| {
                        self.blend_pixel(
                            bb.min.x + gx as i32,
                            bb.min.y + gy as i32,
                            color,
                            coverage,
                        );
                    });
                }
            }
        }
    }
}

/// Rasterize a document snapshot at its canvas size.
pub fn render_pixmap(document: &Document) -> ExportResult<Pixmap> {
    let width = document.canvas_size.width.round() as u32;
    let height = document.canvas_size.height.round() as u32;
    let mut painter =
        RasterPainter::new(width, height).ok_or(ExportError::InvalidCanvasSize { width, height })?;
    document.paint(&mut painter);
    Ok(painter.into_pixmap())
}

/// Write a PNG snapshot of the document to `path`.
pub fn export_png<P: AsRef<Path>>(document: &Document, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let pixmap = render_pixmap(document)?;
    pixmap
        .save_png(path)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    log::debug!("exported PNG to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_core::shapes::{Shape, ShapeKind};
    use kurbo::Size;

    #[test]
    fn test_render_matches_canvas_size() {
        let mut doc = Document::new();
        doc.canvas_size = Size::new(320.0, 240.0);
        let pixmap = render_pixmap(&doc).unwrap();
        assert_eq!(pixmap.width(), 320);
        assert_eq!(pixmap.height(), 240);
    }

    #[test]
    fn test_background_and_fill_pixels() {
        let mut doc = Document::new();
        doc.canvas_size = Size::new(200.0, 200.0);
        let mut shape = ShapeKind::Rectangle.create(Point::new(40.0, 40.0));
        shape.style_mut().fill = Rgba::rgb(255, 0, 0);
        doc.add_shape(shape);

        let pixmap = render_pixmap(&doc).unwrap();
        // Inside the rectangle: red fill.
        let inside = pixmap.pixel(100, 80).unwrap();
        assert!(inside.red() > 200 && inside.green() < 50);
        // Outside: white page background.
        let outside = pixmap.pixel(10, 10).unwrap();
        assert!(outside.red() > 200 && outside.green() > 200 && outside.blue() > 200);
    }

    #[test]
    fn test_connector_stroke_lands_on_path() {
        let mut doc = Document::new();
        doc.canvas_size = Size::new(200.0, 100.0);
        let mut connector =
            flowsheet_core::shapes::Connector::new(Point::new(10.0, 50.0), Point::new(190.0, 50.0));
        connector.arrow = flowsheet_core::shapes::ArrowStyle::None;
        connector.style.line_width = 3;
        doc.add_shape(Shape::Connector(connector));

        let pixmap = render_pixmap(&doc).unwrap();
        let on_path = pixmap.pixel(100, 50).unwrap();
        // Black stroke over white background.
        assert!(on_path.red() < 100);
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let mut doc = Document::new();
        doc.canvas_size = Size::new(0.0, 100.0);
        assert!(matches!(
            render_pixmap(&doc),
            Err(ExportError::InvalidCanvasSize { .. })
        ));
    }

    #[test]
    fn test_export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.png");
        let mut doc = Document::new();
        doc.canvas_size = Size::new(64.0, 64.0);
        doc.add_shape(ShapeKind::Ellipse.create(Point::new(4.0, 4.0)));
        export_png(&doc, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
