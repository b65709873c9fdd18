//! SVG export surface.
//!
//! Builds resolution-independent markup by implementing the core paint
//! primitives over a string buffer.

use crate::ExportResult;
use flowsheet_core::Document;
use flowsheet_core::paint::{self, Painter, Pen, StrokeStyle};
use flowsheet_core::shapes::{FontSpec, Rgba};
use kurbo::{Point, Rect};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// A [`Painter`] that accumulates SVG elements.
#[derive(Debug, Default)]
pub struct SvgPainter {
    body: String,
}

impl SvgPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the accumulated elements in an `<svg>` document of the given
    /// size.
    pub fn finish(self, width: f64, height: f64) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">\n{}</svg>\n",
            self.body
        )
    }
}

fn color_value(color: Rgba) -> String {
    format!("rgb({},{},{})", color.r, color.g, color.b)
}

fn stroke_attrs(pen: Option<&Pen>) -> String {
    match pen {
        None => "stroke=\"none\"".to_string(),
        Some(pen) => {
            let mut attrs = format!(
                "stroke=\"{}\" stroke-width=\"{}\"",
                color_value(pen.color),
                pen.width
            );
            if pen.color.a < 255 {
                let _ = write!(attrs, " stroke-opacity=\"{:.3}\"", pen.color.a as f64 / 255.0);
            }
            if pen.style == StrokeStyle::Dashed {
                attrs.push_str(" stroke-dasharray=\"4 4\"");
            }
            attrs
        }
    }
}

fn fill_attrs(fill: Option<Rgba>) -> String {
    match fill {
        None => "fill=\"none\"".to_string(),
        Some(color) => {
            let mut attrs = format!("fill=\"{}\"", color_value(color));
            if color.a < 255 {
                let _ = write!(attrs, " fill-opacity=\"{:.3}\"", color.a as f64 / 255.0);
            }
            attrs
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Painter for SvgPainter {
    fn line(&mut self, a: Point, b: Point, pen: &Pen) {
        let _ = writeln!(
            self.body,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {}/>",
            a.x,
            a.y,
            b.x,
            b.y,
            stroke_attrs(Some(pen))
        );
    }

    fn rect(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let _ = writeln!(
            self.body,
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {} {}/>",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            fill_attrs(fill),
            stroke_attrs(stroke)
        );
    }

    fn ellipse(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>) {
        let center = rect.center();
        let _ = writeln!(
            self.body,
            "  <ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {} {}/>",
            center.x,
            center.y,
            rect.width() / 2.0,
            rect.height() / 2.0,
            fill_attrs(fill),
            stroke_attrs(stroke)
        );
    }

    fn polygon(&mut self, points: &[Point], stroke: Option<&Pen>, fill: Option<Rgba>) {
        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.body,
            "  <polygon points=\"{}\" {} {}/>",
            coords,
            fill_attrs(fill),
            stroke_attrs(stroke)
        );
    }

    fn text_block(&mut self, rect: Rect, text: &str, font: &FontSpec, color: Rgba) {
        let lines = paint::wrap_text(text, font, rect.width());
        let line_height = paint::line_height(font);
        let block_top = rect.center().y - lines.len() as f64 * line_height / 2.0;
        // Approximate ascent; SVG anchors text on the baseline.
        let ascent = font.point_size as f64 * 0.8;

        let weight = if font.bold { " font-weight=\"bold\"" } else { "" };
        let style = if font.italic {
            " font-style=\"italic\""
        } else {
            ""
        };
        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = block_top + index as f64 * line_height + ascent;
            let _ = writeln!(
                self.body,
                "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{}\" \
                 font-size=\"{}\"{}{} {}>{}</text>",
                rect.center().x,
                baseline,
                escape_text(&font.family),
                font.point_size,
                weight,
                style,
                fill_attrs(Some(color)),
                escape_text(line)
            );
        }
    }
}

/// Render a document snapshot to SVG markup.
pub fn render_svg(document: &Document) -> String {
    let mut painter = SvgPainter::new();
    document.paint(&mut painter);
    painter.finish(document.canvas_size.width, document.canvas_size.height)
}

/// Write an SVG snapshot of the document to `path`.
pub fn export_svg<P: AsRef<Path>>(document: &Document, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    fs::write(path, render_svg(document))?;
    log::debug!("exported SVG to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_core::shapes::{Shape, ShapeBehavior, ShapeKind, Text};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.canvas_size = kurbo::Size::new(400.0, 300.0);
        doc.add_shape(ShapeKind::Rectangle.create(Point::new(10.0, 10.0)));
        doc.add_shape(ShapeKind::Ellipse.create(Point::new(150.0, 10.0)));
        doc.add_shape(ShapeKind::Diamond.create(Point::new(10.0, 120.0)));
        doc.add_shape(ShapeKind::Connector.create(Point::new(10.0, 250.0)));
        let mut text = Text::new(Point::new(200.0, 250.0));
        text.set_label("hello <world>");
        doc.add_shape(Shape::Text(text));
        doc
    }

    #[test]
    fn test_render_contains_each_primitive() {
        let svg = render_svg(&sample_document());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<text"));
        // Labels are escaped.
        assert!(svg.contains("hello &lt;world&gt;"));
        assert!(!svg.contains("<world>"));
    }

    #[test]
    fn test_canvas_size_in_header() {
        let svg = render_svg(&sample_document());
        assert!(svg.contains("width=\"400\""));
        assert!(svg.contains("viewBox=\"0 0 400 300\""));
    }

    #[test]
    fn test_selected_shape_draws_dashed_frame() {
        let mut doc = Document::new();
        let mut shape = ShapeKind::Rectangle.create(Point::new(0.0, 0.0));
        shape.set_selected(true);
        doc.add_shape(shape);
        let svg = render_svg(&doc);
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.svg");
        export_svg(&sample_document(), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
    }
}
