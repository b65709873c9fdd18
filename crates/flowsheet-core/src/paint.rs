//! Paint-primitive abstraction.
//!
//! Shapes never talk to a concrete drawing backend. They issue a small set
//! of primitives (line, rect, ellipse, polygon, word-wrapped text block)
//! against the [`Painter`] trait; export surfaces and on-screen hosts
//! implement it.

use crate::selection::FrameHandle;
use crate::shapes::{FontSpec, Rgba};
use kurbo::{Point, Rect};

/// Side length of the square handles drawn on a selected shape.
pub const HANDLE_SIZE: f64 = 8.0;

/// Color used for selection frames and handles.
pub const SELECTION_COLOR: Rgba = Rgba::rgb(0, 0, 255);

/// Outline style of a pen stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

/// Stroke parameters for outline primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Rgba,
    pub width: f64,
    pub style: StrokeStyle,
}

impl Pen {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn dashed(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }
}

/// Drawing surface primitives.
///
/// `stroke: None` means no outline, `fill: None` means no interior, matching
/// the stroke+fill split of the rect/ellipse/polygon primitives.
pub trait Painter {
    fn line(&mut self, a: Point, b: Point, pen: &Pen);
    fn rect(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>);
    fn ellipse(&mut self, rect: Rect, stroke: Option<&Pen>, fill: Option<Rgba>);
    fn polygon(&mut self, points: &[Point], stroke: Option<&Pen>, fill: Option<Rgba>);

    /// Draw `text` word-wrapped to the width of `rect` and centered both
    /// ways inside it. Implementations share the layout produced by
    /// [`wrap_text`] so every surface breaks lines identically.
    fn text_block(&mut self, rect: Rect, text: &str, font: &FontSpec, color: Rgba);
}

/// Average glyph advance as a fraction of the font size. An estimate, but
/// the same estimate everywhere, so layout is consistent across surfaces.
const CHAR_WIDTH_FACTOR: f64 = 0.55;

/// Line spacing as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Estimated advance width of a single line.
pub fn line_width(line: &str, font: &FontSpec) -> f64 {
    line.chars().count() as f64 * font.point_size as f64 * CHAR_WIDTH_FACTOR
}

/// Line height (baseline-to-baseline) for a font.
pub fn line_height(font: &FontSpec) -> f64 {
    font.point_size as f64 * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap against the estimated metrics. Explicit newlines are
/// hard breaks; a single word wider than `max_width` gets its own line.
pub fn wrap_text(text: &str, font: &FontSpec, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || line_width(&candidate, font) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

/// Extent of `text` wrapped at `max_width`: widest line by estimated
/// advance, total height by line count.
pub fn text_extent(text: &str, font: &FontSpec, max_width: f64) -> kurbo::Size {
    let lines = wrap_text(text, font, max_width);
    let width = lines
        .iter()
        .map(|line| line_width(line, font))
        .fold(0.0, f64::max);
    kurbo::Size::new(width, lines.len() as f64 * line_height(font))
}

/// The square occupied by a handle centered at `center`.
pub fn handle_rect(center: Point) -> Rect {
    Rect::new(
        center.x - HANDLE_SIZE / 2.0,
        center.y - HANDLE_SIZE / 2.0,
        center.x + HANDLE_SIZE / 2.0,
        center.y + HANDLE_SIZE / 2.0,
    )
}

/// Draw the dashed selection frame plus the eight resize handles for a
/// box-kind shape.
pub fn paint_selection_frame(painter: &mut dyn Painter, rect: Rect) {
    painter.rect(rect, Some(&Pen::dashed(SELECTION_COLOR, 1.0)), None);
    let pen = Pen::new(SELECTION_COLOR, 1.0);
    for handle in FrameHandle::ALL {
        painter.rect(
            handle_rect(handle.position(rect)),
            Some(&pen),
            Some(Rgba::white()),
        );
    }
}

/// Draw a non-empty label centered and word-wrapped inside `rect`.
pub fn paint_label(painter: &mut dyn Painter, rect: Rect, label: &str) {
    if label.is_empty() {
        return;
    }
    painter.text_block(rect, label, &FontSpec::default(), Rgba::black());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let font = FontSpec::default();
        let lines = wrap_text("alpha beta gamma delta", &font, 40.0);
        assert!(lines.len() > 1);
        for line in &lines {
            // A wrapped line never holds more than what fits, unless it is a
            // single oversized word.
            assert!(line_width(line, &font) <= 40.0 || !line.contains(' '));
        }
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let font = FontSpec::default();
        let lines = wrap_text("one\ntwo", &font, 1000.0);
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_extent_grows_with_content() {
        let font = FontSpec::default();
        let short = text_extent("hi", &font, 1000.0);
        let long = text_extent("hi there diagram", &font, 1000.0);
        assert!(long.width > short.width);
        assert_eq!(short.height, long.height);
    }

    #[test]
    fn test_handle_rect_centered() {
        let rect = handle_rect(Point::new(10.0, 20.0));
        assert_eq!(rect.center(), Point::new(10.0, 20.0));
        assert_eq!(rect.width(), HANDLE_SIZE);
    }
}
