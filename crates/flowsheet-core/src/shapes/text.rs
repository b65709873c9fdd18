//! Text label shape.

use super::{Rgba, ShapeBehavior, ShapeId, ShapeKind, ShapeStyle};
use crate::paint::{self, Painter};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font description handed to the rendering host. The host resolves the
/// family name against whatever fonts it actually has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub point_size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            point_size: 10,
            bold: false,
            italic: false,
        }
    }
}

/// A standalone text block. Unlike the other box kinds it defaults to a
/// transparent fill and re-derives its size from its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the text box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub font: FontSpec,
    pub text_color: Rgba,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Text {
    pub const DEFAULT_SIZE: Size = Size::new(100.0, 30.0);

    /// Layout bound used when measuring content for auto-sizing.
    const MEASURE_WIDTH: f64 = 1000.0;

    /// Padding added around the measured text extent.
    const PADDING: Size = Size::new(20.0, 10.0);

    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: Self::DEFAULT_SIZE.width,
            height: Self::DEFAULT_SIZE.height,
            font: FontSpec::default(),
            text_color: Rgba::black(),
            style: ShapeStyle {
                fill: Rgba::transparent(),
                ..ShapeStyle::default()
            },
            selected: false,
            label: String::new(),
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
        if !self.label.is_empty() {
            self.fit_to_text();
        }
    }

    /// Re-derive the box size from the wrapped content extent plus padding.
    /// Empty content falls back to the default size.
    pub fn fit_to_text(&mut self) {
        if self.label.is_empty() {
            self.width = Self::DEFAULT_SIZE.width;
            self.height = Self::DEFAULT_SIZE.height;
            return;
        }
        let extent = paint::text_extent(&self.label, &self.font, Self::MEASURE_WIDTH);
        self.width = extent.width + Self::PADDING.width;
        self.height = extent.height + Self::PADDING.height;
    }
}

impl ShapeBehavior for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
        self.fit_to_text();
    }

    fn bounding_rect(&self) -> Rect {
        self.as_rect()
    }

    fn contains(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn set_size(&mut self, size: Size) {
        self.width = size.width.max(0.0);
        self.height = size.height.max(0.0);
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        let rect = self.as_rect();
        if let Some(fill) = self.style.fill_paint() {
            painter.rect(rect, None, Some(fill));
        }
        if !self.label.is_empty() {
            painter.text_block(rect, &self.label, &self.font, self.text_color);
        }
        if self.selected {
            paint::paint_selection_frame(painter, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = Text::new(Point::new(0.0, 0.0));
        assert_eq!(text.size(), Text::DEFAULT_SIZE);
        assert!(text.style.fill.is_transparent());
        assert_eq!(text.font.family, "Arial");
    }

    #[test]
    fn test_set_label_resizes() {
        let mut text = Text::new(Point::new(0.0, 0.0));
        text.set_label("a somewhat longer label that needs room");
        assert!(text.width > Text::DEFAULT_SIZE.width);
        // Clearing restores the default footprint.
        text.set_label("");
        assert_eq!(text.size(), Text::DEFAULT_SIZE);
    }

    #[test]
    fn test_set_font_resizes_nonempty() {
        let mut text = Text::new(Point::new(0.0, 0.0));
        text.set_label("hello");
        let small = text.size();
        text.set_font(FontSpec {
            point_size: 20,
            ..FontSpec::default()
        });
        assert!(text.size().width > small.width);
        assert!(text.size().height > small.height);
    }

    #[test]
    fn test_contains_tracks_box() {
        let mut text = Text::new(Point::new(10.0, 10.0));
        assert!(text.contains(Point::new(50.0, 20.0)));
        text.move_by(Vec2::new(200.0, 0.0));
        assert!(!text.contains(Point::new(50.0, 20.0)));
        assert!(text.contains(Point::new(250.0, 20.0)));
    }
}
