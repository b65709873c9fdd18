//! Ellipse shape.

use super::{ShapeBehavior, ShapeId, ShapeKind, ShapeStyle};
use crate::paint::{self, Painter};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in its bounding box (top-left anchored, like every
/// box kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Ellipse {
    pub const DEFAULT_SIZE: Size = Size::new(120.0, 80.0);

    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: Self::DEFAULT_SIZE.width,
            height: Self::DEFAULT_SIZE.height,
            style: ShapeStyle::default(),
            selected: false,
            label: String::new(),
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }
}

impl ShapeBehavior for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
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
    }

    fn bounding_rect(&self) -> Rect {
        self.as_rect()
    }

    fn contains(&self, point: Point) -> bool {
        let rx = self.width / 2.0;
        let ry = self.height / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let center = self.as_rect().center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
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
        painter.ellipse(rect, Some(&self.style.pen()), self.style.fill_paint());
        paint::paint_label(painter, rect, &self.label);
        if self.selected {
            paint::paint_selection_frame(painter, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_center_and_edge() {
        let ellipse = Ellipse::new(Point::new(0.0, 0.0));
        // 120x80 box: center (60, 40), radii (60, 40).
        assert!(ellipse.contains(Point::new(60.0, 40.0)));
        assert!(ellipse.contains(Point::new(119.0, 40.0)));
        // Bounding box corner is outside the curve.
        assert!(!ellipse.contains(Point::new(1.0, 1.0)));
        assert!(!ellipse.contains(Point::new(121.0, 40.0)));
    }

    #[test]
    fn test_degenerate_contains_nothing() {
        let mut ellipse = Ellipse::new(Point::new(0.0, 0.0));
        ellipse.set_size(Size::new(0.0, 80.0));
        assert!(!ellipse.contains(Point::new(0.0, 40.0)));
    }

    #[test]
    fn test_bounds_follow_move() {
        let mut ellipse = Ellipse::new(Point::new(5.0, 5.0));
        let before = ellipse.bounding_rect();
        ellipse.move_by(Vec2::new(100.0, 0.5));
        assert_eq!(ellipse.bounding_rect(), before + Vec2::new(100.0, 0.5));
    }
}
