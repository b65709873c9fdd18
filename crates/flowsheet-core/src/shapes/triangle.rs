//! Triangle shape.

use super::{ShapeBehavior, ShapeId, ShapeKind, ShapeStyle, polygon_contains};
use crate::paint::{self, Painter};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isoceles triangle: apex at the top midpoint of the bounding box, base
/// along the bottom edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Triangle {
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

    /// Apex first, then the base corners.
    pub fn vertices(&self) -> [Point; 3] {
        let rect = self.as_rect();
        [
            Point::new(rect.center().x, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ]
    }
}

impl ShapeBehavior for Triangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Triangle
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
        polygon_contains(&self.vertices(), point)
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
        painter.polygon(
            &self.vertices(),
            Some(&self.style.pen()),
            self.style.fill_paint(),
        );
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
    fn test_contains_base_not_top_corners() {
        let triangle = Triangle::new(Point::new(0.0, 0.0));
        // Near the base center.
        assert!(triangle.contains(Point::new(60.0, 70.0)));
        // Top corners of the bounding box are outside the triangle.
        assert!(!triangle.contains(Point::new(5.0, 5.0)));
        assert!(!triangle.contains(Point::new(115.0, 5.0)));
    }

    #[test]
    fn test_apex_column() {
        let triangle = Triangle::new(Point::new(0.0, 0.0));
        // Straight down from the apex stays inside.
        assert!(triangle.contains(Point::new(60.0, 10.0)));
        assert!(triangle.contains(Point::new(60.0, 79.0)));
    }

    #[test]
    fn test_size_round_trip() {
        let mut triangle = Triangle::new(Point::new(0.0, 0.0));
        triangle.set_size(Size::new(42.0, 17.0));
        assert_eq!(triangle.size(), Size::new(42.0, 17.0));
    }
}
