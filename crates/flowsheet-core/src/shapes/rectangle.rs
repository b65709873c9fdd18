//! Rectangle shape.

use super::{ShapeBehavior, ShapeId, ShapeKind, ShapeStyle};
use crate::paint::{self, Painter};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Rectangle {
    /// Default size for newly placed rectangles.
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

    /// The occupied region as a kurbo rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }
}

impl ShapeBehavior for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
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
        painter.rect(rect, Some(&self.style.pen()), self.style.fill_paint());
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
    fn test_rectangle_defaults() {
        let rect = Rectangle::new(Point::new(10.0, 20.0));
        assert_eq!(rect.position, Point::new(10.0, 20.0));
        assert_eq!(rect.size(), Rectangle::DEFAULT_SIZE);
        assert!(!rect.selected);
    }

    #[test]
    fn test_contains() {
        let rect = Rectangle::new(Point::new(0.0, 0.0));
        assert!(rect.contains(Point::new(60.0, 40.0)));
        assert!(!rect.contains(Point::new(130.0, 40.0)));
        assert!(!rect.contains(Point::new(60.0, 90.0)));
    }

    #[test]
    fn test_move_by_translates_bounds() {
        let mut rect = Rectangle::new(Point::new(10.0, 10.0));
        let before = rect.bounding_rect();
        rect.move_by(Vec2::new(-7.5, 12.25));
        let after = rect.bounding_rect();
        assert_eq!(after, before + Vec2::new(-7.5, 12.25));
    }

    #[test]
    fn test_set_size_clamps_negative() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0));
        rect.set_size(Size::new(-5.0, 30.0));
        assert_eq!(rect.size(), Size::new(0.0, 30.0));
    }
}
