//! Diamond shape.

use super::{ShapeBehavior, ShapeId, ShapeKind, ShapeStyle, polygon_contains};
use crate::paint::{self, Painter};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A diamond whose vertices sit at the side midpoints of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diamond {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Diamond {
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

    /// Vertices clockwise from the top midpoint.
    pub fn vertices(&self) -> [Point; 4] {
        let rect = self.as_rect();
        let center = rect.center();
        [
            Point::new(center.x, rect.y0),
            Point::new(rect.x1, center.y),
            Point::new(center.x, rect.y1),
            Point::new(rect.x0, center.y),
        ]
    }
}

impl ShapeBehavior for Diamond {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Diamond
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
    fn test_contains_center_not_corners() {
        let diamond = Diamond::new(Point::new(0.0, 0.0));
        assert!(diamond.contains(Point::new(60.0, 40.0)));
        // Bounding box corners lie outside the diamond.
        assert!(!diamond.contains(Point::new(2.0, 2.0)));
        assert!(!diamond.contains(Point::new(118.0, 78.0)));
    }

    #[test]
    fn test_vertices_on_bounds() {
        let diamond = Diamond::new(Point::new(10.0, 10.0));
        let rect = diamond.bounding_rect();
        for v in diamond.vertices() {
            assert!(rect.contains(v) || v.x == rect.x1 || v.y == rect.y1);
        }
    }

    #[test]
    fn test_hit_points_inside_bounds() {
        let diamond = Diamond::new(Point::new(0.0, 0.0));
        let rect = diamond.bounding_rect();
        for x in 0..12 {
            for y in 0..8 {
                let p = Point::new(x as f64 * 10.0, y as f64 * 10.0);
                if diamond.contains(p) {
                    assert!(rect.contains(p));
                }
            }
        }
    }
}
