//! Shape definitions for the diagram canvas.

mod connector;
mod diamond;
mod ellipse;
mod rectangle;
mod text;
mod triangle;

pub use connector::{ArrowStyle, Connector};
pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use rectangle::Rectangle;
pub use text::{FontSpec, Text};
pub use triangle::Triangle;

use crate::paint::Painter;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Fully transparent colors paint nothing.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Stroke and fill properties shared by every shape kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Interior fill color.
    pub fill: Rgba,
    /// Outline color.
    pub line: Rgba,
    /// Outline width in canvas units.
    pub line_width: u32,
}

impl ShapeStyle {
    /// Pen for the shape outline.
    pub fn pen(&self) -> crate::paint::Pen {
        crate::paint::Pen::new(self.line, self.line_width as f64)
    }

    /// Fill paint, `None` when the fill color is fully transparent.
    pub fn fill_paint(&self) -> Option<Rgba> {
        (!self.fill.is_transparent()).then_some(self.fill)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Rgba::white(),
            line: Rgba::black(),
            line_width: 1,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// The closed set of shape kinds. A shape's kind never changes after
/// construction; the kind doubles as the record tag in the file format and
/// as the tool-palette tag for creation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
    Triangle,
    Connector,
    Text,
}

impl ShapeKind {
    /// Stable wire tag for this kind. Tag 0 is reserved (it names the
    /// selection pointer in the tool palette).
    pub fn tag(self) -> u8 {
        match self {
            ShapeKind::Rectangle => 1,
            ShapeKind::Ellipse => 2,
            ShapeKind::Diamond => 3,
            ShapeKind::Triangle => 4,
            ShapeKind::Connector => 5,
            ShapeKind::Text => 6,
        }
    }

    /// Inverse of [`ShapeKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ShapeKind::Rectangle),
            2 => Some(ShapeKind::Ellipse),
            3 => Some(ShapeKind::Diamond),
            4 => Some(ShapeKind::Triangle),
            5 => Some(ShapeKind::Connector),
            6 => Some(ShapeKind::Text),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Connector => "Connector",
            ShapeKind::Text => "Text",
        }
    }

    /// Factory for new shapes, used both by the creation tools and by the
    /// file reader. Box kinds get their default size; a connector starts
    /// degenerate with both endpoints at `position`.
    pub fn create(self, position: Point) -> Shape {
        match self {
            ShapeKind::Rectangle => Shape::Rectangle(Rectangle::new(position)),
            ShapeKind::Ellipse => Shape::Ellipse(Ellipse::new(position)),
            ShapeKind::Diamond => Shape::Diamond(Diamond::new(position)),
            ShapeKind::Triangle => Shape::Triangle(Triangle::new(position)),
            ShapeKind::Connector => Shape::Connector(Connector::new(position, position)),
            ShapeKind::Text => Shape::Text(Text::new(position)),
        }
    }
}

/// Capability set every shape kind implements.
pub trait ShapeBehavior {
    fn id(&self) -> ShapeId;
    fn kind(&self) -> ShapeKind;

    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);

    fn style(&self) -> &ShapeStyle;
    fn style_mut(&mut self) -> &mut ShapeStyle;

    fn selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);

    fn label(&self) -> &str;
    fn set_label(&mut self, label: &str);

    /// Axis-aligned box covering the shape's visible extent. Always contains
    /// every point for which [`ShapeBehavior::contains`] returns true.
    fn bounding_rect(&self) -> Rect;

    /// Point-in-shape test exact to the kind's geometry.
    fn contains(&self, point: Point) -> bool;

    /// Translate all geometry-defining points; style and label untouched.
    fn move_by(&mut self, delta: Vec2);

    fn set_size(&mut self, size: Size);
    fn size(&self) -> Size;

    /// Draw the shape through the paint primitives, including its label and
    /// selection adornments when selected.
    fn paint(&self, painter: &mut dyn Painter);
}

/// Enum wrapper over all shape kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Diamond(Diamond),
    Triangle(Triangle),
    Connector(Connector),
    Text(Text),
}

impl Shape {
    fn inner(&self) -> &dyn ShapeBehavior {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Diamond(s) => s,
            Shape::Triangle(s) => s,
            Shape::Connector(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeBehavior {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Diamond(s) => s,
            Shape::Triangle(s) => s,
            Shape::Connector(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.inner().id()
    }

    pub fn kind(&self) -> ShapeKind {
        self.inner().kind()
    }

    pub fn position(&self) -> Point {
        self.inner().position()
    }

    pub fn set_position(&mut self, position: Point) {
        self.inner_mut().set_position(position);
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.inner_mut().style_mut()
    }

    pub fn selected(&self) -> bool {
        self.inner().selected()
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.inner_mut().set_selected(selected);
    }

    pub fn label(&self) -> &str {
        self.inner().label()
    }

    pub fn set_label(&mut self, label: &str) {
        self.inner_mut().set_label(label);
    }

    pub fn bounding_rect(&self) -> Rect {
        self.inner().bounding_rect()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.inner().contains(point)
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.inner_mut().move_by(delta);
    }

    pub fn set_size(&mut self, size: Size) {
        self.inner_mut().set_size(size);
    }

    pub fn size(&self) -> Size {
        self.inner().size()
    }

    pub fn paint(&self, painter: &mut dyn Painter) {
        self.inner().paint(painter);
    }

    /// Give the shape a fresh identity. Used when duplicating or pasting so
    /// copies never collide with their source.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Diamond(s) => s.id = new_id,
            Shape::Triangle(s) => s.id = new_id,
            Shape::Connector(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Shape::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match self {
            Shape::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Even-odd point-in-polygon test (ray cast along +x).
pub(crate) fn polygon_contains(vertices: &[Point], point: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (pi, pj) = (vertices[i], vertices[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_round_trip() {
        for kind in [
            ShapeKind::Rectangle,
            ShapeKind::Ellipse,
            ShapeKind::Diamond,
            ShapeKind::Triangle,
            ShapeKind::Connector,
            ShapeKind::Text,
        ] {
            assert_eq!(ShapeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ShapeKind::from_tag(0), None);
        assert_eq!(ShapeKind::from_tag(7), None);
    }

    #[test]
    fn test_factory_kind_matches() {
        let shape = ShapeKind::Diamond.create(Point::new(5.0, 5.0));
        assert_eq!(shape.kind(), ShapeKind::Diamond);
        assert_eq!(shape.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_polygon_contains_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(polygon_contains(&square, Point::new(5.0, 5.0)));
        assert!(!polygon_contains(&square, Point::new(15.0, 5.0)));
        assert!(!polygon_contains(&square, Point::new(5.0, -1.0)));
    }

    #[test]
    fn test_polygon_contains_degenerate() {
        let segment = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        assert!(!polygon_contains(&segment, Point::new(5.0, 0.0)));
    }
}
