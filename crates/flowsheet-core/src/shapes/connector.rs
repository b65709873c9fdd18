//! Connector shape linking two canvas locations.

use super::{Rgba, ShapeBehavior, ShapeId, ShapeKind, ShapeStyle};
use crate::paint::{self, Painter, Pen, SELECTION_COLOR};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distance tolerance for the on-segment hit test.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Margin added around the path so selection handles stay paintable.
pub const BOUNDS_MARGIN: f64 = 10.0;

/// Arrowhead edge length.
pub const ARROW_SIZE: f64 = 10.0;

/// Diameter of the handles drawn at the connector's defining points.
const POINT_HANDLE_SIZE: f64 = 6.0;

/// Arrowhead placement along the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArrowStyle {
    None,
    Start,
    #[default]
    End,
    Both,
}

impl ArrowStyle {
    /// Stable wire tag.
    pub fn tag(self) -> u8 {
        match self {
            ArrowStyle::None => 0,
            ArrowStyle::Start => 1,
            ArrowStyle::End => 2,
            ArrowStyle::Both => 3,
        }
    }

    /// Inverse of [`ArrowStyle::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ArrowStyle::None),
            1 => Some(ArrowStyle::Start),
            2 => Some(ArrowStyle::End),
            3 => Some(ArrowStyle::Both),
            _ => None,
        }
    }

    pub fn at_start(self) -> bool {
        matches!(self, ArrowStyle::Start | ArrowStyle::Both)
    }

    pub fn at_end(self) -> bool {
        matches!(self, ArrowStyle::End | ArrowStyle::Both)
    }
}

/// A connector: two endpoints, an optional polyline of intermediate control
/// points, and optional arrowheads. Endpoints are plain coordinates — they
/// are not live references to the shapes they visually join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub(crate) id: ShapeId,
    /// Base anchor; mirrors the start point and is kept for uniformity with
    /// the other kinds (geometry is defined by the points below).
    pub position: Point,
    pub start: Point,
    pub end: Point,
    /// Intermediate points, in path order. Empty means a straight segment.
    pub control_points: Vec<Point>,
    pub arrow: ArrowStyle,
    pub style: ShapeStyle,
    pub selected: bool,
    pub label: String,
}

impl Connector {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: start,
            start,
            end,
            control_points: Vec::new(),
            arrow: ArrowStyle::default(),
            style: ShapeStyle::default(),
            selected: false,
            label: String::new(),
        }
    }

    /// All defining points in path order: start, controls, end.
    pub fn all_points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.control_points.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.control_points);
        points.push(self.end);
        points
    }

    pub fn add_control_point(&mut self, point: Point) {
        self.control_points.push(point);
    }

    pub fn clear_control_points(&mut self) {
        self.control_points.clear();
    }

    /// Midpoint of the rendered path: halfway along a straight segment, or
    /// the middle control point of a polyline.
    pub fn label_anchor(&self) -> Point {
        if self.control_points.is_empty() {
            self.start.midpoint(self.end)
        } else {
            self.control_points[self.control_points.len() / 2]
        }
    }
}

/// Is `point` on the segment a-b? The sum of its distances to the endpoints
/// equals the segment length exactly when it lies on the segment; tolerance
/// widens that into a pickable band.
fn near_segment(point: Point, a: Point, b: Point) -> bool {
    let via_point = (point - a).hypot() + (point - b).hypot();
    (via_point - (b - a).hypot()).abs() < HIT_TOLERANCE
}

/// Filled-triangle arrowhead with its tip at `tip`, pointing away from
/// `toward`. `None` when the two points coincide (no direction).
fn arrow_head(tip: Point, toward: Point) -> Option<[Point; 3]> {
    let back = toward - tip;
    let len = back.hypot();
    if len < f64::EPSILON {
        return None;
    }
    let back = back / len;
    let rotate = |v: Vec2, angle: f64| -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
    };
    let base_a = tip + rotate(back, std::f64::consts::FRAC_PI_3) * ARROW_SIZE;
    let base_b = tip + rotate(back, -std::f64::consts::FRAC_PI_3) * ARROW_SIZE;
    Some([tip, base_a, base_b])
}

impl ShapeBehavior for Connector {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Connector
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
        let points = self.all_points();
        let mut rect = Rect::from_points(points[0], points[0]);
        for point in &points[1..] {
            rect = rect.union_pt(*point);
        }
        rect.inflate(BOUNDS_MARGIN, BOUNDS_MARGIN)
    }

    fn contains(&self, point: Point) -> bool {
        self.all_points()
            .windows(2)
            .any(|w| near_segment(point, w[0], w[1]))
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        self.start += delta;
        self.end += delta;
        for point in &mut self.control_points {
            *point += delta;
        }
    }

    /// Width is reinterpreted as the straight-line start-to-end distance:
    /// the end point slides along the current direction. No-op when the
    /// endpoints coincide.
    fn set_size(&mut self, size: Size) {
        let direction = self.end - self.start;
        let length = direction.hypot();
        if length > 0.0 {
            self.end = self.start + direction * (size.width / length);
        }
    }

    fn size(&self) -> Size {
        Size::new((self.end - self.start).hypot(), 0.0)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        let pen = if self.selected {
            Pen::new(SELECTION_COLOR, (self.style.line_width + 1) as f64)
        } else {
            self.style.pen()
        };

        let points = self.all_points();
        for w in points.windows(2) {
            painter.line(w[0], w[1], &pen);
        }

        if self.arrow.at_start() {
            let toward = self.control_points.first().copied().unwrap_or(self.end);
            if let Some(head) = arrow_head(self.start, toward) {
                painter.polygon(&head, Some(&pen), Some(self.style.line));
            }
        }
        if self.arrow.at_end() {
            let toward = self.control_points.last().copied().unwrap_or(self.start);
            if let Some(head) = arrow_head(self.end, toward) {
                painter.polygon(&head, Some(&pen), Some(self.style.line));
            }
        }

        if !self.label.is_empty() {
            let mid = self.label_anchor();
            let rect = Rect::new(mid.x - 50.0, mid.y - 20.0, mid.x + 50.0, mid.y + 20.0);
            paint::paint_label(painter, rect, &self.label);
        }

        if self.selected {
            let outline = Pen::new(SELECTION_COLOR, 1.0);
            let half = POINT_HANDLE_SIZE / 2.0;
            for point in [self.start, self.end] {
                let circle = Rect::new(
                    point.x - half,
                    point.y - half,
                    point.x + half,
                    point.y + half,
                );
                painter.ellipse(circle, Some(&outline), Some(Rgba::white()));
            }
            for point in &self.control_points {
                let square = Rect::new(
                    point.x - half,
                    point.y - half,
                    point.x + half,
                    point.y + half,
                );
                painter.rect(square, Some(&outline), Some(Rgba::white()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_straight_segment() {
        let connector = Connector::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(connector.contains(Point::new(50.0, 0.0)));
        assert!(connector.contains(Point::new(50.0, 1.0)));
        assert!(!connector.contains(Point::new(50.0, 20.0)));
    }

    #[test]
    fn test_contains_polyline_segments() {
        let mut connector = Connector::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        connector.add_control_point(Point::new(100.0, 0.0));
        assert!(connector.contains(Point::new(50.0, 0.0)));
        assert!(connector.contains(Point::new(100.0, 50.0)));
        // The straight start-to-end diagonal is not part of the path.
        assert!(!connector.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_bounds_cover_all_points_with_margin() {
        let mut connector = Connector::new(Point::new(10.0, 10.0), Point::new(90.0, 10.0));
        connector.add_control_point(Point::new(50.0, 60.0));
        let rect = connector.bounding_rect();
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 70.0));
    }

    #[test]
    fn test_set_size_rescales_end() {
        let mut connector = Connector::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        connector.set_size(Size::new(40.0, 0.0));
        assert_eq!(connector.end, Point::new(40.0, 0.0));
        assert_eq!(connector.size(), Size::new(40.0, 0.0));
    }

    #[test]
    fn test_set_size_degenerate_is_noop() {
        let mut connector = Connector::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        connector.set_size(Size::new(40.0, 0.0));
        assert_eq!(connector.end, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_move_by_shifts_every_point() {
        let mut connector = Connector::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        connector.add_control_point(Point::new(50.0, 25.0));
        let before = connector.bounding_rect();
        connector.move_by(Vec2::new(3.0, -4.0));
        assert_eq!(connector.bounding_rect(), before + Vec2::new(3.0, -4.0));
        assert_eq!(connector.control_points[0], Point::new(53.0, 21.0));
    }

    #[test]
    fn test_arrow_head_geometry() {
        let head = arrow_head(Point::new(100.0, 0.0), Point::new(0.0, 0.0)).unwrap();
        assert_eq!(head[0], Point::new(100.0, 0.0));
        // Base vertices sit behind the tip, symmetric about the axis.
        assert!(head[1].x < 100.0 && head[2].x < 100.0);
        assert!((head[1].y + head[2].y).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_head_degenerate() {
        assert!(arrow_head(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_arrow_style_tags() {
        for style in [
            ArrowStyle::None,
            ArrowStyle::Start,
            ArrowStyle::End,
            ArrowStyle::Both,
        ] {
            assert_eq!(ArrowStyle::from_tag(style.tag()), Some(style));
        }
        assert_eq!(ArrowStyle::from_tag(9), None);
    }
}
