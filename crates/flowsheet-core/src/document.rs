//! Diagram document: the ordered shape list plus canvas properties.

use crate::paint::Painter;
use crate::shapes::{Rgba, Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Canvas size for new documents.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1024.0, 768.0);

/// One diagram: shapes in paint order (index order IS z-order, back to
/// front — there is no separate z-index field), a background color, a canvas
/// size, and a dirty flag. The document exclusively owns its shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    shapes: Vec<Shape>,
    pub background: Rgba,
    pub canvas_size: Size,
    #[serde(skip)]
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            background: Rgba::white(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            modified: false,
        }
    }

    /// Shapes in z-order, back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Append a shape on top of the stack.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        self.modified = true;
        id
    }

    /// Remove a shape, preserving the relative order of the rest.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        self.modified = true;
        Some(self.shapes.remove(index))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.modified = true;
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    /// Mutable iteration in z-order. Crate-internal; callers own the dirty
    /// flag.
    pub(crate) fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.iter_mut()
    }

    /// Z-order position of a shape (0 = backmost).
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.id() == id)
    }

    /// Topmost shape under `point`: picking scans front to back so the
    /// last-painted shape wins ties.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.contains(point))
            .map(|shape| shape.id())
    }

    pub fn bring_to_front(&mut self, id: ShapeId) {
        if let Some(index) = self.index_of(id) {
            let shape = self.shapes.remove(index);
            self.shapes.push(shape);
            self.modified = true;
        }
    }

    pub fn send_to_back(&mut self, id: ShapeId) {
        if let Some(index) = self.index_of(id) {
            let shape = self.shapes.remove(index);
            self.shapes.insert(0, shape);
            self.modified = true;
        }
    }

    /// Swap one step toward the front; false when already frontmost.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        if let Some(index) = self.index_of(id) {
            if index + 1 < self.shapes.len() {
                self.shapes.swap(index, index + 1);
                self.modified = true;
                return true;
            }
        }
        false
    }

    /// Swap one step toward the back; false when already backmost.
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        if let Some(index) = self.index_of(id) {
            if index > 0 {
                self.shapes.swap(index, index - 1);
                self.modified = true;
                return true;
            }
        }
        false
    }

    /// Union of every shape's bounding rect.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for shape in &self.shapes {
            let bounds = shape.bounding_rect();
            result = Some(match result {
                Some(acc) => acc.union(bounds),
                None => bounds,
            });
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Paint the whole document: background first, then every shape in
    /// z-order.
    pub fn paint(&self, painter: &mut dyn Painter) {
        let page = Rect::from_origin_size(Point::ORIGIN, self.canvas_size);
        painter.rect(page, None, Some(self.background));
        for shape in &self.shapes {
            shape.paint(painter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, ShapeKind};

    fn rect_at(x: f64, y: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y)))
    }

    #[test]
    fn test_new_document_is_pristine() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(!doc.is_modified());
        assert_eq!(doc.canvas_size, DEFAULT_CANVAS_SIZE);
        assert_eq!(doc.background, Rgba::white());
    }

    #[test]
    fn test_add_remove() {
        let mut doc = Document::new();
        let id = doc.add_shape(rect_at(0.0, 0.0));
        assert_eq!(doc.len(), 1);
        assert!(doc.is_modified());
        assert_eq!(doc.get(id).map(|s| s.kind()), Some(ShapeKind::Rectangle));

        let removed = doc.remove_shape(id);
        assert!(removed.is_some());
        assert!(doc.is_empty());
        assert!(doc.remove_shape(id).is_none());
    }

    #[test]
    fn test_z_order_ops() {
        let mut doc = Document::new();
        let a = doc.add_shape(rect_at(0.0, 0.0));
        let b = doc.add_shape(rect_at(10.0, 10.0));
        let c = doc.add_shape(rect_at(20.0, 20.0));
        assert_eq!(doc.index_of(a), Some(0));

        doc.bring_to_front(a);
        assert_eq!(doc.index_of(a), Some(2));

        doc.send_to_back(a);
        assert_eq!(doc.index_of(a), Some(0));

        assert!(doc.bring_forward(a));
        assert_eq!(doc.index_of(a), Some(1));
        assert_eq!(doc.index_of(b), Some(0));

        assert!(doc.send_backward(a));
        assert!(!doc.send_backward(a));
        assert!(!doc.bring_forward(c));
    }

    #[test]
    fn test_topmost_shape_wins_pick() {
        let mut doc = Document::new();
        let bottom = doc.add_shape(rect_at(0.0, 0.0));
        let top = doc.add_shape(rect_at(50.0, 40.0));

        // Overlap region belongs to the shape painted last.
        assert_eq!(doc.shape_at(Point::new(60.0, 50.0)), Some(top));
        // Only the bottom shape covers its top-left area.
        assert_eq!(doc.shape_at(Point::new(10.0, 10.0)), Some(bottom));
        assert_eq!(doc.shape_at(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_bounds_union() {
        let mut doc = Document::new();
        assert!(doc.bounds().is_none());
        doc.add_shape(rect_at(0.0, 0.0));
        doc.add_shape(rect_at(100.0, 100.0));
        assert_eq!(doc.bounds(), Some(Rect::new(0.0, 0.0, 220.0, 180.0)));
    }
}
