//! Clipboard buffer for copy/cut/paste.

use crate::shapes::Shape;
use kurbo::Vec2;

/// Offset applied to pasted and duplicated shapes so copies never sit
/// exactly on top of their source.
pub const PASTE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Snapshot buffer holding deep copies of the shapes that were copied or
/// cut. Buffered shapes keep their geometry and style; ids are regenerated
/// at paste time.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Vec<Shape>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with a new snapshot.
    pub fn set(&mut self, shapes: Vec<Shape>) {
        self.buffer = shapes;
        for shape in &mut self.buffer {
            shape.set_selected(false);
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
