//! Selection state and manipulation handles.
//!
//! The selection never owns shapes; it holds ids into the document's shape
//! list, so a deleted shape is simply a lookup miss.

use crate::paint::handle_rect;
use crate::shapes::{Connector, Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The eight resize handles on a box-kind selection frame, in paint order
/// (clockwise from the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl FrameHandle {
    pub const ALL: [FrameHandle; 8] = [
        FrameHandle::TopLeft,
        FrameHandle::Top,
        FrameHandle::TopRight,
        FrameHandle::Right,
        FrameHandle::BottomRight,
        FrameHandle::Bottom,
        FrameHandle::BottomLeft,
        FrameHandle::Left,
    ];

    /// Center of this handle on the given frame.
    pub fn position(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            FrameHandle::TopLeft => Point::new(rect.x0, rect.y0),
            FrameHandle::Top => Point::new(center.x, rect.y0),
            FrameHandle::TopRight => Point::new(rect.x1, rect.y0),
            FrameHandle::Right => Point::new(rect.x1, center.y),
            FrameHandle::BottomRight => Point::new(rect.x1, rect.y1),
            FrameHandle::Bottom => Point::new(center.x, rect.y1),
            FrameHandle::BottomLeft => Point::new(rect.x0, rect.y1),
            FrameHandle::Left => Point::new(rect.x0, center.y),
        }
    }

    /// Resize `rect` by dragging this handle by `delta`. The result is
    /// normalized, so dragging an edge past its opposite flips the frame
    /// instead of producing a negative size.
    pub fn apply(self, rect: Rect, delta: Vec2) -> Rect {
        let (mut x0, mut y0, mut x1, mut y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
        match self {
            FrameHandle::TopLeft => {
                x0 += delta.x;
                y0 += delta.y;
            }
            FrameHandle::Top => y0 += delta.y,
            FrameHandle::TopRight => {
                x1 += delta.x;
                y0 += delta.y;
            }
            FrameHandle::Right => x1 += delta.x,
            FrameHandle::BottomRight => {
                x1 += delta.x;
                y1 += delta.y;
            }
            FrameHandle::Bottom => y1 += delta.y,
            FrameHandle::BottomLeft => {
                x0 += delta.x;
                y1 += delta.y;
            }
            FrameHandle::Left => x0 += delta.x,
        }
        Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

/// A grabbable handle on a selected shape: a frame handle for box kinds, or
/// one of the defining points of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    Frame(FrameHandle),
    Start,
    End,
    Control(usize),
}

/// Which handle of `shape`, if any, sits under `point`.
pub fn handle_at(shape: &Shape, point: Point) -> Option<Handle> {
    match shape {
        Shape::Connector(connector) => connector_handle_at(connector, point),
        _ => {
            let rect = shape.bounding_rect();
            FrameHandle::ALL
                .into_iter()
                .find(|handle| handle_rect(handle.position(rect)).contains(point))
                .map(Handle::Frame)
        }
    }
}

fn connector_handle_at(connector: &Connector, point: Point) -> Option<Handle> {
    if handle_rect(connector.start).contains(point) {
        return Some(Handle::Start);
    }
    if handle_rect(connector.end).contains(point) {
        return Some(Handle::End);
    }
    connector
        .control_points
        .iter()
        .position(|p| handle_rect(*p).contains(point))
        .map(Handle::Control)
}

/// Drag `handle` of `shape` by `delta`.
pub fn apply_handle_drag(shape: &mut Shape, handle: Handle, delta: Vec2) {
    match handle {
        Handle::Frame(frame) => {
            let rect = frame.apply(shape.bounding_rect(), delta);
            shape.set_position(rect.origin());
            shape.set_size(rect.size());
        }
        Handle::Start => {
            if let Some(connector) = shape.as_connector_mut() {
                connector.start += delta;
            }
        }
        Handle::End => {
            if let Some(connector) = shape.as_connector_mut() {
                connector.end += delta;
            }
        }
        Handle::Control(index) => {
            if let Some(connector) = shape.as_connector_mut() {
                if let Some(point) = connector.control_points.get_mut(index) {
                    *point += delta;
                }
            }
        }
    }
}

/// The current selection: a primary shape (property-panel binding) plus any
/// additionally selected shapes. `members` always includes the primary.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    primary: Option<ShapeId>,
    members: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<ShapeId> {
        self.primary
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.members
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn clear(&mut self) {
        self.primary = None;
        self.members.clear();
    }

    /// Make `id` the only selected shape.
    pub fn select_only(&mut self, id: ShapeId) {
        self.primary = Some(id);
        self.members.clear();
        self.members.push(id);
    }

    /// Add `id` to the selection. The first added shape becomes primary.
    pub fn add(&mut self, id: ShapeId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
        if self.primary.is_none() {
            self.primary = Some(id);
        }
    }

    /// Remove `id`; if it was primary, the oldest remaining member takes
    /// over.
    pub fn remove(&mut self, id: ShapeId) {
        self.members.retain(|&member| member != id);
        if self.primary == Some(id) {
            self.primary = self.members.first().copied();
        }
    }

    /// Modifier-click behavior: flip membership.
    pub fn toggle(&mut self, id: ShapeId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    /// Replace the whole selection; the first id becomes primary.
    pub fn replace(&mut self, ids: Vec<ShapeId>) {
        self.members = ids;
        self.members.dedup();
        self.primary = self.members.first().copied();
    }
}
