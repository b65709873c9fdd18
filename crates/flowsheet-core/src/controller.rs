//! Canvas controller: the command API the UI layer drives.
//!
//! All canvas-state mutation funnels through this one owner — pointer
//! gestures, tool changes, clipboard, z-order and property edits — so the
//! UI stays a pure adapter. Collaborators observe changes through the
//! drained [`CanvasEvent`] queue.

use crate::clipboard::{Clipboard, PASTE_OFFSET};
use crate::document::Document;
use crate::selection::{self, Handle, Selection};
use crate::shapes::{ArrowStyle, Connector, FontSpec, Rgba, Shape, ShapeId, ShapeKind};
use crate::tools::ToolKind;
use kurbo::{Point, Rect};

/// Pointer modifier state relevant to the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Extend-selection modifier (shift/ctrl click).
    pub extend: bool,
}

/// Change notifications for UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The primary selection changed; the property panel should rebind.
    ShapeSelected(Option<ShapeId>),
    /// Whether any shape is selected (gates bulk actions).
    SelectionChanged { has_selection: bool },
    /// Document content changed; a repaint is due.
    DocumentChanged,
    /// Double-click requested in-place label editing for a shape.
    LabelEditRequested(ShapeId),
}

/// The gesture state machine. One gesture is in flight at a time; every
/// pointer-up lands back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving the whole selection; `last` is the previous pointer position.
    Dragging { last: Point },
    /// Sizing a freshly created shape from its anchor corner.
    Creating { shape: ShapeId, anchor: Point },
    /// Dragging one handle of a selected shape.
    Resizing {
        shape: ShapeId,
        handle: Handle,
        last: Point,
    },
    /// A connect gesture in flight: source shape, its anchor point, and the
    /// current pointer position (for rubber-line preview).
    Connecting {
        source: ShapeId,
        anchor: Point,
        current: Point,
    },
}

/// Owns the document, selection, clipboard and interaction state.
#[derive(Debug, Default)]
pub struct CanvasController {
    document: Document,
    selection: Selection,
    clipboard: Clipboard,
    tool: ToolKind,
    interaction: Interaction,
    events: Vec<CanvasEvent>,
}

impl CanvasController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Bypasses change notification; prefer the
    /// command methods.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// The shape bound to the property panel.
    pub fn primary_shape(&self) -> Option<&Shape> {
        self.document.get(self.selection.primary()?)
    }

    /// Take all pending notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swap in a different document (new file, load). Clears selection and
    /// any gesture in flight.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.selection.clear();
        self.sync_selection_flags();
        self.interaction = Interaction::Idle;
        self.emit_selection();
        self.events.push(CanvasEvent::DocumentChanged);
    }

    // ---- tool palette ----

    /// Resolve a tool-palette tag; unknown tags are ignored.
    pub fn set_active_tool(&mut self, tag: u8) {
        match ToolKind::from_tag(tag) {
            Some(tool) => self.set_tool(tool),
            None => log::warn!("ignoring unknown tool tag {tag}"),
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.interaction = Interaction::Idle;
    }

    // ---- selection API ----

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.sync_selection_flags();
        self.emit_selection();
    }

    pub fn select_only(&mut self, id: ShapeId) {
        self.selection.select_only(id);
        self.sync_selection_flags();
        self.emit_selection();
    }

    pub fn add_to_selection(&mut self, id: ShapeId) {
        self.selection.add(id);
        self.sync_selection_flags();
        self.emit_selection();
    }

    pub fn toggle_selection(&mut self, id: ShapeId) {
        self.selection.toggle(id);
        self.sync_selection_flags();
        self.emit_selection();
    }

    pub fn replace_selection(&mut self, ids: Vec<ShapeId>) {
        self.selection.replace(ids);
        self.sync_selection_flags();
        self.emit_selection();
    }

    // ---- pointer gestures ----

    pub fn pointer_down(&mut self, pos: Point, modifiers: Modifiers) {
        match self.tool {
            ToolKind::Select => self.pointer_down_select(pos, modifiers),
            ToolKind::Draw(ShapeKind::Connector) => {
                if let Some(source) = self.document.shape_at(pos) {
                    let anchor = self.shape_anchor(source);
                    self.interaction = Interaction::Connecting {
                        source,
                        anchor,
                        current: pos,
                    };
                }
            }
            ToolKind::Draw(kind) => {
                let id = self.document.add_shape(kind.create(pos));
                self.select_only(id);
                self.interaction = Interaction::Creating { shape: id, anchor: pos };
                self.events.push(CanvasEvent::DocumentChanged);
            }
        }
    }

    fn pointer_down_select(&mut self, pos: Point, modifiers: Modifiers) {
        // A handle grab on an already-selected shape wins over picking.
        for &id in self.selection.ids() {
            if let Some(shape) = self.document.get(id) {
                if let Some(handle) = selection::handle_at(shape, pos) {
                    self.interaction = Interaction::Resizing {
                        shape: id,
                        handle,
                        last: pos,
                    };
                    return;
                }
            }
        }

        if let Some(id) = self.document.shape_at(pos) {
            if modifiers.extend {
                self.toggle_selection(id);
            } else {
                if !self.selection.contains(id) {
                    self.select_only(id);
                }
                self.interaction = Interaction::Dragging { last: pos };
            }
        } else if !modifiers.extend {
            self.clear_selection();
        }
    }

    pub fn pointer_move(&mut self, pos: Point) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging { last } => {
                let delta = pos - last;
                let ids: Vec<ShapeId> = self.selection.ids().to_vec();
                for id in ids {
                    if let Some(shape) = self.document.get_mut(id) {
                        shape.move_by(delta);
                    }
                }
                self.document.set_modified(true);
                self.interaction = Interaction::Dragging { last: pos };
                self.events.push(CanvasEvent::DocumentChanged);
            }
            Interaction::Creating { shape, anchor } => {
                if let Some(s) = self.document.get_mut(shape) {
                    let frame = Rect::from_points(anchor, pos);
                    s.set_position(frame.origin());
                    s.set_size(frame.size());
                    self.document.set_modified(true);
                    self.events.push(CanvasEvent::DocumentChanged);
                }
            }
            Interaction::Resizing { shape, handle, last } => {
                let delta = pos - last;
                if let Some(s) = self.document.get_mut(shape) {
                    selection::apply_handle_drag(s, handle, delta);
                    self.document.set_modified(true);
                    self.events.push(CanvasEvent::DocumentChanged);
                }
                self.interaction = Interaction::Resizing {
                    shape,
                    handle,
                    last: pos,
                };
            }
            Interaction::Connecting { source, anchor, .. } => {
                self.interaction = Interaction::Connecting {
                    source,
                    anchor,
                    current: pos,
                };
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Point) {
        match self.interaction {
            Interaction::Connecting { source, anchor, .. } => {
                self.interaction = Interaction::Idle;
                // Releasing over empty canvas, or back over the source,
                // aborts the gesture.
                let target = self.document.shape_at(pos).filter(|&t| t != source);
                if let Some(target) = target {
                    let connector = Connector::new(anchor, self.shape_anchor(target));
                    let id = self.document.add_shape(Shape::Connector(connector));
                    self.select_only(id);
                    self.events.push(CanvasEvent::DocumentChanged);
                }
            }
            Interaction::Idle => {}
            _ => self.interaction = Interaction::Idle,
        }
    }

    pub fn double_click(&mut self, pos: Point) {
        if let Some(id) = self.document.shape_at(pos) {
            self.events.push(CanvasEvent::LabelEditRequested(id));
        }
    }

    /// Where a connector attaches to a shape.
    fn shape_anchor(&self, id: ShapeId) -> Point {
        self.document
            .get(id)
            .map(|shape| shape.bounding_rect().center())
            .unwrap_or_default()
    }

    // ---- bulk operations ----

    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selection.ids().to_vec() {
            self.document.remove_shape(id);
        }
        self.selection.clear();
        self.emit_selection();
        self.events.push(CanvasEvent::DocumentChanged);
    }

    /// Selected ids ordered back-to-front, so z-order ops preserve the
    /// relative stacking of a multi-selection.
    fn selected_in_z_order(&self) -> Vec<ShapeId> {
        self.document
            .shapes()
            .iter()
            .map(|shape| shape.id())
            .filter(|id| self.selection.contains(*id))
            .collect()
    }

    pub fn bring_to_front(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selected_in_z_order() {
            self.document.bring_to_front(id);
        }
        self.events.push(CanvasEvent::DocumentChanged);
    }

    pub fn send_to_back(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selected_in_z_order().into_iter().rev() {
            self.document.send_to_back(id);
        }
        self.events.push(CanvasEvent::DocumentChanged);
    }

    pub fn bring_forward(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        // Topmost first, so adjacent selected shapes don't leapfrog each
        // other.
        for id in self.selected_in_z_order().into_iter().rev() {
            self.document.bring_forward(id);
        }
        self.events.push(CanvasEvent::DocumentChanged);
    }

    pub fn send_backward(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selected_in_z_order() {
            self.document.send_backward(id);
        }
        self.events.push(CanvasEvent::DocumentChanged);
    }

    // ---- clipboard ----

    pub fn copy_selection(&mut self) {
        let shapes: Vec<Shape> = self
            .selected_in_z_order()
            .iter()
            .filter_map(|&id| self.document.get(id).cloned())
            .collect();
        if !shapes.is_empty() {
            self.clipboard.set(shapes);
        }
    }

    pub fn cut_selection(&mut self) {
        self.copy_selection();
        self.delete_selection();
    }

    pub fn paste(&mut self) {
        let copies = self.clipboard.shapes().to_vec();
        self.insert_copies(copies);
    }

    /// Copy+paste the live selection without touching the clipboard buffer.
    pub fn duplicate_selection(&mut self) {
        let copies: Vec<Shape> = self
            .selected_in_z_order()
            .iter()
            .filter_map(|&id| self.document.get(id).cloned())
            .collect();
        self.insert_copies(copies);
    }

    fn insert_copies(&mut self, copies: Vec<Shape>) {
        if copies.is_empty() {
            return;
        }
        let mut ids = Vec::with_capacity(copies.len());
        for mut shape in copies {
            shape.regenerate_id();
            shape.move_by(PASTE_OFFSET);
            ids.push(self.document.add_shape(shape));
        }
        self.replace_selection(ids);
        self.events.push(CanvasEvent::DocumentChanged);
    }

    // ---- property edits (primary selection) ----

    fn with_primary(&mut self, edit: impl FnOnce(&mut Shape)) {
        let Some(id) = self.selection.primary() else {
            return;
        };
        if let Some(shape) = self.document.get_mut(id) {
            edit(shape);
            self.document.set_modified(true);
            self.events.push(CanvasEvent::DocumentChanged);
        }
    }

    pub fn set_label(&mut self, label: &str) {
        self.with_primary(|shape| shape.set_label(label));
    }

    pub fn set_fill_color(&mut self, color: Rgba) {
        self.with_primary(|shape| shape.style_mut().fill = color);
    }

    pub fn set_line_color(&mut self, color: Rgba) {
        self.with_primary(|shape| shape.style_mut().line = color);
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.with_primary(|shape| shape.style_mut().line_width = width.max(1));
    }

    /// Font of the primary shape; only meaningful for Text.
    pub fn set_font(&mut self, font: FontSpec) {
        self.with_primary(|shape| {
            if let Some(text) = shape.as_text_mut() {
                text.set_font(font);
            }
        });
    }

    /// Text color of the primary shape; only meaningful for Text.
    pub fn set_text_color(&mut self, color: Rgba) {
        self.with_primary(|shape| {
            if let Some(text) = shape.as_text_mut() {
                text.text_color = color;
            }
        });
    }

    /// Arrow placement of the primary shape; only meaningful for connectors.
    pub fn set_arrow_style(&mut self, arrow: ArrowStyle) {
        self.with_primary(|shape| {
            if let Some(connector) = shape.as_connector_mut() {
                connector.arrow = arrow;
            }
        });
    }

    // ---- internals ----

    /// Mirror the selection set onto the shapes' own selected flags (those
    /// drive selection adornments and persist with the file).
    fn sync_selection_flags(&mut self) {
        let selection = self.selection.clone();
        for shape in self.document.shapes_mut() {
            let selected = selection.contains(shape.id());
            shape.set_selected(selected);
        }
    }

    fn emit_selection(&mut self) {
        self.events
            .push(CanvasEvent::ShapeSelected(self.selection.primary()));
        self.events.push(CanvasEvent::SelectionChanged {
            has_selection: !self.selection.is_empty(),
        });
    }
}
