//! Flowsheet Core Library
//!
//! Document model and interaction engine for the Flowsheet diagram editor:
//! shape kinds, the canvas document, the pointer-gesture controller,
//! clipboard, and the binary file format. Rendering hosts plug in through
//! the [`paint::Painter`] primitives.

pub mod clipboard;
pub mod controller;
pub mod document;
pub mod format;
pub mod paint;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use clipboard::Clipboard;
pub use controller::{CanvasController, CanvasEvent, Interaction, Modifiers};
pub use document::Document;
pub use format::{FormatError, FormatResult};
pub use paint::{Painter, Pen, StrokeStyle};
pub use selection::{FrameHandle, Handle, Selection};
pub use shapes::{
    ArrowStyle, Connector, Diamond, Ellipse, FontSpec, Rectangle, Rgba, Shape, ShapeBehavior,
    ShapeId, ShapeKind, ShapeStyle, Text, Triangle,
};
pub use tools::ToolKind;
