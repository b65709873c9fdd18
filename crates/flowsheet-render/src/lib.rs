//! Flowsheet Render Library
//!
//! Export surfaces for Flowsheet documents: resolution-independent SVG
//! markup and tiny-skia rasterization with PNG encoding. Both implement the
//! core's paint primitives, so a document draws identically into either.

mod font;
mod raster;
mod svg;

pub use raster::{RasterPainter, export_png, render_pixmap};
pub use svg::{SvgPainter, export_svg, render_svg};

use thiserror::Error;

/// Errors from exporting a document snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("canvas size {width}x{height} cannot be rasterized")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
