//! Binary file format for diagrams.
//!
//! A strict linear stream, written and read field by field:
//!
//! 1. magic `"FLOWCHART"` (9 bytes)
//! 2. format version, `u32`
//! 3. background color (4 bytes RGBA), canvas width/height (`u32` each)
//! 4. shape count, `u32`
//! 5. per shape, in z-order: kind tag (`u8`), base fields (position as two
//!    `f64`, fill + line color, line width `u32`, selected flag `u8`,
//!    length-prefixed UTF-8 label), then kind-specific fields (size for box
//!    kinds; start/end/arrow/control points for connectors; size, font and
//!    text color for text).
//!
//! Integers and floats are little-endian. There is no compression and no
//! checksum. Loading builds a fresh [`Document`]; any read failure aborts
//! the whole load, so a truncated file never produces a partial document.

use crate::document::Document;
use crate::shapes::{ArrowStyle, FontSpec, Rgba, Shape, ShapeKind, ShapeStyle};
use kurbo::{Point, Size};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Magic literal opening every diagram file.
pub const MAGIC: &[u8; 9] = b"FLOWCHART";

/// Current format version. Readers accept exactly the versions they have a
/// field reader for.
pub const FORMAT_VERSION: u32 = 1;

/// Errors from reading or writing the diagram format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a diagram file (bad magic)")]
    BadMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("unknown shape tag {0}")]
    UnknownShapeTag(u8),
    #[error("unknown arrow style {0}")]
    UnknownArrowStyle(u8),
    #[error("text field is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Serialize the document to a stream. A pure function of document state.
pub fn save<W: Write>(document: &Document, writer: &mut W) -> FormatResult<()> {
    writer.write_all(MAGIC)?;
    write_u32(writer, FORMAT_VERSION)?;
    write_color(writer, document.background)?;
    write_u32(writer, document.canvas_size.width.round() as u32)?;
    write_u32(writer, document.canvas_size.height.round() as u32)?;
    write_u32(writer, document.len() as u32)?;
    for shape in document.shapes() {
        write_shape(writer, shape)?;
    }
    Ok(())
}

/// Deserialize a document from a stream. All-or-nothing: the document is
/// only returned once every field has been read.
pub fn load<R: Read>(reader: &mut R) -> FormatResult<Document> {
    let mut magic = [0u8; MAGIC.len()];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(FormatError::BadMagic);
    }
    match read_u32(reader)? {
        1 => load_v1(reader),
        other => Err(FormatError::UnsupportedVersion(other)),
    }
}

/// Save to a file path. Failure to create the target surfaces before any
/// document bytes are committed.
pub fn save_file<P: AsRef<Path>>(path: P, document: &Document) -> FormatResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    save(document, &mut writer)?;
    writer.flush()?;
    log::debug!("saved {} shapes to {}", document.len(), path.display());
    Ok(())
}

/// Load from a file path.
pub fn load_file<P: AsRef<Path>>(path: P) -> FormatResult<Document> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let document = load(&mut reader)?;
    log::debug!("loaded {} shapes from {}", document.len(), path.display());
    Ok(document)
}

fn load_v1<R: Read>(reader: &mut R) -> FormatResult<Document> {
    let mut document = Document::new();
    document.background = read_color(reader)?;
    let width = read_u32(reader)?;
    let height = read_u32(reader)?;
    document.canvas_size = Size::new(width as f64, height as f64);

    let count = read_u32(reader)?;
    for _ in 0..count {
        let shape = read_shape(reader)?;
        document.add_shape(shape);
    }
    document.set_modified(false);
    Ok(document)
}

fn write_shape<W: Write>(writer: &mut W, shape: &Shape) -> FormatResult<()> {
    write_u8(writer, shape.kind().tag())?;
    write_point(writer, shape.position())?;
    write_color(writer, shape.style().fill)?;
    write_color(writer, shape.style().line)?;
    write_u32(writer, shape.style().line_width)?;
    write_u8(writer, shape.selected() as u8)?;
    write_string(writer, shape.label())?;

    match shape {
        Shape::Rectangle(_) | Shape::Ellipse(_) | Shape::Diamond(_) | Shape::Triangle(_) => {
            write_size(writer, shape.size())?;
        }
        Shape::Connector(connector) => {
            write_point(writer, connector.start)?;
            write_point(writer, connector.end)?;
            write_u8(writer, connector.arrow.tag())?;
            write_u32(writer, connector.control_points.len() as u32)?;
            for point in &connector.control_points {
                write_point(writer, *point)?;
            }
        }
        Shape::Text(text) => {
            write_size(writer, shape.size())?;
            write_string(writer, &text.font.family)?;
            write_u32(writer, text.font.point_size)?;
            write_u8(writer, text.font.bold as u8)?;
            write_u8(writer, text.font.italic as u8)?;
            write_color(writer, text.text_color)?;
        }
    }
    Ok(())
}

fn read_shape<R: Read>(reader: &mut R) -> FormatResult<Shape> {
    let tag = read_u8(reader)?;
    let kind = ShapeKind::from_tag(tag).ok_or(FormatError::UnknownShapeTag(tag))?;
    let position = read_point(reader)?;
    let fill = read_color(reader)?;
    let line = read_color(reader)?;
    let line_width = read_u32(reader)?;
    let selected = read_u8(reader)? != 0;
    let label = read_string(reader)?;

    // Shape ids are runtime identities, not part of the format; the factory
    // mints fresh ones.
    let mut shape = kind.create(position);
    *shape.style_mut() = ShapeStyle {
        fill,
        line,
        line_width,
    };
    shape.set_selected(selected);
    shape.set_label(&label);

    match kind {
        ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Diamond | ShapeKind::Triangle => {
            let size = read_size(reader)?;
            shape.set_size(size);
        }
        ShapeKind::Connector => {
            let start = read_point(reader)?;
            let end = read_point(reader)?;
            let arrow_tag = read_u8(reader)?;
            let arrow =
                ArrowStyle::from_tag(arrow_tag).ok_or(FormatError::UnknownArrowStyle(arrow_tag))?;
            let count = read_u32(reader)?;
            let mut control_points = Vec::with_capacity(count.min(1024) as usize);
            for _ in 0..count {
                control_points.push(read_point(reader)?);
            }
            if let Shape::Connector(connector) = &mut shape {
                connector.position = start;
                connector.start = start;
                connector.end = end;
                connector.arrow = arrow;
                connector.control_points = control_points;
            }
        }
        ShapeKind::Text => {
            // The stored size wins over the auto-derived one, so it is
            // applied after the label.
            let size = read_size(reader)?;
            let family = read_string(reader)?;
            let point_size = read_u32(reader)?;
            let bold = read_u8(reader)? != 0;
            let italic = read_u8(reader)? != 0;
            let text_color = read_color(reader)?;
            if let Shape::Text(text) = &mut shape {
                text.font = FontSpec {
                    family,
                    point_size,
                    bold,
                    italic,
                };
                text.text_color = text_color;
                text.width = size.width;
                text.height = size.height;
            }
        }
    }
    Ok(shape)
}

// ---- field primitives ----

fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_f64<W: Write>(writer: &mut W, value: f64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_point<W: Write>(writer: &mut W, point: Point) -> io::Result<()> {
    write_f64(writer, point.x)?;
    write_f64(writer, point.y)
}

fn write_size<W: Write>(writer: &mut W, size: Size) -> io::Result<()> {
    write_f64(writer, size.width)?;
    write_f64(writer, size.height)
}

fn write_color<W: Write>(writer: &mut W, color: Rgba) -> io::Result<()> {
    writer.write_all(&[color.r, color.g, color.b, color.a])
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    write_u32(writer, value.len() as u32)?;
    writer.write_all(value.as_bytes())
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_point<R: Read>(reader: &mut R) -> io::Result<Point> {
    Ok(Point::new(read_f64(reader)?, read_f64(reader)?))
}

fn read_size<R: Read>(reader: &mut R) -> io::Result<Size> {
    Ok(Size::new(read_f64(reader)?, read_f64(reader)?))
}

fn read_color<R: Read>(reader: &mut R) -> io::Result<Rgba> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(Rgba::new(buf[0], buf[1], buf[2], buf[3]))
}

fn read_string<R: Read>(reader: &mut R) -> FormatResult<String> {
    let len = read_u32(reader)? as u64;
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(FormatError::Io(io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Connector, Rectangle, ShapeBehavior, Text};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.background = Rgba::rgb(240, 240, 255);
        doc.canvas_size = Size::new(800.0, 600.0);

        let mut rect = Rectangle::new(Point::new(10.0, 10.0));
        rect.style.fill = Rgba::rgb(255, 0, 0);
        rect.label = "start".to_string();
        rect.selected = true;
        doc.add_shape(Shape::Rectangle(rect));

        doc.add_shape(ShapeKind::Ellipse.create(Point::new(200.0, 10.0)));
        doc.add_shape(ShapeKind::Diamond.create(Point::new(400.0, 10.0)));
        doc.add_shape(ShapeKind::Triangle.create(Point::new(10.0, 200.0)));

        let mut connector = Connector::new(Point::new(130.0, 50.0), Point::new(200.0, 50.0));
        connector.add_control_point(Point::new(165.0, 80.0));
        connector.arrow = ArrowStyle::Both;
        connector.style.line_width = 3;
        connector.label = "yes".to_string();
        doc.add_shape(Shape::Connector(connector));

        let mut text = Text::new(Point::new(10.0, 400.0));
        text.set_label("caption");
        text.font = FontSpec {
            family: "Helvetica".to_string(),
            point_size: 14,
            bold: true,
            italic: false,
        };
        text.text_color = Rgba::rgb(0, 128, 0);
        doc.add_shape(Shape::Text(text));

        doc
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let original = sample_document();
        let mut buffer = Vec::new();
        save(&original, &mut buffer).unwrap();

        let loaded = load(&mut buffer.as_slice()).unwrap();
        assert_eq!(loaded.len(), original.len());
        assert_eq!(loaded.background, original.background);
        assert_eq!(loaded.canvas_size, original.canvas_size);
        assert!(!loaded.is_modified());

        for (a, b) in original.shapes().iter().zip(loaded.shapes()) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.position(), b.position());
            assert_eq!(a.style(), b.style());
            assert_eq!(a.label(), b.label());
            assert_eq!(a.size(), b.size());
            // The selection flag round-trips too.
            assert_eq!(a.selected(), b.selected());
        }

        let original_conn = original.shapes()[4].as_connector().unwrap();
        let loaded_conn = loaded.shapes()[4].as_connector().unwrap();
        assert_eq!(loaded_conn.start, original_conn.start);
        assert_eq!(loaded_conn.end, original_conn.end);
        assert_eq!(loaded_conn.control_points, original_conn.control_points);
        assert_eq!(loaded_conn.arrow, ArrowStyle::Both);

        let loaded_text = loaded.shapes()[5].as_text().unwrap();
        assert_eq!(loaded_text.font.family, "Helvetica");
        assert_eq!(loaded_text.font.point_size, 14);
        assert!(loaded_text.font.bold);
        assert_eq!(loaded_text.text_color, Rgba::rgb(0, 128, 0));
    }

    #[test]
    fn test_loaded_shapes_get_fresh_ids() {
        let original = sample_document();
        let mut buffer = Vec::new();
        save(&original, &mut buffer).unwrap();
        let loaded = load(&mut buffer.as_slice()).unwrap();
        for (a, b) in original.shapes().iter().zip(loaded.shapes()) {
            assert_ne!(a.id(), b.id());
        }
    }

    #[test]
    fn test_save_clear_load_scenario() {
        let mut doc = Document::new();
        let mut rect = Rectangle::new(Point::new(10.0, 10.0));
        rect.set_size(Size::new(120.0, 80.0));
        rect.style.fill = Rgba::rgb(255, 0, 0);
        doc.add_shape(Shape::Rectangle(rect));

        let mut buffer = Vec::new();
        save(&doc, &mut buffer).unwrap();
        doc.clear();
        assert!(doc.is_empty());

        let restored = load(&mut buffer.as_slice()).unwrap();
        assert_eq!(restored.len(), 1);
        let shape = &restored.shapes()[0];
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.position(), Point::new(10.0, 10.0));
        assert_eq!(shape.size(), Size::new(120.0, 80.0));
        assert_eq!(shape.style().fill, Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut buffer = Vec::new();
        save(&Document::new(), &mut buffer).unwrap();
        buffer[0] = b'X';
        assert!(matches!(
            load(&mut buffer.as_slice()),
            Err(FormatError::BadMagic)
        ));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut buffer = Vec::new();
        save(&Document::new(), &mut buffer).unwrap();
        // Version field sits right after the magic.
        buffer[MAGIC.len()..MAGIC.len() + 4].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            load(&mut buffer.as_slice()),
            Err(FormatError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_truncated_stream_fails_cleanly() {
        let mut buffer = Vec::new();
        save(&sample_document(), &mut buffer).unwrap();
        for cut in [buffer.len() / 4, buffer.len() / 2, buffer.len() - 1] {
            let result = load(&mut &buffer[..cut]);
            assert!(result.is_err(), "truncation at {cut} must fail");
        }
    }

    #[test]
    fn test_unknown_shape_tag_rejected() {
        let mut doc = Document::new();
        doc.add_shape(ShapeKind::Rectangle.create(Point::new(0.0, 0.0)));
        let mut buffer = Vec::new();
        save(&doc, &mut buffer).unwrap();
        // The first shape tag follows magic, version, color and three u32s.
        let tag_offset = MAGIC.len() + 4 + 4 + 4 + 4 + 4;
        buffer[tag_offset] = 200;
        assert!(matches!(
            load(&mut buffer.as_slice()),
            Err(FormatError::UnknownShapeTag(200))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.flow");

        let doc = sample_document();
        save_file(&path, &doc).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), doc.len());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file(dir.path().join("nope.flow"));
        assert!(matches!(result, Err(FormatError::Io(_))));
    }
}
