//! System font lookup for raster text.

use flowsheet_core::shapes::FontSpec;
use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use rusttype::Font;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

fn database() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        db
    })
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// Resolve a font spec against the system database, falling back to any
/// sans-serif face. Results are cached, misses included; loaded faces are
/// leaked for the process lifetime.
pub fn font_for(spec: &FontSpec) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: spec.family.clone(),
        bold: spec.bold,
        italic: spec.italic,
    };
    if let Some(entry) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *entry;
    }

    let loaded = load_system_font(&spec.family, spec.bold, spec.italic)
        .map(|font| -> &'static Font<'static> { Box::leak(Box::new(font)) });
    if loaded.is_none() {
        log::warn!("no usable font for family {:?}", spec.family);
    }
    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, loaded);
    loaded
}

fn load_system_font(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families = [Family::Name(family), Family::SansSerif];
    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = database().query(&query)?;
    let (source, index) = database().face_source(id)?;
    let data = match source {
        Source::File(path) => std::fs::read(path).ok()?,
        Source::Binary(data) => data.as_ref().as_ref().to_vec(),
        Source::SharedFile(_, data) => data.as_ref().as_ref().to_vec(),
    };
    Font::try_from_vec_and_index(data, index)
}
