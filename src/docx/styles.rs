//! Run style deduplication and the document default election.
//!
//! Word inherits run formatting from the document default ("Normal") style.
//! The collector registers every emitted run's formatting signature, counts
//! usage, and elects the most frequent signature as Normal so that the bulk
//! of runs serialize with no explicit properties at all.

use crate::scene::TextElement;
use std::collections::HashMap;

/// Font size used when a document contains no text at all.
pub const FALLBACK_FONT_SIZE_PT: f32 = 11.0;
/// Font used when a document contains no text at all.
pub const FALLBACK_FONT_NAME: &str = "Calibri";

/// A deduplicated run formatting signature with a usage counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxStyle {
    /// Font name as reported by the scene extractor
    pub font_name: String,
    /// Font size in half-points
    pub size_half_points: i64,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Text color as an uppercase RRGGBB hex string
    pub color: String,
    /// How many runs carried this signature
    pub count: u32,
}

impl DocxStyle {
    fn fallback() -> Self {
        DocxStyle {
            font_name: FALLBACK_FONT_NAME.to_string(),
            size_half_points: (FALLBACK_FONT_SIZE_PT * 2.0) as i64,
            bold: false,
            italic: false,
            color: "000000".to_string(),
            count: 0,
        }
    }
}

/// Exact-match lookup key for a formatting signature.
type StyleKey = (String, i64, bool, bool, String);

/// Registers run formatting signatures and elects the document default.
///
/// One instance per conversion run; identifiers are never reused and usage
/// counts only grow.
#[derive(Debug, Default)]
pub struct StyleCollector {
    styles: Vec<DocxStyle>,
    index: HashMap<StyleKey, usize>,
}

impl StyleCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one run's formatting, returning its stable identifier.
    pub fn register(&mut self, text: &TextElement) -> usize {
        self.register_signature(
            &text.font_name,
            (text.font_size * 2.0).round() as i64,
            text.bold,
            text.italic,
            &text.color.hex(),
        )
    }

    /// Register a raw signature, returning its stable identifier.
    pub fn register_signature(
        &mut self,
        font_name: &str,
        size_half_points: i64,
        bold: bool,
        italic: bool,
        color: &str,
    ) -> usize {
        let key = (
            font_name.to_string(),
            size_half_points,
            bold,
            italic,
            color.to_string(),
        );
        if let Some(&id) = self.index.get(&key) {
            self.styles[id].count += 1;
            return id;
        }
        let id = self.styles.len();
        self.styles.push(DocxStyle {
            font_name: font_name.to_string(),
            size_half_points,
            bold,
            italic,
            color: color.to_string(),
            count: 1,
        });
        self.index.insert(key, id);
        id
    }

    /// The elected document default: the signature with the highest usage
    /// count, ties broken by first registration. An empty collector yields
    /// the hardcoded fallback.
    pub fn normal(&self) -> DocxStyle {
        self.styles
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.count.cmp(&b.count).then(ib.cmp(ia)))
            .map(|(_, s)| s.clone())
            .unwrap_or_else(DocxStyle::fallback)
    }

    /// Styles differing from the elected default, in registration order.
    pub fn used_styles(&self) -> Vec<&DocxStyle> {
        let normal = self.normal();
        self.styles
            .iter()
            .filter(|s| !same_signature(s, &normal))
            .collect()
    }

    /// Distinct font names in registration order, the fallback font always
    /// included.
    pub fn font_names(&self) -> Vec<String> {
        let mut names = vec![FALLBACK_FONT_NAME.to_string()];
        for s in &self.styles {
            if !names.contains(&s.font_name) {
                names.push(s.font_name.clone());
            }
        }
        names
    }

    /// Access a registered style by identifier.
    pub fn get(&self, id: usize) -> Option<&DocxStyle> {
        self.styles.get(id)
    }
}

fn same_signature(a: &DocxStyle, b: &DocxStyle) -> bool {
    a.font_name == b.font_name
        && a.size_half_points == b.size_half_points
        && a.bold == b.bold
        && a.italic == b.italic
        && a.color == b.color
}

/// Font family classification for the font table, inferred from the name
/// when no font metadata is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    /// Serif faces (`w:family` "roman")
    Roman,
    /// Sans-serif faces (`w:family` "swiss")
    Swiss,
    /// Monospace faces (`w:family` "modern")
    Modern,
    /// Handwriting faces (`w:family` "script")
    Script,
}

impl FontFamily {
    /// The `w:family` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Roman => "roman",
            FontFamily::Swiss => "swiss",
            FontFamily::Modern => "modern",
            FontFamily::Script => "script",
        }
    }
}

/// Classify a font by name. Subset names win over family words so that
/// "Liberation Sans Mono" lands on monospace.
pub fn classify_font_family(name: &str) -> FontFamily {
    let lower = name.to_lowercase();
    if lower.contains("mono")
        || lower.contains("courier")
        || lower.contains("consol")
        || lower.contains("menlo")
    {
        FontFamily::Modern
    } else if lower.contains("script")
        || lower.contains("brush")
        || lower.contains("cursive")
        || lower.contains("comic")
    {
        FontFamily::Script
    } else if lower.contains("times")
        || lower.contains("georgia")
        || lower.contains("garamond")
        || lower.contains("cambria")
        || lower.contains("book")
        || (lower.contains("serif") && !lower.contains("sans"))
    {
        FontFamily::Roman
    } else {
        FontFamily::Swiss
    }
}
