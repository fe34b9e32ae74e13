//! DOCX package assembly.
//!
//! The converter runs the layout stages over each input scene, emits the
//! main document part, and assembles the named XML parts a DOCX package
//! requires. The ZIP container itself is written by the caller; the output
//! here is the ordered set of parts.

pub mod document;
pub mod package;
pub mod styles;
pub mod units;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::{LayoutAssembler, PageLayout};
use crate::scene::{PackagedImage, PageScene};
use document::DocumentWriter;
use package::RelIdAllocator;
use std::collections::BTreeSet;
use styles::StyleCollector;

pub use package::{ReferencedStyles, Relationship};
pub use styles::{classify_font_family, DocxStyle, FontFamily};

/// The assembled package: named parts in write order.
///
/// Part names are package-relative (`word/document.xml`); payloads are
/// UTF-8 XML except for `word/media/` entries, which carry the original
/// image bytes.
#[derive(Debug, Default)]
pub struct DocxPackage {
    /// (part name, payload) pairs in package order
    pub parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Look up a part's payload by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// A part's payload as UTF-8 text, for XML parts.
    pub fn part_str(&self, name: &str) -> Option<&str> {
        self.part(name).and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Converts page scenes into a DOCX package.
///
/// Holds only configuration; the mutable per-run state (style counters,
/// relationship ids) is created fresh inside [`convert`](Self::convert), so
/// a converter may be reused across documents but never shared across
/// threads mid-run.
#[derive(Debug, Default)]
pub struct DocxConverter {
    config: LayoutConfig,
}

impl DocxConverter {
    /// Create a converter with default thresholds.
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    /// Create a converter with custom thresholds.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Reconstruct structure from `scenes` and serialize the result.
    ///
    /// `images` supplies the packaged bytes for image placements; placements
    /// with no matching resource are skipped.
    pub fn convert(
        &self,
        scenes: &[PageScene],
        images: &[PackagedImage],
    ) -> Result<DocxPackage> {
        let layouts = self.assemble(scenes);
        self.serialize(&layouts, images)
    }

    /// Run only the layout stages, for callers that want the reconstructed
    /// structure without serialization.
    pub fn assemble(&self, scenes: &[PageScene]) -> Vec<PageLayout> {
        let assembler = LayoutAssembler::new(&self.config);
        scenes.iter().map(|scene| assembler.assemble(scene)).collect()
    }

    /// Serialize already-assembled layouts into a package.
    pub fn serialize(
        &self,
        layouts: &[PageLayout],
        images: &[PackagedImage],
    ) -> Result<DocxPackage> {
        let mut styles = StyleCollector::new();
        let mut rels = RelIdAllocator::new();

        let mut writer = DocumentWriter::new(&self.config, &mut styles, &mut rels, images);
        let document_xml = writer.write(layouts)?;
        let referenced = writer.referenced_styles();
        drop(writer);

        let has_form_fields = layouts.iter().any(|p| p.has_form_fields());

        let mut media_parts: Vec<(String, Vec<u8>)> = Vec::new();
        let mut extensions: BTreeSet<String> = BTreeSet::new();
        for (resource_id, target) in rels.referenced_images() {
            if let Some(packaged) = images.iter().find(|i| i.resource_id == resource_id) {
                media_parts.push((format!("word/{}", target), packaged.bytes.clone()));
                extensions.insert(packaged.extension.clone());
            }
        }

        let mut parts: Vec<(String, Vec<u8>)> = vec![
            (
                "[Content_Types].xml".to_string(),
                package::content_types_xml(&extensions).into_bytes(),
            ),
            (
                "_rels/.rels".to_string(),
                package::root_rels_xml().into_bytes(),
            ),
            ("word/document.xml".to_string(), document_xml.into_bytes()),
            (
                "word/_rels/document.xml.rels".to_string(),
                package::document_rels_xml(&rels).into_bytes(),
            ),
            (
                "word/styles.xml".to_string(),
                package::styles_xml(&styles, &referenced).into_bytes(),
            ),
            (
                "word/settings.xml".to_string(),
                package::settings_xml(has_form_fields).into_bytes(),
            ),
            (
                "word/fontTable.xml".to_string(),
                package::font_table_xml(&styles).into_bytes(),
            ),
        ];
        parts.extend(media_parts);

        Ok(DocxPackage { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, SceneElement, TextElement};

    fn mock_scene_with_text() -> PageScene {
        let mut scene = PageScene::new(612.0, 792.0);
        scene.elements.push(SceneElement::Text(TextElement {
            text: "Converted".to_string(),
            x: 72.0,
            y: 100.0,
            width: 60.0,
            height: 11.0,
            font_name: "Arial".to_string(),
            font_size: 11.0,
            bold: false,
            italic: false,
            color: Color::black(),
            underline: false,
            strikethrough: false,
            rotation: 0.0,
            superscript_offset: 0.0,
            language: None,
            hyperlink: None,
        }));
        scene
    }

    #[test]
    fn test_convert_produces_all_fixed_parts() {
        let converter = DocxConverter::new();
        let package = converter.convert(&[mock_scene_with_text()], &[]).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/settings.xml",
            "word/fontTable.xml",
        ] {
            assert!(package.part(name).is_some(), "missing part {}", name);
        }
    }

    #[test]
    fn test_document_part_carries_text() {
        let converter = DocxConverter::new();
        let package = converter.convert(&[mock_scene_with_text()], &[]).unwrap();
        let document = package.part_str("word/document.xml").unwrap();
        assert!(document.contains("Converted"));
    }

    #[test]
    fn test_empty_input_still_produces_package() {
        let converter = DocxConverter::new();
        let package = converter.convert(&[], &[]).unwrap();
        let document = package.part_str("word/document.xml").unwrap();
        assert!(document.contains("<w:body>"));
        assert!(document.contains("w:pgMar"));
    }
}
