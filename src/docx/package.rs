//! Package plumbing: relationships, content types, and the fixed XML parts.
//!
//! The main document part is emitted by [`super::document`]; everything else
//! the package schema requires (content-types manifest, relationship parts,
//! styles, settings, font table) is assembled here. ZIP container writing is
//! the caller's job; this module only produces named parts.

use crate::docx::styles::{classify_font_family, StyleCollector};
use std::collections::BTreeSet;

/// One relationship entry in `word/_rels/document.xml.rels`.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship id (`rId1`, `rId2`, …)
    pub id: String,
    /// Schema type URI suffix (`styles`, `image`, `hyperlink`, …)
    pub rel_type: &'static str,
    /// Target part path, relative to `word/`, or an external URL
    pub target: String,
    /// External targets carry `TargetMode="External"`
    pub external: bool,
}

/// Allocates relationship ids in first-reference order.
///
/// `rId1`–`rId3` are reserved for styles, settings and the font table; image
/// and hyperlink targets take `rId4` onward as the document emitter first
/// references them. One instance per conversion run.
#[derive(Debug)]
pub struct RelIdAllocator {
    entries: Vec<Relationship>,
    /// resource id -> entry index, so repeated placements share one part
    image_ids: Vec<(String, usize)>,
    hyperlink_ids: Vec<(String, usize)>,
    image_count: usize,
}

impl Default for RelIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RelIdAllocator {
    /// Create an allocator pre-seeded with the fixed part relationships.
    pub fn new() -> Self {
        let entries = vec![
            Relationship {
                id: "rId1".to_string(),
                rel_type: "styles",
                target: "styles.xml".to_string(),
                external: false,
            },
            Relationship {
                id: "rId2".to_string(),
                rel_type: "settings",
                target: "settings.xml".to_string(),
                external: false,
            },
            Relationship {
                id: "rId3".to_string(),
                rel_type: "fontTable",
                target: "fontTable.xml".to_string(),
                external: false,
            },
        ];
        Self {
            entries,
            image_ids: Vec::new(),
            hyperlink_ids: Vec::new(),
            image_count: 0,
        }
    }

    /// Register an image placement. Returns the relationship id; repeated
    /// references to the same resource share one entry.
    pub fn add_image(&mut self, resource_id: &str, extension: &str) -> String {
        if let Some((_, idx)) = self.image_ids.iter().find(|(r, _)| r == resource_id) {
            return self.entries[*idx].id.clone();
        }
        self.image_count += 1;
        let target = format!("media/image{}.{}", self.image_count, extension);
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: "image",
            target,
            external: false,
        });
        self.image_ids
            .push((resource_id.to_string(), self.entries.len() - 1));
        id
    }

    /// Register a hyperlink target. Repeated URLs share one entry.
    pub fn add_hyperlink(&mut self, url: &str) -> String {
        if let Some((_, idx)) = self.hyperlink_ids.iter().find(|(u, _)| u == url) {
            return self.entries[*idx].id.clone();
        }
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: "hyperlink",
            target: url.to_string(),
            external: true,
        });
        self.hyperlink_ids
            .push((url.to_string(), self.entries.len() - 1));
        id
    }

    /// Referenced images as (resource id, media part target) pairs, in
    /// first-reference order.
    pub fn referenced_images(&self) -> Vec<(String, String)> {
        self.image_ids
            .iter()
            .map(|(res, idx)| (res.clone(), self.entries[*idx].target.clone()))
            .collect()
    }

    /// All allocated relationships.
    pub fn entries(&self) -> &[Relationship] {
        &self.entries
    }
}

/// Escape special XML characters.
pub fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_TYPE_BASE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Generate `[Content_Types].xml` declaring the image extensions present.
pub fn content_types_xml(image_extensions: &BTreeSet<String>) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\n",
    );
    xml.push_str("  <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\n");
    xml.push_str("  <Default Extension=\"xml\" ContentType=\"application/xml\"/>\n");
    for ext in image_extensions {
        let content_type = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tiff" | "tif" => "image/tiff",
            other => {
                log::warn!("unrecognized image extension {:?} in package manifest", other);
                "application/octet-stream"
            },
        };
        xml.push_str(&format!(
            "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
            xml_escape(ext),
            content_type
        ));
    }
    for (part, kind) in [
        ("/word/document.xml", "document.main"),
        ("/word/styles.xml", "styles"),
        ("/word/settings.xml", "settings"),
        ("/word/fontTable.xml", "fontTable"),
    ] {
        xml.push_str(&format!(
            "  <Override PartName=\"{}\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.{}+xml\"/>\n",
            part, kind
        ));
    }
    xml.push_str("</Types>\n");
    xml
}

/// Generate the root `_rels/.rels` pointing at the main document part.
pub fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n",
    );
    xml.push_str(&format!(
        "  <Relationship Id=\"rId1\" Type=\"{}/officeDocument\" Target=\"word/document.xml\"/>\n",
        REL_TYPE_BASE
    ));
    xml.push_str("</Relationships>\n");
    xml
}

/// Generate `word/_rels/document.xml.rels` from the allocated relationships.
pub fn document_rels_xml(rels: &RelIdAllocator) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n",
    );
    for rel in rels.entries() {
        let mode = if rel.external {
            " TargetMode=\"External\""
        } else {
            ""
        };
        xml.push_str(&format!(
            "  <Relationship Id=\"{}\" Type=\"{}/{}\" Target=\"{}\"{}/>\n",
            rel.id,
            REL_TYPE_BASE,
            rel.rel_type,
            xml_escape(&rel.target),
            mode
        ));
    }
    xml.push_str("</Relationships>\n");
    xml
}

/// Paragraph style definitions the document emitter actually referenced.
#[derive(Debug, Default, Clone)]
pub struct ReferencedStyles {
    /// Heading levels (1-3) used by at least one paragraph
    pub heading_levels: BTreeSet<u8>,
    /// Whether any paragraph was flagged as a list item
    pub list_used: bool,
}

/// Generate `word/styles.xml`: document defaults from the elected Normal
/// style, plus only the style definitions actually used.
pub fn styles_xml(collector: &StyleCollector, referenced: &ReferencedStyles) -> String {
    let normal = collector.normal();
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<w:styles xmlns:w=\"{}\">\n", W_NS));

    xml.push_str("  <w:docDefaults>\n    <w:rPrDefault>\n      <w:rPr>\n");
    xml.push_str(&format!(
        "        <w:rFonts w:ascii=\"{}\" w:hAnsi=\"{}\"/>\n",
        xml_escape(&normal.font_name),
        xml_escape(&normal.font_name)
    ));
    xml.push_str(&format!(
        "        <w:sz w:val=\"{}\"/>\n        <w:szCs w:val=\"{}\"/>\n",
        normal.size_half_points, normal.size_half_points
    ));
    if normal.color != "000000" {
        xml.push_str(&format!("        <w:color w:val=\"{}\"/>\n", normal.color));
    }
    if normal.bold {
        xml.push_str("        <w:b/>\n");
    }
    if normal.italic {
        xml.push_str("        <w:i/>\n");
    }
    xml.push_str("      </w:rPr>\n    </w:rPrDefault>\n  </w:docDefaults>\n");

    xml.push_str("  <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\n");
    xml.push_str("    <w:name w:val=\"Normal\"/>\n  </w:style>\n");

    for level in &referenced.heading_levels {
        xml.push_str(&format!(
            "  <w:style w:type=\"paragraph\" w:styleId=\"Heading{0}\">\n    <w:name w:val=\"heading {0}\"/>\n    <w:basedOn w:val=\"Normal\"/>\n    <w:pPr>\n      <w:outlineLvl w:val=\"{1}\"/>\n    </w:pPr>\n    <w:rPr>\n      <w:b/>\n    </w:rPr>\n  </w:style>\n",
            level,
            level - 1
        ));
    }
    if referenced.list_used {
        xml.push_str("  <w:style w:type=\"paragraph\" w:styleId=\"ListParagraph\">\n    <w:name w:val=\"List Paragraph\"/>\n    <w:basedOn w:val=\"Normal\"/>\n    <w:pPr>\n      <w:ind w:left=\"720\"/>\n    </w:pPr>\n  </w:style>\n");
    }

    for (i, style) in collector.used_styles().iter().enumerate() {
        xml.push_str(&format!(
            "  <w:style w:type=\"character\" w:styleId=\"C{}\">\n    <w:name w:val=\"C{}\"/>\n    <w:rPr>\n",
            i, i
        ));
        if style.font_name != normal.font_name {
            xml.push_str(&format!(
                "      <w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\"/>\n",
                xml_escape(&style.font_name)
            ));
        }
        if style.size_half_points != normal.size_half_points {
            xml.push_str(&format!(
                "      <w:sz w:val=\"{}\"/>\n",
                style.size_half_points
            ));
        }
        if style.bold && !normal.bold {
            xml.push_str("      <w:b/>\n");
        }
        if style.italic && !normal.italic {
            xml.push_str("      <w:i/>\n");
        }
        if style.color != normal.color {
            xml.push_str(&format!("      <w:color w:val=\"{}\"/>\n", style.color));
        }
        xml.push_str("    </w:rPr>\n  </w:style>\n");
    }

    xml.push_str("</w:styles>\n");
    xml
}

/// Generate `word/settings.xml`. When the document carries form fields, a
/// forms-editable protection flag keeps the fields interactive in Word.
pub fn settings_xml(has_form_fields: bool) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<w:settings xmlns:w=\"{}\">\n", W_NS));
    xml.push_str("  <w:compat>\n    <w:compatSetting w:name=\"compatibilityMode\" w:uri=\"http://schemas.microsoft.com/office/word\" w:val=\"15\"/>\n  </w:compat>\n");
    if has_form_fields {
        xml.push_str("  <w:documentProtection w:edit=\"forms\" w:enforcement=\"1\"/>\n");
    }
    xml.push_str("</w:settings>\n");
    xml
}

/// Generate `word/fontTable.xml`: one entry per font actually used, with a
/// name-heuristic family classification.
pub fn font_table_xml(collector: &StyleCollector) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<w:fonts xmlns:w=\"{}\">\n", W_NS));
    for name in collector.font_names() {
        let family = classify_font_family(&name);
        xml.push_str(&format!(
            "  <w:font w:name=\"{}\">\n    <w:family w:val=\"{}\"/>\n  </w:font>\n",
            xml_escape(&name),
            family.as_str()
        ));
    }
    xml.push_str("</w:fonts>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_ids_fixed_parts_first() {
        let rels = RelIdAllocator::new();
        let ids: Vec<&str> = rels.entries().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId2", "rId3"]);
        assert_eq!(rels.entries()[0].target, "styles.xml");
        assert_eq!(rels.entries()[2].target, "fontTable.xml");
    }

    #[test]
    fn test_image_ids_allocated_in_reference_order() {
        let mut rels = RelIdAllocator::new();
        assert_eq!(rels.add_image("img-a", "png"), "rId4");
        assert_eq!(rels.add_image("img-b", "jpeg"), "rId5");
        // Same resource referenced again shares the entry.
        assert_eq!(rels.add_image("img-a", "png"), "rId4");

        let media = rels.referenced_images();
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].1, "media/image1.png");
        assert_eq!(media[1].1, "media/image2.jpeg");
    }

    #[test]
    fn test_hyperlinks_are_external() {
        let mut rels = RelIdAllocator::new();
        let id = rels.add_hyperlink("https://example.com");
        let entry = rels.entries().iter().find(|r| r.id == id).unwrap();
        assert!(entry.external);

        let xml = document_rels_xml(&rels);
        assert!(xml.contains("TargetMode=\"External\""));
        assert!(xml.contains("Target=\"https://example.com\""));
    }

    #[test]
    fn test_content_types_declare_image_extensions() {
        let mut exts = BTreeSet::new();
        exts.insert("png".to_string());
        exts.insert("jpeg".to_string());

        let xml = content_types_xml(&exts);
        assert!(xml.contains("Extension=\"png\" ContentType=\"image/png\""));
        assert!(xml.contains("Extension=\"jpeg\" ContentType=\"image/jpeg\""));
        assert!(xml.contains("PartName=\"/word/document.xml\""));
    }

    #[test]
    fn test_unknown_image_extension_not_mislabeled() {
        let mut exts = BTreeSet::new();
        exts.insert("webp".to_string());

        let xml = content_types_xml(&exts);
        assert!(xml.contains("Extension=\"webp\" ContentType=\"application/octet-stream\""));
        assert!(!xml.contains("Extension=\"webp\" ContentType=\"image/png\""));
    }

    #[test]
    fn test_settings_protection_only_with_fields() {
        assert!(settings_xml(true).contains("w:edit=\"forms\""));
        assert!(!settings_xml(false).contains("documentProtection"));
        assert!(settings_xml(false).contains("compatibilityMode"));
    }

    #[test]
    fn test_styles_doc_defaults_from_normal() {
        let mut collector = StyleCollector::new();
        for _ in 0..3 {
            collector.register_signature("Arial", 24, false, false, "000000");
        }
        collector.register_signature("Arial", 24, true, false, "FF0000");

        let xml = styles_xml(&collector, &ReferencedStyles::default());
        assert!(xml.contains("w:ascii=\"Arial\""));
        assert!(xml.contains("<w:sz w:val=\"24\"/>"));
        // The bold red variant is the only explicit definition.
        assert!(xml.contains("w:styleId=\"C0\""));
        assert!(xml.contains("<w:color w:val=\"FF0000\"/>"));
    }

    #[test]
    fn test_font_table_classifies_families() {
        let mut collector = StyleCollector::new();
        collector.register_signature("Times New Roman", 24, false, false, "000000");
        collector.register_signature("Courier New", 20, false, false, "000000");

        let xml = font_table_xml(&collector);
        assert!(xml.contains("w:name=\"Times New Roman\""));
        assert!(xml.contains("<w:family w:val=\"roman\"/>"));
        assert!(xml.contains("<w:family w:val=\"modern\"/>"));
        // Fallback font always present.
        assert!(xml.contains("w:name=\"Calibri\""));
    }

    #[test]
    fn test_heading_styles_only_when_referenced() {
        let collector = StyleCollector::new();
        let mut referenced = ReferencedStyles::default();
        referenced.heading_levels.insert(1);

        let xml = styles_xml(&collector, &referenced);
        assert!(xml.contains("w:styleId=\"Heading1\""));
        assert!(!xml.contains("w:styleId=\"Heading2\""));
        assert!(!xml.contains("ListParagraph"));
    }
}
