//! Main document part emission.
//!
//! Walks assembled page layouts and writes `word/document.xml`: tables with
//! spans and shading, paragraphs with inferred alignment and indentation,
//! inline images, legacy interactive form fields, and the closing section
//! properties. Emission is deterministic; elements appear in the reading
//! order the assembler established.

use crate::config::LayoutConfig;
use crate::docx::package::{ReferencedStyles, RelIdAllocator};
use crate::docx::styles::{DocxStyle, StyleCollector};
use crate::docx::units::{
    degrees_to_xfrm_rot, pt_to_eighth_points, pt_to_emu, pt_to_half_points, pt_to_twips,
};
use crate::error::Result;
use crate::layout::{DetectedCell, DetectedTable, LayoutElement, PageLayout, ParagraphGroup};
use crate::scene::{FieldKind, FormField, ImageElement, PackagedImage, TextElement};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_WPS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";

fn open(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(name.to_string());
    for (k, v) in attrs {
        el.push_attribute((*k, *v));
    }
    w.write_event(Event::Start(el))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(name.to_string());
    for (k, v) in attrs {
        el.push_attribute((*k, *v));
    }
    w.write_event(Event::Empty(el))?;
    Ok(())
}

fn close(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name.to_string())))?;
    Ok(())
}

fn write_text(w: &mut XmlWriter, text: &str) -> Result<()> {
    w.write_event(Event::Text(BytesText::new(text)))?;
    Ok(())
}

/// Writes the main document part for one conversion run.
pub struct DocumentWriter<'a> {
    config: &'a LayoutConfig,
    styles: &'a mut StyleCollector,
    rels: &'a mut RelIdAllocator,
    images: &'a [PackagedImage],
    normal: DocxStyle,
    referenced: ReferencedStyles,
    drawing_id: u32,
}

impl<'a> DocumentWriter<'a> {
    /// Create a writer over the shared per-run collectors.
    pub fn new(
        config: &'a LayoutConfig,
        styles: &'a mut StyleCollector,
        rels: &'a mut RelIdAllocator,
        images: &'a [PackagedImage],
    ) -> Self {
        Self {
            config,
            styles,
            rels,
            images,
            normal: StyleCollector::new().normal(),
            referenced: ReferencedStyles::default(),
            drawing_id: 0,
        }
    }

    /// Paragraph style definitions the emitted body referenced, for the
    /// styles part.
    pub fn referenced_styles(&self) -> ReferencedStyles {
        self.referenced.clone()
    }

    /// Emit `word/document.xml` for the given page layouts.
    ///
    /// Registers every run with the style collector first so the document
    /// default is elected before any run properties are written.
    pub fn write(&mut self, layouts: &[PageLayout]) -> Result<String> {
        self.collect_styles(layouts);
        self.normal = self.styles.normal();

        let mut w = Writer::new(Vec::new());
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        open(
            &mut w,
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
                ("xmlns:wps", NS_WPS),
            ],
        )?;
        open(&mut w, "w:body", &[])?;

        for (i, page) in layouts.iter().enumerate() {
            for element in &page.elements {
                self.write_element(&mut w, element)?;
            }
            if i + 1 < layouts.len() {
                self.write_page_break(&mut w)?;
            }
        }

        self.write_section_properties(&mut w, layouts)?;
        close(&mut w, "w:body")?;
        close(&mut w, "w:document")?;

        Ok(String::from_utf8(w.into_inner())?)
    }

    fn collect_styles(&mut self, layouts: &[PageLayout]) {
        for page in layouts {
            for element in &page.elements {
                match element {
                    LayoutElement::Table(t) => {
                        for cell in &t.cells {
                            for text in &cell.texts {
                                self.styles.register(text);
                            }
                        }
                    },
                    LayoutElement::Paragraph(p) => self.collect_paragraph(p),
                    LayoutElement::TwoColumn { left, right, .. } => {
                        for p in left.iter().chain(right) {
                            self.collect_paragraph(p);
                        }
                    },
                    LayoutElement::Image(_) => {},
                }
            }
        }
    }

    fn collect_paragraph(&mut self, paragraph: &ParagraphGroup) {
        for text in paragraph.lines.iter().flatten() {
            self.styles.register(text);
        }
    }

    fn write_element(&mut self, w: &mut XmlWriter, element: &LayoutElement) -> Result<()> {
        match element {
            LayoutElement::Table(t) => self.write_table(w, t),
            LayoutElement::Paragraph(p) => self.write_paragraph(w, p),
            LayoutElement::Image(i) => self.write_image_paragraph(w, i),
            LayoutElement::TwoColumn { left, right, .. } => {
                // A flowed document has no side-by-side free paragraphs;
                // render the left band, then the right.
                for p in left.iter().chain(right) {
                    self.write_paragraph(w, p)?;
                }
                Ok(())
            },
        }
    }

    fn write_page_break(&mut self, w: &mut XmlWriter) -> Result<()> {
        open(w, "w:p", &[])?;
        open(w, "w:r", &[])?;
        empty(w, "w:br", &[("w:type", "page")])?;
        close(w, "w:r")?;
        close(w, "w:p")?;
        Ok(())
    }

    // --- tables ---

    fn write_table(&mut self, w: &mut XmlWriter, table: &DetectedTable) -> Result<()> {
        let total_width = pt_to_twips(table.column_widths.iter().sum());
        open(w, "w:tbl", &[])?;
        open(w, "w:tblPr", &[])?;
        let width_attr = total_width.to_string();
        empty(w, "w:tblW", &[("w:w", width_attr.as_str()), ("w:type", "dxa")])?;
        empty(w, "w:tblLayout", &[("w:type", "fixed")])?;
        close(w, "w:tblPr")?;

        open(w, "w:tblGrid", &[])?;
        for width in &table.column_widths {
            let value = pt_to_twips(*width).to_string();
            empty(w, "w:gridCol", &[("w:w", value.as_str())])?;
        }
        close(w, "w:tblGrid")?;

        for row in 0..table.rows {
            open(w, "w:tr", &[])?;
            open(w, "w:trPr", &[])?;
            let height = pt_to_twips(table.row_heights[row]).to_string();
            empty(w, "w:trHeight", &[("w:val", height.as_str())])?;
            close(w, "w:trPr")?;

            let mut col = 0;
            while col < table.cols {
                match table.covering_cell(row, col) {
                    Some(cell) if cell.row == row && cell.col == col => {
                        self.write_cell(w, table, cell)?;
                        col += cell.col_span;
                    },
                    Some(cell) if cell.col == col => {
                        // A rowSpan continuation: placeholder carrying the
                        // same column span.
                        self.write_merge_continuation(w, table, cell)?;
                        col += cell.col_span;
                    },
                    Some(_) => {
                        col += 1;
                    },
                    None => {
                        // Structurally required placeholder so the row
                        // stays complete.
                        self.write_empty_cell(w, table.column_widths[col])?;
                        col += 1;
                    },
                }
            }
            close(w, "w:tr")?;
        }
        close(w, "w:tbl")?;
        Ok(())
    }

    fn write_cell(
        &mut self,
        w: &mut XmlWriter,
        table: &DetectedTable,
        cell: &DetectedCell,
    ) -> Result<()> {
        let spanned_width: f32 = table.column_widths[cell.col..cell.col + cell.col_span]
            .iter()
            .sum();

        open(w, "w:tc", &[])?;
        open(w, "w:tcPr", &[])?;
        let width_attr = pt_to_twips(spanned_width).to_string();
        empty(w, "w:tcW", &[("w:w", width_attr.as_str()), ("w:type", "dxa")])?;
        if cell.col_span > 1 {
            let span = cell.col_span.to_string();
            empty(w, "w:gridSpan", &[("w:val", span.as_str())])?;
        }
        if cell.row_span > 1 {
            empty(w, "w:vMerge", &[("w:val", "restart")])?;
        }
        self.write_cell_borders(w, cell)?;
        if let Some(fill) = cell.fill_color {
            let hex = fill.hex();
            empty(w, "w:shd", &[("w:val", "clear"), ("w:fill", hex.as_str())])?;
        }
        if let Some(padding) = cell.padding {
            let pad = pt_to_twips(padding).to_string();
            open(w, "w:tcMar", &[])?;
            for edge in ["w:top", "w:left", "w:bottom", "w:right"] {
                empty(w, edge, &[("w:w", pad.as_str()), ("w:type", "dxa")])?;
            }
            close(w, "w:tcMar")?;
        }
        match cell.valign {
            crate::layout::CellVAlign::Center => empty(w, "w:vAlign", &[("w:val", "center")])?,
            crate::layout::CellVAlign::Bottom => empty(w, "w:vAlign", &[("w:val", "bottom")])?,
            crate::layout::CellVAlign::Top => {},
        }
        close(w, "w:tcPr")?;

        if cell.texts.is_empty() && cell.fields.is_empty() {
            open(w, "w:p", &[])?;
            close(w, "w:p")?;
        } else {
            let mut texts = cell.texts.clone();
            texts.sort_by(|a, b| {
                (a.y, a.x)
                    .partial_cmp(&(b.y, b.x))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            open(w, "w:p", &[])?;
            for (i, text) in texts.iter().enumerate() {
                if i > 0 {
                    self.write_space_run(w)?;
                }
                self.write_content_run(w, text)?;
            }
            for field in &cell.fields {
                self.write_field(w, field)?;
            }
            close(w, "w:p")?;
        }
        close(w, "w:tc")?;
        Ok(())
    }

    fn write_merge_continuation(
        &mut self,
        w: &mut XmlWriter,
        table: &DetectedTable,
        cell: &DetectedCell,
    ) -> Result<()> {
        let spanned_width: f32 = table.column_widths[cell.col..cell.col + cell.col_span]
            .iter()
            .sum();
        open(w, "w:tc", &[])?;
        open(w, "w:tcPr", &[])?;
        let width_attr = pt_to_twips(spanned_width).to_string();
        empty(w, "w:tcW", &[("w:w", width_attr.as_str()), ("w:type", "dxa")])?;
        if cell.col_span > 1 {
            let span = cell.col_span.to_string();
            empty(w, "w:gridSpan", &[("w:val", span.as_str())])?;
        }
        empty(w, "w:vMerge", &[])?;
        close(w, "w:tcPr")?;
        open(w, "w:p", &[])?;
        close(w, "w:p")?;
        close(w, "w:tc")?;
        Ok(())
    }

    fn write_empty_cell(&mut self, w: &mut XmlWriter, width: f32) -> Result<()> {
        open(w, "w:tc", &[])?;
        open(w, "w:tcPr", &[])?;
        let width_attr = pt_to_twips(width).to_string();
        empty(w, "w:tcW", &[("w:w", width_attr.as_str()), ("w:type", "dxa")])?;
        close(w, "w:tcPr")?;
        open(w, "w:p", &[])?;
        close(w, "w:p")?;
        close(w, "w:tc")?;
        Ok(())
    }

    fn write_cell_borders(&mut self, w: &mut XmlWriter, cell: &DetectedCell) -> Result<()> {
        let borders = &cell.borders;
        let edges = [
            ("w:top", borders.top),
            ("w:left", borders.left),
            ("w:bottom", borders.bottom),
            ("w:right", borders.right),
        ];
        if edges.iter().all(|(_, line)| line.is_none()) {
            return Ok(());
        }
        open(w, "w:tcBorders", &[])?;
        for (name, line) in edges {
            if let Some(line) = line {
                let sz = pt_to_eighth_points(line.width).max(2).to_string();
                let color = line
                    .color
                    .map(|c| c.hex())
                    .unwrap_or_else(|| "auto".to_string());
                empty(
                    w,
                    name,
                    &[
                        ("w:val", "single"),
                        ("w:sz", sz.as_str()),
                        ("w:color", color.as_str()),
                    ],
                )?;
            }
        }
        close(w, "w:tcBorders")?;
        Ok(())
    }

    // --- paragraphs ---

    fn write_paragraph(&mut self, w: &mut XmlWriter, paragraph: &ParagraphGroup) -> Result<()> {
        open(w, "w:p", &[])?;
        self.write_paragraph_properties(w, paragraph)?;

        for (i, line) in paragraph.lines.iter().enumerate() {
            if i > 0 {
                self.write_space_run(w)?;
            }
            for text in line {
                self.write_content_run(w, text)?;
            }
        }
        for field in &paragraph.fields {
            self.write_field(w, field)?;
        }
        close(w, "w:p")?;
        Ok(())
    }

    fn write_paragraph_properties(
        &mut self,
        w: &mut XmlWriter,
        paragraph: &ParagraphGroup,
    ) -> Result<()> {
        let alignment = infer_alignment(paragraph, self.config);
        let indent = infer_indent(paragraph, self.config);
        let has_spacing = paragraph.line_spacing.is_some()
            || paragraph.space_before.is_some()
            || paragraph.space_after.is_some();

        let needs_ppr = paragraph.heading_level.is_some()
            || paragraph.list_item
            || alignment != Alignment::Left
            || indent.is_some()
            || has_spacing
            || paragraph.background.is_some()
            || paragraph.bottom_border.is_some();
        if !needs_ppr {
            return Ok(());
        }

        open(w, "w:pPr", &[])?;
        if let Some(level) = paragraph.heading_level {
            self.referenced.heading_levels.insert(level);
            let style = format!("Heading{}", level);
            empty(w, "w:pStyle", &[("w:val", style.as_str())])?;
        } else if paragraph.list_item {
            self.referenced.list_used = true;
            empty(w, "w:pStyle", &[("w:val", "ListParagraph")])?;
        }
        match alignment {
            Alignment::Center => empty(w, "w:jc", &[("w:val", "center")])?,
            Alignment::Right => empty(w, "w:jc", &[("w:val", "right")])?,
            Alignment::Justify => empty(w, "w:jc", &[("w:val", "both")])?,
            Alignment::Left => {},
        }
        if let Some(indent) = indent {
            match indent {
                Indent::FirstLine(pt) => {
                    let value = pt_to_twips(pt).to_string();
                    empty(w, "w:ind", &[("w:firstLine", value.as_str())])?;
                },
                Indent::Hanging(pt) => {
                    let value = pt_to_twips(pt).to_string();
                    empty(w, "w:ind", &[("w:hanging", value.as_str())])?;
                },
            }
        }
        if has_spacing {
            let mut attrs: Vec<(&str, String)> = Vec::new();
            if let Some(before) = paragraph.space_before {
                attrs.push(("w:before", pt_to_twips(before).to_string()));
            }
            if let Some(after) = paragraph.space_after {
                attrs.push(("w:after", pt_to_twips(after).to_string()));
            }
            if let Some(line) = paragraph.line_spacing {
                attrs.push(("w:line", pt_to_twips(line).to_string()));
                attrs.push(("w:lineRule", "exact".to_string()));
            }
            let refs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
            empty(w, "w:spacing", &refs)?;
        }
        if let Some(background) = paragraph.background {
            let hex = background.hex();
            empty(w, "w:shd", &[("w:val", "clear"), ("w:fill", hex.as_str())])?;
        }
        if let Some((color, width)) = paragraph.bottom_border {
            let sz = pt_to_eighth_points(width).max(2).to_string();
            let color = color
                .map(|c| c.hex())
                .unwrap_or_else(|| "auto".to_string());
            open(w, "w:pBdr", &[])?;
            empty(
                w,
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", sz.as_str()),
                    ("w:color", color.as_str()),
                ],
            )?;
            close(w, "w:pBdr")?;
        }
        close(w, "w:pPr")?;
        Ok(())
    }

    /// Route one text run to the right emitter: rotated runs become inline
    /// drawings, hyperlinked runs get a `w:hyperlink` wrapper with a
    /// relationship, everything else is a plain run. Paragraph and table-cell
    /// content share this dispatch.
    fn write_content_run(&mut self, w: &mut XmlWriter, text: &TextElement) -> Result<()> {
        if text.rotation.abs() > self.config.rotation_threshold {
            self.write_rotated_run(w, text)
        } else if let Some(url) = text.hyperlink.clone() {
            let rid = self.rels.add_hyperlink(&url);
            open(w, "w:hyperlink", &[("r:id", rid.as_str())])?;
            self.write_run(w, text)?;
            close(w, "w:hyperlink")
        } else {
            self.write_run(w, text)
        }
    }

    fn write_space_run(&mut self, w: &mut XmlWriter) -> Result<()> {
        open(w, "w:r", &[])?;
        open(w, "w:t", &[("xml:space", "preserve")])?;
        write_text(w, " ")?;
        close(w, "w:t")?;
        close(w, "w:r")?;
        Ok(())
    }

    /// Emit one plain run, writing only the properties that differ from the
    /// elected Normal style.
    fn write_run(&mut self, w: &mut XmlWriter, text: &TextElement) -> Result<()> {
        open(w, "w:r", &[])?;

        let half_points = pt_to_half_points(text.font_size);
        let hex = text.color.hex();
        let font_differs = text.font_name != self.normal.font_name;
        let size_differs = half_points != self.normal.size_half_points;
        let bold_differs = text.bold != self.normal.bold;
        let italic_differs = text.italic != self.normal.italic;
        let color_differs = hex != self.normal.color;
        let vert_align = if text.superscript_offset > 0.5 {
            Some("superscript")
        } else if text.superscript_offset < -0.5 {
            Some("subscript")
        } else {
            None
        };
        let has_rpr = font_differs
            || size_differs
            || bold_differs
            || italic_differs
            || color_differs
            || text.underline
            || text.strikethrough
            || vert_align.is_some()
            || text.language.is_some();

        if has_rpr {
            open(w, "w:rPr", &[])?;
            if font_differs {
                empty(
                    w,
                    "w:rFonts",
                    &[
                        ("w:ascii", text.font_name.as_str()),
                        ("w:hAnsi", text.font_name.as_str()),
                    ],
                )?;
            }
            if bold_differs {
                if text.bold {
                    empty(w, "w:b", &[])?;
                } else {
                    empty(w, "w:b", &[("w:val", "0")])?;
                }
            }
            if italic_differs {
                if text.italic {
                    empty(w, "w:i", &[])?;
                } else {
                    empty(w, "w:i", &[("w:val", "0")])?;
                }
            }
            if text.strikethrough {
                empty(w, "w:strike", &[])?;
            }
            if size_differs {
                let value = half_points.to_string();
                empty(w, "w:sz", &[("w:val", value.as_str())])?;
                empty(w, "w:szCs", &[("w:val", value.as_str())])?;
            }
            if text.underline {
                empty(w, "w:u", &[("w:val", "single")])?;
            }
            if color_differs {
                empty(w, "w:color", &[("w:val", hex.as_str())])?;
            }
            if let Some(kind) = vert_align {
                empty(w, "w:vertAlign", &[("w:val", kind)])?;
            }
            if let Some(lang) = &text.language {
                empty(w, "w:lang", &[("w:val", lang.as_str())])?;
            }
            close(w, "w:rPr")?;
        }

        open(w, "w:t", &[("xml:space", "preserve")])?;
        write_text(w, &text.text)?;
        close(w, "w:t")?;
        close(w, "w:r")?;
        Ok(())
    }

    /// Text rotated beyond the threshold goes into an inline shape with an
    /// `a:xfrm` rotation; plain runs have no rotation property.
    fn write_rotated_run(&mut self, w: &mut XmlWriter, text: &TextElement) -> Result<()> {
        self.drawing_id += 1;
        let id = self.drawing_id.to_string();
        let name = format!("Rotated Text {}", self.drawing_id);
        let cx = pt_to_emu(text.width.max(1.0)).to_string();
        let cy = pt_to_emu(text.height.max(1.0)).to_string();
        let rot = degrees_to_xfrm_rot(text.rotation).to_string();

        open(w, "w:r", &[])?;
        open(w, "w:drawing", &[])?;
        open(
            w,
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )?;
        empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        empty(w, "wp:docPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        open(w, "a:graphic", &[])?;
        open(w, "a:graphicData", &[("uri", NS_WPS)])?;
        open(w, "wps:wsp", &[])?;
        open(w, "wps:spPr", &[])?;
        open(w, "a:xfrm", &[("rot", rot.as_str())])?;
        empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
        empty(w, "a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        close(w, "a:xfrm")?;
        open(w, "a:prstGeom", &[("prst", "rect")])?;
        empty(w, "a:avLst", &[])?;
        close(w, "a:prstGeom")?;
        close(w, "wps:spPr")?;
        open(w, "wps:txbx", &[])?;
        open(w, "w:txbxContent", &[])?;
        open(w, "w:p", &[])?;
        self.write_run(w, text)?;
        close(w, "w:p")?;
        close(w, "w:txbxContent")?;
        close(w, "wps:txbx")?;
        empty(w, "wps:bodyPr", &[("wrap", "none")])?;
        close(w, "wps:wsp")?;
        close(w, "a:graphicData")?;
        close(w, "a:graphic")?;
        close(w, "wp:inline")?;
        close(w, "w:drawing")?;
        close(w, "w:r")?;
        Ok(())
    }

    // --- images ---

    fn write_image_paragraph(&mut self, w: &mut XmlWriter, image: &ImageElement) -> Result<()> {
        let Some(packaged) = self
            .images
            .iter()
            .find(|p| p.resource_id == image.resource_id)
        else {
            // Upstream extraction gap; skip the placement silently.
            log::debug!("no packaged bytes for image {}, skipping", image.resource_id);
            return Ok(());
        };
        let rid = self
            .rels
            .add_image(&packaged.resource_id, &packaged.extension);
        self.drawing_id += 1;

        let id = self.drawing_id.to_string();
        let name = format!("Image {}", self.drawing_id);
        let bbox = image.bbox;
        let cx = pt_to_emu(bbox.width.max(1.0)).to_string();
        let cy = pt_to_emu(bbox.height.max(1.0)).to_string();

        open(w, "w:p", &[])?;
        open(w, "w:r", &[])?;
        open(w, "w:drawing", &[])?;
        open(
            w,
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )?;
        empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        empty(w, "wp:docPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        open(w, "a:graphic", &[])?;
        open(w, "a:graphicData", &[("uri", NS_PIC)])?;
        open(w, "pic:pic", &[])?;
        open(w, "pic:nvPicPr", &[])?;
        empty(w, "pic:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        empty(w, "pic:cNvPicPr", &[])?;
        close(w, "pic:nvPicPr")?;
        open(w, "pic:blipFill", &[])?;
        empty(w, "a:blip", &[("r:embed", rid.as_str())])?;
        open(w, "a:stretch", &[])?;
        empty(w, "a:fillRect", &[])?;
        close(w, "a:stretch")?;
        close(w, "pic:blipFill")?;
        open(w, "pic:spPr", &[])?;
        open(w, "a:xfrm", &[])?;
        empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
        empty(w, "a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        close(w, "a:xfrm")?;
        open(w, "a:prstGeom", &[("prst", "rect")])?;
        empty(w, "a:avLst", &[])?;
        close(w, "a:prstGeom")?;
        close(w, "pic:spPr")?;
        close(w, "pic:pic")?;
        close(w, "a:graphicData")?;
        close(w, "a:graphic")?;
        close(w, "wp:inline")?;
        close(w, "w:drawing")?;
        close(w, "w:r")?;
        close(w, "w:p")?;
        Ok(())
    }

    // --- form fields ---

    fn write_field(&mut self, w: &mut XmlWriter, field: &FormField) -> Result<()> {
        match field.kind {
            FieldKind::Text => self.write_text_field(w, field),
            FieldKind::Button if field.checkbox || field.radio => {
                self.write_checkbox_field(w, field)
            },
            FieldKind::Choice => self.write_dropdown_field(w, field),
            FieldKind::Button => {
                // Push buttons have no legacy form construct; the field
                // becomes inert in the output.
                log::debug!("skipping push-button field {}", field.name);
                Ok(())
            },
        }
    }

    fn write_field_begin(
        &mut self,
        w: &mut XmlWriter,
        field: &FormField,
        write_inner: impl FnOnce(&mut XmlWriter) -> Result<()>,
    ) -> Result<()> {
        let name = sanitize_field_name(&field.name);
        open(w, "w:r", &[])?;
        open(w, "w:fldChar", &[("w:fldCharType", "begin")])?;
        open(w, "w:ffData", &[])?;
        empty(w, "w:name", &[("w:val", name.as_str())])?;
        if field.read_only {
            empty(w, "w:enabled", &[("w:val", "0")])?;
        } else {
            empty(w, "w:enabled", &[])?;
        }
        write_inner(w)?;
        close(w, "w:ffData")?;
        close(w, "w:fldChar")?;
        close(w, "w:r")?;
        Ok(())
    }

    fn write_instr(&mut self, w: &mut XmlWriter, instruction: &str) -> Result<()> {
        open(w, "w:r", &[])?;
        open(w, "w:instrText", &[("xml:space", "preserve")])?;
        write_text(w, instruction)?;
        close(w, "w:instrText")?;
        close(w, "w:r")?;
        Ok(())
    }

    fn write_field_end(&mut self, w: &mut XmlWriter) -> Result<()> {
        open(w, "w:r", &[])?;
        empty(w, "w:fldChar", &[("w:fldCharType", "end")])?;
        close(w, "w:r")?;
        Ok(())
    }

    fn write_text_field(&mut self, w: &mut XmlWriter, field: &FormField) -> Result<()> {
        let max_length = field.max_length;
        self.write_field_begin(w, field, |w| {
            open(w, "w:textInput", &[])?;
            if let Some(max) = max_length {
                let value = max.to_string();
                empty(w, "w:maxLength", &[("w:val", value.as_str())])?;
            }
            close(w, "w:textInput")?;
            Ok(())
        })?;
        self.write_instr(w, " FORMTEXT ")?;

        open(w, "w:r", &[])?;
        empty(w, "w:fldChar", &[("w:fldCharType", "separate")])?;
        close(w, "w:r")?;

        // An empty value still needs visible width in the rendered field.
        let display = if field.value.is_empty() {
            "     ".to_string()
        } else {
            field.value.clone()
        };
        open(w, "w:r", &[])?;
        open(w, "w:t", &[("xml:space", "preserve")])?;
        write_text(w, &display)?;
        close(w, "w:t")?;
        close(w, "w:r")?;

        self.write_field_end(w)?;
        Ok(())
    }

    fn write_checkbox_field(&mut self, w: &mut XmlWriter, field: &FormField) -> Result<()> {
        let checked = matches!(
            field.value.to_lowercase().as_str(),
            "yes" | "on" | "1" | "true" | "checked"
        );
        self.write_field_begin(w, field, |w| {
            open(w, "w:checkBox", &[])?;
            empty(w, "w:sizeAuto", &[])?;
            let default = if checked { "1" } else { "0" };
            empty(w, "w:default", &[("w:val", default)])?;
            close(w, "w:checkBox")?;
            Ok(())
        })?;
        self.write_instr(w, " FORMCHECKBOX ")?;
        self.write_field_end(w)?;
        Ok(())
    }

    fn write_dropdown_field(&mut self, w: &mut XmlWriter, field: &FormField) -> Result<()> {
        let options = field.options.clone();
        let selected = options.iter().position(|o| *o == field.value);
        self.write_field_begin(w, field, |w| {
            open(w, "w:ddList", &[])?;
            if let Some(index) = selected {
                let value = index.to_string();
                empty(w, "w:result", &[("w:val", value.as_str())])?;
            }
            for option in &options {
                empty(w, "w:listEntry", &[("w:val", option.as_str())])?;
            }
            close(w, "w:ddList")?;
            Ok(())
        })?;
        self.write_instr(w, " FORMDROPDOWN ")?;
        self.write_field_end(w)?;
        Ok(())
    }

    // --- section properties ---

    fn write_section_properties(
        &mut self,
        w: &mut XmlWriter,
        layouts: &[PageLayout],
    ) -> Result<()> {
        let (page_width, page_height) = layouts
            .first()
            .map(|p| (p.width, p.height))
            .unwrap_or((612.0, 792.0));

        let mut margins = Vec::new();
        for page in layouts {
            if let Some(bounds) = page.content_bounds {
                margins.push((
                    bounds.top().max(0.0),
                    (page.width - bounds.right()).max(0.0),
                    (page.height - bounds.bottom()).max(0.0),
                    bounds.left().max(0.0),
                ));
            }
        }
        let (top, right, bottom, left) = if margins.is_empty() {
            (1440, 1440, 1440, 1440)
        } else {
            let n = margins.len() as f32;
            let sum = margins.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, m| {
                (acc.0 + m.0, acc.1 + m.1, acc.2 + m.2, acc.3 + m.3)
            });
            (
                pt_to_twips(sum.0 / n),
                pt_to_twips(sum.1 / n),
                pt_to_twips(sum.2 / n),
                pt_to_twips(sum.3 / n),
            )
        };

        open(w, "w:sectPr", &[])?;
        let width_attr = pt_to_twips(page_width).to_string();
        let height_attr = pt_to_twips(page_height).to_string();
        empty(
            w,
            "w:pgSz",
            &[("w:w", width_attr.as_str()), ("w:h", height_attr.as_str())],
        )?;
        let (top, right, bottom, left) = (
            top.to_string(),
            right.to_string(),
            bottom.to_string(),
            left.to_string(),
        );
        empty(
            w,
            "w:pgMar",
            &[
                ("w:top", top.as_str()),
                ("w:right", right.as_str()),
                ("w:bottom", bottom.as_str()),
                ("w:left", left.as_str()),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        close(w, "w:sectPr")?;
        Ok(())
    }
}

/// Inferred paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// First-line or hanging indent, in points.
#[derive(Debug, Clone, Copy)]
enum Indent {
    FirstLine(f32),
    Hanging(f32),
}

fn variance(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

fn line_left(line: &[TextElement]) -> f32 {
    line.iter().map(|t| t.x).fold(f32::INFINITY, f32::min)
}

fn line_right(line: &[TextElement]) -> f32 {
    line.iter()
        .map(|t| t.x + t.width)
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Alignment from the statistical variance of line edges. A single line
/// gives no signal and stays left-aligned.
fn infer_alignment(paragraph: &ParagraphGroup, config: &LayoutConfig) -> Alignment {
    if paragraph.lines.len() < 2 {
        return Alignment::Left;
    }
    let lefts: Vec<f32> = paragraph.lines.iter().map(|l| line_left(l)).collect();
    let rights: Vec<f32> = paragraph.lines.iter().map(|l| line_right(l)).collect();
    let mids: Vec<f32> = lefts
        .iter()
        .zip(&rights)
        .map(|(l, r)| (l + r) / 2.0)
        .collect();

    let threshold = config.alignment_variance_threshold;
    let left_low = variance(&lefts) < threshold;
    let right_low = variance(&rights) < threshold;
    let mid_low = variance(&mids) < threshold;

    if left_low && right_low {
        Alignment::Justify
    } else if left_low {
        Alignment::Left
    } else if right_low {
        Alignment::Right
    } else if mid_low {
        Alignment::Center
    } else {
        Alignment::Left
    }
}

/// First-line indent when the first line starts deeper than the rest,
/// hanging indent when it starts shallower.
fn infer_indent(paragraph: &ParagraphGroup, config: &LayoutConfig) -> Option<Indent> {
    if paragraph.lines.len() < 2 {
        return None;
    }
    let first = line_left(&paragraph.lines[0]);
    let rest: Vec<f32> = paragraph.lines[1..].iter().map(|l| line_left(l)).collect();
    let rest_mean = rest.iter().sum::<f32>() / rest.len() as f32;
    let offset = first - rest_mean;
    if offset > config.indent_threshold {
        Some(Indent::FirstLine(offset))
    } else if offset < -config.indent_threshold {
        Some(Indent::Hanging(-offset))
    } else {
        None
    }
}

/// Word caps form-field names at 20 characters; keep the last dot segment,
/// drop array-index brackets.
fn sanitize_field_name(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    let mut out = String::new();
    let mut in_brackets = false;
    for c in last.chars() {
        match c {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ if !in_brackets => out.push(c),
            _ => {},
        }
    }
    out.chars().take(20).collect()
}
