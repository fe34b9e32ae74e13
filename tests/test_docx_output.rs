//! Integration tests for DOCX package output.

use docx_oxide::config::LayoutConfig;
use docx_oxide::docx::DocxConverter;
use docx_oxide::geometry::Rect;
use docx_oxide::layout::{
    CellBorders, CellVAlign, DetectedCell, DetectedTable, LayoutElement, PageLayout,
};
use docx_oxide::scene::{
    Color, FieldKind, FormField, ImageElement, PackagedImage, PageScene, RectElement,
    SceneElement, TextElement,
};
use quick_xml::events::Event;
use quick_xml::Reader;

fn mock_text(s: &str, x: f32, y: f32, font_size: f32, bold: bool) -> TextElement {
    TextElement {
        text: s.to_string(),
        x,
        y,
        width: s.len() as f32 * font_size * 0.5,
        height: font_size,
        font_name: "Arial".to_string(),
        font_size,
        bold,
        italic: false,
        color: Color::black(),
        underline: false,
        strikethrough: false,
        rotation: 0.0,
        superscript_offset: 0.0,
        language: None,
        hyperlink: None,
    }
}

fn mock_border(x: f32, y: f32, w: f32, h: f32) -> SceneElement {
    SceneElement::Rect(RectElement {
        x,
        y,
        width: w,
        height: h,
        fill_color: None,
        stroke_color: Some(Color::black()),
        stroke_width: 0.5,
    })
}

/// Count start/empty elements with the given local name in an XML part.
fn count_elements(xml: &str, local_name: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == local_name.as_bytes() {
                    count += 1;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {},
        }
        buf.clear();
    }
    count
}

/// A page holding a bordered 2x2 grid with one text per cell.
fn scene_with_2x2_table() -> PageScene {
    let mut scene = PageScene::new(612.0, 792.0);
    scene.elements.push(mock_border(50.0, 50.0, 100.0, 40.0));
    scene.elements.push(mock_border(150.0, 50.0, 100.0, 40.0));
    scene.elements.push(mock_border(50.0, 90.0, 100.0, 40.0));
    scene.elements.push(mock_border(150.0, 90.0, 100.0, 40.0));
    for (i, (x, y)) in [(60.0, 60.0), (160.0, 60.0), (60.0, 100.0), (160.0, 100.0)]
        .iter()
        .enumerate()
    {
        scene
            .elements
            .push(SceneElement::Text(mock_text(&format!("c{}", i), *x, *y, 10.0, false)));
    }
    scene
}

#[test]
fn test_round_trip_cell_count() {
    // A 2x2 table with no merges must re-parse to rows * cols cells.
    let converter = DocxConverter::new();
    let package = converter.convert(&[scene_with_2x2_table()], &[]).unwrap();
    let document = package.part_str("word/document.xml").unwrap();

    assert_eq!(count_elements(document, "tbl"), 1);
    assert_eq!(count_elements(document, "tr"), 2);
    assert_eq!(count_elements(document, "tc"), 4);
    assert_eq!(count_elements(document, "gridCol"), 2);
}

#[test]
fn test_table_geometry_in_twips() {
    let converter = DocxConverter::new();
    let package = converter.convert(&[scene_with_2x2_table()], &[]).unwrap();
    let document = package.part_str("word/document.xml").unwrap();

    // 100pt columns, 40pt rows.
    assert!(document.contains("<w:gridCol w:w=\"2000\"/>"));
    assert!(document.contains("<w:trHeight w:val=\"800\"/>"));
}

#[test]
fn test_normal_style_elected_from_dominant_run() {
    let mut scene = PageScene::new(612.0, 792.0);
    for i in 0..5 {
        scene.elements.push(SceneElement::Text(mock_text(
            "plain body text",
            72.0,
            100.0 + i as f32 * 40.0,
            12.0,
            false,
        )));
    }
    scene.elements.push(SceneElement::Text(mock_text(
        "bolded",
        72.0,
        320.0,
        12.0,
        true,
    )));

    let converter = DocxConverter::new();
    let package = converter.convert(&[scene], &[]).unwrap();

    let styles = package.part_str("word/styles.xml").unwrap();
    assert!(styles.contains("w:ascii=\"Arial\""));
    assert!(styles.contains("<w:sz w:val=\"24\"/>"));
    // Exactly one explicit character style: the bold variant.
    assert_eq!(count_elements(styles, "style") - styles_without_character(styles), 1);

    let document = package.part_str("word/document.xml").unwrap();
    assert_eq!(count_elements(document, "rPr"), 1);
}

/// Number of non-character style definitions (Normal, headings, lists).
fn styles_without_character(xml: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                let is_character = e.attributes().flatten().any(|a| {
                    a.key.local_name().as_ref() == b"type" && a.value.as_ref() == b"character"
                });
                if !is_character {
                    count += 1;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {},
        }
        buf.clear();
    }
    count
}

#[test]
fn test_form_fields_enable_document_protection() {
    let mut scene = PageScene::new(612.0, 792.0);
    scene.form_fields.push(FormField {
        kind: FieldKind::Text,
        name: "name".to_string(),
        value: String::new(),
        options: Vec::new(),
        rect: Rect::new(100.0, 100.0, 120.0, 14.0),
        max_length: None,
        read_only: false,
        checkbox: false,
        radio: false,
    });

    let converter = DocxConverter::new();
    let package = converter.convert(&[scene], &[]).unwrap();

    let settings = package.part_str("word/settings.xml").unwrap();
    assert!(settings.contains("w:edit=\"forms\""));

    let document = package.part_str("word/document.xml").unwrap();
    assert!(document.contains(" FORMTEXT "));
}

#[test]
fn test_no_fields_no_protection() {
    let converter = DocxConverter::new();
    let package = converter.convert(&[scene_with_2x2_table()], &[]).unwrap();
    let settings = package.part_str("word/settings.xml").unwrap();
    assert!(!settings.contains("documentProtection"));
}

#[test]
fn test_embedded_image_parts_and_relationships() {
    let mut scene = PageScene::new(612.0, 792.0);
    scene.elements.push(SceneElement::Image(ImageElement {
        resource_id: "logo".to_string(),
        bbox: Rect::new(100.0, 100.0, 144.0, 72.0),
        pixel_width: Some(300),
        pixel_height: Some(150),
    }));
    let images = vec![PackagedImage {
        resource_id: "logo".to_string(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
        extension: "png".to_string(),
    }];

    let converter = DocxConverter::new();
    let package = converter.convert(&[scene], &images).unwrap();

    assert_eq!(
        package.part("word/media/image1.png"),
        Some(&[0x89u8, 0x50, 0x4E, 0x47][..])
    );

    let rels = package.part_str("word/_rels/document.xml.rels").unwrap();
    assert!(rels.contains("Id=\"rId4\""));
    assert!(rels.contains("Target=\"media/image1.png\""));

    let content_types = package.part_str("[Content_Types].xml").unwrap();
    assert!(content_types.contains("Extension=\"png\""));

    let document = package.part_str("word/document.xml").unwrap();
    assert!(document.contains("r:embed=\"rId4\""));
}

#[test]
fn test_missing_image_bytes_skip_placement() {
    let mut scene = PageScene::new(612.0, 792.0);
    scene.elements.push(SceneElement::Image(ImageElement {
        resource_id: "gone".to_string(),
        bbox: Rect::new(100.0, 100.0, 144.0, 72.0),
        pixel_width: None,
        pixel_height: None,
    }));

    let converter = DocxConverter::new();
    let package = converter.convert(&[scene], &[]).unwrap();

    let document = package.part_str("word/document.xml").unwrap();
    assert_eq!(count_elements(document, "drawing"), 0);
    assert!(package.part("word/media/image1.png").is_none());
}

#[test]
fn test_row_span_serializes_as_merge_continuation() {
    let mock_cell = |row: usize, col: usize, row_span: usize| DetectedCell {
        row,
        col,
        row_span,
        col_span: 1,
        bbox: Rect::new(col as f32 * 100.0, row as f32 * 50.0, 100.0, 50.0 * row_span as f32),
        fill_color: None,
        borders: CellBorders::default(),
        padding: None,
        valign: CellVAlign::Top,
        texts: Vec::new(),
        fields: Vec::new(),
    };
    let table = DetectedTable {
        rows: 2,
        cols: 2,
        column_widths: vec![100.0, 100.0],
        row_heights: vec![50.0, 50.0],
        bbox: Rect::new(0.0, 0.0, 200.0, 100.0),
        cells: vec![mock_cell(0, 0, 2), mock_cell(0, 1, 1), mock_cell(1, 1, 1)],
    };
    let layout = PageLayout {
        elements: vec![LayoutElement::Table(table)],
        width: 612.0,
        height: 792.0,
        content_bounds: Some(Rect::new(0.0, 0.0, 200.0, 100.0)),
    };

    let converter = DocxConverter::with_config(LayoutConfig::default());
    let package = converter.serialize(&[layout], &[]).unwrap();
    let document = package.part_str("word/document.xml").unwrap();

    assert!(document.contains("<w:vMerge w:val=\"restart\"/>"));
    assert!(document.contains("<w:vMerge/>"));
    // Both rows stay structurally complete.
    assert_eq!(count_elements(document, "tr"), 2);
    assert_eq!(count_elements(document, "tc"), 4);
}

/// A 1x1 table whose single cell holds the given texts.
fn single_cell_table(texts: Vec<TextElement>) -> PageLayout {
    let table = DetectedTable {
        rows: 1,
        cols: 1,
        column_widths: vec![200.0],
        row_heights: vec![50.0],
        bbox: Rect::new(0.0, 0.0, 200.0, 50.0),
        cells: vec![DetectedCell {
            row: 0,
            col: 0,
            row_span: 1,
            col_span: 1,
            bbox: Rect::new(0.0, 0.0, 200.0, 50.0),
            fill_color: None,
            borders: CellBorders::default(),
            padding: None,
            valign: CellVAlign::Top,
            texts,
            fields: Vec::new(),
        }],
    };
    PageLayout {
        elements: vec![LayoutElement::Table(table)],
        width: 612.0,
        height: 792.0,
        content_bounds: Some(Rect::new(0.0, 0.0, 200.0, 50.0)),
    }
}

#[test]
fn test_rotated_text_in_cell_becomes_drawing() {
    let mut text = mock_text("sideways", 10.0, 10.0, 10.0, false);
    text.rotation = 90.0;

    let converter = DocxConverter::with_config(LayoutConfig::default());
    let package = converter
        .serialize(&[single_cell_table(vec![text])], &[])
        .unwrap();
    let document = package.part_str("word/document.xml").unwrap();

    assert!(document.contains("<wps:wsp>"));
    assert!(document.contains("rot=\"5400000\""));
    // The run must not also appear as plain cell text.
    assert_eq!(count_elements(document, "hyperlink"), 0);
}

#[test]
fn test_hyperlink_in_cell_keeps_wrapper_and_relationship() {
    let mut text = mock_text("details", 10.0, 10.0, 10.0, false);
    text.hyperlink = Some("https://example.com/details".to_string());

    let converter = DocxConverter::with_config(LayoutConfig::default());
    let package = converter
        .serialize(&[single_cell_table(vec![text])], &[])
        .unwrap();
    let document = package.part_str("word/document.xml").unwrap();
    let rels = package.part_str("word/_rels/document.xml.rels").unwrap();

    assert!(document.contains("<w:hyperlink r:id=\"rId4\">"));
    assert!(rels.contains("Target=\"https://example.com/details\""));
    assert!(rels.contains("TargetMode=\"External\""));
}

#[test]
fn test_font_table_lists_used_fonts() {
    let converter = DocxConverter::new();
    let package = converter.convert(&[scene_with_2x2_table()], &[]).unwrap();
    let fonts = package.part_str("word/fontTable.xml").unwrap();

    assert!(fonts.contains("w:name=\"Arial\""));
    assert!(fonts.contains("<w:family w:val=\"swiss\"/>"));
    assert!(fonts.contains("w:name=\"Calibri\""));
}
