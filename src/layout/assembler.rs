//! Per-page layout assembly.
//!
//! Orchestrates the detection stages for one page: rectangle classification,
//! vector table detection, the spatial form-field fallback, paragraph
//! grouping over whatever content is left, then images, merged into a single
//! reading-order sequence.

use crate::config::LayoutConfig;
use crate::geometry::Rect;
use crate::layout::field_table_detector::FieldTableDetector;
use crate::layout::paragraph::{ParagraphGroup, ParagraphGrouper};
use crate::layout::rect_classifier::{classify_rect, RectRole};
use crate::layout::table_detector::{assign_table_content, DetectedTable, TableDetector};
use crate::scene::{FormField, ImageElement, PageScene, RectElement, TextElement};

/// One element of a page's reconstructed content, in reading order.
#[derive(Debug, Clone)]
pub enum LayoutElement {
    /// A detected table
    Table(DetectedTable),
    /// A paragraph
    Paragraph(ParagraphGroup),
    /// An image placement
    Image(ImageElement),
    /// Two side-by-side column bands of paragraphs
    TwoColumn {
        /// Paragraphs of the left band, top to bottom
        left: Vec<ParagraphGroup>,
        /// Paragraphs of the right band, top to bottom
        right: Vec<ParagraphGroup>,
        /// Bounding box over both bands
        bbox: Rect,
    },
}

impl LayoutElement {
    /// Bounding box of this element, used for reading-order sorting and
    /// content-bounds accumulation.
    pub fn bbox(&self, config: &LayoutConfig) -> Rect {
        match self {
            LayoutElement::Table(t) => t.bbox,
            LayoutElement::Paragraph(p) => Rect::from_points(
                p.x,
                p.y,
                p.right_edge.max(p.x),
                p.bottom(config).max(p.y),
            ),
            LayoutElement::Image(i) => i.bbox,
            LayoutElement::TwoColumn { bbox, .. } => *bbox,
        }
    }
}

/// One page's reconstructed content.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Elements in reading order
    pub elements: Vec<LayoutElement>,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Union of all element bounds; used downstream for margin inference
    pub content_bounds: Option<Rect>,
}

impl PageLayout {
    /// Whether any element on this page carries a form field.
    pub fn has_form_fields(&self) -> bool {
        self.elements.iter().any(|e| match e {
            LayoutElement::Table(t) => t.cells.iter().any(|c| !c.fields.is_empty()),
            LayoutElement::Paragraph(p) => !p.fields.is_empty(),
            LayoutElement::TwoColumn { left, right, .. } => {
                left.iter().chain(right).any(|p| !p.fields.is_empty())
            },
            LayoutElement::Image(_) => false,
        })
    }
}

/// Assembles one [`PageLayout`] per input scene.
pub struct LayoutAssembler<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutAssembler<'a> {
    /// Create an assembler over the given configuration.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Reconstruct one page. Tables claim content first, paragraphs absorb
    /// what remains, then images are merged in by position.
    pub fn assemble(&self, scene: &PageScene) -> PageLayout {
        let texts: Vec<TextElement> = scene.texts().cloned().collect();
        let rects: Vec<RectElement> = scene.rects().cloned().collect();
        let fields: Vec<FormField> = scene.form_fields.clone();

        let mut borders = Vec::new();
        let mut fills = Vec::new();
        let mut separators = Vec::new();
        for rect in &rects {
            match classify_rect(rect, scene.width, scene.height, self.config) {
                RectRole::TableBorder => borders.push(rect.clone()),
                RectRole::CellFill => fills.push(rect.clone()),
                RectRole::Separator => separators.push(rect.clone()),
                RectRole::PageBackground | RectRole::Decorative => {},
            }
        }

        let mut tables = TableDetector::new(self.config).detect(&borders, &fills);

        let mut text_used = vec![false; texts.len()];
        let mut field_used = vec![false; fields.len()];
        for table in &mut tables {
            let (t_idx, f_idx) = assign_table_content(table, &texts, &fields);
            for i in t_idx {
                text_used[i] = true;
            }
            for i in f_idx {
                field_used[i] = true;
            }
        }

        // Spatial fallback only when vector detection found nothing.
        if tables.is_empty() {
            let spatial = FieldTableDetector::new(self.config).detect(&fields, &texts);
            for i in &spatial.consumed_fields {
                field_used[*i] = true;
            }
            for i in &spatial.consumed_texts {
                text_used[*i] = true;
            }
            tables.extend(spatial.tables);
        }

        let free_texts: Vec<TextElement> = texts
            .iter()
            .zip(&text_used)
            .filter(|(_, used)| !**used)
            .map(|(t, _)| t.clone())
            .collect();
        let free_fields: Vec<FormField> = fields
            .iter()
            .zip(&field_used)
            .filter(|(_, used)| !**used)
            .map(|(f, _)| f.clone())
            .collect();

        let mut elements: Vec<LayoutElement> = Vec::new();
        elements.extend(tables.into_iter().map(LayoutElement::Table));
        elements.extend(self.group_free_content(
            &free_texts,
            &free_fields,
            scene.width,
            &fills,
            &separators,
        ));
        elements.extend(scene.images().cloned().map(LayoutElement::Image));

        elements.sort_by(|a, b| {
            let ba = a.bbox(self.config);
            let bb = b.bbox(self.config);
            (ba.y, ba.x)
                .partial_cmp(&(bb.y, bb.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let content_bounds = elements
            .iter()
            .map(|e| e.bbox(self.config))
            .reduce(|a, b| a.union(&b));

        PageLayout {
            elements,
            width: scene.width,
            height: scene.height,
            content_bounds,
        }
    }

    /// Group non-table content into paragraph elements, folding clean
    /// two-band pages into a two-column region.
    fn group_free_content(
        &self,
        texts: &[TextElement],
        fields: &[FormField],
        page_width: f32,
        fills: &[RectElement],
        separators: &[RectElement],
    ) -> Vec<LayoutElement> {
        let grouper = ParagraphGrouper::new(self.config);

        if let Some((lt, rt)) = self.split_column_bands(texts, page_width) {
            let cx = page_width / 2.0;
            let (lf, rf): (Vec<FormField>, Vec<FormField>) = fields
                .iter()
                .cloned()
                .partition(|f| f.rect.center().x < cx);

            let mut left = grouper.group(&lt, &lf);
            let mut right = grouper.group(&rt, &rf);
            if left.len() >= 2 && right.len() >= 2 {
                self.attach_rect_hints(&mut left, fills, separators);
                self.attach_rect_hints(&mut right, fills, separators);
                let bbox = left
                    .iter()
                    .chain(&right)
                    .map(|p| {
                        Rect::from_points(p.x, p.y, p.right_edge.max(p.x), p.bottom(self.config))
                    })
                    .reduce(|a, b| a.union(&b))
                    .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
                return vec![LayoutElement::TwoColumn { left, right, bbox }];
            }
        }

        let mut paragraphs = grouper.group(texts, fields);
        self.attach_rect_hints(&mut paragraphs, fills, separators);
        paragraphs
            .into_iter()
            .map(LayoutElement::Paragraph)
            .collect()
    }

    /// Partition the page's free text into left/right column bands, when
    /// every run sits cleanly on one side of the page center and the bands
    /// are separated by a real gutter.
    fn split_column_bands(
        &self,
        texts: &[TextElement],
        page_width: f32,
    ) -> Option<(Vec<TextElement>, Vec<TextElement>)> {
        if texts.len() < 4 {
            return None;
        }
        let cx = page_width / 2.0;
        let mut left = Vec::new();
        let mut right = Vec::new();
        for t in texts {
            let b = t.bbox();
            if b.right() <= cx {
                left.push(t.clone());
            } else if b.left() >= cx {
                right.push(t.clone());
            } else {
                // A run spanning the center: not a two-column page.
                return None;
            }
        }
        if left.len() < 2 || right.len() < 2 {
            return None;
        }
        let gutter_left = left
            .iter()
            .map(|t| t.bbox().right())
            .fold(f32::NEG_INFINITY, f32::max);
        let gutter_right = right
            .iter()
            .map(|t| t.bbox().left())
            .fold(f32::INFINITY, f32::min);
        if gutter_right - gutter_left < self.config.column_gap_min {
            return None;
        }
        Some((left, right))
    }

    /// Paragraph-level hints carried by rectangles: a fill behind the
    /// paragraph becomes its background, a separator directly underneath
    /// becomes its bottom border.
    fn attach_rect_hints(
        &self,
        paragraphs: &mut [ParagraphGroup],
        fills: &[RectElement],
        separators: &[RectElement],
    ) {
        for p in paragraphs.iter_mut() {
            let extent = Rect::from_points(p.x, p.y, p.right_edge.max(p.x), p.bottom(self.config));

            p.background = fills
                .iter()
                .find(|f| f.bbox().contains_point(&extent.center()))
                .and_then(|f| f.fill_color);

            p.bottom_border = separators
                .iter()
                .find(|s| {
                    let b = s.bbox();
                    let below = b.center().y - extent.bottom();
                    (0.0..=6.0).contains(&below)
                        && b.left() < extent.right()
                        && b.right() > extent.left()
                })
                .map(|s| {
                    (
                        s.stroke_color.or(s.fill_color),
                        s.bbox().height.max(s.stroke_width),
                    )
                });
        }
    }
}
