//! Spatial form-field table detection.
//!
//! Fallback strategy for pages that lay out input fields in a grid without
//! drawing any vector borders: when enough text-input fields share row and
//! column alignment, an equivalent table grid is synthesized from the field
//! positions alone, optionally capturing a text header row found directly
//! above the fields.

use crate::config::LayoutConfig;
use crate::geometry::Rect;
use crate::layout::table_detector::{CellBorders, CellVAlign, DetectedCell, DetectedTable};
use crate::scene::{FormField, TextElement};

/// Result of spatial detection: the synthesized tables plus the indices of
/// the scene fields and texts they consumed.
#[derive(Debug, Default)]
pub struct SpatialTables {
    /// Synthesized tables in reading order
    pub tables: Vec<DetectedTable>,
    /// Indices into the input field slice that were consumed
    pub consumed_fields: Vec<usize>,
    /// Indices into the input text slice consumed as header labels
    pub consumed_texts: Vec<usize>,
}

/// A row of vertically-aligned fields (indices into the input slice).
#[derive(Debug, Clone)]
struct FieldRow {
    fields: Vec<usize>,
    top: f32,
    bottom: f32,
}

/// Synthesizes table grids from aligned text-input form fields.
pub struct FieldTableDetector<'a> {
    config: &'a LayoutConfig,
}

impl<'a> FieldTableDetector<'a> {
    /// Create a detector over the given configuration.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Detect field tables. Caller must only invoke this when vector table
    /// detection found nothing on the page.
    pub fn detect(&self, fields: &[FormField], texts: &[TextElement]) -> SpatialTables {
        let mut result = SpatialTables::default();

        let inputs: Vec<usize> = (0..fields.len())
            .filter(|&i| fields[i].is_text_input())
            .collect();
        if inputs.len() < self.config.min_spatial_fields {
            return result;
        }

        let rows = self.cluster_rows(fields, &inputs);
        let mut row_consumed = vec![false; rows.len()];

        // Maximal runs of ≥ 2 consecutive rows with the same field count and
        // matching start positions.
        let mut i = 0;
        while i < rows.len() {
            let n = rows[i].fields.len();
            if n < 2 {
                i += 1;
                continue;
            }
            let mut end = i + 1;
            while end < rows.len()
                && rows[end].fields.len() == n
                && self.starts_aligned(fields, &rows[i], &rows[end])
            {
                end += 1;
            }
            if end - i >= 2 {
                let run: Vec<&FieldRow> = rows[i..end].iter().collect();
                let header = self.find_header_row(fields, texts, run[0], &result.consumed_texts);
                result
                    .tables
                    .push(self.build_table(fields, texts, &run, header.as_deref()));
                for row in &rows[i..end] {
                    result.consumed_fields.extend(row.fields.iter().copied());
                }
                if let Some(h) = &header {
                    result.consumed_texts.extend(h.iter().copied());
                }
                for flag in &mut row_consumed[i..end] {
                    *flag = true;
                }
                i = end;
            } else {
                i += 1;
            }
        }

        // A single aligned row of ≥ 2 fields qualifies when a matching text
        // header row sits directly above it.
        for (idx, row) in rows.iter().enumerate() {
            if row_consumed[idx] || row.fields.len() < 2 {
                continue;
            }
            if let Some(header) = self.find_header_row(fields, texts, row, &result.consumed_texts) {
                let run = vec![row];
                result
                    .tables
                    .push(self.build_table(fields, texts, &run, Some(&header)));
                result.consumed_fields.extend(row.fields.iter().copied());
                result.consumed_texts.extend(header.iter().copied());
                row_consumed[idx] = true;
            }
        }

        // Leftover pairs of adjacent 2-field rows become simple 2-column
        // tables (the common "label: value" side-by-side layout).
        let mut idx = 0;
        while idx + 1 < rows.len() {
            if !row_consumed[idx]
                && !row_consumed[idx + 1]
                && rows[idx].fields.len() == 2
                && rows[idx + 1].fields.len() == 2
            {
                let run = vec![&rows[idx], &rows[idx + 1]];
                result.tables.push(self.build_table(fields, texts, &run, None));
                result
                    .consumed_fields
                    .extend(rows[idx].fields.iter().chain(&rows[idx + 1].fields));
                row_consumed[idx] = true;
                row_consumed[idx + 1] = true;
                idx += 2;
            } else {
                idx += 1;
            }
        }

        result.tables.sort_by(|a, b| {
            (a.bbox.y, a.bbox.x)
                .partial_cmp(&(b.bbox.y, b.bbox.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        result
    }

    /// Cluster fields into rows by vertical-center proximity, top to bottom,
    /// each row's fields sorted left to right.
    fn cluster_rows(&self, fields: &[FormField], inputs: &[usize]) -> Vec<FieldRow> {
        let mut by_y: Vec<usize> = inputs.to_vec();
        by_y.sort_by(|&a, &b| {
            fields[a]
                .rect
                .center()
                .y
                .partial_cmp(&fields[b].rect.center().y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut sum = 0.0f32;
        for &idx in &by_y {
            let cy = fields[idx].rect.center().y;
            match rows.last_mut() {
                Some(row) if (cy - sum / row.len() as f32).abs() <= self.config.field_row_tolerance => {
                    row.push(idx);
                    sum += cy;
                },
                _ => {
                    rows.push(vec![idx]);
                    sum = cy;
                },
            }
        }

        rows.into_iter()
            .map(|mut row| {
                row.sort_by(|&a, &b| {
                    fields[a]
                        .rect
                        .x
                        .partial_cmp(&fields[b].rect.x)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                let top = row
                    .iter()
                    .map(|&i| fields[i].rect.top())
                    .fold(f32::INFINITY, f32::min);
                let bottom = row
                    .iter()
                    .map(|&i| fields[i].rect.bottom())
                    .fold(f32::NEG_INFINITY, f32::max);
                FieldRow {
                    fields: row,
                    top,
                    bottom,
                }
            })
            .collect()
    }

    /// Do two rows' field start positions match column-for-column?
    fn starts_aligned(&self, fields: &[FormField], a: &FieldRow, b: &FieldRow) -> bool {
        a.fields.len() == b.fields.len()
            && a.fields.iter().zip(&b.fields).all(|(&fa, &fb)| {
                (fields[fa].rect.x - fields[fb].rect.x).abs() <= self.config.field_col_tolerance
            })
    }

    /// Look for one label text per column directly above `row`.
    ///
    /// A label must sit within the vertical search band above the row's top,
    /// be horizontally centered within its column (± the column tolerance),
    /// and have a font size within 20% of the candidate set's median so an
    /// unrelated section heading does not pass as a column label.
    fn find_header_row(
        &self,
        fields: &[FormField],
        texts: &[TextElement],
        row: &FieldRow,
        already_consumed: &[usize],
    ) -> Option<Vec<usize>> {
        let band_top = row.top - self.config.header_search_above;
        let band_bottom = row.top + self.config.header_search_below;

        let candidates: Vec<usize> = (0..texts.len())
            .filter(|i| !already_consumed.contains(i))
            .filter(|&i| {
                let t = &texts[i];
                t.y >= band_top && t.y <= band_bottom && !t.text.trim().is_empty()
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let mut sizes: Vec<f32> = candidates.iter().map(|&i| texts[i].font_size).collect();
        sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = sizes[sizes.len() / 2];

        let mut header = Vec::with_capacity(row.fields.len());
        for &fi in &row.fields {
            let col = fields[fi].rect;
            let label = candidates.iter().copied().find(|&ti| {
                let t = &texts[ti];
                let cx = t.bbox().center().x;
                let centered = cx >= col.left() - self.config.field_col_tolerance
                    && cx <= col.right() + self.config.field_col_tolerance;
                let size_ok =
                    (t.font_size - median).abs() <= self.config.header_font_size_ratio * median;
                centered && size_ok && !header.contains(&ti)
            })?;
            header.push(label);
        }
        Some(header)
    }

    /// Build the grid for one run of rows (plus optional header labels).
    fn build_table(
        &self,
        fields: &[FormField],
        texts: &[TextElement],
        run: &[&FieldRow],
        header: Option<&[usize]>,
    ) -> DetectedTable {
        let cols = run[0].fields.len();

        // Per-column averaged start/end positions across the run.
        let mut starts = vec![0.0f32; cols];
        let mut ends = vec![0.0f32; cols];
        for row in run {
            for (k, &fi) in row.fields.iter().enumerate() {
                starts[k] += fields[fi].rect.left();
                ends[k] += fields[fi].rect.right();
            }
        }
        for k in 0..cols {
            starts[k] /= run.len() as f32;
            ends[k] /= run.len() as f32;
        }

        // Interior boundaries at midpoints; outer boundaries extended to
        // capture label text outside the fields' own bounds.
        let mut col_bounds = Vec::with_capacity(cols + 1);
        let mut left = starts[0];
        let mut right = ends[cols - 1];
        if let Some(labels) = header {
            for &ti in labels {
                left = left.min(texts[ti].bbox().left());
                right = right.max(texts[ti].bbox().right());
            }
        }
        col_bounds.push(left);
        for k in 0..cols - 1 {
            col_bounds.push((ends[k] + starts[k + 1]) / 2.0);
        }
        col_bounds.push(right);

        // Row boundaries: midpoints between adjacent rows' field extents;
        // the header row (when present) is bounded above by its own top.
        let mut row_bounds = Vec::new();
        if let Some(labels) = header {
            let header_top = labels
                .iter()
                .map(|&ti| texts[ti].bbox().top())
                .fold(f32::INFINITY, f32::min);
            row_bounds.push(header_top);
        }
        row_bounds.push(run[0].top);
        for w in run.windows(2) {
            row_bounds.push((w[0].bottom + w[1].top) / 2.0);
        }
        row_bounds.push(run[run.len() - 1].bottom);

        let header_rows = usize::from(header.is_some());
        let rows = run.len() + header_rows;

        let mut cells = Vec::with_capacity(rows * cols);
        if let Some(labels) = header {
            for (k, &ti) in labels.iter().enumerate() {
                cells.push(self.make_cell(0, k, &col_bounds, &row_bounds, vec![texts[ti].clone()], vec![]));
            }
        }
        for (ri, row) in run.iter().enumerate() {
            for (k, &fi) in row.fields.iter().enumerate() {
                cells.push(self.make_cell(
                    ri + header_rows,
                    k,
                    &col_bounds,
                    &row_bounds,
                    vec![],
                    vec![fields[fi].clone()],
                ));
            }
        }

        let bbox = Rect::from_points(
            col_bounds[0],
            row_bounds[0],
            col_bounds[cols],
            row_bounds[rows],
        );
        DetectedTable {
            rows,
            cols,
            column_widths: col_bounds.windows(2).map(|w| w[1] - w[0]).collect(),
            row_heights: row_bounds.windows(2).map(|w| w[1] - w[0]).collect(),
            bbox,
            cells,
        }
    }

    fn make_cell(
        &self,
        row: usize,
        col: usize,
        col_bounds: &[f32],
        row_bounds: &[f32],
        texts: Vec<TextElement>,
        fields: Vec<FormField>,
    ) -> DetectedCell {
        DetectedCell {
            row,
            col,
            row_span: 1,
            col_span: 1,
            bbox: Rect::from_points(
                col_bounds[col],
                row_bounds[row],
                col_bounds[col + 1],
                row_bounds[row + 1],
            ),
            fill_color: None,
            borders: CellBorders::default(),
            padding: None,
            valign: CellVAlign::Center,
            texts,
            fields,
        }
    }
}
