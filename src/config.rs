//! Configuration for structure detection.
//!
//! Every heuristic threshold used by the detection stages lives here as a
//! named field. The values are empirically chosen against real documents,
//! not derived from a formal model; tune them only with equivalent
//! validation.

/// Tunable thresholds for the detection and grouping stages.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// A rectangle covering more than this fraction of the page area is a
    /// page background.
    pub page_background_area_ratio: f32,

    /// Maximum thickness (points) of a separator rule.
    pub separator_max_thickness: f32,

    /// Minimum fraction of the page dimension a separator must span.
    pub separator_min_span_ratio: f32,

    /// Tolerance (points) when clustering border edges into grid boundaries.
    /// Twice this value is also the maximum gap for two border rectangles to
    /// count as touching during table grouping.
    pub edge_cluster_tolerance: f32,

    /// Minimum fraction of grid cells that must be backed by actual border
    /// geometry for a candidate table to survive verification.
    pub cell_verify_min_ratio: f32,

    /// Maximum baseline difference (points) for two text runs to share a line.
    pub baseline_tolerance: f32,

    /// Line height as a multiple of font size, used to estimate line bottoms.
    pub line_height_factor: f32,

    /// Maximum inter-line gap, as a multiple of the average font size, before
    /// a new paragraph starts.
    pub paragraph_gap_factor: f32,

    /// Relative font-size change between lines that forces a paragraph break.
    pub font_size_change_ratio: f32,

    /// Vertical tolerance (points) when matching a form field to a
    /// paragraph's text extent.
    pub paragraph_field_tolerance: f32,

    /// Minimum number of text-input fields before spatial field-table
    /// detection activates.
    pub min_spatial_fields: usize,

    /// Vertical-center tolerance (points) when clustering fields into rows.
    pub field_row_tolerance: f32,

    /// Horizontal start-position tolerance (points) when matching field
    /// columns across rows.
    pub field_col_tolerance: f32,

    /// Header text may sit from this far above a field row's top edge…
    pub header_search_above: f32,

    /// …down to this far below it (negative = overlapping the field top).
    pub header_search_below: f32,

    /// Maximum relative deviation of a header run's font size from the row
    /// median before it is dismissed as an unrelated section heading.
    pub header_font_size_ratio: f32,

    /// Rotation (degrees) beyond which text is emitted through the
    /// rotated-shape path instead of a plain run.
    pub rotation_threshold: f32,

    /// Edge variance (points squared) under which a paragraph edge counts as
    /// aligned for alignment inference.
    pub alignment_variance_threshold: f32,

    /// First-line offset (points) distinguishing first-line/hanging indents.
    pub indent_threshold: f32,

    /// Minimum horizontal gap (points) between two paragraph bands before a
    /// two-column region is assembled.
    pub column_gap_min: f32,

    /// Font-size multiples of the page median at which single-line
    /// paragraphs become headings (levels 1, 2, 3).
    pub heading_size_ratios: [f32; 3],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create a configuration with the validated default thresholds.
    pub fn new() -> Self {
        Self {
            page_background_area_ratio: 0.90,
            separator_max_thickness: 2.0,
            separator_min_span_ratio: 0.5,
            edge_cluster_tolerance: 2.0,
            cell_verify_min_ratio: 0.5,
            baseline_tolerance: 3.0,
            line_height_factor: 1.2,
            paragraph_gap_factor: 1.5,
            font_size_change_ratio: 0.15,
            paragraph_field_tolerance: 5.0,
            min_spatial_fields: 4,
            field_row_tolerance: 8.0,
            field_col_tolerance: 15.0,
            header_search_above: 30.0,
            header_search_below: 2.0,
            header_font_size_ratio: 0.2,
            rotation_threshold: 5.0,
            alignment_variance_threshold: 4.0,
            indent_threshold: 10.0,
            column_gap_min: 18.0,
            heading_size_ratios: [1.6, 1.45, 1.3],
        }
    }

    /// Override the edge-clustering tolerance.
    pub fn with_edge_cluster_tolerance(mut self, tolerance: f32) -> Self {
        self.edge_cluster_tolerance = tolerance;
        self
    }

    /// Override the baseline tolerance.
    pub fn with_baseline_tolerance(mut self, tolerance: f32) -> Self {
        self.baseline_tolerance = tolerance;
        self
    }

    /// Override the cell-verification ratio.
    pub fn with_cell_verify_min_ratio(mut self, ratio: f32) -> Self {
        self.cell_verify_min_ratio = ratio;
        self
    }
}
