//! Layout reconstruction.
//!
//! Turns a flat page scene into structured content: rectangles are
//! classified by role, vector-bordered tables are fitted to a grid,
//! form-heavy pages fall back to spatial alignment, and the remaining
//! text is grouped into paragraphs. [`assembler`] ties the stages
//! together into one reading-order sequence per page.

pub mod assembler;
pub mod field_table_detector;
pub mod paragraph;
pub mod rect_classifier;
pub mod table_detector;

pub use assembler::{LayoutAssembler, LayoutElement, PageLayout};
pub use field_table_detector::FieldTableDetector;
pub use paragraph::{ParagraphGroup, ParagraphGrouper};
pub use rect_classifier::{classify_rect, RectRole};
pub use table_detector::{
    assign_table_content, CellBorderLine, CellBorders, CellVAlign, DetectedCell, DetectedTable,
    TableDetector,
};
