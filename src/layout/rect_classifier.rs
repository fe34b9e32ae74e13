//! Rectangle role classification.
//!
//! Every rectangle primitive on a page plays exactly one visual role; the
//! detection stages downstream key on that role. Classification is a pure
//! mapping over geometry and paint attributes with no error conditions.

use crate::config::LayoutConfig;
use crate::scene::RectElement;

/// Visual role of a rectangle primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RectRole {
    /// Covers (almost) the whole page; a background wash.
    PageBackground,
    /// A thin rule spanning most of a page dimension.
    Separator,
    /// Stroked rectangle that can participate in a table grid.
    TableBorder,
    /// Filled, unstroked rectangle; candidate cell shading.
    CellFill,
    /// Anything else.
    Decorative,
}

/// Classify one rectangle by visual role.
///
/// Rules apply in priority order:
/// 1. area > 90% of the page area → [`RectRole::PageBackground`]
/// 2. one dimension under 2 pt while the other spans over half the page →
///    [`RectRole::Separator`]
/// 3. stroked (stroke color present, stroke width > 0) →
///    [`RectRole::TableBorder`]
/// 4. filled but not stroked → [`RectRole::CellFill`]
/// 5. otherwise [`RectRole::Decorative`]
///
/// Width/height are normalized to non-negative magnitudes first.
pub fn classify_rect(
    rect: &RectElement,
    page_width: f32,
    page_height: f32,
    config: &LayoutConfig,
) -> RectRole {
    let bbox = rect.bbox();

    let page_area = page_width * page_height;
    if page_area > 0.0 && bbox.area() > config.page_background_area_ratio * page_area {
        return RectRole::PageBackground;
    }

    let thin_horizontal = bbox.height < config.separator_max_thickness
        && bbox.width > config.separator_min_span_ratio * page_width;
    let thin_vertical = bbox.width < config.separator_max_thickness
        && bbox.height > config.separator_min_span_ratio * page_height;
    if thin_horizontal || thin_vertical {
        return RectRole::Separator;
    }

    if rect.stroke_color.is_some() && rect.stroke_width > 0.0 {
        return RectRole::TableBorder;
    }

    if rect.fill_color.is_some() && rect.stroke_color.is_none() {
        return RectRole::CellFill;
    }

    RectRole::Decorative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Color;

    fn mock_rect(x: f32, y: f32, w: f32, h: f32) -> RectElement {
        RectElement {
            x,
            y,
            width: w,
            height: h,
            fill_color: None,
            stroke_color: None,
            stroke_width: 0.0,
        }
    }

    fn classify(rect: &RectElement) -> RectRole {
        classify_rect(rect, 612.0, 792.0, &LayoutConfig::default())
    }

    #[test]
    fn test_page_background() {
        let rect = mock_rect(0.0, 0.0, 612.0, 792.0);
        assert_eq!(classify(&rect), RectRole::PageBackground);
    }

    #[test]
    fn test_horizontal_separator() {
        let rect = mock_rect(50.0, 400.0, 500.0, 1.0);
        assert_eq!(classify(&rect), RectRole::Separator);
    }

    #[test]
    fn test_vertical_separator() {
        let rect = mock_rect(300.0, 50.0, 1.5, 700.0);
        assert_eq!(classify(&rect), RectRole::Separator);
    }

    #[test]
    fn test_table_border() {
        let mut rect = mock_rect(100.0, 100.0, 200.0, 50.0);
        rect.stroke_color = Some(Color::black());
        rect.stroke_width = 0.5;
        assert_eq!(classify(&rect), RectRole::TableBorder);
    }

    #[test]
    fn test_zero_width_stroke_is_not_border() {
        let mut rect = mock_rect(100.0, 100.0, 200.0, 50.0);
        rect.stroke_color = Some(Color::black());
        rect.stroke_width = 0.0;
        assert_eq!(classify(&rect), RectRole::Decorative);
    }

    #[test]
    fn test_cell_fill() {
        let mut rect = mock_rect(100.0, 100.0, 200.0, 50.0);
        rect.fill_color = Some(Color::new(220, 220, 220));
        assert_eq!(classify(&rect), RectRole::CellFill);
    }

    #[test]
    fn test_filled_and_stroked_is_border() {
        // Stroke wins over fill in the priority order.
        let mut rect = mock_rect(100.0, 100.0, 200.0, 50.0);
        rect.fill_color = Some(Color::white());
        rect.stroke_color = Some(Color::black());
        rect.stroke_width = 1.0;
        assert_eq!(classify(&rect), RectRole::TableBorder);
    }

    #[test]
    fn test_negative_extent_normalized_before_rules() {
        // Drawn bottom-right to top-left; magnitudes cover the page.
        let rect = mock_rect(612.0, 792.0, -612.0, -792.0);
        assert_eq!(classify(&rect), RectRole::PageBackground);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut rect = mock_rect(10.0, 10.0, 80.0, 30.0);
        rect.stroke_color = Some(Color::black());
        rect.stroke_width = 1.0;
        assert_eq!(classify(&rect), classify(&rect));
    }
}
