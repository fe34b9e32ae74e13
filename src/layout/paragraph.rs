//! Baseline-driven paragraph grouping.
//!
//! Text runs and form fields left over after table detection are clustered
//! into baseline-aligned lines, then into paragraphs using gap and
//! font-size-change heuristics. A font-size jump forces a paragraph break
//! even without a large gap, which is what separates headings from the body
//! that follows them.

use crate::config::LayoutConfig;
use crate::scene::{Color, FormField, TextElement};

/// One reconstructed paragraph: its lines, any form fields flowing with it,
/// and the formatting hints derived from geometry.
#[derive(Debug, Clone, Default)]
pub struct ParagraphGroup {
    /// Lines in top-to-bottom order; each line's runs are sorted left to
    /// right.
    pub lines: Vec<Vec<TextElement>>,
    /// Form fields associated with this paragraph's vertical extent.
    pub fields: Vec<FormField>,
    /// X of the first line's left edge.
    pub x: f32,
    /// Y of the first line's top.
    pub y: f32,
    /// Rightmost edge over all lines.
    pub right_edge: f32,
    /// Heading level (1-3) when the paragraph reads as a heading.
    pub heading_level: Option<u8>,
    /// Paragraph-level background fill, when a fill rectangle backs it.
    pub background: Option<Color>,
    /// Bottom border width/color, when a separator rule sits underneath.
    pub bottom_border: Option<(Option<Color>, f32)>,
    /// List membership (bullet or numbered marker on the first run).
    pub list_item: bool,
    /// Distance between consecutive line tops in points, for multi-line
    /// paragraphs.
    pub line_spacing: Option<f32>,
    /// Gap to the previous paragraph in points.
    pub space_before: Option<f32>,
    /// Gap to the next paragraph in points.
    pub space_after: Option<f32>,
}

impl ParagraphGroup {
    /// A paragraph holding a single form field and no text.
    pub fn from_field(field: FormField) -> Self {
        Self {
            x: field.rect.x,
            y: field.rect.y,
            right_edge: field.rect.right(),
            fields: vec![field],
            ..Default::default()
        }
    }

    /// Average font size over all runs, or 0 for field-only paragraphs.
    pub fn avg_font_size(&self) -> f32 {
        let sizes: Vec<f32> = self
            .lines
            .iter()
            .flatten()
            .map(|t| t.font_size)
            .collect();
        if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<f32>() / sizes.len() as f32
        }
    }

    /// Top of the first line.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Estimated bottom of the last line.
    pub fn bottom(&self, config: &LayoutConfig) -> f32 {
        self.lines
            .last()
            .map(|line| line_bottom(line, config))
            .unwrap_or_else(|| {
                self.fields
                    .iter()
                    .map(|f| f.rect.bottom())
                    .fold(self.y, f32::max)
            })
    }

    /// Concatenated text of all runs, lines joined by spaces.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn line_top(line: &[TextElement]) -> f32 {
    line.iter().map(|t| t.y).fold(f32::INFINITY, f32::min)
}

fn line_bottom(line: &[TextElement], config: &LayoutConfig) -> f32 {
    line.iter()
        .map(|t| t.y + t.font_size * config.line_height_factor)
        .fold(f32::NEG_INFINITY, f32::max)
}

fn line_avg_font_size(line: &[TextElement]) -> f32 {
    line.iter().map(|t| t.font_size).sum::<f32>() / line.len() as f32
}

/// Groups leftover text and form fields into paragraphs.
pub struct ParagraphGrouper<'a> {
    config: &'a LayoutConfig,
}

impl<'a> ParagraphGrouper<'a> {
    /// Create a grouper over the given configuration.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Group `texts` and `fields` (the elements no table consumed) into
    /// paragraphs, sorted top to bottom.
    pub fn group(&self, texts: &[TextElement], fields: &[FormField]) -> Vec<ParagraphGroup> {
        if texts.is_empty() {
            // No text at all: every field becomes its own paragraph.
            let mut paragraphs: Vec<ParagraphGroup> = fields
                .iter()
                .cloned()
                .map(ParagraphGroup::from_field)
                .collect();
            paragraphs.sort_by(|a, b| {
                a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal)
            });
            return paragraphs;
        }

        let lines = self.build_lines(texts);
        let mut paragraphs = self.build_paragraphs(lines);
        self.attach_fields(&mut paragraphs, fields);

        paragraphs.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

        self.derive_hints(&mut paragraphs, texts);
        paragraphs
    }

    /// Sort by (y, x) and split into baseline-aligned lines.
    fn build_lines(&self, texts: &[TextElement]) -> Vec<Vec<TextElement>> {
        let mut sorted: Vec<TextElement> = texts.to_vec();
        sorted.sort_by(|a, b| {
            (a.y, a.x)
                .partial_cmp(&(b.y, b.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut lines: Vec<Vec<TextElement>> = Vec::new();
        for text in sorted {
            match lines.last_mut() {
                Some(line)
                    if (text.y - line.last().map(|t| t.y).unwrap_or(text.y)).abs()
                        <= self.config.baseline_tolerance =>
                {
                    line.push(text);
                },
                _ => lines.push(vec![text]),
            }
        }
        for line in &mut lines {
            line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        }
        lines
    }

    /// Merge consecutive lines into paragraphs while the inter-line gap
    /// stays small and the average font size stays stable.
    fn build_paragraphs(&self, lines: Vec<Vec<TextElement>>) -> Vec<ParagraphGroup> {
        let mut paragraphs: Vec<Vec<Vec<TextElement>>> = Vec::new();

        for line in lines {
            let start_new = match paragraphs.last().and_then(|para| para.last()) {
                None => true,
                Some(prev) => {
                    let gap = line_top(&line) - line_bottom(prev, self.config);
                    let prev_size = line_avg_font_size(prev);
                    let size = line_avg_font_size(&line);
                    let gap_break = gap > prev_size * self.config.paragraph_gap_factor;
                    let size_break = (size - prev_size).abs()
                        > prev_size * self.config.font_size_change_ratio;
                    gap_break || size_break
                },
            };
            match paragraphs.last_mut() {
                Some(para) if !start_new => para.push(line),
                _ => paragraphs.push(vec![line]),
            }
        }

        paragraphs
            .into_iter()
            .map(|lines| {
                let x = lines[0]
                    .iter()
                    .map(|t| t.x)
                    .fold(f32::INFINITY, f32::min);
                let y = line_top(&lines[0]);
                let right_edge = lines
                    .iter()
                    .flatten()
                    .map(|t| t.x + t.width)
                    .fold(f32::NEG_INFINITY, f32::max);
                ParagraphGroup {
                    lines,
                    x,
                    y,
                    right_edge,
                    ..Default::default()
                }
            })
            .collect()
    }

    /// Attach each field to the paragraph whose vertical text extent
    /// contains its center; unmatched fields become standalone paragraphs.
    fn attach_fields(&self, paragraphs: &mut Vec<ParagraphGroup>, fields: &[FormField]) {
        let tol = self.config.paragraph_field_tolerance;
        for field in fields {
            let cy = field.rect.center().y;
            let hit = paragraphs.iter().position(|p| {
                !p.lines.is_empty()
                    && cy >= p.top() - tol
                    && cy <= p.bottom(self.config) + tol
            });
            match hit {
                Some(i) => {
                    let p = &mut paragraphs[i];
                    p.fields.push(field.clone());
                    p.right_edge = p.right_edge.max(field.rect.right());
                },
                None => paragraphs.push(ParagraphGroup::from_field(field.clone())),
            }
        }
    }

    /// Derive heading/list/spacing hints once paragraph order is final.
    fn derive_hints(&self, paragraphs: &mut [ParagraphGroup], all_texts: &[TextElement]) {
        let mut sizes: Vec<f32> = all_texts.iter().map(|t| t.font_size).collect();
        sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if sizes.is_empty() {
            0.0
        } else {
            sizes[sizes.len() / 2]
        };

        let bottoms: Vec<f32> = paragraphs.iter().map(|p| p.bottom(self.config)).collect();
        let tops: Vec<f32> = paragraphs.iter().map(|p| p.top()).collect();

        for (i, p) in paragraphs.iter_mut().enumerate() {
            if p.lines.len() == 1 && median > 0.0 {
                let ratio = p.avg_font_size() / median;
                let [h1, h2, h3] = self.config.heading_size_ratios;
                p.heading_level = if ratio >= h1 {
                    Some(1)
                } else if ratio >= h2 {
                    Some(2)
                } else if ratio >= h3 {
                    Some(3)
                } else {
                    None
                };
            }

            p.list_item = p
                .lines
                .first()
                .and_then(|l| l.first())
                .map(|t| is_list_marker(&t.text))
                .unwrap_or(false);

            if p.lines.len() >= 2 {
                let gaps: Vec<f32> = p
                    .lines
                    .windows(2)
                    .map(|w| line_top(&w[1]) - line_top(&w[0]))
                    .collect();
                p.line_spacing = Some(gaps.iter().sum::<f32>() / gaps.len() as f32);
            }

            if i > 0 {
                let gap = tops[i] - bottoms[i - 1];
                if gap > 0.0 {
                    p.space_before = Some(gap);
                }
            }
            if i + 1 < tops.len() {
                let gap = tops[i + 1] - bottoms[i];
                if gap > 0.0 {
                    p.space_after = Some(gap);
                }
            }
        }
    }
}

/// Does a run's text start with a bullet glyph or an `N.` / `N)` marker?
fn is_list_marker(text: &str) -> bool {
    let trimmed = text.trim_start();
    if let Some(first) = trimmed.chars().next() {
        if matches!(first, '•' | '◦' | '▪' | '‣' | '-') && trimmed.chars().nth(1).is_none_or(|c| c.is_whitespace()) {
            return true;
        }
    }
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    matches!(
        trimmed[digits.len()..].chars().next(),
        Some('.') | Some(')')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::FieldKind;
    use crate::geometry::Rect;

    fn run(s: &str, x: f32, y: f32, size: f32) -> TextElement {
        TextElement {
            text: s.to_string(),
            x,
            y,
            width: s.len() as f32 * size * 0.5,
            height: size,
            font_name: "Arial".to_string(),
            font_size: size,
            bold: false,
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

    fn field(name: &str, x: f32, y: f32) -> FormField {
        FormField {
            kind: FieldKind::Text,
            name: name.to_string(),
            value: String::new(),
            options: vec![],
            rect: Rect::new(x, y, 100.0, 14.0),
            max_length: None,
            read_only: false,
            checkbox: false,
            radio: false,
        }
    }

    #[test]
    fn test_baseline_merge_and_gap_break() {
        // Runs at y=100 and y=103 share a line; y=135 starts a new
        // paragraph because the gap exceeds avgFontSize * 1.5.
        let config = LayoutConfig::default();
        let texts = vec![
            run("first", 0.0, 100.0, 10.0),
            run("half", 60.0, 103.0, 10.0),
            run("second", 0.0, 135.0, 10.0),
        ];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].lines.len(), 1);
        assert_eq!(paragraphs[0].lines[0].len(), 2);
        assert_eq!(paragraphs[1].lines[0][0].text, "second");
    }

    #[test]
    fn test_close_lines_merge_into_one_paragraph() {
        let config = LayoutConfig::default();
        let texts = vec![
            run("line one", 0.0, 100.0, 10.0),
            run("line two", 0.0, 113.0, 10.0),
        ];
        // Gap: 113 - (100 + 12) = 1 <= 15.
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].lines.len(), 2);
    }

    #[test]
    fn test_font_size_jump_forces_break() {
        let config = LayoutConfig::default();
        // Lines nearly touching, but the second is 50% larger.
        let texts = vec![
            run("heading", 0.0, 100.0, 18.0),
            run("body follows here", 0.0, 123.0, 10.0),
        ];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_fields_only_page() {
        let config = LayoutConfig::default();
        let fields = vec![field("b", 0.0, 200.0), field("a", 0.0, 100.0)];
        let paragraphs = ParagraphGrouper::new(&config).group(&[], &fields);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].fields[0].name, "a");
        assert_eq!(paragraphs[1].fields[0].name, "b");
    }

    #[test]
    fn test_field_attached_to_matching_paragraph() {
        let config = LayoutConfig::default();
        let texts = vec![run("Name:", 0.0, 100.0, 10.0)];
        let fields = vec![field("name", 60.0, 99.0)];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &fields);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].fields.len(), 1);
    }

    #[test]
    fn test_unmatched_field_is_standalone() {
        let config = LayoutConfig::default();
        let texts = vec![run("Header", 0.0, 50.0, 10.0)];
        let fields = vec![field("lonely", 0.0, 400.0)];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &fields);
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[1].lines.is_empty());
        assert_eq!(paragraphs[1].fields[0].name, "lonely");
    }

    #[test]
    fn test_heading_hint_from_size_ratio() {
        let config = LayoutConfig::default();
        let mut texts = vec![run("Title", 0.0, 50.0, 20.0)];
        for i in 0..5 {
            texts.push(run("body text", 0.0, 120.0 + i as f32 * 14.0, 10.0));
        }
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);
        assert_eq!(paragraphs[0].heading_level, Some(1));
        assert_eq!(paragraphs.last().unwrap().heading_level, None);
    }

    #[test]
    fn test_list_marker_detection() {
        assert!(is_list_marker("• item"));
        assert!(is_list_marker("1. first"));
        assert!(is_list_marker("12) twelfth"));
        assert!(is_list_marker("- dash item"));
        assert!(!is_list_marker("plain text"));
        assert!(!is_list_marker("3rd quarter"));
        assert!(!is_list_marker("-5 degrees"));
    }

    #[test]
    fn test_paragraphs_sorted_by_y() {
        let config = LayoutConfig::default();
        let texts = vec![
            run("below", 0.0, 300.0, 10.0),
            run("above", 0.0, 100.0, 10.0),
        ];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);
        assert_eq!(paragraphs[0].lines[0][0].text, "above");
        assert_eq!(paragraphs[1].lines[0][0].text, "below");
    }

    #[test]
    fn test_spacing_hints() {
        let config = LayoutConfig::default();
        let texts = vec![
            run("one", 0.0, 100.0, 10.0),
            run("two", 0.0, 160.0, 10.0),
        ];
        let paragraphs = ParagraphGrouper::new(&config).group(&texts, &[]);
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].space_after.is_some());
        assert!(paragraphs[1].space_before.is_some());
        assert_eq!(paragraphs[0].space_before, None);
    }
}
