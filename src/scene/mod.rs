//! Scene-graph input contract.
//!
//! The upstream page-content extractor hands this crate one [`PageScene`]
//! per page: a flat, unordered list of positioned primitives plus the page's
//! interactive form fields. All geometry is already in a single coordinate
//! space (origin top-left, y increasing downward) and all colors are
//! resolved to final RGB; no color-space or transform math happens here.
//!
//! These types are read-only to the reconstruction core. They derive serde
//! so scenes can be captured and replayed as JSON fixtures.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A resolved RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Color {
    /// Create a color from channel values.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub fn black() -> Self {
        Self { r: 0, g: 0, b: 0 }
    }

    /// White.
    pub fn white() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
        }
    }

    /// Uppercase `RRGGBB` hex form, as OOXML color attributes expect.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A positioned run of text.
///
/// `origin` is the top-left of the run's bounding box; `y` is measured from
/// the page top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    /// Text content of the run
    pub text: String,
    /// X coordinate of the run origin, in points
    pub x: f32,
    /// Y coordinate of the run origin, in points (from page top)
    pub y: f32,
    /// Advance width of the run, in points
    pub width: f32,
    /// Height of the run, in points
    pub height: f32,
    /// Resolved font name
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Text color
    pub color: Color,
    /// Underline flag
    #[serde(default)]
    pub underline: bool,
    /// Strikethrough flag
    #[serde(default)]
    pub strikethrough: bool,
    /// Counter-clockwise rotation in degrees
    #[serde(default)]
    pub rotation: f32,
    /// Baseline offset in points for super/subscript runs (positive = raised)
    #[serde(default)]
    pub superscript_offset: f32,
    /// BCP-47 language tag, when the extractor knows it
    #[serde(default)]
    pub language: Option<String>,
    /// Hyperlink target URI, when the run sits inside a link annotation
    #[serde(default)]
    pub hyperlink: Option<String>,
}

impl TextElement {
    /// Bounding box of the run.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// An axis-aligned rectangle primitive.
///
/// Width and height may be negative when the primitive was drawn with an
/// inverted coordinate delta; use [`Rect::normalized`] before geometric
/// comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectElement {
    /// X coordinate of the drawn origin
    pub x: f32,
    /// Y coordinate of the drawn origin
    pub y: f32,
    /// Width (may be negative)
    pub width: f32,
    /// Height (may be negative)
    pub height: f32,
    /// Fill color, if the rectangle was filled
    #[serde(default)]
    pub fill_color: Option<Color>,
    /// Stroke color, if the rectangle was stroked
    #[serde(default)]
    pub stroke_color: Option<Color>,
    /// Stroke width in points
    #[serde(default)]
    pub stroke_width: f32,
}

impl RectElement {
    /// Normalized bounding box (non-negative width/height).
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height).normalized()
    }
}

/// A positioned raster image reference.
///
/// The image bytes themselves are extracted and decoded by an upstream
/// collaborator; this element only carries the placement and the resource
/// identity used to match it to a packaged file at serialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageElement {
    /// Resource identity shared with the packaged image file
    pub resource_id: String,
    /// Placement on the page
    pub bbox: Rect,
    /// Natural pixel width, when known
    #[serde(default)]
    pub pixel_width: Option<u32>,
    /// Natural pixel height, when known
    #[serde(default)]
    pub pixel_height: Option<u32>,
}

/// An opaque vector path primitive.
///
/// Paths participate in the input contract but carry no structure this core
/// recovers; only the bounding box is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathElement {
    /// Bounding box of the path
    pub bbox: Rect,
}

/// Type tag of an interactive form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single- or multi-line text input
    Text,
    /// Push button, checkbox or radio button (see the sub-flags)
    Button,
    /// Dropdown / list selection
    Choice,
}

/// An interactive form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Field type tag
    pub kind: FieldKind,
    /// Fully-qualified field name (dot-separated, may carry array indices)
    pub name: String,
    /// Current value
    #[serde(default)]
    pub value: String,
    /// Selectable options, for choice fields
    #[serde(default)]
    pub options: Vec<String>,
    /// Widget bounding geometry
    pub rect: Rect,
    /// Maximum character count, for text fields
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Read-only flag
    #[serde(default)]
    pub read_only: bool,
    /// Checkbox sub-flag (button fields)
    #[serde(default)]
    pub checkbox: bool,
    /// Radio-button sub-flag (button fields)
    #[serde(default)]
    pub radio: bool,
}

impl FormField {
    /// Whether this is a text-input field (the kind spatial table detection
    /// keys on).
    pub fn is_text_input(&self) -> bool {
        self.kind == FieldKind::Text
    }
}

/// One positioned primitive in the flat page scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SceneElement {
    /// A text run
    Text(TextElement),
    /// A rectangle
    Rect(RectElement),
    /// An image placement
    Image(ImageElement),
    /// An opaque vector path
    Path(PathElement),
}

/// One page's flat scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScene {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Unordered positioned primitives
    pub elements: Vec<SceneElement>,
    /// Interactive form fields on this page
    #[serde(default)]
    pub form_fields: Vec<FormField>,
}

impl PageScene {
    /// Create an empty scene with the given page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            form_fields: Vec::new(),
        }
    }

    /// Iterate the text elements in the scene.
    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Iterate the rectangle elements in the scene.
    pub fn rects(&self) -> impl Iterator<Item = &RectElement> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Rect(r) => Some(r),
            _ => None,
        })
    }

    /// Iterate the image elements in the scene.
    pub fn images(&self) -> impl Iterator<Item = &ImageElement> {
        self.elements.iter().filter_map(|e| match e {
            SceneElement::Image(i) => Some(i),
            _ => None,
        })
    }

    /// Parse one scene from its JSON representation.
    ///
    /// Rejects scenes whose page size violates the input contract.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check the page geometry against the input contract.
    fn validate(&self) -> crate::error::Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(crate::error::Error::InvalidScene(format!(
                "page size {}x{} is not a positive finite extent",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Parse a multi-page scene document: a JSON array of page scenes.
pub fn load_scenes_json(json: &str) -> crate::error::Result<Vec<PageScene>> {
    let scenes: Vec<PageScene> = serde_json::from_str(json)?;
    for scene in &scenes {
        scene.validate()?;
    }
    Ok(scenes)
}

/// An image file extracted and decoded upstream, ready for packaging.
#[derive(Debug, Clone)]
pub struct PackagedImage {
    /// Resource identity shared with [`ImageElement::resource_id`]
    pub resource_id: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// File extension without the dot (`png`, `jpeg`, …)
    pub extension: String,
}
