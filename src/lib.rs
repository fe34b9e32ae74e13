// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # DOCX Oxide
//!
//! Reconstructs structured, editable documents from flat scene graphs of
//! positioned primitives and serializes them to DOCX.
//!
//! Fixed-layout page descriptions carry no structural semantics: text runs,
//! rectangles, and images are positioned independently, with no notion of
//! "table" or "paragraph". This crate recovers that structure from geometry
//! alone and re-expresses it in OOXML's flowed model.
//!
//! ## Pipeline
//!
//! - **Rectangle classification**: every rectangle gets a visual role
//!   (background, separator, table border, cell fill, decorative)
//! - **Vector table detection**: border rectangles are grouped, fitted to a
//!   row/column grid, verified, and merged cells recovered
//! - **Spatial form-field tables**: when no borders exist, aligned
//!   text-input fields synthesize an equivalent grid
//! - **Paragraph grouping**: leftover text clusters into baseline-aligned
//!   lines, then paragraphs, with alignment/indent/heading hints
//! - **Style collection**: run formatting is deduplicated and the most
//!   frequent signature becomes the document default
//! - **OOXML serialization**: tables with spans and shading, paragraphs,
//!   inline images, legacy interactive form fields, section properties
//!
//! Scene extraction, image decoding, and ZIP container writing are external
//! collaborators; this crate consumes [`scene::PageScene`] values and
//! produces a [`docx::DocxPackage`] of named parts.
//!
//! ## Quick Start
//!
//! ```ignore
//! use docx_oxide::docx::DocxConverter;
//! use docx_oxide::scene::PageScene;
//!
//! # fn main() -> docx_oxide::Result<()> {
//! let scenes: Vec<PageScene> = load_scenes()?;
//! let converter = DocxConverter::new();
//! let package = converter.convert(&scenes, &[])?;
//! for (name, bytes) in &package.parts {
//!     write_zip_entry(name, bytes)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry primitives and clustering
pub mod geometry;

// Scene-graph input contract
pub mod scene;

// Structure reconstruction
pub mod layout;

// OOXML serialization
pub mod docx;

// Re-exports
pub use config::LayoutConfig;
pub use docx::{DocxConverter, DocxPackage};
pub use error::{Error, Result};
pub use layout::{LayoutAssembler, LayoutElement, PageLayout};
pub use scene::{PackagedImage, PageScene};
