//! # ink2img
//!
//! Convert an InkML handwriting dataset into PNG images plus per-split JSON
//! label manifests, ready for image-to-text training.
//!
//! ## Pipeline Overview
//!
//! ```text
//! <input>/<split>/*.inkml
//!  │
//!  ├─ 1. Input     list split directories and documents (sorted)
//!  ├─ 2. Trace     parse <trace> coordinates, order strokes by id
//!  ├─ 3. Group     resolve the segmentation <traceGroup> into stroke groups
//!  ├─ 4. Render    fit, draw and crop every stroke into one PNG
//!  ├─ 5. Label     normalizedLabel → label, first non-empty wins
//!  └─ 6. Manifest  <output>/<split>/labels.json, labeled images only
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ink2img::{convert_dataset, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let report = convert_dataset("crohme", "crohme_images", &config)?;
//!     eprintln!("{}/{} documents labeled", report.labeled(), report.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ink2img` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ink2img = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, RenderStyle, Rgba8};
pub use convert::{convert_dataset, convert_document, convert_split, inspect};
pub use error::{DocumentError, Ink2ImgError};
pub use output::{DatasetReport, DocumentResult, DocumentSummary, ManifestEntry, SplitReport};
pub use pipeline::group::StrokeGroup;
pub use pipeline::label::{extract_label, LabelExtractor};
pub use pipeline::trace::{InkDocument, Point, Stroke};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
