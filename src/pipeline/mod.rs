//! Pipeline stages for InkML-to-image conversion.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─▶ trace ──▶ group ──▶ render ──▶ <stem>.png
//! input ─────┤
//! (read)     └─▶ label ─────────────────────────▶ manifest (labels.json)
//! ```
//!
//! 1. [`input`]: find split directories and `.inkml` files, read text
//! 2. [`trace`]: parse strokes and raw segmentation; order strokes
//! 3. [`group`]: resolve trace-group references by stroke position
//! 4. [`render`]: draw all strokes with one style onto a cropped canvas
//! 5. [`label`]: prioritised annotation lookup, never fails
//! 6. [`manifest`]: atomic 4-space-indented JSON array per split

pub mod group;
pub mod input;
pub mod label;
pub mod manifest;
pub mod render;
pub mod trace;
