//! Error types for the ink2img library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Ink2ImgError`]: **Fatal** for the call that returns it: the dataset
//!   root is missing, a manifest cannot be written, the configuration is
//!   invalid, or (at document granularity) the InkML markup is broken.
//!
//! * [`DocumentError`]: **Non-fatal**: a single document failed to read,
//!   parse or render, but the rest of the split is fine. Stored inside
//!   [`crate::output::DocumentResult`] so a batch reports partial success
//!   instead of stopping at the first bad file.
//!
//! Malformed points, empty strokes and out-of-range trace references are not
//! errors at all: they are dropped where they occur.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ink2img library.
#[derive(Debug, Error)]
pub enum Ink2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory was not found at the given path.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// A directory was expected (dataset root or split) but a file was given.
    #[error("Expected a directory but found a file: '{path}'")]
    NotADirectory { path: PathBuf },

    /// The document exists but could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors ───────────────────────────────────────────────────
    /// The InkML markup is not well-formed XML.
    #[error("Malformed InkML document: {detail}")]
    MalformedInk { detail: String },

    /// The drawing surface could not be created or drawn on.
    #[error("Rasterisation failed: {detail}")]
    RasterisationFailed { detail: String },

    /// PNG encoding or writing failed.
    #[error("Failed to write image '{path}': {detail}")]
    ImageWriteFailed { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create an output directory or write the manifest.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<roxmltree::Error> for Ink2ImgError {
    fn from(e: roxmltree::Error) -> Self {
        Ink2ImgError::MalformedInk {
            detail: e.to_string(),
        }
    }
}

/// A non-fatal error for a single document.
///
/// Stored alongside [`crate::output::DocumentResult`] when a document fails.
/// The split continues with the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("{file}: read failed: {detail}")]
    ReadFailed { file: String, detail: String },

    /// The InkML markup could not be parsed.
    #[error("{file}: parse failed: {detail}")]
    ParseFailed { file: String, detail: String },

    /// Rendering or writing the image failed.
    #[error("{file}: rasterisation failed: {detail}")]
    RenderFailed { file: String, detail: String },
}

impl DocumentError {
    /// Classify a fatal document-level error for the named file.
    pub fn from_fatal(file: impl Into<String>, err: &Ink2ImgError) -> Self {
        let file = file.into();
        let detail = err.to_string();
        match err {
            Ink2ImgError::InputNotFound { .. } | Ink2ImgError::ReadFailed { .. } => {
                DocumentError::ReadFailed { file, detail }
            }
            Ink2ImgError::MalformedInk { .. } => DocumentError::ParseFailed { file, detail },
            _ => DocumentError::RenderFailed { file, detail },
        }
    }

    /// Name of the file the error belongs to.
    pub fn file(&self) -> &str {
        match self {
            DocumentError::ReadFailed { file, .. }
            | DocumentError::ParseFailed { file, .. }
            | DocumentError::RenderFailed { file, .. } => file,
        }
    }
}
