//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as each split and document is processed. The CLI drives its
//! terminal progress bar from these events; library users can forward them
//! anywhere else.
//!
//! # Example
//!
//! ```rust
//! use ink2img::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, split: &str, file: &str, labeled: bool) {
//!         let n = self.done.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("[{split}] #{n} {file} labeled={labeled}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Processing is sequential, but the trait is
/// `Send + Sync` so a callback can be shared with other threads (e.g. a
/// progress bar's ticker).
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once per split, after its input files have been listed.
    fn on_split_start(&self, split: &str, total_documents: usize) {
        let _ = (split, total_documents);
    }

    /// Called when a document's image has been written.
    ///
    /// `labeled` is false when no label was found; the image still exists
    /// but the document is left out of the manifest.
    fn on_document_complete(&self, split: &str, file: &str, labeled: bool) {
        let _ = (split, file, labeled);
    }

    /// Called when a document could not be read, parsed or rendered.
    fn on_document_error(&self, split: &str, file: &str, error: &str) {
        let _ = (split, file, error);
    }

    /// Called once per split after its manifest has been written.
    fn on_split_complete(&self, split: &str, total_documents: usize, labeled: usize) {
        let _ = (split, total_documents, labeled);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
