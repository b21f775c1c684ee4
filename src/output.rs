//! Result types returned by the conversion entry points.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One manifest row: an image file and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_name: String,
    pub label: String,
}

/// Outcome of converting one InkML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Source file name, e.g. `abc.inkml`.
    pub source: String,
    /// Image file name, e.g. `abc.png`.
    pub image: String,
    /// Strokes kept after parsing.
    pub strokes: usize,
    /// Stroke groups drawn.
    pub groups: usize,
    /// Extracted label; `None` leaves the image out of the manifest.
    pub label: Option<String>,
    /// Set when the document failed; no image was written.
    pub error: Option<DocumentError>,
}

impl DocumentResult {
    /// Manifest row for this document, if it was converted and labeled.
    pub fn manifest_entry(&self) -> Option<ManifestEntry> {
        if self.error.is_some() {
            return None;
        }
        self.label.as_ref().map(|label| ManifestEntry {
            file_name: self.image.clone(),
            label: label.clone(),
        })
    }

    pub fn is_labeled(&self) -> bool {
        self.error.is_none() && self.label.is_some()
    }
}

/// Outcome of converting one split directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub split: String,
    /// Written manifest; `None` when the split had no input documents.
    pub manifest_path: Option<PathBuf>,
    /// Per-document outcomes, in processing order.
    pub documents: Vec<DocumentResult>,
    pub duration_ms: u64,
}

impl SplitReport {
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Documents with an image and a label.
    pub fn labeled(&self) -> usize {
        self.documents.iter().filter(|d| d.is_labeled()).count()
    }

    /// Documents with an image but no label.
    pub fn unlabeled(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.error.is_none() && d.label.is_none())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.documents.iter().filter(|d| d.error.is_some()).count()
    }

    /// Manifest rows in processing order.
    pub fn entries(&self) -> Vec<ManifestEntry> {
        self.documents
            .iter()
            .filter_map(DocumentResult::manifest_entry)
            .collect()
    }
}

/// Outcome of converting a whole dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetReport {
    pub splits: Vec<SplitReport>,
    /// Configured splits whose input directory did not exist.
    pub skipped_splits: Vec<String>,
    pub total_duration_ms: u64,
}

impl DatasetReport {
    pub fn total(&self) -> usize {
        self.splits.iter().map(SplitReport::total).sum()
    }

    pub fn labeled(&self) -> usize {
        self.splits.iter().map(SplitReport::labeled).sum()
    }

    pub fn failed(&self) -> usize {
        self.splits.iter().map(SplitReport::failed).sum()
    }
}

/// Structural summary of one document, produced without rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub strokes: usize,
    pub points: usize,
    /// Whether the document carries a segmentation `<traceGroup>`.
    pub segmented: bool,
    /// Label of each resolved group, in order.
    pub group_labels: Vec<Option<String>>,
    pub label: Option<String>,
}
