//! Conversion entry points: single document, split, and whole dataset.
//!
//! Processing is strictly sequential. Each document is read, parsed, rendered
//! and labeled before the next one starts, and a failure in one document is
//! recorded in its [`DocumentResult`] without stopping the split.

use crate::config::ConversionConfig;
use crate::error::{DocumentError, Ink2ImgError};
use crate::output::{DatasetReport, DocumentResult, DocumentSummary, SplitReport};
use crate::pipeline::input::{self, display_name, image_file_name};
use crate::pipeline::label::LabelExtractor;
use crate::pipeline::trace::InkDocument;
use crate::pipeline::{manifest, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert one InkML file to a PNG at `output`.
///
/// Parent directories of `output` are created as needed. A missing label is
/// not an error: the image is written and `label` is `None`.
///
/// # Errors
/// - The input cannot be read
/// - The markup is not well-formed XML
/// - The image cannot be rendered or written
pub fn convert_document(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentResult, Ink2ImgError> {
    let output = output.as_ref();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Ink2ImgError::OutputWriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let extractor = LabelExtractor::new(config.label_kinds.iter().cloned());
    convert_one(input.as_ref(), output, config, &extractor)
}

/// Convert every document of one split.
///
/// Reads `<input_root>/<split>/*.<ext>` and writes
/// `<output_root>/<split>/<images_dir>/<stem>.png` plus
/// `<output_root>/<split>/<manifest_name>`.
///
/// # Returns
/// `Ok(None)` when the split's input directory does not exist (a warning is
/// logged). A split without documents yields a report with no manifest.
///
/// # Errors
/// Only output-level failures: the output directories or the manifest
/// cannot be written, or the input directory cannot be listed.
pub fn convert_split(
    input_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    split: &str,
    config: &ConversionConfig,
) -> Result<Option<SplitReport>, Ink2ImgError> {
    let start = Instant::now();
    let input_dir = input_root.as_ref().join(split);
    if !input_dir.is_dir() {
        warn!(
            "Input directory '{}' does not exist; skipping split '{}'",
            input_dir.display(),
            split
        );
        return Ok(None);
    }

    let output_dir = output_root.as_ref().join(split);
    let images_dir = output_dir.join(&config.images_dir);
    std::fs::create_dir_all(&images_dir).map_err(|source| Ink2ImgError::OutputWriteFailed {
        path: images_dir.clone(),
        source,
    })?;

    let files = input::list_documents(&input_dir, &config.input_extension)?;
    if files.is_empty() {
        warn!(
            "No .{} files found in '{}'",
            config.input_extension,
            input_dir.display()
        );
        return Ok(Some(SplitReport {
            split: split.to_string(),
            manifest_path: None,
            documents: Vec::new(),
            duration_ms: start.elapsed().as_millis() as u64,
        }));
    }

    info!("Processing split '{}': {} documents", split, files.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_split_start(split, files.len());
    }

    let extractor = LabelExtractor::new(config.label_kinds.iter().cloned());
    let mut documents = Vec::with_capacity(files.len());

    for path in &files {
        let source = display_name(path);
        let image_path = images_dir.join(image_file_name(path));

        let result = match convert_one(path, &image_path, config, &extractor) {
            Ok(result) => {
                if result.label.is_none() {
                    warn!(
                        "No label found in '{}'; image written but left out of the manifest",
                        source
                    );
                }
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(split, &source, result.label.is_some());
                }
                result
            }
            Err(e) => {
                let err = DocumentError::from_fatal(source.clone(), &e);
                warn!("Skipping document: {}", err);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(split, &source, &err.to_string());
                }
                DocumentResult {
                    source,
                    image: image_file_name(path),
                    strokes: 0,
                    groups: 0,
                    label: None,
                    error: Some(err),
                }
            }
        };
        documents.push(result);
    }

    let mut report = SplitReport {
        split: split.to_string(),
        manifest_path: None,
        documents,
        duration_ms: 0,
    };

    let manifest_path = output_dir.join(&config.manifest_name);
    manifest::write_manifest(&manifest_path, &report.entries())?;
    report.manifest_path = Some(manifest_path);
    report.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Split '{}' done: {} image/label pairs saved to '{}' ({} unlabeled, {} failed, {}ms)",
        split,
        report.labeled(),
        output_dir.join(&config.manifest_name).display(),
        report.unlabeled(),
        report.failed(),
        report.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_split_complete(split, report.total(), report.labeled());
    }

    Ok(Some(report))
}

/// Convert every configured split of a dataset.
///
/// # Errors
/// Returns `Err` when the input root is missing or not a directory, or when
/// any split hits an output-level failure. Per-document failures and missing
/// split directories are reported in the returned [`DatasetReport`].
pub fn convert_dataset(
    input_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DatasetReport, Ink2ImgError> {
    let total_start = Instant::now();
    let input_root = input::resolve_dir(input_root.as_ref())?;
    let output_root = output_root.as_ref();
    info!(
        "Converting dataset '{}' → '{}'",
        input_root.display(),
        output_root.display()
    );

    let mut report = DatasetReport::default();
    for split in &config.splits {
        match convert_split(&input_root, output_root, split, config)? {
            Some(split_report) => report.splits.push(split_report),
            None => report.skipped_splits.push(split.clone()),
        }
    }
    report.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Dataset complete: {}/{} documents labeled across {} splits, {}ms",
        report.labeled(),
        report.total(),
        report.splits.len(),
        report.total_duration_ms
    );
    Ok(report)
}

/// Parse a document and summarise its structure without rendering it.
pub fn inspect(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentSummary, Ink2ImgError> {
    let text = input::read_document(input.as_ref())?;
    let doc = InkDocument::parse(&text)?;
    let groups = doc.groups();
    let extractor = LabelExtractor::new(config.label_kinds.iter().cloned());

    Ok(DocumentSummary {
        strokes: doc.strokes.len(),
        points: doc.strokes.iter().map(|s| s.points.len()).sum(),
        segmented: doc.segmentation.is_some(),
        group_labels: groups.iter().map(|g| g.label.clone()).collect(),
        label: extractor.extract(&text),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Parse → resolve → rasterise → label, for one document.
fn convert_one(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
    extractor: &LabelExtractor,
) -> Result<DocumentResult, Ink2ImgError> {
    let text = input::read_document(input)?;
    let doc = InkDocument::parse(&text)?;
    let groups = doc.groups();

    render::rasterize_to_file(&groups, output, &config.style)?;
    let label = extractor.extract(&text);

    debug!(
        "{} → {} ({} strokes, {} groups, label: {:?})",
        input.display(),
        output.display(),
        doc.strokes.len(),
        groups.len(),
        label
    );

    Ok(DocumentResult {
        source: display_name(input),
        image: display_name(output),
        strokes: doc.strokes.len(),
        groups: groups.len(),
        label,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LABELED: &str = r#"<ink xmlns="http://www.w3.org/2003/InkML">
        <annotation type="label">x</annotation>
        <trace id="0">0 0, 10 10</trace></ink>"#;

    #[test]
    fn convert_document_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.inkml");
        fs::write(&input, LABELED).unwrap();
        let output = dir.path().join("out").join("nested").join("a.png");

        let result = convert_document(&input, &output, &ConversionConfig::default()).unwrap();
        assert!(output.exists());
        assert_eq!(result.image, "a.png");
        assert_eq!(result.label.as_deref(), Some("x"));
        assert_eq!(result.strokes, 1);
        assert_eq!(result.groups, 1);
    }

    #[test]
    fn convert_document_fails_on_bad_xml() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.inkml");
        fs::write(&input, "<ink><trace>").unwrap();
        let output = dir.path().join("bad.png");
        let err = convert_document(&input, &output, &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, Ink2ImgError::MalformedInk { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn missing_split_is_skipped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let report =
            convert_split(input.path(), output.path(), "train", &ConversionConfig::default())
                .unwrap();
        assert!(report.is_none());
        assert!(!output.path().join("train").exists());
    }

    #[test]
    fn empty_split_writes_no_manifest() {
        let input = tempfile::tempdir().unwrap();
        fs::create_dir(input.path().join("valid")).unwrap();
        let output = tempfile::tempdir().unwrap();
        let report =
            convert_split(input.path(), output.path(), "valid", &ConversionConfig::default())
                .unwrap()
                .unwrap();
        assert_eq!(report.total(), 0);
        assert!(report.manifest_path.is_none());
        assert!(!output.path().join("valid").join("labels.json").exists());
    }

    #[test]
    fn upper_case_extension_does_not_clobber_image() {
        let input = tempfile::tempdir().unwrap();
        let train = input.path().join("train");
        fs::create_dir(&train).unwrap();
        let doc = |label: &str, x: u32| {
            format!(
                r#"<ink xmlns="http://www.w3.org/2003/InkML">
                <annotation type="label">{label}</annotation>
                <trace id="0">0 0, {x} 10</trace></ink>"#
            )
        };
        fs::write(train.join("a.INKML"), doc("first", 10)).unwrap();
        fs::write(train.join("a.inkml"), doc("second", 20)).unwrap();
        if fs::read_dir(&train).unwrap().count() != 2 {
            // case-insensitive file system: only one file exists
            return;
        }
        let output = tempfile::tempdir().unwrap();

        let report =
            convert_split(input.path(), output.path(), "train", &ConversionConfig::default())
                .unwrap()
                .unwrap();
        assert_eq!(report.total(), 1);
        assert_eq!(report.documents[0].source, "a.inkml");

        let text = fs::read_to_string(output.path().join("train").join("labels.json")).unwrap();
        let entries: Vec<crate::output::ManifestEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "a.png");
        assert_eq!(entries[0].label, "second");
    }

    #[test]
    fn inspect_summarises_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.inkml");
        fs::write(&input, LABELED).unwrap();
        let summary = inspect(&input, &ConversionConfig::default()).unwrap();
        assert_eq!(summary.strokes, 1);
        assert_eq!(summary.points, 2);
        assert!(!summary.segmented);
        assert_eq!(summary.group_labels, vec![None]);
        assert_eq!(summary.label.as_deref(), Some("x"));
    }

    #[test]
    fn missing_dataset_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_dataset(
            dir.path().join("missing"),
            dir.path().join("out"),
            &ConversionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Ink2ImgError::InputNotFound { .. }));
    }
}
