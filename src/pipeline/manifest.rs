//! Manifest output: one JSON array of `{file_name, label}` per split.
//!
//! The file is indented with four spaces and keeps non-ASCII labels as raw
//! UTF-8. It is written to a temporary file in the target directory and then
//! renamed into place, so a crash never leaves a truncated manifest behind.

use crate::error::Ink2ImgError;
use crate::output::ManifestEntry;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Serialise entries as a 4-space-indented JSON array.
pub fn to_json(entries: &[ManifestEntry]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Atomically write the manifest to `path`.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<(), Ink2ImgError> {
    let json = to_json(entries)
        .map_err(|e| Ink2ImgError::Internal(format!("manifest serialisation: {e}")))?;

    let write_err = |source: std::io::Error| Ink2ImgError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} manifest entries to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file: &str, label: &str) -> ManifestEntry {
        ManifestEntry {
            file_name: file.into(),
            label: label.into(),
        }
    }

    #[test]
    fn uses_four_space_indent() {
        let json = to_json(&[entry("a.png", "x")]).unwrap();
        assert_eq!(
            json,
            "[\n    {\n        \"file_name\": \"a.png\",\n        \"label\": \"x\"\n    }\n]"
        );
    }

    #[test]
    fn keeps_unicode_unescaped() {
        let json = to_json(&[entry("a.png", "α≤β")]).unwrap();
        assert!(json.contains("α≤β"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn empty_manifest_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn writes_and_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, "stale").unwrap();

        let entries = vec![entry("a.png", r"\sqrt{2}"), entry("b.png", "1+1")];
        write_manifest(&path, &entries).unwrap();

        let back: Vec<ManifestEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, entries);
        // no temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("labels.json");
        let err = write_manifest(&path, &[]).unwrap_err();
        assert!(matches!(err, Ink2ImgError::OutputWriteFailed { .. }));
    }
}
