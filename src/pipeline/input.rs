//! Input resolution: dataset directories, document listing and reading.
//!
//! A dataset root holds one sub-directory per split; each split holds the
//! InkML documents directly (no recursion). Listing is sorted by file name
//! so that repeated runs produce identical manifests.

use crate::error::Ink2ImgError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists and is a directory.
pub fn resolve_dir(path: &Path) -> Result<PathBuf, Ink2ImgError> {
    if !path.exists() {
        return Err(Ink2ImgError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(Ink2ImgError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

/// List the documents in `dir` whose extension is exactly `extension`,
/// skipping hidden files, sorted by name.
///
/// The match is case-sensitive: `a.inkml` and `a.INKML` would both render
/// to `a.png`.
pub fn list_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Ink2ImgError> {
    let read_err = |source: std::io::Error| Ink2ImgError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if !hidden {
            files.push(path);
        }
    }
    files.sort();

    debug!("Found {} documents in {}", files.len(), dir.display());
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}

/// Read a document as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String, Ink2ImgError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Ink2ImgError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Ink2ImgError::ReadFailed {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// The file name shown for `path` in reports and logs.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Image file name for a document: its stem plus `.png`.
pub fn image_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.inkml", "a.INKML", "c.txt", ".hidden.inkml", "d.inkml.bak"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub.inkml")).unwrap();

        let names: Vec<String> = list_documents(dir.path(), "inkml")
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["b.inkml"]);
    }

    #[test]
    fn resolve_dir_rejects_missing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            resolve_dir(&missing),
            Err(Ink2ImgError::InputNotFound { .. })
        ));

        let file = dir.path().join("f");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            resolve_dir(&file),
            Err(Ink2ImgError::NotADirectory { .. })
        ));

        assert!(resolve_dir(dir.path()).is_ok());
    }

    #[test]
    fn read_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("x.inkml")).unwrap_err();
        assert!(matches!(err, Ink2ImgError::InputNotFound { .. }));
    }

    #[test]
    fn read_non_utf8_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.inkml");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            read_document(&path),
            Err(Ink2ImgError::ReadFailed { .. })
        ));
    }

    #[test]
    fn image_names_keep_inner_dots() {
        assert_eq!(image_file_name(Path::new("/x/abc.inkml")), "abc.png");
        assert_eq!(image_file_name(Path::new("a.b.inkml")), "a.b.png");
    }
}
