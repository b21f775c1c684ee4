//! Label extraction: the best-available text label of a document.
//!
//! Label kinds are tried in priority order (`normalizedLabel` before `label`
//! by default). For each kind the first `<annotation type="kind">` in the
//! document is consulted; the first one with non-blank text wins.
//!
//! Extraction never fails: unreadable files and broken markup simply yield
//! `None`, so a missing label can never abort a document.

use crate::config::DEFAULT_LABEL_KINDS;
use crate::pipeline::trace::{is_ink, parse_xml};
use roxmltree::Document;
use std::path::Path;
use tracing::debug;

/// Ordered list of annotation kinds to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelExtractor {
    kinds: Vec<String>,
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KINDS)
    }
}

impl LabelExtractor {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    /// Extract a label from InkML text.
    pub fn extract(&self, text: &str) -> Option<String> {
        match parse_xml(text) {
            Ok(doc) => self.extract_from(&doc),
            Err(e) => {
                debug!("No label: markup does not parse ({})", e);
                None
            }
        }
    }

    /// Extract a label from an already parsed document.
    pub fn extract_from(&self, doc: &Document<'_>) -> Option<String> {
        self.kinds.iter().find_map(|kind| lookup(doc, kind))
    }

    /// Extract a label from a file on disk.
    pub fn extract_from_file(&self, path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.extract(&text),
            Err(e) => {
                debug!("No label: cannot read {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn lookup(doc: &Document<'_>, kind: &str) -> Option<String> {
    let node = doc
        .descendants()
        .find(|n| is_ink(*n, "annotation") && n.attribute("type") == Some(kind))?;
    let text = node.text()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Extract a label with the default priority (`normalizedLabel`, `label`).
pub fn extract_label(text: &str) -> Option<String> {
    LabelExtractor::default().extract(text)
}

/// File-based variant of [`extract_label`].
pub fn extract_label_from_file(path: impl AsRef<Path>) -> Option<String> {
    LabelExtractor::default().extract_from_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(body: &str) -> String {
        format!(r#"<ink xmlns="http://www.w3.org/2003/InkML">{body}</ink>"#)
    }

    #[test]
    fn normalized_label_takes_precedence() {
        let doc = ink(
            r#"<annotation type="label">sum</annotation>
               <annotation type="normalizedLabel">x+y</annotation>"#,
        );
        assert_eq!(extract_label(&doc).as_deref(), Some("x+y"));
    }

    #[test]
    fn falls_back_to_label() {
        let doc = ink(r#"<annotation type="label">sum</annotation>"#);
        assert_eq!(extract_label(&doc).as_deref(), Some("sum"));
    }

    #[test]
    fn blank_normalized_label_falls_through() {
        let doc = ink(
            r#"<annotation type="normalizedLabel">   </annotation>
               <annotation type="label"> \frac{a}{b} </annotation>"#,
        );
        assert_eq!(extract_label(&doc).as_deref(), Some(r"\frac{a}{b}"));
    }

    #[test]
    fn no_annotation_is_absent() {
        let doc = ink(r#"<annotation type="writer">w1</annotation><trace>0 0</trace>"#);
        assert_eq!(extract_label(&doc), None);
    }

    #[test]
    fn nested_annotations_are_found() {
        let doc = ink(
            r#"<traceGroup><annotation type="label">αβ</annotation></traceGroup>"#,
        );
        assert_eq!(extract_label(&doc).as_deref(), Some("αβ"));
    }

    #[test]
    fn broken_markup_is_absent() {
        assert_eq!(extract_label("<ink><annotation type='label'>x"), None);
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(extract_label_from_file(dir.path().join("nope.inkml")), None);
    }

    #[test]
    fn reads_label_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.inkml");
        std::fs::write(&path, ink(r#"<annotation type="label">y=2</annotation>"#)).unwrap();
        assert_eq!(extract_label_from_file(&path).as_deref(), Some("y=2"));
    }

    #[test]
    fn custom_kinds_are_tried_in_order() {
        let doc = ink(
            r#"<annotation type="label">sum</annotation>
               <annotation type="truth">total</annotation>"#,
        );
        let extractor = LabelExtractor::new(["truth", "label"]);
        assert_eq!(extractor.extract(&doc).as_deref(), Some("total"));
        assert_eq!(extractor.kinds(), ["truth", "label"]);
    }
}
