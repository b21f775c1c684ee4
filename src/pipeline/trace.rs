//! Trace parsing: InkML markup → ordered strokes plus raw segmentation.
//!
//! ## Tolerance
//!
//! Ink exporters disagree on whitespace, extra channels (time, pressure) and
//! occasionally emit garbage coordinates. Coordinate text is therefore read
//! point by point: a point survives only if its first two whitespace-separated
//! tokens are finite numbers, and a stroke survives only if at least one of
//! its points does. Nothing below the document level is ever an error.
//!
//! `nan` and `inf` parse as floats but are dropped here on purpose, even
//! though a plain "does it parse" rule would keep them: a non-finite
//! coordinate poisons the bounding box of the whole document.
//!
//! Only broken XML is fatal, and only for the document being parsed.
//!
//! ## Ordering
//!
//! Trace groups reference strokes by *position*, so the stroke order fixed
//! here is load-bearing. When every stroke id is an integer, strokes are
//! sorted by it; otherwise document order is kept as-is.
//!
//! Only the plain `id` attribute counts as a declared id. `xml:id` is
//! ignored, so such traces fall back to their position index and keep
//! document order, which is what positional `traceDataRef` values expect.

use crate::error::Ink2ImgError;
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

/// Namespace every InkML element must carry to be recognised.
pub const INKML_NS: &str = "http://www.w3.org/2003/InkML";

/// A 2D sample in document-native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One pen-down-to-pen-up trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Declared `id`, or the trace's position among all traces.
    pub id: String,
    /// Never empty for strokes produced by the parser.
    pub points: Vec<Point>,
}

/// Raw segmentation metadata for one child `<traceGroup>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceGroupRef {
    /// Text of the group's first `<annotation>`, trimmed.
    pub label: Option<String>,
    /// `traceDataRef` values of its `<traceView>` children, unparsed.
    pub refs: Vec<String>,
}

/// A parsed InkML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InkDocument {
    /// Non-empty strokes in resolution order.
    pub strokes: Vec<Stroke>,
    /// `Some` when the root declares a `<traceGroup>` wrapper.
    pub segmentation: Option<Vec<TraceGroupRef>>,
}

impl InkDocument {
    /// Parse InkML text.
    ///
    /// # Errors
    /// [`Ink2ImgError::MalformedInk`] when the text is not well-formed XML.
    pub fn parse(text: &str) -> Result<Self, Ink2ImgError> {
        let doc = parse_xml(text)?;
        let root = doc.root_element();

        let strokes = collect_strokes(root);
        let segmentation = ink_children(root, "traceGroup")
            .next()
            .map(read_segmentation);

        debug!(
            "Parsed {} strokes, {} trace groups",
            strokes.len(),
            segmentation.as_ref().map_or(0, Vec::len)
        );

        Ok(Self {
            strokes,
            segmentation,
        })
    }
}

/// Parse only the strokes of a document.
pub fn parse_strokes(text: &str) -> Result<Vec<Stroke>, Ink2ImgError> {
    InkDocument::parse(text).map(|doc| doc.strokes)
}

/// Parse coordinate text of the form `"x y [..], x y [..], ..."`.
///
/// Points whose first two tokens are not finite numbers are dropped,
/// including `nan` and `inf`.
pub fn parse_points(text: &str) -> Vec<Point> {
    text.split(',').filter_map(parse_point).collect()
}

fn parse_point(chunk: &str) -> Option<Point> {
    let mut tokens = chunk.split_whitespace();
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some(Point { x, y })
}

/// Sort strokes by integer id when every id is an integer; otherwise leave
/// them in document order. The sort is stable.
pub fn order_strokes(strokes: &mut Vec<Stroke>) {
    let keys: Option<Vec<i64>> = strokes
        .iter()
        .map(|s| s.id.trim().parse::<i64>().ok())
        .collect();

    let Some(keys) = keys else {
        debug!("Non-numeric stroke ids; keeping document order");
        return;
    };

    let mut keyed: Vec<(i64, Stroke)> = keys.into_iter().zip(strokes.drain(..)).collect();
    keyed.sort_by_key(|(key, _)| *key);
    strokes.extend(keyed.into_iter().map(|(_, stroke)| stroke));
}

fn collect_strokes(root: Node<'_, '_>) -> Vec<Stroke> {
    let mut strokes: Vec<Stroke> = ink_children(root, "trace")
        .enumerate()
        .filter_map(|(index, trace)| {
            let id = trace
                .attribute("id")
                .map_or_else(|| index.to_string(), str::to_string);
            let points = parse_points(trace.text().unwrap_or_default());
            if points.is_empty() {
                debug!("Dropping trace '{}' with no usable points", id);
                return None;
            }
            Some(Stroke { id, points })
        })
        .collect();

    order_strokes(&mut strokes);
    strokes
}

fn read_segmentation(wrapper: Node<'_, '_>) -> Vec<TraceGroupRef> {
    ink_children(wrapper, "traceGroup")
        .map(|group| TraceGroupRef {
            label: ink_children(group, "annotation")
                .next()
                .and_then(|a| a.text())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            refs: ink_children(group, "traceView")
                .filter_map(|view| view.attribute("traceDataRef"))
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

// ── XML helpers shared with the label extractor ──────────────────────────

/// Parse XML, accepting DTD declarations.
pub(crate) fn parse_xml(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
}

/// True for an InkML-namespaced element with the given local name.
pub(crate) fn is_ink(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(INKML_NS)
}

fn ink_children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_ink(*n, name))
}
