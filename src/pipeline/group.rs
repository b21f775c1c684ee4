//! Group resolution: strokes + segmentation → ordered stroke groups.
//!
//! `traceDataRef` values are positions into the ordered stroke list, not
//! stroke ids. References that are out of range or not integers contribute
//! nothing; a group left with no strokes is dropped.

use crate::pipeline::trace::{InkDocument, Stroke, TraceGroupRef};
use tracing::debug;

/// An ordered set of strokes, optionally tagged with a symbol label.
///
/// Strokes are borrowed from the parsed document, so every member is one of
/// the document's strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeGroup<'a> {
    pub label: Option<String>,
    pub strokes: Vec<&'a Stroke>,
}

impl StrokeGroup<'_> {
    /// Total number of points across the group's strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}

impl InkDocument {
    /// Resolve this document's stroke groups.
    pub fn groups(&self) -> Vec<StrokeGroup<'_>> {
        resolve_groups(&self.strokes, self.segmentation.as_deref())
    }
}

/// Build stroke groups from segmentation metadata, or one singleton group per
/// stroke when there is none.
pub fn resolve_groups<'a>(
    strokes: &'a [Stroke],
    segmentation: Option<&[TraceGroupRef]>,
) -> Vec<StrokeGroup<'a>> {
    match segmentation {
        Some(groups) => groups
            .iter()
            .filter_map(|group| resolve_group(strokes, group))
            .collect(),
        None => strokes
            .iter()
            .filter(|s| !s.points.is_empty())
            .map(|s| StrokeGroup {
                label: None,
                strokes: vec![s],
            })
            .collect(),
    }
}

fn resolve_group<'a>(strokes: &'a [Stroke], group: &TraceGroupRef) -> Option<StrokeGroup<'a>> {
    let members: Vec<&'a Stroke> = group
        .refs
        .iter()
        .filter_map(|r| r.trim().parse::<usize>().ok())
        .filter_map(|index| strokes.get(index))
        .collect();

    if members.is_empty() {
        debug!(
            "Dropping trace group {:?}: none of {:?} resolved",
            group.label, group.refs
        );
        return None;
    }

    Some(StrokeGroup {
        label: group.label.clone(),
        strokes: members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::trace::Point;

    fn stroke(id: &str, n: usize) -> Stroke {
        Stroke {
            id: id.to_string(),
            points: (0..n).map(|i| Point::new(i as f64, 0.0)).collect(),
        }
    }

    fn group(label: &str, refs: &[&str]) -> TraceGroupRef {
        TraceGroupRef {
            label: Some(label.to_string()),
            refs: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn without_segmentation_every_stroke_is_a_singleton() {
        let strokes = vec![stroke("0", 2), stroke("1", 1), stroke("2", 3)];
        let groups = resolve_groups(&strokes, None);
        assert_eq!(groups.len(), 3);
        for (g, s) in groups.iter().zip(&strokes) {
            assert_eq!(g.label, None);
            assert_eq!(g.strokes.len(), 1);
            assert!(std::ptr::eq(g.strokes[0], s));
        }
    }

    #[test]
    fn singleton_fallback_skips_empty_strokes() {
        let strokes = vec![stroke("0", 2), stroke("1", 0)];
        assert_eq!(resolve_groups(&strokes, None).len(), 1);
    }

    #[test]
    fn references_resolve_by_position_not_id() {
        let strokes = vec![stroke("10", 1), stroke("20", 2), stroke("30", 3)];
        let seg = vec![group("x", &["2", "0"])];
        let groups = resolve_groups(&strokes, Some(seg.as_slice()));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label.as_deref(), Some("x"));
        let ids: Vec<&str> = groups[0].strokes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["30", "10"]);
    }

    #[test]
    fn out_of_range_reference_is_ignored() {
        let strokes = vec![stroke("0", 2), stroke("1", 2), stroke("2", 2)];
        let seg = vec![group("+", &["1", "99"])];
        let groups = resolve_groups(&strokes, Some(seg.as_slice()));
        assert_eq!(groups[0].strokes.len(), 1);
        assert!(std::ptr::eq(groups[0].strokes[0], &strokes[1]));
    }

    #[test]
    fn unresolvable_group_is_dropped() {
        let strokes = vec![stroke("0", 2)];
        let seg = vec![group("a", &["99", "-1", "x"]), group("b", &["0"])];
        let groups = resolve_groups(&strokes, Some(seg.as_slice()));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label.as_deref(), Some("b"));
    }

    #[test]
    fn empty_segmentation_yields_no_groups() {
        let strokes = vec![stroke("0", 2)];
        assert!(resolve_groups(&strokes, Some(&[][..])).is_empty());
    }

    #[test]
    fn members_are_drawn_from_the_document() {
        let text = r#"<ink xmlns="http://www.w3.org/2003/InkML">
            <trace id="1">0 0, 1 1</trace><trace id="0">2 2, 3 3</trace>
            <traceGroup><traceGroup>
              <annotation type="truth">=</annotation>
              <traceView traceDataRef="0"/><traceView traceDataRef="1"/>
            </traceGroup></traceGroup></ink>"#;
        let doc = InkDocument::parse(text).unwrap();
        let groups = doc.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].point_count(), 4);
        // position 0 is the stroke with id "0" after numeric ordering
        assert_eq!(groups[0].strokes[0].id, "0");
        for member in &groups[0].strokes {
            assert!(doc.strokes.iter().any(|s| std::ptr::eq(s, *member)));
        }
    }
}
