// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Crossings between the knife polyline and shape segments.
//!
//! Segments are tested through their sample chains, so `t` is the
//! fractional position along the chain rather than the curve parameter.

use crate::settings::KnifeSettings;
use crate::shape::segment::{SAMPLE_SPANS, chain_t, sample_span};
use crate::shape::{AnchorIndex, PathIndex, Shape};
use kurbo::{Line, ParamCurve, Point};

/// Parametric slack at the ends of both lines
const RANGE_EPSILON: f64 = 1e-6;

/// Cross products smaller than this count as parallel
const PARALLEL_EPSILON: f64 = 1e-12;

/// A knife crossing of one shape segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    pub path: PathIndex,
    /// Starting anchor of the crossed segment
    pub segment: AnchorIndex,
    pub position: Point,
    /// Position along the segment's sample chain
    pub t: f64,
    /// Which knife segment (pair of consecutive points) crossed
    pub knife_segment: usize,
    /// Position along that knife segment
    pub knife_t: f64,
}

impl SegmentIntersection {
    /// Position along the whole knife polyline
    pub fn knife_order(&self) -> f64 {
        self.knife_segment as f64 + self.knife_t
    }
}

/// Find the intersection of two line segments.
///
/// Returns `(knife_t, segment_t)`, or `None` for parallel lines and
/// crossings outside either segment.
pub fn intersect_lines(knife: Line, segment: Line) -> Option<(f64, f64)> {
    let d1 = knife.p1 - knife.p0;
    let d2 = segment.p1 - segment.p0;
    let cross = d1.cross(d2);

    if cross.abs() < PARALLEL_EPSILON {
        return None;
    }

    let d = segment.p0 - knife.p0;
    let t1 = d.cross(d2) / cross;
    let t2 = d.cross(d1) / cross;

    let range = -RANGE_EPSILON..=1.0 + RANGE_EPSILON;
    if range.contains(&t1) && range.contains(&t2) {
        Some((t1.clamp(0.0, 1.0), t2.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Rebuild every crossing of the knife polyline `points` with the shape.
///
/// With `only_path` set, other paths are not tested. Crossings are kept in
/// discovery order: knife segment, then path, then shape segment. A
/// crossing is dropped when one on the same shape segment is within
/// `dedupe_t_epsilon`, or one on the same path sits at the same position.
pub fn find_intersections(
    shape: &Shape,
    points: &[Point],
    only_path: Option<PathIndex>,
    settings: &KnifeSettings,
) -> Vec<SegmentIntersection> {
    let mut found: Vec<SegmentIntersection> = Vec::new();

    for (knife_segment, pair) in points.windows(2).enumerate() {
        let knife = Line::new(pair[0], pair[1]);
        for (path_index, path) in shape.paths().iter().enumerate() {
            let path_index = path_index as PathIndex;
            if only_path.is_some_and(|only| only != path_index) {
                continue;
            }
            for segment in path.anchors() {
                let Some(samples) = shape.segment_samples(segment) else {
                    continue;
                };
                for span in 0..SAMPLE_SPANS {
                    let Some((knife_t, span_t)) = intersect_lines(knife, sample_span(samples, span)) else {
                        continue;
                    };
                    let hit = SegmentIntersection {
                        path: path_index,
                        segment,
                        position: knife.eval(knife_t),
                        t: chain_t(span, span_t),
                        knife_segment,
                        knife_t,
                    };
                    if !is_duplicate(&found, &hit, settings) {
                        found.push(hit);
                    }
                }
            }
        }
    }
    found
}

fn is_duplicate(found: &[SegmentIntersection], hit: &SegmentIntersection, settings: &KnifeSettings) -> bool {
    found.iter().any(|other| {
        other.path == hit.path
            && ((other.segment == hit.segment && (other.t - hit.t).abs() < settings.dedupe_t_epsilon)
                || other.position.distance(hit.position) < settings.point_epsilon)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::unit_square;

    #[test]
    fn crossing_lines() {
        let knife = Line::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let segment = Line::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        let (knife_t, segment_t) = intersect_lines(knife, segment).unwrap();
        assert!((knife_t - 0.5).abs() < 1e-12);
        assert!((segment_t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parallel_and_out_of_range() {
        let knife = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let parallel = Line::new(Point::new(0.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(intersect_lines(knife, parallel), None);

        let short = Line::new(Point::new(2.0, -1.0), Point::new(2.0, 1.0));
        assert_eq!(intersect_lines(knife, short), None);
    }

    #[test]
    fn knife_through_square_hits_two_edges() {
        let shape = unit_square();
        let points = [Point::new(0.5, -1.0), Point::new(0.5, 2.0)];
        let hits = find_intersections(&shape, &points, None, &KnifeSettings::default());
        assert_eq!(hits.len(), 2);
        let segments: Vec<AnchorIndex> = hits.iter().map(|h| h.segment).collect();
        assert!(segments.contains(&1) && segments.contains(&3));
        for hit in &hits {
            assert!((hit.t - 0.5).abs() < 1e-9);
            assert!((hit.position.x - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn endpoints_on_edges_register() {
        let shape = unit_square();
        let points = [Point::new(0.5, 0.0), Point::new(0.5, 1.0)];
        let hits = find_intersections(&shape, &points, None, &KnifeSettings::default());
        assert_eq!(hits.len(), 2);
        let mut knife_ts: Vec<f64> = hits.iter().map(|h| h.knife_t).collect();
        knife_ts.sort_by(f64::total_cmp);
        assert_eq!(knife_ts, vec![0.0, 1.0]);
    }

    #[test]
    fn crossing_at_an_anchor_counts_once() {
        let shape = unit_square();
        // Diagonal through the (0, 0) and (1, 1) corners.
        let points = [Point::new(-1.0, -1.0), Point::new(2.0, 2.0)];
        let hits = find_intersections(&shape, &points, None, &KnifeSettings::default());
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn near_hits_on_one_segment_are_merged() {
        let shape = unit_square();
        // Zig-zag crossing the top edge twice, 0.004 apart.
        let points = [
            Point::new(0.498, 0.9),
            Point::new(0.5, 1.1),
            Point::new(0.502, 0.9),
        ];
        let hits = find_intersections(&shape, &points, None, &KnifeSettings::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].segment, 1);
    }

    #[test]
    fn path_filter_limits_search() {
        let shape = unit_square();
        let points = [Point::new(0.5, -1.0), Point::new(0.5, 2.0)];
        let hits = find_intersections(&shape, &points, Some(1), &KnifeSettings::default());
        assert!(hits.is_empty());
    }
}
