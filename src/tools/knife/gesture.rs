// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The state of one knife gesture: placed points, the path the gesture
//! targets, and the crossings of the knife polyline with the shape.
//!
//! A gesture is a value. Adding or removing a point builds the next
//! gesture from the current one, and the tool swaps it in; nothing else
//! writes to it.

use super::intersect::{SegmentIntersection, find_intersections};
use super::point::{Hover, KnifePoint};
use crate::settings::KnifeSettings;
use crate::shape::{PathIndex, Shape};
use kurbo::Point;
use thiserror::Error;

/// Why a point was not added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PointRejected {
    #[error("knife already has {0} points")]
    AtCapacity(usize),
    #[error("point coincides with the previous point")]
    Duplicate,
    #[error("no hover position to place")]
    NoHover,
}

/// Points, resolved path and intersections of one gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnifeGesture {
    points: Vec<KnifePoint>,
    resolved_path: Option<PathIndex>,
    intersections: Vec<SegmentIntersection>,
}

impl KnifeGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[KnifePoint] {
        &self.points
    }

    pub fn intersections(&self) -> &[SegmentIntersection] {
        &self.intersections
    }

    /// The path this gesture cuts, once known
    pub fn resolved_path(&self) -> Option<PathIndex> {
        self.resolved_path
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Knife point positions in placement order
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|point| point.position).collect()
    }

    /// The gesture with `hover` appended as a new point
    pub fn with_point(&self, hover: &Hover, shape: &Shape, settings: &KnifeSettings) -> Result<Self, PointRejected> {
        if self.points.len() >= settings.max_points {
            return Err(PointRejected::AtCapacity(self.points.len()));
        }
        if self
            .points
            .last()
            .is_some_and(|last| last.position.distance(hover.position) < settings.point_epsilon)
        {
            return Err(PointRejected::Duplicate);
        }

        let mut next = self.clone();
        let mut point = KnifePoint::from_hover(hover);
        let mut newly_resolved = false;

        match (point.candidates.len(), next.resolved_path) {
            (1, None) => {
                point.resolved = Some(0);
                next.resolved_path = Some(point.candidates[0].path);
                newly_resolved = true;
            }
            (1, Some(_)) => {
                point.resolved = Some(0);
            }
            (_, Some(path)) => {
                point.resolve_to_path(path);
            }
            _ => {}
        }
        next.points.push(point);

        if newly_resolved {
            next.try_resolve_ambiguous_points();
        }
        next.recalculate_intersections(shape, settings);
        Ok(next)
    }

    /// The gesture without its last point.
    ///
    /// Resolution is rebuilt from the remaining points, so a resolution
    /// that came from the removed point is forgotten. Only points with a
    /// single candidate keep theirs; the rest are resolved again.
    pub fn without_last_point(&self, shape: &Shape, settings: &KnifeSettings) -> Self {
        let mut next = self.clone();
        next.points.pop();
        for point in next.points.iter_mut().filter(|point| point.candidates.len() > 1) {
            point.resolved = None;
        }
        next.resolved_path = next.points.iter().find_map(KnifePoint::resolved_path);
        next.try_resolve_ambiguous_points();
        next.recalculate_intersections(shape, settings);
        next
    }

    /// Resolve every ambiguous point that has a candidate on the resolved
    /// path. Points already resolved are left alone.
    pub fn try_resolve_ambiguous_points(&mut self) {
        let Some(path) = self.resolved_path else {
            return;
        };
        for point in self.points.iter_mut().filter(|point| point.is_ambiguous()) {
            point.resolve_to_path(path);
        }
    }

    /// Fall back to the first candidate for every point still ambiguous
    pub fn force_resolve(&mut self) {
        for point in self.points.iter_mut().filter(|point| point.is_ambiguous()) {
            point.resolved = Some(0);
        }
    }

    /// Rebuild the intersection list from scratch
    fn recalculate_intersections(&mut self, shape: &Shape, settings: &KnifeSettings) {
        let positions = self.positions();
        self.intersections = find_intersections(shape, &positions, self.resolved_path, settings);
        if self.resolved_path.is_none() {
            if let Some(first) = self.intersections.first() {
                self.resolved_path = Some(first.path);
                self.try_resolve_ambiguous_points();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::knife::point::PointKind;

    fn settings() -> KnifeSettings {
        KnifeSettings {
            anchor_hit_radius: 0.05,
            segment_hit_radius: 0.05,
            ..KnifeSettings::default()
        }
    }

    /// Two squares sharing the corner (1, 1)
    fn corner_sharing_squares() -> Shape {
        Shape::from_polygons(&[
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 0.0),
            ],
            &[
                Point::new(1.0, 1.0),
                Point::new(1.0, 2.0),
                Point::new(2.0, 2.0),
                Point::new(2.0, 1.0),
            ],
        ])
        .unwrap()
    }

    fn add(gesture: &KnifeGesture, shape: &Shape, at: Point) -> KnifeGesture {
        let hover = Hover::classify(shape, at, &settings(), gesture.resolved_path());
        gesture.with_point(&hover, shape, &settings()).unwrap()
    }

    #[test]
    fn single_candidate_resolves_gesture() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(0.0, 0.5));
        assert_eq!(gesture.points()[0].kind, PointKind::Segment);
        assert_eq!(gesture.resolved_path(), Some(0));
        assert_eq!(gesture.points()[0].resolved, Some(0));
    }

    #[test]
    fn later_resolution_propagates_backwards() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(1.0, 1.0));
        assert!(gesture.points()[0].is_ambiguous());
        assert_eq!(gesture.resolved_path(), None);

        // The right edge of the second square has a single candidate.
        let gesture = add(&gesture, &shape, Point::new(2.0, 1.5));
        assert_eq!(gesture.resolved_path(), Some(1));
        assert_eq!(gesture.points()[0].resolved_path(), Some(1));

        let gesture = gesture.without_last_point(&shape, &settings());
        assert_eq!(gesture.resolved_path(), None);
        assert!(gesture.points()[0].is_ambiguous());
    }

    #[test]
    fn duplicate_and_capacity_rejections() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(5.0, 5.0));
        let hover = Hover::free(Point::new(5.0, 5.0));
        assert_eq!(gesture.with_point(&hover, &shape, &settings()), Err(PointRejected::Duplicate));

        let capped = KnifeSettings {
            max_points: 1,
            ..settings()
        };
        let hover = Hover::free(Point::new(6.0, 6.0));
        assert_eq!(gesture.with_point(&hover, &shape, &capped), Err(PointRejected::AtCapacity(1)));
    }

    #[test]
    fn resolving_twice_changes_nothing() {
        let shape = corner_sharing_squares();
        let mut gesture = add(&KnifeGesture::new(), &shape, Point::new(1.0, 1.0));
        gesture = add(&gesture, &shape, Point::new(2.0, 1.5));
        gesture.try_resolve_ambiguous_points();
        let once = gesture.clone();
        gesture.try_resolve_ambiguous_points();
        assert_eq!(gesture, once);
    }

    #[test]
    fn first_intersection_resolves_gesture() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(0.5, -1.0));
        assert_eq!(gesture.resolved_path(), None);
        let gesture = add(&gesture, &shape, Point::new(0.5, 3.0));
        assert_eq!(gesture.resolved_path(), Some(0));
        assert_eq!(gesture.intersections().len(), 2);
        assert!(gesture.intersections().iter().all(|hit| hit.path == 0));
    }

    #[test]
    fn removing_the_deciding_point_unsets_resolution() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(3.0, 3.0));
        let gesture = add(&gesture, &shape, Point::new(1.0, 1.0));
        // The knife ends on the shared corner; its crossing decides a path.
        assert!(gesture.resolved_path().is_some());

        let gesture = gesture.without_last_point(&shape, &settings());
        assert_eq!(gesture.points().len(), 1);
        assert_eq!(gesture.resolved_path(), None);
        assert!(gesture.intersections().is_empty());
    }

    #[test]
    fn removing_keeps_resolution_from_remaining_points() {
        let shape = corner_sharing_squares();
        let gesture = add(&KnifeGesture::new(), &shape, Point::new(0.0, 0.5));
        let gesture = add(&gesture, &shape, Point::new(0.5, 0.5));
        let gesture = gesture.without_last_point(&shape, &settings());
        assert_eq!(gesture.resolved_path(), Some(0));
    }
}
