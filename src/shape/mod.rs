// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shape geometry store: closed paths over a flat anchor array.
//!
//! Each `PathInfo` owns a contiguous range of `anchors`; the segment
//! starting at anchor `i` runs to `next_anchor(i)`, wrapping inside its
//! path. Every segment keeps a cached sample chain (`segment_samples`)
//! which hit testing and the knife use instead of the analytic curve.
//! Mutators in `edit.rs` keep the sample cache in step with the anchors;
//! bounds are only refreshed by `update_bounds`.

pub mod anchor;
pub mod data;
pub mod edit;
pub mod segment;

pub use anchor::{Anchor, AnchorIndex, FillColor, PathIndex, PathInfo};
pub use data::{PathData, ShapeData};
pub use hit_test::{Hit, HitTarget, Location};
pub use segment::SegmentSamples;

use crate::error::ShapeError;
use crate::settings::shape::{MAX_ANCHORS, MAX_PATHS, MIN_PATH_ANCHORS};
use kurbo::{BezPath, Point, Rect};

/// A multi-path vector shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    paths: Vec<PathInfo>,
    anchors: Vec<Anchor>,
    samples: Vec<SegmentSamples>,
    bounds: Rect,
}

impl Shape {
    /// Create an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closed path built from `anchors`
    pub fn push_path(&mut self, fill: FillColor, anchors: &[Anchor]) -> Result<PathIndex, ShapeError> {
        if anchors.len() < MIN_PATH_ANCHORS {
            return Err(ShapeError::DegeneratePath(anchors.len()));
        }
        if self.anchors.len() + anchors.len() > MAX_ANCHORS {
            return Err(ShapeError::AnchorCapacity(MAX_ANCHORS));
        }
        let path = self.add_path(fill)?;
        for anchor in anchors {
            self.add_anchor(path, anchor.position, anchor.curve)?;
        }
        self.update_bounds();
        Ok(path)
    }

    /// Build a shape from straight-edged polygons, one path each
    pub fn from_polygons(polygons: &[&[Point]]) -> Result<Self, ShapeError> {
        let mut shape = Self::new();
        for polygon in polygons {
            let anchors: Vec<Anchor> = polygon.iter().copied().map(Anchor::new).collect();
            shape.push_path(FillColor::default(), &anchors)?;
        }
        Ok(shape)
    }

    // ===== Queries =====

    /// All paths in drawing order
    pub fn paths(&self) -> &[PathInfo] {
        &self.paths
    }

    /// The flat anchor array
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn path(&self, index: PathIndex) -> Option<&PathInfo> {
        self.paths.get(usize::from(index))
    }

    pub fn anchor(&self, index: AnchorIndex) -> Option<&Anchor> {
        self.anchors.get(usize::from(index))
    }

    /// Successor of `index` within its path, wrapping at the end
    pub fn next_anchor(&self, index: AnchorIndex) -> Option<AnchorIndex> {
        let path = self.path(self.path_of_anchor(index)?)?;
        let next = index + 1;
        Some(if next == path.anchor_end() {
            path.anchor_start
        } else {
            next
        })
    }

    /// The path owning anchor `index`
    pub fn path_of_anchor(&self, index: AnchorIndex) -> Option<PathIndex> {
        self.paths
            .iter()
            .position(|path| path.contains(index))
            .map(|i| i as PathIndex)
    }

    /// Cached samples of the segment starting at `index`
    pub fn segment_samples(&self, index: AnchorIndex) -> Option<&SegmentSamples> {
        self.samples.get(usize::from(index))
    }

    /// Anchor positions of a path in ring order
    pub fn path_positions(&self, index: PathIndex) -> Option<Vec<Point>> {
        let path = self.path(index)?;
        Some(
            path.anchors()
                .map(|i| self.anchors[usize::from(i)].position)
                .collect(),
        )
    }

    /// Bounds as of the last `update_bounds`
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The path as a closed kurbo bezier path
    pub fn to_bezpath(&self, index: PathIndex) -> Option<BezPath> {
        let path = self.path(index)?;
        let mut bez = BezPath::new();
        for (n, anchor_index) in path.anchors().enumerate() {
            let anchor = &self.anchors[usize::from(anchor_index)];
            if n == 0 {
                bez.move_to(anchor.position);
            }
            let next = self.next_anchor(anchor_index)?;
            let end = self.anchors[usize::from(next)].position;
            if anchor.curve == 0.0 {
                bez.line_to(end);
            } else {
                let quad = segment::segment_curve(anchor.position, end, anchor.curve);
                bez.quad_to(quad.p1, quad.p2);
            }
        }
        bez.close_path();
        Some(bez)
    }

    /// Signed enclosed area of a path
    pub fn path_area(&self, index: PathIndex) -> Option<f64> {
        use kurbo::Shape as _;
        self.to_bezpath(index).map(|bez| bez.area())
    }

    // ===== Cache maintenance =====

    /// Recompute every segment's sample chain
    pub fn update_samples(&mut self) {
        self.samples = (0..self.anchors.len())
            .map(|i| self.compute_samples(i as AnchorIndex))
            .collect();
    }

    /// Recompute the shape bounds from the sample chains
    pub fn update_bounds(&mut self) {
        let mut points = self.samples.iter().flat_map(|chain| chain.iter());
        self.bounds = match points.next() {
            Some(first) => points.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
            None => Rect::ZERO,
        };
    }

    fn compute_samples(&self, index: AnchorIndex) -> SegmentSamples {
        let anchor = &self.anchors[usize::from(index)];
        let next = self.next_anchor(index).unwrap_or(index);
        segment::sample_segment(
            anchor.position,
            self.anchors[usize::from(next)].position,
            anchor.curve,
        )
    }

    /// Refresh the sample chains of one path
    fn refresh_path_samples(&mut self, index: PathIndex) {
        if let Some(path) = self.path(index).copied() {
            for anchor in path.anchors() {
                self.samples[usize::from(anchor)] = self.compute_samples(anchor);
            }
        }
    }

    pub(crate) fn check_path_capacity(&self) -> Result<(), ShapeError> {
        if self.paths.len() >= MAX_PATHS {
            Err(ShapeError::PathCapacity(MAX_PATHS))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_anchor_capacity(&self, extra: usize) -> Result<(), ShapeError> {
        if self.anchors.len() + extra > MAX_ANCHORS {
            Err(ShapeError::AnchorCapacity(MAX_ANCHORS))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unit square, anchors counter-clockwise in y-down screen terms
    pub(crate) fn unit_square() -> Shape {
        Shape::from_polygons(&[&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]])
        .unwrap()
    }

    #[test]
    fn push_path_rejects_degenerate() {
        let mut shape = Shape::new();
        let anchors = [Anchor::new(Point::ZERO), Anchor::new(Point::new(1.0, 0.0))];
        assert_eq!(
            shape.push_path(FillColor::BLACK, &anchors),
            Err(ShapeError::DegeneratePath(2))
        );
        assert_eq!(shape.path_count(), 0);
    }

    #[test]
    fn next_anchor_wraps_within_path() {
        let shape = Shape::from_polygons(&[
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            &[Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(5.0, 6.0)],
        ])
        .unwrap();
        assert_eq!(shape.next_anchor(2), Some(0));
        assert_eq!(shape.next_anchor(3), Some(4));
        assert_eq!(shape.next_anchor(5), Some(3));
        assert_eq!(shape.path_of_anchor(4), Some(1));
        assert_eq!(shape.next_anchor(6), None);
    }

    #[test]
    fn square_area_and_bounds() {
        let shape = unit_square();
        let area = shape.path_area(0).unwrap();
        assert!((area.abs() - 1.0).abs() < 1e-9);
        assert_eq!(shape.bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn samples_follow_segments() {
        let shape = unit_square();
        let samples = shape.segment_samples(1).unwrap();
        assert_eq!(samples[0], Point::new(0.0, 1.0));
        assert_eq!(samples[samples.len() - 1], Point::new(1.0, 1.0));
    }
}
