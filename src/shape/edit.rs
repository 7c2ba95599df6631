// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Structural mutators for `Shape`.
//!
//! Any call here may shift anchor and path indices. Callers holding
//! indices from before a mutation must look them up again by position.

use super::{Anchor, AnchorIndex, FillColor, PathIndex, PathInfo, Shape};
use crate::error::ShapeError;
use crate::settings::shape::{MAX_SEGMENT_SAMPLES, MIN_PATH_ANCHORS};
use kurbo::Point;

impl Shape {
    /// Insert a straight anchor right after `after` in the same path
    pub fn insert_anchor_raw(&mut self, after: AnchorIndex, position: Point) -> Result<AnchorIndex, ShapeError> {
        let first = self.insert_anchors_raw(after, &[position])?;
        Ok(first)
    }

    /// Insert straight anchors after `after`, in order.
    ///
    /// Returns the index of the first inserted anchor.
    pub fn insert_anchors_raw(&mut self, after: AnchorIndex, positions: &[Point]) -> Result<AnchorIndex, ShapeError> {
        let path = self
            .path_of_anchor(after)
            .ok_or(ShapeError::NoSuchAnchor(after))?;
        self.check_anchor_capacity(positions.len())?;

        let at = usize::from(after) + 1;
        let count = positions.len() as u16;
        for (offset, position) in positions.iter().enumerate() {
            self.anchors.insert(at + offset, Anchor::new(*position));
            self.samples.insert(at + offset, [*position; MAX_SEGMENT_SAMPLES]);
        }
        self.paths[usize::from(path)].anchor_count += count;
        for later in self.paths.iter_mut().skip(usize::from(path) + 1) {
            later.anchor_start += count;
        }
        self.refresh_path_samples(path);
        Ok(at as AnchorIndex)
    }

    /// Append an empty path; anchors are added with `add_anchor`
    pub fn add_path(&mut self, fill: FillColor) -> Result<PathIndex, ShapeError> {
        self.check_path_capacity()?;
        self.paths.push(PathInfo {
            fill,
            anchor_start: self.anchors.len() as AnchorIndex,
            anchor_count: 0,
        });
        Ok((self.paths.len() - 1) as PathIndex)
    }

    /// Append an anchor at the end of `path`'s ring
    pub fn add_anchor(&mut self, path: PathIndex, position: Point, curve: f64) -> Result<AnchorIndex, ShapeError> {
        let info = *self.path(path).ok_or(ShapeError::NoSuchPath(path))?;
        self.check_anchor_capacity(1)?;

        let at = usize::from(info.anchor_end());
        self.anchors.insert(at, Anchor::with_curve(position, curve));
        self.samples.insert(at, [position; MAX_SEGMENT_SAMPLES]);
        self.paths[usize::from(path)].anchor_count += 1;
        for later in self.paths.iter_mut().skip(usize::from(path) + 1) {
            later.anchor_start += 1;
        }
        self.refresh_path_samples(path);
        Ok(at as AnchorIndex)
    }

    /// Split the segment starting at `segment` by inserting an anchor
    pub fn split_segment_at_point(&mut self, segment: AnchorIndex, position: Point) -> Result<AnchorIndex, ShapeError> {
        self.insert_anchor_raw(segment, position)
    }

    /// Split `path` into two closed paths between two of its anchors.
    ///
    /// The first new path runs `head -> tail` along the ring, the second
    /// `tail -> head`; both close through `intermediates`, which are given
    /// in `head -> tail` order unless `reversed`. Anchors ending on the cut
    /// edge get zero curvature. The original path is deleted before the
    /// new ones are appended, so its index and every later path index
    /// shift down by one.
    pub fn split_path_at_anchors(
        &mut self,
        path: PathIndex,
        head: AnchorIndex,
        tail: AnchorIndex,
        intermediates: &[Point],
        reversed: bool,
    ) -> Result<(PathIndex, PathIndex), ShapeError> {
        let info = *self.path(path).ok_or(ShapeError::NoSuchPath(path))?;
        for anchor in [head, tail] {
            if !info.contains(anchor) {
                return Err(ShapeError::NoSuchAnchor(anchor));
            }
        }

        let mut forward: Vec<Point> = intermediates.to_vec();
        if reversed {
            forward.reverse();
        }
        let mut backward = forward.clone();
        backward.reverse();

        let first = self.ring_arc(&info, head, tail, &backward);
        let second = self.ring_arc(&info, tail, head, &forward);
        let shortest = first.len().min(second.len());
        if shortest < MIN_PATH_ANCHORS || head == tail {
            return Err(ShapeError::DegeneratePath(shortest));
        }
        self.check_path_capacity()?;
        self.check_anchor_capacity(2 + 2 * intermediates.len())?;

        self.clear_selection();
        for anchor in info.anchors() {
            self.set_anchor_selected(anchor, true);
        }
        self.delete_anchors();

        let one = self.add_path(info.fill)?;
        for anchor in &first {
            self.add_anchor(one, anchor.position, anchor.curve)?;
        }
        let two = self.add_path(info.fill)?;
        for anchor in &second {
            self.add_anchor(two, anchor.position, anchor.curve)?;
        }
        Ok((one, two))
    }

    /// Anchors from `from` to `to` along the ring, closed by `closing`
    fn ring_arc(&self, info: &PathInfo, from: AnchorIndex, to: AnchorIndex, closing: &[Point]) -> Vec<Anchor> {
        let count = usize::from(info.anchor_count);
        let start = info.local_index(from);
        let span = (info.local_index(to) + count - start) % count;

        let mut arc: Vec<Anchor> = (0..=span)
            .map(|step| {
                let anchor = self.anchors[usize::from(info.ring_anchor(start + step))];
                Anchor::with_curve(anchor.position, anchor.curve)
            })
            .collect();
        if let Some(last) = arc.last_mut() {
            last.curve = 0.0;
        }
        arc.extend(closing.iter().copied().map(Anchor::new));
        arc
    }

    /// Delete all selected anchors; paths left empty are removed
    pub fn delete_anchors(&mut self) {
        let mut kept_anchors = Vec::with_capacity(self.anchors.len());
        let mut kept_paths = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let start = kept_anchors.len();
            kept_anchors.extend(
                self.anchors[usize::from(path.anchor_start)..usize::from(path.anchor_end())]
                    .iter()
                    .filter(|anchor| !anchor.selected)
                    .copied(),
            );
            let count = kept_anchors.len() - start;
            if count > 0 {
                kept_paths.push(PathInfo {
                    fill: path.fill,
                    anchor_start: start as AnchorIndex,
                    anchor_count: count as u16,
                });
            }
        }
        self.anchors = kept_anchors;
        self.paths = kept_paths;
        self.update_samples();
    }

    pub fn set_anchor_selected(&mut self, index: AnchorIndex, selected: bool) {
        if let Some(anchor) = self.anchors.get_mut(usize::from(index)) {
            anchor.selected = selected;
        }
    }

    pub fn clear_selection(&mut self) {
        for anchor in &mut self.anchors {
            anchor.selected = false;
        }
    }

    /// Exact anchor of `path` sitting at `position`, if any
    pub fn find_anchor_at(&self, path: PathIndex, position: Point, tolerance: f64) -> Option<AnchorIndex> {
        let info = self.path(path)?;
        info.anchors().find(|&i| {
            self.anchors[usize::from(i)].position.distance(position) <= tolerance
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::unit_square;

    #[test]
    fn insert_shifts_later_paths() {
        let mut shape = Shape::from_polygons(&[
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            &[Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(5.0, 6.0)],
        ])
        .unwrap();
        let inserted = shape.insert_anchor_raw(0, Point::new(0.5, 0.0)).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(shape.path(0).unwrap().anchor_count, 4);
        assert_eq!(shape.path(1).unwrap().anchor_start, 4);
        assert_eq!(shape.next_anchor(3), Some(0));
        let samples = shape.segment_samples(0).unwrap();
        assert_eq!(samples[samples.len() - 1], Point::new(0.5, 0.0));
    }

    #[test]
    fn insert_several_keeps_order() {
        let mut shape = unit_square();
        let first = shape
            .insert_anchors_raw(1, &[Point::new(0.25, 1.0), Point::new(0.75, 1.0)])
            .unwrap();
        assert_eq!(first, 2);
        let positions = shape.path_positions(0).unwrap();
        assert_eq!(positions[2], Point::new(0.25, 1.0));
        assert_eq!(positions[3], Point::new(0.75, 1.0));
        assert_eq!(positions[4], Point::new(1.0, 1.0));
    }

    #[test]
    fn delete_removes_empty_paths() {
        let mut shape = Shape::from_polygons(&[
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            &[Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(5.0, 6.0)],
        ])
        .unwrap();
        for i in 0..3 {
            shape.set_anchor_selected(i, true);
        }
        shape.delete_anchors();
        assert_eq!(shape.path_count(), 1);
        assert_eq!(shape.path(0).unwrap().anchor_start, 0);
        assert_eq!(shape.anchor(0).unwrap().position, Point::new(5.0, 5.0));
    }

    #[test]
    fn split_square_along_diagonal() {
        let mut shape = unit_square();
        let (one, two) = shape.split_path_at_anchors(0, 0, 2, &[], false).unwrap();
        assert_eq!(shape.path_count(), 2);
        assert_eq!(shape.path(one).unwrap().anchor_count, 3);
        assert_eq!(shape.path(two).unwrap().anchor_count, 3);
        let total = shape.path_area(one).unwrap().abs() + shape.path_area(two).unwrap().abs();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn split_adjacent_anchors_is_degenerate() {
        let mut shape = unit_square();
        let before = shape.clone();
        assert_eq!(
            shape.split_path_at_anchors(0, 0, 1, &[], false),
            Err(ShapeError::DegeneratePath(2))
        );
        assert_eq!(shape, before);
    }

    #[test]
    fn split_with_intermediate_points() {
        let mut shape = unit_square();
        let (one, two) = shape
            .split_path_at_anchors(0, 0, 2, &[Point::new(0.6, 0.4)], false)
            .unwrap();
        assert_eq!(shape.path(one).unwrap().anchor_count, 4);
        assert_eq!(shape.path(two).unwrap().anchor_count, 4);
        let total = shape.path_area(one).unwrap().abs() + shape.path_area(two).unwrap().abs();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn split_resets_cut_edge_curvature() {
        let mut shape = Shape::new();
        let anchors = [
            Anchor::with_curve(Point::new(0.0, 0.0), 0.2),
            Anchor::with_curve(Point::new(0.0, 1.0), 0.2),
            Anchor::with_curve(Point::new(1.0, 1.0), 0.2),
            Anchor::with_curve(Point::new(1.0, 0.0), 0.2),
        ];
        shape.push_path(FillColor::BLACK, &anchors).unwrap();
        let (one, two) = shape.split_path_at_anchors(0, 0, 2, &[], false).unwrap();
        let one = *shape.path(one).unwrap();
        let two = *shape.path(two).unwrap();
        // Ring starts keep their outgoing curve, ring ends face the cut.
        assert_eq!(shape.anchor(one.anchor_start).unwrap().curve, 0.2);
        assert_eq!(shape.anchor(one.anchor_end() - 1).unwrap().curve, 0.0);
        assert_eq!(shape.anchor(two.anchor_start).unwrap().curve, 0.2);
        assert_eq!(shape.anchor(two.anchor_end() - 1).unwrap().curve, 0.0);
    }
}
