// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Anchor and path records stored in a `Shape`

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Index into a shape's path list
pub type PathIndex = u16;

/// Index into a shape's flat anchor array.
///
/// A segment is named by the index of its starting anchor.
pub type AnchorIndex = u16;

/// A control point of a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Position in local space
    pub position: Point,
    /// Bulge of the outgoing segment, as a fraction of its length.
    ///
    /// Zero is a straight segment.
    #[serde(default)]
    pub curve: f64,
    /// Selection flag, consumed by `Shape::delete_anchors`
    #[serde(skip)]
    pub selected: bool,
}

impl Anchor {
    /// A straight-edged, unselected anchor
    pub fn new(position: Point) -> Self {
        Self {
            position,
            curve: 0.0,
            selected: false,
        }
    }

    /// An unselected anchor with curvature
    pub fn with_curve(position: Point, curve: f64) -> Self {
        Self {
            position,
            curve,
            selected: false,
        }
    }
}

/// RGBA fill color of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FillColor(pub [u8; 4]);

impl FillColor {
    pub const BLACK: FillColor = FillColor([0, 0, 0, 255]);
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A closed path owning a contiguous range of the anchor array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathInfo {
    pub fill: FillColor,
    pub anchor_start: AnchorIndex,
    pub anchor_count: u16,
}

impl PathInfo {
    /// One past the last anchor of this path
    pub fn anchor_end(&self) -> AnchorIndex {
        self.anchor_start + self.anchor_count
    }

    /// Whether `anchor` belongs to this path
    pub fn contains(&self, anchor: AnchorIndex) -> bool {
        anchor >= self.anchor_start && anchor < self.anchor_end()
    }

    /// Iterate the anchor indices of this path in ring order
    pub fn anchors(&self) -> std::ops::Range<AnchorIndex> {
        self.anchor_start..self.anchor_end()
    }

    /// Anchor index of local ring position `local`, wrapping around
    pub fn ring_anchor(&self, local: usize) -> AnchorIndex {
        let count = usize::from(self.anchor_count.max(1));
        self.anchor_start + (local % count) as u16
    }

    /// Local ring position of `anchor`
    pub fn local_index(&self, anchor: AnchorIndex) -> usize {
        usize::from(anchor - self.anchor_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_wraps() {
        let path = PathInfo {
            fill: FillColor::BLACK,
            anchor_start: 4,
            anchor_count: 3,
        };
        assert_eq!(path.ring_anchor(0), 4);
        assert_eq!(path.ring_anchor(3), 4);
        assert_eq!(path.ring_anchor(5), 6);
        assert_eq!(path.local_index(6), 2);
        assert!(path.contains(6));
        assert!(!path.contains(7));
        assert_eq!(path.anchors().collect::<Vec<_>>(), vec![4, 5, 6]);
    }
}
