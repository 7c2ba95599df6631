// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Knife points and hover classification.
//!
//! A click near overlapping paths can match several anchors or segments
//! at once, so every point keeps all of its candidates until the gesture
//! learns which path is meant.

use crate::settings::KnifeSettings;
use crate::shape::{AnchorIndex, HitTarget, PathIndex, Shape};
use kurbo::Point;

/// How a knife point attached to the shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// Not on the shape
    Free,
    /// Snapped to an anchor
    Anchor,
    /// Snapped to a segment
    Segment,
}

/// One shape element a knife point may refer to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub path: PathIndex,
    /// The anchor, or the starting anchor of the segment
    pub element: AnchorIndex,
    pub position: Point,
}

/// Classification of the current mouse position
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    /// Snapped position (the raw mouse position when `Free`)
    pub position: Point,
    pub kind: PointKind,
    /// Closest first
    pub candidates: Vec<Candidate>,
}

impl Hover {
    /// A hover that touches nothing
    pub fn free(position: Point) -> Self {
        Self {
            position,
            kind: PointKind::Free,
            candidates: Vec::new(),
        }
    }

    /// Classify `mouse` against `shape`, anchors first, then segments.
    ///
    /// With `only_path` set, elements of other paths are ignored.
    pub fn classify(shape: &Shape, mouse: Point, settings: &KnifeSettings, only_path: Option<PathIndex>) -> Self {
        let hits = shape.hit_test_all(
            mouse,
            settings.anchor_hit_radius,
            settings.segment_hit_radius,
            only_path,
            settings.max_candidates,
        );
        let Some(first) = hits.first() else {
            return Self::free(mouse);
        };
        let kind = match first.target {
            HitTarget::Anchor(_) => PointKind::Anchor,
            HitTarget::Segment(_) => PointKind::Segment,
        };
        Self {
            position: first.position,
            kind,
            candidates: hits
                .iter()
                .map(|hit| Candidate {
                    path: hit.path,
                    element: hit.target.index(),
                    position: hit.position,
                })
                .collect(),
        }
    }
}

/// A placed knife point
#[derive(Debug, Clone, PartialEq)]
pub struct KnifePoint {
    pub position: Point,
    pub kind: PointKind,
    pub candidates: Vec<Candidate>,
    /// Index into `candidates` once the intended path is known
    pub resolved: Option<usize>,
}

impl KnifePoint {
    pub fn from_hover(hover: &Hover) -> Self {
        Self {
            position: hover.position,
            kind: hover.kind,
            candidates: hover.candidates.clone(),
            resolved: None,
        }
    }

    /// Whether a resolution is still pending
    pub fn is_ambiguous(&self) -> bool {
        self.resolved.is_none() && !self.candidates.is_empty()
    }

    pub fn resolved_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.resolved?)
    }

    pub fn resolved_path(&self) -> Option<PathIndex> {
        self.resolved_candidate().map(|candidate| candidate.path)
    }

    /// Resolve to the candidate on `path`, if there is one.
    ///
    /// Returns whether the point is now resolved to `path`.
    pub fn resolve_to_path(&mut self, path: PathIndex) -> bool {
        match self.candidates.iter().position(|c| c.path == path) {
            Some(index) => {
                self.resolved = Some(index);
                true
            }
            None => false,
        }
    }
}
