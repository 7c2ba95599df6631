// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The knife tool for cutting paths
//!
//! A gesture is a polyline of clicks. Each click snaps to an anchor or a
//! segment when close enough, or stays free. Committing applies the cut
//! to the shape in one undo step; cancelling leaves the shape untouched.

pub mod commit;
pub mod gesture;
pub mod intersect;
pub mod point;

pub use commit::{AbortReason, CommitOutcome, CutStrategy, commit_gesture};
pub use gesture::{KnifeGesture, PointRejected};
pub use intersect::SegmentIntersection;
pub use point::{Candidate, Hover, KnifePoint, PointKind};

use crate::editing::{DocumentHooks, EditType};
use crate::settings::KnifeSettings;
use crate::shape::{PathIndex, Shape};
use crate::tools::{Tool, ToolId};
use kurbo::Point;

/// The knife tool for cutting paths
#[derive(Debug, Clone, Default)]
pub struct KnifeTool {
    settings: KnifeSettings,
    /// Current gesture state
    gesture: KnifeGesture,
    /// Classification of the last mouse position
    hover: Option<Hover>,
}

impl KnifeTool {
    pub fn new(settings: KnifeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &KnifeSettings {
        &self.settings
    }

    pub fn gesture(&self) -> &KnifeGesture {
        &self.gesture
    }

    pub fn points(&self) -> &[KnifePoint] {
        self.gesture.points()
    }

    pub fn intersections(&self) -> &[SegmentIntersection] {
        self.gesture.intersections()
    }

    pub fn resolved_path(&self) -> Option<PathIndex> {
        self.gesture.resolved_path()
    }

    pub fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }

    /// Classify the mouse position, limited to the resolved path once
    /// the gesture has one
    pub fn update_hover(&mut self, shape: &Shape, mouse: Point) -> &Hover {
        let hover = Hover::classify(shape, mouse, &self.settings, self.gesture.resolved_path());
        self.hover.insert(hover)
    }

    /// Place a knife point at the current hover
    pub fn add_point(&mut self, shape: &Shape) -> Result<(), PointRejected> {
        let hover = self.hover.as_ref().ok_or(PointRejected::NoHover)?;
        let was_resolved = self.gesture.resolved_path();
        match self.gesture.with_point(hover, shape, &self.settings) {
            Ok(next) => {
                tracing::debug!(
                    "Knife point {} at {:?} ({:?}, {} candidates)",
                    next.points().len() - 1,
                    hover.position,
                    hover.kind,
                    hover.candidates.len()
                );
                if was_resolved.is_none() {
                    if let Some(path) = next.resolved_path() {
                        tracing::debug!("Knife gesture resolved to path {}", path);
                    }
                }
                self.gesture = next;
                Ok(())
            }
            Err(err) => {
                tracing::debug!("Knife point rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Hover at `position` and place a point there
    pub fn click(&mut self, shape: &Shape, position: Point) -> Result<(), PointRejected> {
        self.update_hover(shape, position);
        self.add_point(shape)
    }

    /// Undo the last placed point. Returns false if there was none.
    pub fn remove_last_point(&mut self, shape: &Shape) -> bool {
        if self.gesture.is_empty() {
            return false;
        }
        self.gesture = self.gesture.without_last_point(shape, &self.settings);
        tracing::debug!(
            "Removed knife point, {} left, resolved path {:?}",
            self.gesture.points().len(),
            self.gesture.resolved_path()
        );
        true
    }

    /// Drop the gesture without touching the shape
    pub fn cancel(&mut self) {
        if !self.gesture.is_empty() {
            tracing::debug!("Knife gesture cancelled with {} points", self.gesture.points().len());
        }
        self.gesture = KnifeGesture::new();
        self.hover = None;
    }

    /// Apply the gesture to `shape` and start over
    pub fn commit<H: DocumentHooks + ?Sized>(&mut self, shape: &mut Shape, hooks: &mut H) -> CommitOutcome {
        let gesture = std::mem::take(&mut self.gesture);
        self.hover = None;
        let outcome = commit_gesture(&gesture, shape, hooks, &self.settings);
        match &outcome {
            CommitOutcome::Committed {
                strategy,
                cuts_applied,
                cuts_skipped,
            } => tracing::info!(
                "Knife commit ({:?}): {} cuts applied, {} skipped, {} paths now",
                strategy,
                cuts_applied,
                cuts_skipped,
                shape.path_count()
            ),
            CommitOutcome::Aborted(reason) => tracing::info!("Knife commit aborted: {:?}", reason),
        }
        outcome
    }
}

impl Tool for KnifeTool {
    fn id(&self) -> ToolId {
        ToolId::Knife
    }

    fn edit_type(&self) -> Option<EditType> {
        if self.gesture.is_empty() {
            None
        } else {
            Some(EditType::Normal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::NoopHooks;
    use crate::editing::document::RecordingHooks;
    use crate::shape::tests::unit_square;

    fn tool() -> KnifeTool {
        KnifeTool::new(KnifeSettings {
            anchor_hit_radius: 0.05,
            segment_hit_radius: 0.05,
            ..KnifeSettings::default()
        })
    }

    fn two_squares() -> Shape {
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

    #[test]
    fn hover_snaps_and_filters() {
        let shape = two_squares();
        let mut tool = tool();
        let hover = tool.update_hover(&shape, Point::new(1.01, 1.0));
        assert_eq!(hover.kind, PointKind::Anchor);
        assert_eq!(hover.candidates.len(), 2);

        tool.click(&shape, Point::new(2.0, 1.5)).unwrap();
        assert_eq!(tool.resolved_path(), Some(1));
        let hover = tool.update_hover(&shape, Point::new(1.01, 1.0));
        assert_eq!(hover.candidates.len(), 1);
        assert_eq!(hover.candidates[0].path, 1);
    }

    #[test]
    fn add_point_needs_a_hover() {
        let shape = unit_square();
        let mut tool = tool();
        assert_eq!(tool.add_point(&shape), Err(PointRejected::NoHover));
        assert!(tool.points().is_empty());
    }

    #[test]
    fn cancel_leaves_shape_untouched() {
        let mut shape = unit_square();
        let before = shape.clone();
        let mut tool = tool();
        for (x, y) in [(0.5, -1.0), (0.5, 0.5), (2.0, 0.5)] {
            tool.click(&shape, Point::new(x, y)).unwrap();
        }
        assert!(!tool.intersections().is_empty());
        assert_eq!(tool.edit_type(), Some(EditType::Normal));

        tool.cancel();
        assert!(tool.points().is_empty());
        assert!(tool.hover().is_none());
        assert_eq!(tool.edit_type(), None);

        let mut hooks = RecordingHooks::default();
        assert_eq!(
            tool.commit(&mut shape, &mut hooks),
            CommitOutcome::Aborted(AbortReason::TooFewPoints)
        );
        assert_eq!(shape, before);
        assert!(hooks.undo_snapshots.is_empty());
    }

    #[test]
    fn remove_last_point_resets_resolution() {
        let shape = two_squares();
        let mut tool = tool();
        tool.click(&shape, Point::new(1.0, 1.0)).unwrap();
        assert_eq!(tool.resolved_path(), None);
        tool.click(&shape, Point::new(2.0, 1.5)).unwrap();
        assert_eq!(tool.resolved_path(), Some(1));

        assert!(tool.remove_last_point(&shape));
        assert_eq!(tool.resolved_path(), None);
        assert!(tool.points()[0].is_ambiguous());
        assert!(tool.remove_last_point(&shape));
        assert!(!tool.remove_last_point(&shape));
    }

    #[test]
    fn commit_bisects_and_resets_gesture() {
        let mut shape = unit_square();
        let mut tool = tool();
        tool.click(&shape, Point::new(0.5, 0.0)).unwrap();
        tool.click(&shape, Point::new(0.5, 1.0)).unwrap();
        assert_eq!(tool.points()[0].kind, PointKind::Segment);
        assert_eq!(tool.intersections().len(), 2);

        let outcome = tool.commit(&mut shape, &mut NoopHooks);
        assert!(outcome.is_committed());
        assert_eq!(shape.path_count(), 2);
        assert!(tool.points().is_empty());
        assert_eq!(tool.resolved_path(), None);
    }

    #[test]
    fn duplicate_click_is_rejected() {
        let shape = unit_square();
        let mut tool = tool();
        tool.click(&shape, Point::new(0.5, 0.5)).unwrap();
        assert_eq!(tool.click(&shape, Point::new(0.5, 0.5)), Err(PointRejected::Duplicate));
        assert_eq!(tool.points().len(), 1);
    }

    #[test]
    fn tool_id() {
        assert_eq!(tool().id(), ToolId::Knife);
    }
}
