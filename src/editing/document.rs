// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Notifications a shape edit sends to the owning document.
//!
//! A committed edit calls `record_undo` once before the shape is touched,
//! then `mark_modified`, `bounds_changed` and `invalidate_raster` once
//! each after every mutation is done.

use super::EditType;
use crate::shape::Shape;
use kurbo::Rect;

/// Document-side collaborator for shape edits
pub trait DocumentHooks {
    /// Snapshot `shape` for undo before it is mutated
    fn record_undo(&mut self, shape: &Shape, edit: EditType);

    /// The document has unsaved changes
    fn mark_modified(&mut self) {}

    /// The shape's bounds were recomputed
    fn bounds_changed(&mut self, _bounds: Rect) {}

    /// Cached rasterizations of the shape are stale
    fn invalidate_raster(&mut self) {}
}

/// Hooks that ignore every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl DocumentHooks for NoopHooks {
    fn record_undo(&mut self, _shape: &Shape, _edit: EditType) {}
}

/// Hooks that count calls and keep undo snapshots, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingHooks {
    pub undo_snapshots: Vec<Shape>,
    pub modified: usize,
    pub bounds: Vec<Rect>,
    pub raster_invalidations: usize,
}

#[cfg(test)]
impl DocumentHooks for RecordingHooks {
    fn record_undo(&mut self, shape: &Shape, _edit: EditType) {
        self.undo_snapshots.push(shape.clone());
    }

    fn mark_modified(&mut self) {
        self.modified += 1;
    }

    fn bounds_changed(&mut self, bounds: Rect) {
        self.bounds.push(bounds);
    }

    fn invalidate_raster(&mut self) {
        self.raster_invalidations += 1;
    }
}
