// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for shape mutation and rejected cuts

use crate::shape::{AnchorIndex, PathIndex};
use thiserror::Error;

/// Errors raised by `Shape` mutators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// The flat anchor array is full
    #[error("anchor capacity exceeded ({0} anchors)")]
    AnchorCapacity(usize),

    /// The path list is full
    #[error("path capacity exceeded ({0} paths)")]
    PathCapacity(usize),

    /// No path with this index
    #[error("path {0} does not exist")]
    NoSuchPath(PathIndex),

    /// No anchor with this index
    #[error("anchor {0} does not exist")]
    NoSuchAnchor(AnchorIndex),

    /// A closed path needs at least three anchors
    #[error("path would have {0} anchors, at least 3 are required")]
    DegeneratePath(usize),
}

/// Why a single cut was not applied.
///
/// These never reach the user; the committer logs them and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CutRejected {
    /// One side of the split would be degenerate
    #[error("split would leave a path with {0} anchors")]
    TooFewAnchors(usize),

    /// A cut endpoint is no longer on the shape
    #[error("cut point {0:?} is no longer on the shape")]
    NotLocated(kurbo::Point),

    /// Entry and exit now lie on different paths
    #[error("cut endpoints lie on paths {0} and {1}")]
    DifferentPaths(PathIndex, PathIndex),

    /// Entry and exit are the same point
    #[error("cut endpoints coincide")]
    Coincident,

    /// The shape refused the mutation
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
