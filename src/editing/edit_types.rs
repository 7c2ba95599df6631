// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit types for undo grouping

/// Type of edit being performed
///
/// Used by the undo collaborator to decide whether an edit opens a new
/// undo group. Knife commits are single edits, so every undo step they
/// record opens its own group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// Normal edit (creates new undo group)
    Normal,
}
