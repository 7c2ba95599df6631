// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for shape editing

use crate::editing::EditType;

pub mod knife;

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Knife tool for cutting paths
    Knife,
}

// ===== Tool Trait =====

/// A tool for editing shapes
pub trait Tool {
    /// Get the tool identifier
    fn id(&self) -> ToolId;

    /// Get the edit type for the current operation (for undo grouping)
    fn edit_type(&self) -> Option<EditType> {
        None
    }
}
