// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model: undo grouping and document notifications

pub mod document;
pub mod edit_types;

pub use document::{DocumentHooks, NoopHooks};
pub use edit_types::EditType;
