// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Knife and shape settings.
//!
//! The constants below are the defaults. `KnifeSettings` mirrors the
//! tunable subset so a host can override them from a TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// KNIFE HIT TESTING
// ============================================================================
/// Radius within which a click snaps to an anchor (local units)
const ANCHOR_HIT_RADIUS: f64 = 8.0;

/// Radius within which a click snaps to a segment (local units)
const SEGMENT_HIT_RADIUS: f64 = 6.0;

/// Maximum number of hit candidates recorded for one click
const MAX_CANDIDATES: usize = 8;

// ============================================================================
// KNIFE GESTURE
// ============================================================================
/// Maximum number of knife points in one gesture
const MAX_POINTS: usize = 128;

/// Two positions closer than this are the same point
const POINT_EPSILON: f64 = 1e-4;

/// Intersections on one segment closer than this in chain `t` are merged
const DEDUPE_T_EPSILON: f64 = 0.01;

/// Distance within which a cut point is re-found on a mutated shape
const LOCATE_TOLERANCE: f64 = 1e-3;

// ============================================================================
// SHAPE STORAGE
// ============================================================================
/// Number of sample points per segment, endpoints included
const MAX_SEGMENT_SAMPLES: usize = 16;

/// Maximum anchors in one shape (must fit in a `u16` index)
const MAX_ANCHORS: usize = 4096;

/// Maximum paths in one shape
const MAX_PATHS: usize = 512;

/// Minimum anchors for a non-degenerate closed path
const MIN_PATH_ANCHORS: usize = 3;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Knife tool defaults
pub mod knife {
    pub const ANCHOR_HIT_RADIUS: f64 = super::ANCHOR_HIT_RADIUS;
    pub const SEGMENT_HIT_RADIUS: f64 = super::SEGMENT_HIT_RADIUS;
    pub const MAX_CANDIDATES: usize = super::MAX_CANDIDATES;
    pub const MAX_POINTS: usize = super::MAX_POINTS;
    pub const POINT_EPSILON: f64 = super::POINT_EPSILON;
    pub const DEDUPE_T_EPSILON: f64 = super::DEDUPE_T_EPSILON;
    pub const LOCATE_TOLERANCE: f64 = super::LOCATE_TOLERANCE;
}

/// Shape storage limits
pub mod shape {
    pub const MAX_SEGMENT_SAMPLES: usize = super::MAX_SEGMENT_SAMPLES;
    pub const MAX_ANCHORS: usize = super::MAX_ANCHORS;
    pub const MAX_PATHS: usize = super::MAX_PATHS;
    pub const MIN_PATH_ANCHORS: usize = super::MIN_PATH_ANCHORS;
}

/// Tunable knife settings, defaulting to the constants above
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnifeSettings {
    pub anchor_hit_radius: f64,
    pub segment_hit_radius: f64,
    pub max_points: usize,
    pub max_candidates: usize,
    pub point_epsilon: f64,
    pub dedupe_t_epsilon: f64,
    pub locate_tolerance: f64,
}

impl Default for KnifeSettings {
    fn default() -> Self {
        Self {
            anchor_hit_radius: knife::ANCHOR_HIT_RADIUS,
            segment_hit_radius: knife::SEGMENT_HIT_RADIUS,
            max_points: knife::MAX_POINTS,
            max_candidates: knife::MAX_CANDIDATES,
            point_epsilon: knife::POINT_EPSILON,
            dedupe_t_epsilon: knife::DEDUPE_T_EPSILON,
            locate_tolerance: knife::LOCATE_TOLERANCE,
        }
    }
}

impl KnifeSettings {
    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("Invalid knife settings")?;
        Ok(settings.clamped())
    }

    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Keep capacities within what the gesture can represent
    fn clamped(mut self) -> Self {
        self.max_points = self.max_points.clamp(2, knife::MAX_POINTS);
        self.max_candidates = self.max_candidates.clamp(1, knife::MAX_CANDIDATES);
        self
    }
}
