// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene files: a shape plus the knife clicks to replay on it

use crate::editing::DocumentHooks;
use crate::settings::KnifeSettings;
use crate::shape::{Shape, ShapeData};
use crate::tools::knife::{CommitOutcome, KnifeTool};
use anyhow::{Context, Result};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A shape and a knife gesture, as stored on disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub shape: ShapeData,
    /// Knife clicks in placement order, as `[x, y]`
    #[serde(default)]
    pub clicks: Vec<[f64; 2]>,
}

impl Scene {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scene JSON")
    }

    /// Load a scene from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading scene: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene: {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid scene: {}", path.display()))
    }

    /// Replay the clicks with a fresh knife, then commit.
    ///
    /// Rejected clicks are logged and skipped, the same way an
    /// interactive session ignores them.
    pub fn replay<H: DocumentHooks + ?Sized>(
        &self,
        settings: KnifeSettings,
        hooks: &mut H,
    ) -> Result<(Shape, CommitOutcome)> {
        let mut shape = self.shape.to_shape().context("Scene shape is invalid")?;
        let mut knife = KnifeTool::new(settings);
        for &[x, y] in &self.clicks {
            if let Err(err) = knife.click(&shape, Point::new(x, y)) {
                tracing::warn!("Ignoring click at ({}, {}): {}", x, y, err);
            }
        }
        tracing::debug!(
            "Replayed {} clicks, {} knife crossings",
            self.clicks.len(),
            knife.intersections().len()
        );
        let outcome = knife.commit(&mut shape, hooks);
        Ok((shape, outcome))
    }
}
