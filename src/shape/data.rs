// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Serializable form of a `Shape`: one entry per path with its anchors

use super::{Anchor, FillColor, Shape};
use crate::error::ShapeError;
use serde::{Deserialize, Serialize};

/// A path as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    #[serde(default)]
    pub fill: FillColor,
    pub anchors: Vec<Anchor>,
}

/// A shape as stored on disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeData {
    pub paths: Vec<PathData>,
}

impl ShapeData {
    /// Build the live shape, validating every path
    pub fn to_shape(&self) -> Result<Shape, ShapeError> {
        let mut shape = Shape::new();
        for path in &self.paths {
            shape.push_path(path.fill, &path.anchors)?;
        }
        Ok(shape)
    }
}

impl From<&Shape> for ShapeData {
    fn from(shape: &Shape) -> Self {
        let paths = shape
            .paths()
            .iter()
            .map(|path| PathData {
                fill: path.fill,
                anchors: shape.anchors()[usize::from(path.anchor_start)..usize::from(path.anchor_end())]
                    .iter()
                    .map(|anchor| Anchor::with_curve(anchor.position, anchor.curve))
                    .collect(),
            })
            .collect();
        Self { paths }
    }
}
