// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shapecut: interactive knife cutting for multi-path vector shapes

use anyhow::{Context, Result, bail};
use kurbo::Rect;
use std::path::PathBuf;

pub mod editing;
pub mod error;
pub mod scene;
pub mod settings;
pub mod shape;
pub mod tools;

use editing::{DocumentHooks, EditType};
use scene::Scene;
use settings::KnifeSettings;
use shape::{Shape, ShapeData};

const USAGE: &str = "Usage: shapecut <scene.json> [--settings knife.toml]";

/// Entry point for the shapecut replay tool
pub fn run() -> Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("shapecut=info".parse()?),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let settings = match &args.settings {
        Some(path) => KnifeSettings::load(path)?,
        None => KnifeSettings::default(),
    };

    let scene = Scene::load(&args.scene)?;
    let mut hooks = LoggingHooks::default();
    let (shape, _outcome) = scene.replay(settings, &mut hooks)?;

    let json = serde_json::to_string_pretty(&ShapeData::from(&shape))
        .context("Failed to serialize shape")?;
    println!("{json}");
    Ok(())
}

/// Command-line arguments
#[derive(Debug, Clone, PartialEq)]
struct Args {
    scene: PathBuf,
    settings: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut scene = None;
        let mut settings = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--settings" => {
                    let path = args.next().context("--settings needs a path")?;
                    settings = Some(PathBuf::from(path));
                }
                "-h" | "--help" => bail!(USAGE),
                _ if scene.is_none() => scene = Some(PathBuf::from(arg)),
                _ => bail!("Unexpected argument: {arg}\n{USAGE}"),
            }
        }
        let Some(scene) = scene else {
            bail!(USAGE);
        };
        Ok(Self { scene, settings })
    }
}

/// Document hooks that report every notification through tracing
#[derive(Debug, Default)]
struct LoggingHooks {
    undo_steps: usize,
}

impl DocumentHooks for LoggingHooks {
    fn record_undo(&mut self, shape: &Shape, edit: EditType) {
        self.undo_steps += 1;
        tracing::info!(
            "Undo step {} ({:?}): {} paths, {} anchors",
            self.undo_steps,
            edit,
            shape.path_count(),
            shape.anchor_count()
        );
    }

    fn mark_modified(&mut self) {
        tracing::debug!("Shape modified");
    }

    fn bounds_changed(&mut self, bounds: Rect) {
        tracing::debug!("Shape bounds now {:?}", bounds);
    }

    fn invalidate_raster(&mut self) {
        tracing::debug!("Raster cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_scene_and_settings() {
        let parsed = args(&["cut.json", "--settings", "knife.toml"]).unwrap();
        assert_eq!(parsed.scene, PathBuf::from("cut.json"));
        assert_eq!(parsed.settings, Some(PathBuf::from("knife.toml")));
    }

    #[test]
    fn rejects_missing_or_extra_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["cut.json", "--settings"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
    }
}
