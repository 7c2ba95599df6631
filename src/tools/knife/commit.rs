// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Applying a finished knife gesture to the shape.
//!
//! The committer picks one strategy, in order:
//!
//! 1. First and last points snapped to anchors of one path: split that
//!    path between the two anchors.
//! 2. Two or more knife crossings: pair them up per path in knife order
//!    and apply each pair as its own cut.
//! 3. Otherwise build crossings from the snapped first and last points
//!    and apply those as in 2.
//!
//! Each cut looks its endpoints up again by position, since an earlier
//! cut in the same commit may have split the path it was found on. The
//! lookup tries the paths the pair was found on first, following them
//! through earlier splits, so edges shared by two paths cut the right one.

use super::gesture::KnifeGesture;
use super::intersect::SegmentIntersection;
use super::point::{KnifePoint, PointKind};
use crate::editing::{DocumentHooks, EditType};
use crate::error::{CutRejected, ShapeError};
use crate::settings::KnifeSettings;
use crate::settings::shape::MIN_PATH_ANCHORS;
use crate::shape::{Location, PathIndex, Shape};
use kurbo::Point;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which rule produced the committed cuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutStrategy {
    /// Split between two anchors of one path
    PathSplit,
    /// Pairs of knife crossings
    IterativeCuts,
    /// Crossings taken from the snapped end points
    SyntheticCuts,
}

/// Why a commit left the shape untouched
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    /// Fewer than two knife points
    TooFewPoints,
    /// No strategy applies to the gesture
    NoValidPattern,
    /// The anchor-to-anchor split was refused
    Rejected(CutRejected),
    /// Every candidate cut was skipped
    NoCutApplied { skipped: usize },
}

/// Result of committing a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Aborted(AbortReason),
    Committed {
        strategy: CutStrategy,
        cuts_applied: usize,
        cuts_skipped: usize,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}

/// What a single applied cut did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutKind {
    /// Anchors inserted on one segment, path count unchanged
    Notch,
    /// Path replaced by two new paths
    Split {
        removed: PathIndex,
        pieces: (PathIndex, PathIndex),
    },
}

/// Undo and notification bookkeeping for one commit.
///
/// Undo is recorded before the first mutation only; the notifications go
/// out once in `finish`, and only if something was mutated.
struct CommitTxn<'a, H: DocumentHooks + ?Sized> {
    hooks: &'a mut H,
    recorded: bool,
}

impl<'a, H: DocumentHooks + ?Sized> CommitTxn<'a, H> {
    fn new(hooks: &'a mut H) -> Self {
        Self { hooks, recorded: false }
    }

    fn before_mutation(&mut self, shape: &Shape) {
        if !self.recorded {
            self.hooks.record_undo(shape, EditType::Normal);
            self.recorded = true;
        }
    }

    fn finish(self, shape: &mut Shape) {
        if !self.recorded {
            return;
        }
        shape.update_bounds();
        self.hooks.mark_modified();
        self.hooks.bounds_changed(shape.bounds());
        self.hooks.invalidate_raster();
    }
}

/// Apply `gesture` to `shape`.
///
/// Points still ambiguous are resolved to their first candidate.
pub fn commit_gesture<H: DocumentHooks + ?Sized>(
    gesture: &KnifeGesture,
    shape: &mut Shape,
    hooks: &mut H,
    settings: &KnifeSettings,
) -> CommitOutcome {
    if gesture.points().len() < 2 {
        return CommitOutcome::Aborted(AbortReason::TooFewPoints);
    }

    let mut gesture = gesture.clone();
    gesture.force_resolve();
    let knife = gesture.positions();
    let mut txn = CommitTxn::new(hooks);

    let outcome = if let Some((path, head, tail)) = anchor_endpoints(gesture.points()) {
        let interior = &knife[1..knife.len() - 1];
        match split_between_anchors(shape, &mut txn, path, head, tail, interior, settings) {
            Ok(()) => CommitOutcome::Committed {
                strategy: CutStrategy::PathSplit,
                cuts_applied: 1,
                cuts_skipped: 0,
            },
            Err(reason) => {
                tracing::debug!("Anchor split on path {} rejected: {}", path, reason);
                CommitOutcome::Aborted(AbortReason::Rejected(reason))
            }
        }
    } else if gesture.intersections().len() >= 2 {
        apply_cuts(
            shape,
            &mut txn,
            gesture.intersections(),
            &knife,
            settings,
            CutStrategy::IterativeCuts,
        )
    } else {
        let synthetic = synthesize_intersections(gesture.points());
        if synthetic.len() >= 2 {
            apply_cuts(shape, &mut txn, &synthetic, &knife, settings, CutStrategy::SyntheticCuts)
        } else {
            CommitOutcome::Aborted(AbortReason::NoValidPattern)
        }
    };

    txn.finish(shape);
    outcome
}

/// Path and anchor positions when both ends snapped to anchors of one path
fn anchor_endpoints(points: &[KnifePoint]) -> Option<(PathIndex, Point, Point)> {
    let (first, last) = (points.first()?, points.last()?);
    if first.kind != PointKind::Anchor || last.kind != PointKind::Anchor {
        return None;
    }
    let head = first.resolved_candidate()?;
    let tail = last.resolved_candidate()?;
    (head.path == tail.path).then_some((head.path, head.position, tail.position))
}

fn split_between_anchors<H: DocumentHooks + ?Sized>(
    shape: &mut Shape,
    txn: &mut CommitTxn<'_, H>,
    path: PathIndex,
    head: Point,
    tail: Point,
    interior: &[Point],
    settings: &KnifeSettings,
) -> Result<(), CutRejected> {
    let eps = settings.point_epsilon;
    let info = *shape.path(path).ok_or(ShapeError::NoSuchPath(path))?;
    let head_anchor = shape
        .find_anchor_at(path, head, eps)
        .ok_or(CutRejected::NotLocated(head))?;
    let tail_anchor = shape
        .find_anchor_at(path, tail, eps)
        .ok_or(CutRejected::NotLocated(tail))?;
    if head_anchor == tail_anchor {
        return Err(CutRejected::Coincident);
    }

    let count = usize::from(info.anchor_count);
    let steps = (info.local_index(tail_anchor) + count - info.local_index(head_anchor)) % count;
    let intermediates = intermediate_points(interior, head, tail, eps);
    check_arc_sizes(steps - 1, count - steps - 1, intermediates.len())?;
    shape.check_path_capacity()?;
    shape.check_anchor_capacity(2 + 2 * intermediates.len())?;

    txn.before_mutation(shape);
    shape.split_path_at_anchors(path, head_anchor, tail_anchor, &intermediates, false)?;
    Ok(())
}

/// Group crossings by path, pair them in knife order, cut each pair
fn apply_cuts<H: DocumentHooks + ?Sized>(
    shape: &mut Shape,
    txn: &mut CommitTxn<'_, H>,
    intersections: &[SegmentIntersection],
    knife: &[Point],
    settings: &KnifeSettings,
    strategy: CutStrategy,
) -> CommitOutcome {
    let mut by_path: BTreeMap<PathIndex, Vec<SegmentIntersection>> = BTreeMap::new();
    for hit in intersections {
        by_path.entry(hit.path).or_default().push(*hit);
    }

    // Current indices of the path each group was found on.
    let mut groups: Vec<(Vec<PathIndex>, Vec<SegmentIntersection>)> =
        by_path.into_iter().map(|(path, hits)| (vec![path], hits)).collect();

    let mut applied = 0;
    let mut skipped = 0;
    for group in 0..groups.len() {
        let mut hits = std::mem::take(&mut groups[group].1);
        hits.sort_by(|a, b| a.knife_order().total_cmp(&b.knife_order()));
        if hits.len() % 2 == 1 {
            tracing::debug!("Path {} has an unpaired knife crossing", hits[0].path);
        }
        for pair in hits.chunks_exact(2) {
            let (entry, exit) = (&pair[0], &pair[1]);
            let between = knife
                .get(entry.knife_segment + 1..=exit.knife_segment)
                .unwrap_or(&[]);
            let targets = &groups[group].0;
            match perform_single_cut(shape, txn, targets, entry.position, exit.position, between, settings) {
                Ok(kind) => {
                    applied += 1;
                    tracing::debug!("{:?} cut from {:?} to {:?}", kind, entry.position, exit.position);
                    if let CutKind::Split { removed, pieces } = kind {
                        for (targets, _) in &mut groups {
                            follow_split(targets, removed, pieces);
                        }
                    }
                }
                Err(reason) => {
                    skipped += 1;
                    tracing::debug!("Skipping cut from {:?} to {:?}: {}", entry.position, exit.position, reason);
                }
            }
        }
    }

    if applied == 0 {
        CommitOutcome::Aborted(AbortReason::NoCutApplied { skipped })
    } else {
        CommitOutcome::Committed {
            strategy,
            cuts_applied: applied,
            cuts_skipped: skipped,
        }
    }
}

/// Renumber `targets` after `removed` was replaced by `pieces`
fn follow_split(targets: &mut Vec<PathIndex>, removed: PathIndex, pieces: (PathIndex, PathIndex)) {
    *targets = targets
        .iter()
        .flat_map(|&path| match path.cmp(&removed) {
            Ordering::Less => vec![path],
            Ordering::Equal => vec![pieces.0, pieces.1],
            Ordering::Greater => vec![path - 1],
        })
        .collect();
}

/// Crossing records for the snapped first and last points
fn synthesize_intersections(points: &[KnifePoint]) -> Vec<SegmentIntersection> {
    let last_segment = points.len().saturating_sub(2);
    [(points.first(), 0, 0.0), (points.last(), last_segment, 1.0)]
        .into_iter()
        .filter_map(|(point, knife_segment, knife_t)| {
            let point = point?;
            let candidate = point.resolved_candidate()?;
            let t = match point.kind {
                PointKind::Segment => 0.5,
                PointKind::Anchor => 0.0,
                PointKind::Free => return None,
            };
            Some(SegmentIntersection {
                path: candidate.path,
                segment: candidate.element,
                position: point.position,
                t,
                knife_segment,
                knife_t,
            })
        })
        .collect()
}

/// Where a cut meets its path's ring
#[derive(Debug, Clone, Copy)]
struct CutSite {
    /// Local index of the anchor, or of the segment's start anchor
    local: usize,
    /// Chain parameter on the segment, zero on an anchor
    t: f64,
    on_anchor: bool,
    position: Point,
}

impl CutSite {
    /// Snap a location to an anchor when it sits on either segment end
    fn from_location(shape: &Shape, location: &Location, eps: f64) -> Option<Self> {
        let info = shape.path(location.path)?;
        let count = usize::from(info.anchor_count);
        let local = info.local_index(location.segment);
        let start = shape.anchor(location.segment)?.position;
        let end = shape.anchor(shape.next_anchor(location.segment)?)?.position;

        let site = if location.position.distance(start) <= eps {
            Self::anchor(local, start)
        } else if location.position.distance(end) <= eps {
            Self::anchor((local + 1) % count, end)
        } else {
            Self {
                local,
                t: location.t,
                on_anchor: false,
                position: location.position,
            }
        };
        Some(site)
    }

    fn anchor(local: usize, position: Point) -> Self {
        Self {
            local,
            t: 0.0,
            on_anchor: true,
            position,
        }
    }

    fn ring_param(&self) -> f64 {
        self.local as f64 + self.t
    }
}

/// Cut the path under `entry` and `exit` along the knife.
///
/// `targets` are the paths to try first. `between` holds the knife points
/// lying between the two crossings, which become vertices of the cut
/// edge. Both endpoints on one segment make a notch; anything else splits
/// the path in two.
fn perform_single_cut<H: DocumentHooks + ?Sized>(
    shape: &mut Shape,
    txn: &mut CommitTxn<'_, H>,
    targets: &[PathIndex],
    entry: Point,
    exit: Point,
    between: &[Point],
    settings: &KnifeSettings,
) -> Result<CutKind, CutRejected> {
    let eps = settings.point_epsilon;
    let tolerance = settings.locate_tolerance;

    let (entry_location, exit_location) = locate_pair(shape, targets, entry, exit, tolerance)?;
    let path = entry_location.path;

    let entry = CutSite::from_location(shape, &entry_location, eps).ok_or(CutRejected::NotLocated(entry))?;
    let exit = CutSite::from_location(shape, &exit_location, eps).ok_or(CutRejected::NotLocated(exit))?;
    if entry.position.distance(exit.position) <= eps {
        return Err(CutRejected::Coincident);
    }

    let info = *shape.path(path).ok_or(ShapeError::NoSuchPath(path))?;
    let mut intermediates = intermediate_points(between, entry.position, exit.position, eps);

    if !entry.on_anchor && !exit.on_anchor && entry.local == exit.local {
        let (first, last) = if entry.t <= exit.t {
            (entry, exit)
        } else {
            intermediates.reverse();
            (exit, entry)
        };
        let mut positions = Vec::with_capacity(intermediates.len() + 2);
        positions.push(first.position);
        positions.extend(intermediates);
        positions.push(last.position);

        shape.check_anchor_capacity(positions.len())?;
        txn.before_mutation(shape);
        shape.insert_anchors_raw(info.ring_anchor(entry.local), &positions)?;
        return Ok(CutKind::Notch);
    }

    // Original anchors strictly between the sites, walking the ring forward
    // from entry to exit and then on back to entry.
    let count = usize::from(info.anchor_count);
    let from = entry.ring_param();
    let mut to = exit.ring_param();
    if to <= from {
        to += count as f64;
    }
    let forward = ((to.ceil() - from.floor()) as usize).saturating_sub(1);
    let on_sites = usize::from(entry.on_anchor) + usize::from(exit.on_anchor);
    let backward = count.saturating_sub(forward + on_sites);
    check_arc_sizes(forward, backward, intermediates.len())?;
    let inserted = usize::from(!entry.on_anchor) + usize::from(!exit.on_anchor);
    shape.check_path_capacity()?;
    shape.check_anchor_capacity(inserted + 2 + 2 * intermediates.len())?;

    txn.before_mutation(shape);
    if !entry.on_anchor {
        shape.split_segment_at_point(info.ring_anchor(entry.local), entry.position)?;
    }
    if !exit.on_anchor {
        let segment = shape
            .locate_on_path(path, exit.position, tolerance)
            .ok_or(CutRejected::NotLocated(exit.position))?
            .segment;
        shape.split_segment_at_point(segment, exit.position)?;
    }
    let head = shape
        .find_anchor_at(path, entry.position, eps)
        .ok_or(CutRejected::NotLocated(entry.position))?;
    let tail = shape
        .find_anchor_at(path, exit.position, eps)
        .ok_or(CutRejected::NotLocated(exit.position))?;
    let pieces = shape.split_path_at_anchors(path, head, tail, &intermediates, false)?;
    Ok(CutKind::Split { removed: path, pieces })
}

/// Find both cut ends on one path, trying `targets` before the rest
fn locate_pair(
    shape: &Shape,
    targets: &[PathIndex],
    entry: Point,
    exit: Point,
    tolerance: f64,
) -> Result<(Location, Location), CutRejected> {
    let on_path = |path: PathIndex| {
        Some((
            shape.locate_on_path(path, entry, tolerance)?,
            shape.locate_on_path(path, exit, tolerance)?,
        ))
    };
    let every_path = (0..shape.path_count()).map(|path| path as PathIndex);
    if let Some(pair) = targets.iter().copied().chain(every_path).find_map(on_path) {
        return Ok(pair);
    }

    let entry_location = shape
        .locate(entry, tolerance)
        .ok_or(CutRejected::NotLocated(entry))?;
    let exit_location = shape
        .locate(exit, tolerance)
        .ok_or(CutRejected::NotLocated(exit))?;
    Err(CutRejected::DifferentPaths(entry_location.path, exit_location.path))
}

/// Both arcs of a split need enough anchors to stay closed paths
fn check_arc_sizes(forward: usize, backward: usize, intermediates: usize) -> Result<(), CutRejected> {
    let shortest = forward.min(backward) + 2 + intermediates;
    if shortest < MIN_PATH_ANCHORS {
        Err(CutRejected::TooFewAnchors(shortest))
    } else {
        Ok(())
    }
}

/// Knife points usable as cut-edge vertices between `entry` and `exit`
fn intermediate_points(knife: &[Point], entry: Point, exit: Point, eps: f64) -> Vec<Point> {
    knife
        .iter()
        .copied()
        .filter(|point| point.distance(entry) > eps && point.distance(exit) > eps)
        .collect()
}
