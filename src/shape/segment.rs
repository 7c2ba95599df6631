// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Segment curves and their sampled approximation.
//!
//! Every segment is a quadratic bezier whose control point sits off the
//! chord midpoint by `curve * chord length` along the chord's left normal.
//! Hit testing and intersections never evaluate the curve directly; they
//! walk a fixed chain of samples instead.

use crate::settings::shape::MAX_SEGMENT_SAMPLES;
use kurbo::{Line, ParamCurve, ParamCurveNearest, Point, QuadBez, Vec2};

/// Sampled points of one segment, first and last being its anchors
pub type SegmentSamples = [Point; MAX_SEGMENT_SAMPLES];

/// Number of straight pieces in a sample chain
pub const SAMPLE_SPANS: usize = MAX_SEGMENT_SAMPLES - 1;

/// The curve from `start` to `end` with the given bulge
pub fn segment_curve(start: Point, end: Point, curve: f64) -> QuadBez {
    let chord = end - start;
    let normal = Vec2::new(-chord.y, chord.x);
    let control = start.midpoint(end) + normal * curve;
    QuadBez::new(start, control, end)
}

/// Sample a segment at evenly spaced curve parameters
pub fn sample_segment(start: Point, end: Point, curve: f64) -> SegmentSamples {
    let mut samples = [start; MAX_SEGMENT_SAMPLES];
    if curve == 0.0 {
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = start.lerp(end, i as f64 / SAMPLE_SPANS as f64);
        }
    } else {
        let quad = segment_curve(start, end, curve);
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = quad.eval(i as f64 / SAMPLE_SPANS as f64);
        }
    }
    // Pin the endpoints so neighbouring segments share exact positions
    samples[0] = start;
    samples[SAMPLE_SPANS] = end;
    samples
}

/// The straight piece `span` of a sample chain
pub fn sample_span(samples: &SegmentSamples, span: usize) -> Line {
    Line::new(samples[span], samples[span + 1])
}

/// Convert a position on piece `span` into a chain parameter in `[0, 1]`
pub fn chain_t(span: usize, local_t: f64) -> f64 {
    ((span as f64 + local_t) / SAMPLE_SPANS as f64).clamp(0.0, 1.0)
}

/// Closest point on a sample chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainNearest {
    /// Chain parameter of the closest point
    pub t: f64,
    /// The closest point itself
    pub position: Point,
    /// Squared distance to the query point
    pub distance_sq: f64,
}

/// Find the closest point on a sample chain to `point`
pub fn nearest_on_chain(samples: &SegmentSamples, point: Point) -> ChainNearest {
    let mut best = ChainNearest {
        t: 0.0,
        position: samples[0],
        distance_sq: f64::INFINITY,
    };
    for span in 0..SAMPLE_SPANS {
        let line = sample_span(samples, span);
        let nearest = line.nearest(point, 1e-9);
        if nearest.distance_sq < best.distance_sq {
            best = ChainNearest {
                t: chain_t(span, nearest.t),
                position: line.eval(nearest.t),
                distance_sq: nearest.distance_sq,
            };
        }
    }
    best
}
