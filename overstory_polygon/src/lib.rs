// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Polygon: convex geometry for pointer grace areas.
//!
//! This crate provides the small set of pure geometric primitives behind
//! grace-area tracking: classifying which side of a rectangle a pointer
//! left through, widening that exit point into a small wedge, building the
//! convex hull of the wedge plus a destination rectangle, and testing
//! whether a later pointer position is still inside that hull.
//!
//! Everything here is stateless and operates on [`kurbo::Point`] and
//! [`kurbo::Rect`]; higher-level crates (for example `overstory_grace`)
//! own the tracking state and decide when to build or discard a hull.
//!
//! # Containment convention
//!
//! [`point_in_polygon`] is a standard ray-casting parity test. Its boundary
//! behavior is the usual ray-cast artifact: a point on some edges counts as
//! inside while a shared vertex can count as outside, depending on vertex
//! ordering. Grace areas only need a stable, fast answer for points near a
//! hull a few pixels across, so this approximation is documented and kept
//! rather than corrected; see the tests for the exact convention.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for
//!   floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

/// Default padding, in pixels, applied around an exit point.
pub const DEFAULT_EXIT_PADDING: f64 = 5.0;

/// The side of a rectangle through which a pointer left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExitSide {
    /// The left edge (`x0`).
    Left,
    /// The right edge (`x1`).
    Right,
    /// The top edge (`y0`).
    Top,
    /// The bottom edge (`y1`).
    Bottom,
}

/// Classify which edge of `rect` is nearest to `point`.
///
/// Returns the side with the smallest absolute distance from `point` to the
/// corresponding edge. Ties resolve in the fixed order left, right, top,
/// bottom: the comparison is strict, so an earlier side keeps a tied
/// distance. The result is total for every finite input; there is no
/// unreachable fallback branch to guess from.
pub fn exit_side(point: Point, rect: &Rect) -> ExitSide {
    let candidates = [
        (ExitSide::Left, (point.x - rect.x0).abs()),
        (ExitSide::Right, (rect.x1 - point.x).abs()),
        (ExitSide::Top, (point.y - rect.y0).abs()),
        (ExitSide::Bottom, (rect.y1 - point.y).abs()),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Widen an exit point into a three-point wedge anchored on the departed
/// side.
///
/// The wedge straddles the exit point at `padding` distance, with the middle
/// point pushed to 1.5× the padding so that pointer jitter right at the edge
/// does not immediately re-trigger exit detection. The wedge reaches back
/// across the exit side (into the rectangle being left), anchoring the grace
/// hull at the departure edge while the destination rectangle's corners pull
/// it across the gap.
pub fn padded_exit_points(exit_point: Point, exit_side: ExitSide, padding: f64) -> [Point; 3] {
    let (x, y) = (exit_point.x, exit_point.y);
    match exit_side {
        ExitSide::Top => [
            Point::new(x - padding, y + padding),
            Point::new(x, y + padding * 1.5),
            Point::new(x + padding, y + padding),
        ],
        ExitSide::Bottom => [
            Point::new(x - padding, y - padding),
            Point::new(x, y - padding * 1.5),
            Point::new(x + padding, y - padding),
        ],
        ExitSide::Left => [
            Point::new(x + padding, y - padding),
            Point::new(x + padding * 1.5, y),
            Point::new(x + padding, y + padding),
        ],
        ExitSide::Right => [
            Point::new(x - padding, y - padding),
            Point::new(x - padding * 1.5, y),
            Point::new(x - padding, y + padding),
        ],
    }
}

/// The four corners of `rect`, in `x0y0`, `x1y0`, `x1y1`, `x0y1` order.
pub fn rect_corners(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Build the convex hull of `points` via the monotone chain algorithm.
///
/// Points are sorted by `x`, then `y`, ascending; the upper and lower chains
/// are built with a cross-product turn test that drops collinear and
/// interior points, and the shared chain endpoints are removed once.
/// Degenerate inputs (zero or one point, or all points coincident) collapse
/// to the distinct input rather than erroring.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() <= 1 {
        return points.to_vec();
    }
    let mut sorted: SmallVec<[Point; 8]> = SmallVec::from_slice(points);
    sorted.sort_by(compare_x_then_y);
    hull_presorted(&sorted)
}

fn compare_x_then_y(a: &Point, b: &Point) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

/// Whether the turn `r → q → p` fails the strict right-turn test, meaning
/// `q` is collinear or interior and must be popped from the chain.
fn pops_chain(r: Point, q: Point, p: Point) -> bool {
    (q.x - r.x) * (p.y - r.y) >= (q.y - r.y) * (p.x - r.x)
}

fn half_chain(points: impl Iterator<Item = Point>) -> SmallVec<[Point; 8]> {
    let mut chain: SmallVec<[Point; 8]> = SmallVec::new();
    for p in points {
        while chain.len() >= 2 {
            let q = chain[chain.len() - 1];
            let r = chain[chain.len() - 2];
            if pops_chain(r, q, p) {
                chain.pop();
            } else {
                break;
            }
        }
        chain.push(p);
    }
    // The chain's final point is the other chain's starting point.
    chain.pop();
    chain
}

fn hull_presorted(sorted: &[Point]) -> Vec<Point> {
    let upper = half_chain(sorted.iter().copied());
    let lower = half_chain(sorted.iter().rev().copied());

    // All input points coincident: both chains reduce to the same single point.
    if upper.len() == 1 && lower.len() == 1 && upper[0] == lower[0] {
        return upper.to_vec();
    }

    let mut hull = Vec::with_capacity(upper.len() + lower.len());
    hull.extend_from_slice(&upper);
    hull.extend_from_slice(&lower);
    hull
}

/// Ray-casting parity test for `point` against `polygon`.
///
/// An empty polygon contains nothing. Boundary behavior follows the
/// ray-cast convention described in the crate docs: it is stable but not
/// symmetric between edges and vertices, and is intentionally left as-is.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
