// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Grace: pointer-transit tracking between a trigger and its
//! floating content.
//!
//! When a pointer leaves a trigger toward its floating content (for
//! example, trigger → tooltip), the gap between the two rectangles must
//! not read as "the pointer left". [`GraceArea`] covers that gap with a
//! transient convex hull — built from a padded wedge at the exit point and
//! the corners of the destination rectangle — and classifies every
//! subsequent pointer move against it:
//!
//! - back over the trigger or the content → [`Transit::ReEntered`], hull
//!   discarded;
//! - outside the hull → [`Transit::Exited`], hull discarded, delivered at
//!   most once per transit — the owner's cue to close or unschedule;
//! - still inside the hull → [`Transit::InTransit`].
//!
//! The host owns time: every time-sensitive call takes a millisecond
//! timestamp, and a transit silently lapses `timeout_ms` after it began
//! (default 300 ms) as a safety net for pointers that leave the window and
//! never produce another event. A hull therefore exists exactly while
//! "the pointer is in transit" can be true.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use overstory_grace::{GraceArea, PointerOver, Transit};
//!
//! let trigger = Rect::new(0.0, 0.0, 10.0, 10.0);
//! let content = Rect::new(20.0, 0.0, 30.0, 10.0);
//!
//! let mut grace = GraceArea::new();
//! grace.begin_transit(Point::new(10.0, 5.0), &trigger, &content, 1_000);
//!
//! // Crossing the gap stays in transit…
//! let t = grace.pointer_move(Point::new(15.0, 5.0), PointerOver::Outside, 1_050);
//! assert_eq!(t, Transit::InTransit);
//! // …and arriving on the content ends tracking without an exit.
//! let t = grace.pointer_move(Point::new(21.0, 5.0), PointerOver::Content, 1_080);
//! assert_eq!(t, Transit::ReEntered);
//! ```
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

use kurbo::{Point, Rect};
use overstory_polygon::{
    DEFAULT_EXIT_PADDING, convex_hull, exit_side, padded_exit_points, point_in_polygon,
    rect_corners,
};
use smallvec::SmallVec;

/// Default lifetime of a transit before it lapses, in milliseconds.
pub const DEFAULT_TRANSIT_TIMEOUT_MS: u64 = 300;

/// Where a pointer event's target lives relative to the tracked pair.
///
/// Containment is the host's call (it owns the node tree); the grace area
/// only needs this three-way classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerOver {
    /// The event target is the trigger or inside it.
    Trigger,
    /// The event target is the floating content or inside it.
    Content,
    /// The event target is neither.
    Outside,
}

/// Outcome of classifying a pointer move against the active grace hull.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transit {
    /// No hull is active (never started, already resolved, or lapsed).
    Idle,
    /// The pointer is still traveling inside the grace hull.
    InTransit,
    /// The pointer came back over the trigger or content; tracking stops.
    ReEntered,
    /// The pointer left the hull. Delivered at most once per transit; the
    /// owning overlay should treat this as a real exit.
    Exited,
}

/// Transit tracker for one trigger/content pair.
///
/// Create one per pair while the content is open and both rectangles are
/// known; drop or [`cancel`](GraceArea::cancel) it when the content closes
/// so no stale hull outlives its overlay.
#[derive(Clone, Debug)]
pub struct GraceArea {
    polygon: Option<Vec<Point>>,
    deadline: u64,
    timeout_ms: u64,
    padding: f64,
}

impl GraceArea {
    /// Create a tracker with the default timeout and exit padding.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TRANSIT_TIMEOUT_MS)
    }

    /// Create a tracker with a custom transit timeout in milliseconds.
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            polygon: None,
            deadline: 0,
            timeout_ms,
            padding: DEFAULT_EXIT_PADDING,
        }
    }

    /// Override the exit-wedge padding (pixels).
    pub fn set_padding(&mut self, padding: f64) {
        self.padding = padding;
    }

    /// Begin tracking a transit.
    ///
    /// `departed` is the rectangle the pointer just left (the exit side is
    /// classified against it) and `counterpart` is the other half of the
    /// pair the pointer is presumably heading for. Leaving the trigger and
    /// leaving the content are the same call with the rectangles swapped.
    ///
    /// Replaces any hull already active and restarts the lapse deadline.
    pub fn begin_transit(&mut self, exit_point: Point, departed: &Rect, counterpart: &Rect, now: u64) {
        let side = exit_side(exit_point, departed);
        let wedge = padded_exit_points(exit_point, side, self.padding);
        let mut points: SmallVec<[Point; 8]> = SmallVec::new();
        points.extend_from_slice(&wedge);
        points.extend_from_slice(&rect_corners(counterpart));
        self.polygon = Some(convex_hull(&points));
        self.deadline = now.saturating_add(self.timeout_ms);
    }

    /// Classify a pointer move at `position` whose target is `over`.
    ///
    /// Resolving moves ([`Transit::ReEntered`], [`Transit::Exited`]) and a
    /// lapsed deadline discard the hull, so each transit resolves at most
    /// once.
    pub fn pointer_move(&mut self, position: Point, over: PointerOver, now: u64) -> Transit {
        if self.polygon.is_none() {
            return Transit::Idle;
        }
        if now > self.deadline {
            // The safety net: expected follow-up events never arrived.
            self.polygon = None;
            return Transit::Idle;
        }
        match over {
            PointerOver::Trigger | PointerOver::Content => {
                self.polygon = None;
                Transit::ReEntered
            }
            PointerOver::Outside => {
                let inside = self
                    .polygon
                    .as_deref()
                    .is_some_and(|hull| point_in_polygon(position, hull));
                if inside {
                    Transit::InTransit
                } else {
                    self.polygon = None;
                    Transit::Exited
                }
            }
        }
    }

    /// Whether a transit is currently active (hull present, deadline not
    /// lapsed).
    pub fn is_in_transit(&self, now: u64) -> bool {
        self.polygon.is_some() && now <= self.deadline
    }

    /// Unconditionally discard any active hull.
    pub fn cancel(&mut self) {
        self.polygon = None;
    }

    /// The active hull, for hosts that render debug overlays.
    pub fn polygon(&self) -> Option<&[Point]> {
        self.polygon.as_deref()
    }
}

impl Default for GraceArea {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIGGER: Rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    const CONTENT: Rect = Rect::new(20.0, 0.0, 30.0, 10.0);

    fn started() -> GraceArea {
        let mut grace = GraceArea::new();
        // Leave the trigger through its right edge, toward the content.
        grace.begin_transit(Point::new(10.0, 5.0), &TRIGGER, &CONTENT, 1_000);
        grace
    }

    #[test]
    fn idle_until_transit_begins() {
        let mut grace = GraceArea::new();
        assert!(!grace.is_in_transit(0));
        assert_eq!(
            grace.pointer_move(Point::new(5.0, 5.0), PointerOver::Outside, 10),
            Transit::Idle
        );
    }

    #[test]
    fn path_inside_hull_never_exits() {
        let mut grace = started();
        assert!(grace.is_in_transit(1_000));
        // A straight crossing of the gap, one step at a time.
        for x in [11.0, 13.0, 15.0, 17.0, 19.0] {
            assert_eq!(
                grace.pointer_move(Point::new(x, 5.0), PointerOver::Outside, 1_010),
                Transit::InTransit
            );
        }
        assert_eq!(
            grace.pointer_move(Point::new(21.0, 5.0), PointerOver::Content, 1_020),
            Transit::ReEntered
        );
        assert!(!grace.is_in_transit(1_030));
    }

    #[test]
    fn leaving_hull_exits_exactly_once() {
        let mut grace = started();
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 5.0), PointerOver::Outside, 1_010),
            Transit::InTransit
        );
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 40.0), PointerOver::Outside, 1_020),
            Transit::Exited
        );
        // The hull is gone; nothing further can fire.
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 40.0), PointerOver::Outside, 1_030),
            Transit::Idle
        );
    }

    #[test]
    fn jitter_at_the_exit_edge_stays_in_transit() {
        let mut grace = started();
        // Just behind the exit point, inside the wedge rather than the gap.
        assert_eq!(
            grace.pointer_move(Point::new(9.0, 5.0), PointerOver::Outside, 1_005),
            Transit::InTransit
        );
    }

    #[test]
    fn re_entering_trigger_clears_without_exit() {
        let mut grace = started();
        assert_eq!(
            grace.pointer_move(Point::new(5.0, 5.0), PointerOver::Trigger, 1_010),
            Transit::ReEntered
        );
        assert!(grace.polygon().is_none());
    }

    #[test]
    fn deadline_lapse_resets_to_idle() {
        let mut grace = started();
        assert!(grace.is_in_transit(1_300));
        assert!(!grace.is_in_transit(1_301));
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 5.0), PointerOver::Outside, 1_301),
            Transit::Idle
        );
        assert!(grace.polygon().is_none());
    }

    #[test]
    fn leaving_content_builds_hull_against_trigger() {
        let mut grace = GraceArea::new();
        // Symmetric direction: leave the content through its left edge.
        grace.begin_transit(Point::new(20.0, 5.0), &CONTENT, &TRIGGER, 2_000);
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 5.0), PointerOver::Outside, 2_010),
            Transit::InTransit
        );
        assert_eq!(
            grace.pointer_move(Point::new(5.0, 5.0), PointerOver::Trigger, 2_020),
            Transit::ReEntered
        );
    }

    #[test]
    fn begin_transit_replaces_active_hull() {
        let mut grace = started();
        let first = grace.polygon().map(<[Point]>::to_vec);
        grace.begin_transit(Point::new(20.0, 5.0), &CONTENT, &TRIGGER, 1_100);
        assert!(grace.is_in_transit(1_400), "deadline restarted");
        assert_ne!(grace.polygon().map(<[Point]>::to_vec), first);
    }

    #[test]
    fn cancel_discards_hull() {
        let mut grace = started();
        grace.cancel();
        assert!(!grace.is_in_transit(1_000));
        assert_eq!(
            grace.pointer_move(Point::new(15.0, 5.0), PointerOver::Outside, 1_010),
            Transit::Idle
        );
    }

    #[test]
    fn hull_spans_wedge_and_counterpart() {
        let grace = started();
        let hull = grace.polygon().unwrap();
        // Wedge behind the exit point and the far content corners both
        // survive the hull pass.
        assert!(point_in_polygon(Point::new(9.0, 5.0), hull));
        assert!(point_in_polygon(Point::new(29.0, 5.0), hull));
        assert!(!point_in_polygon(Point::new(15.0, 40.0), hull));
    }
}
