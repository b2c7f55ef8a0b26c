// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Roving: single tab-stop keyboard navigation for composite
//! widgets.
//!
//! Composite widgets (menus, radio groups, tabs, toolbars) expose exactly
//! one element to sequential Tab navigation at a time; arrow keys move a
//! logical focus position among the widget's items without changing the
//! tab order. [`RovingFocus`] is that state machine: it stores nothing but
//! the current tab-stop owner and its configuration, and resolves every
//! query against a **fresh candidate snapshot** the host builds at call
//! time. There is deliberately no cached candidate list — items come and
//! go between renders, and a stale cache is worse than a per-call rebuild.
//!
//! ```
//! use overstory_roving::{Candidate, NavKey, Orientation, RovingFocus};
//!
//! let items = [
//!     Candidate { id: 1_u32, enabled: true },
//!     Candidate { id: 2, enabled: true },
//!     Candidate { id: 3, enabled: true },
//! ];
//! let mut roving = RovingFocus::new(Orientation::Vertical);
//!
//! // The first candidate is the implicit tab stop…
//! assert_eq!(roving.tab_index(&1, &items), 0);
//! assert_eq!(roving.tab_index(&2, &items), -1);
//! // …and arrows move the stop.
//! assert_eq!(roving.handle_key(&1, NavKey::ArrowDown, &items), Some(2));
//! assert_eq!(roving.tab_index(&2, &items), 0);
//! ```
//!
//! The [`grid`] module provides the two-dimensional variant used by ARIA
//! grids, where rows and cells form an extra layer and cells may delegate
//! focus to an inner control.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod grid;

pub use grid::{GridCell, GridRovingFocus, GridRow};

/// Axis along which arrow keys navigate a linear group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left/Right arrows move the stop.
    Horizontal,
    /// Up/Down arrows move the stop.
    Vertical,
}

/// Document text direction.
///
/// Horizontal arrows swap their meaning under right-to-left text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextDirection {
    /// Left-to-right.
    Ltr,
    /// Right-to-left.
    Rtl,
}

/// Navigation keys the roving state machine understands.
///
/// Anything else should simply not be forwarded; handlers return `None`
/// for keys they do not map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// The left arrow key.
    ArrowLeft,
    /// The right arrow key.
    ArrowRight,
    /// The up arrow key.
    ArrowUp,
    /// The down arrow key.
    ArrowDown,
    /// The Home key.
    Home,
    /// The End key.
    End,
}

/// One focus candidate in a host-built snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate<K> {
    /// Identifier for the candidate element.
    pub id: K,
    /// Disabled candidates stay in the snapshot (they keep their place in
    /// the order) but are skipped by navigation and never own the stop.
    pub enabled: bool,
}

/// Resolved movement through a candidate sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NavIntent {
    Prev,
    Next,
    First,
    Last,
}

/// Roving tab-stop state for one linear composite widget.
///
/// At most one candidate owns the stop ([`tab_index`](Self::tab_index)
/// returns 0) at a time; all others report −1. Until anything is
/// interacted with, the first enabled candidate is the implicit owner.
#[derive(Clone, Debug)]
pub struct RovingFocus<K> {
    /// Axis along which arrow keys navigate.
    pub orientation: Orientation,
    /// Text direction; horizontal arrows swap under [`TextDirection::Rtl`].
    pub direction: TextDirection,
    /// Wrap from the last candidate to the first and back.
    pub wrap: bool,
    current: Option<K>,
}

impl<K: Copy + Eq> RovingFocus<K> {
    /// Create a group navigating along `orientation`, left-to-right, not
    /// wrapping.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            direction: TextDirection::Ltr,
            wrap: false,
            current: None,
        }
    }

    /// The candidate currently owning the tab stop, if any has been
    /// recorded.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Record `id` as the tab-stop owner (an external focus, for example a
    /// pointer click on an item).
    pub fn set_current(&mut self, id: K) {
        self.current = Some(id);
    }

    /// The `tabindex` value for `node` against a fresh snapshot: 0 for the
    /// stop owner, −1 for everyone else.
    ///
    /// When no candidate owns the stop — nothing recorded yet, or the
    /// recorded owner is gone from the snapshot — the first enabled
    /// candidate is assigned it implicitly.
    pub fn tab_index(&mut self, node: &K, candidates: &[Candidate<K>]) -> i32 {
        match self.resolve_owner(candidates) {
            Some(owner) if owner == *node => 0,
            _ => -1,
        }
    }

    /// Handle a navigation key pressed on `node`.
    ///
    /// Returns the candidate that should receive focus (recorded as the
    /// new stop owner), or `None` when the key does not map under the
    /// group's orientation/direction, when `node` is not an enabled
    /// candidate, or when a non-wrapping move runs off either end — in all
    /// of which cases focus is left unchanged.
    pub fn handle_key(&mut self, node: &K, key: NavKey, candidates: &[Candidate<K>]) -> Option<K> {
        let intent = self.intent_for(key)?;
        let mut enabled = candidates.iter().filter(|c| c.enabled).map(|c| c.id);
        let position = enabled.clone().position(|id| id == *node)?;
        let count = enabled.clone().count();

        let target = match intent {
            NavIntent::Prev => {
                if position > 0 {
                    position - 1
                } else if self.wrap {
                    count - 1
                } else {
                    return None;
                }
            }
            NavIntent::Next => {
                if position + 1 < count {
                    position + 1
                } else if self.wrap {
                    0
                } else {
                    return None;
                }
            }
            NavIntent::First => 0,
            NavIntent::Last => count - 1,
        };

        let id = enabled.nth(target)?;
        self.current = Some(id);
        Some(id)
    }

    /// Move the stop to the first enabled candidate and return it.
    pub fn focus_first(&mut self, candidates: &[Candidate<K>]) -> Option<K> {
        let first = candidates.iter().find(|c| c.enabled).map(|c| c.id)?;
        self.current = Some(first);
        Some(first)
    }

    fn resolve_owner(&mut self, candidates: &[Candidate<K>]) -> Option<K> {
        if let Some(current) = self.current
            && candidates.iter().any(|c| c.enabled && c.id == current)
        {
            return Some(current);
        }
        let first = candidates.iter().find(|c| c.enabled).map(|c| c.id);
        self.current = first;
        first
    }

    fn intent_for(&self, key: NavKey) -> Option<NavIntent> {
        let rtl = self.direction == TextDirection::Rtl;
        match (self.orientation, key) {
            (Orientation::Horizontal, NavKey::ArrowRight) => {
                Some(if rtl { NavIntent::Prev } else { NavIntent::Next })
            }
            (Orientation::Horizontal, NavKey::ArrowLeft) => {
                Some(if rtl { NavIntent::Next } else { NavIntent::Prev })
            }
            (Orientation::Vertical, NavKey::ArrowDown) => Some(NavIntent::Next),
            (Orientation::Vertical, NavKey::ArrowUp) => Some(NavIntent::Prev),
            (_, NavKey::Home) => Some(NavIntent::First),
            (_, NavKey::End) => Some(NavIntent::Last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn items(count: u32) -> Vec<Candidate<u32>> {
        (1..=count)
            .map(|id| Candidate { id, enabled: true })
            .collect()
    }

    #[test]
    fn first_candidate_is_the_implicit_stop() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let items = items(3);
        assert_eq!(roving.tab_index(&1, &items), 0);
        assert_eq!(roving.tab_index(&2, &items), -1);
        assert_eq!(roving.tab_index(&3, &items), -1);
    }

    #[test]
    fn exactly_one_candidate_owns_the_stop() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        roving.wrap = true;
        let items = items(4);

        let mut node = 1_u32;
        for key in [
            NavKey::ArrowDown,
            NavKey::ArrowDown,
            NavKey::End,
            NavKey::ArrowDown,
            NavKey::Home,
            NavKey::ArrowUp,
        ] {
            if let Some(next) = roving.handle_key(&node, key, &items) {
                node = next;
            }
            let owners: Vec<u32> = items
                .iter()
                .filter(|c| roving.tab_index(&c.id, &items) == 0)
                .map(|c| c.id)
                .collect();
            assert_eq!(owners.len(), 1, "after {key:?}");
            assert!(items.iter().any(|c| c.id == owners[0]));
        }
    }

    #[test]
    fn vertical_arrows_move_the_stop() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let items = items(3);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowDown, &items), Some(2));
        assert_eq!(roving.handle_key(&2, NavKey::ArrowDown, &items), Some(3));
        assert_eq!(roving.handle_key(&3, NavKey::ArrowUp, &items), Some(2));
        assert_eq!(roving.current(), Some(2));
    }

    #[test]
    fn horizontal_arrows_swap_under_rtl() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Horizontal);
        let items = items(3);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowRight, &items), Some(2));

        roving.direction = TextDirection::Rtl;
        assert_eq!(roving.handle_key(&2, NavKey::ArrowRight, &items), Some(1));
        assert_eq!(roving.handle_key(&1, NavKey::ArrowLeft, &items), Some(2));
    }

    #[test]
    fn cross_axis_keys_do_not_map() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let items = items(3);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowRight, &items), None);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowLeft, &items), None);
    }

    #[test]
    fn edges_without_wrap_leave_focus_unchanged() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let items = items(3);
        assert_eq!(roving.handle_key(&3, NavKey::ArrowDown, &items), None);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowUp, &items), None);
        // Nothing was recorded by the refused moves.
        assert_eq!(roving.current(), None);
    }

    #[test]
    fn edges_with_wrap_go_around() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        roving.wrap = true;
        let items = items(3);
        assert_eq!(roving.handle_key(&3, NavKey::ArrowDown, &items), Some(1));
        assert_eq!(roving.handle_key(&1, NavKey::ArrowUp, &items), Some(3));
    }

    #[test]
    fn home_and_end_jump_to_the_extremes() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Horizontal);
        let items = items(4);
        assert_eq!(roving.handle_key(&2, NavKey::End, &items), Some(4));
        assert_eq!(roving.handle_key(&4, NavKey::Home, &items), Some(1));
    }

    #[test]
    fn disabled_candidates_are_skipped_everywhere() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        roving.wrap = true;
        let items = [
            Candidate {
                id: 1_u32,
                enabled: false,
            },
            Candidate {
                id: 2,
                enabled: true,
            },
            Candidate {
                id: 3,
                enabled: false,
            },
            Candidate {
                id: 4,
                enabled: true,
            },
        ];
        // The implicit stop is the first *enabled* candidate.
        assert_eq!(roving.tab_index(&1, &items), -1);
        assert_eq!(roving.tab_index(&2, &items), 0);
        // Navigation hops over disabled entries.
        assert_eq!(roving.handle_key(&2, NavKey::ArrowDown, &items), Some(4));
        assert_eq!(roving.handle_key(&4, NavKey::ArrowDown, &items), Some(2));
        // A disabled node cannot navigate.
        assert_eq!(roving.handle_key(&3, NavKey::ArrowDown, &items), None);
    }

    #[test]
    fn stale_owner_falls_back_to_first() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let before = items(3);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowDown, &before), Some(2));

        // Item 2 disappears between renders; the fresh snapshot reassigns
        // the implicit stop.
        let after = [
            Candidate {
                id: 1_u32,
                enabled: true,
            },
            Candidate {
                id: 3,
                enabled: true,
            },
        ];
        assert_eq!(roving.tab_index(&1, &after), 0);
        assert_eq!(roving.tab_index(&3, &after), -1);
    }

    #[test]
    fn set_current_and_focus_first() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        let items = items(3);
        roving.set_current(3);
        assert_eq!(roving.tab_index(&3, &items), 0);
        assert_eq!(roving.focus_first(&items), Some(1));
        assert_eq!(roving.tab_index(&1, &items), 0);
    }

    #[test]
    fn empty_snapshot_is_inert() {
        let mut roving: RovingFocus<u32> = RovingFocus::new(Orientation::Vertical);
        assert_eq!(roving.tab_index(&1, &[]), -1);
        assert_eq!(roving.handle_key(&1, NavKey::ArrowDown, &[]), None);
        assert_eq!(roving.focus_first(&[]), None);
    }
}
