// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Focus Scope: stack-based focus trapping for modal-like
//! overlays.
//!
//! A focus scope constrains keyboard focus to a container while it is the
//! **active** scope and restores focus to wherever it was when the scope
//! unmounts. Scopes form a shared, ordered stack — one
//! [`FocusScopeStack`] per document — and only the topmost unpaused scope
//! traps anything; scopes below it are inert until the ones above unmount
//! or pause. Mount and unmount must be paired, including abnormal
//! teardown, or a stale entry keeps every other scope inert.
//!
//! The crate is headless: the host owns the node tree and real focus. It
//! reports focus changes, Tab presses, and node removals into the active
//! scope, and applies the returned focus moves. Tabbable/focusable
//! queries go through [`FocusQuery`], resolved fresh at each call.
//!
//! Two moments — just after mount and just before restore on unmount —
//! emit a cancellable [`Notification`]; a consumer that calls
//! [`Notification::prevent_default`] keeps focus where it is, and the
//! emitter observes the flag immediately after the callback returns.
//!
//! ```
//! use overstory_focus_scope::{FocusQuery, FocusScopeStack, ScopeOptions};
//!
//! struct World;
//! impl FocusQuery<u32> for World {
//!     fn is_within(&self, container: &u32, node: &u32) -> bool {
//!         *container == 10 && (10..20).contains(node)
//!     }
//!     fn tabbables(&self, container: &u32) -> Vec<u32> {
//!         if *container == 10 { vec![11, 12, 13] } else { vec![] }
//!     }
//!     fn focusables(&self, container: &u32) -> Vec<u32> {
//!         self.tabbables(container)
//!     }
//! }
//!
//! let mut stack: FocusScopeStack<u32> = FocusScopeStack::new();
//! // Focus was on node 5; mounting the scope moves it to the first
//! // tabbable inside container 10.
//! let (scope, focus) = stack.mount(10, ScopeOptions::default(), Some(5), &World, |_| {});
//! assert_eq!(focus, Some(11));
//! // Unmounting restores it.
//! let restore = stack.unmount(scope, |_| {});
//! assert_eq!(restore, Some(5));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// Identifier for a mounted scope. Never reused within a stack.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

/// Per-scope configuration.
#[derive(Copy, Clone, Debug)]
pub struct ScopeOptions {
    /// Wrap Tab navigation from the last tabbable back to the first (and
    /// the reverse under Shift+Tab). When off, Tab at the edges is
    /// swallowed and focus stays put — the trap holds either way.
    pub wrap: bool,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self { wrap: true }
    }
}

/// Host-provided focus queries, resolved fresh at each call.
pub trait FocusQuery<K> {
    /// Whether `node` is `container` or one of its descendants.
    fn is_within(&self, container: &K, node: &K) -> bool;
    /// The container's tabbable descendants, in document order.
    fn tabbables(&self, container: &K) -> Vec<K>;
    /// The container's focusable descendants, in document order (a
    /// superset of the tabbables).
    fn focusables(&self, container: &K) -> Vec<K>;
}

/// A cancellable before-notification (open/close auto-focus).
///
/// The emitting call observes [`default_prevented`](Self::default_prevented)
/// immediately after the consumer callback returns; preventing suppresses
/// the focus move the notification precedes.
#[derive(Debug, Default)]
pub struct Notification {
    default_prevented: bool,
}

impl Notification {
    /// Suppress the focus move this notification precedes.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the default focus move has been suppressed.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What the container's Tab handler should do with a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabAction<K> {
    /// Not this scope's key; let the host's sequential navigation run.
    Pass,
    /// Swallow the key; focus stays where it is.
    Block,
    /// Swallow the key and move focus to this element.
    MoveTo(K),
}

#[derive(Clone, Debug)]
struct Scope<K> {
    id: ScopeId,
    container: K,
    wrap: bool,
    paused: bool,
    /// Focus to restore on unmount: whatever was focused just before mount.
    prev_focused: Option<K>,
    /// Last element known to be focused inside the container.
    last_focused: Option<K>,
}

/// The shared, ordered stack of mounted focus scopes.
#[derive(Debug)]
pub struct FocusScopeStack<K> {
    scopes: Vec<Scope<K>>,
    next_id: u64,
}

impl<K: Copy + Eq> FocusScopeStack<K> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of mounted scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scopes are mounted.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The scope currently trapping focus: the topmost unpaused scope.
    pub fn active_scope(&self) -> Option<ScopeId> {
        self.scopes
            .iter()
            .rev()
            .find(|scope| !scope.paused)
            .map(|scope| scope.id)
    }

    /// Whether `id` is the scope currently trapping focus.
    pub fn is_active(&self, id: ScopeId) -> bool {
        self.active_scope() == Some(id)
    }

    /// Mount a scope over `container` and push it onto the stack.
    ///
    /// `prev_focused` is whatever held focus just before mount; it becomes
    /// the restore target for [`unmount`](Self::unmount). When it is
    /// already inside the container, focus is left alone. Otherwise the
    /// cancellable open-auto-focus notification fires and — unless
    /// prevented — the returned focus target is the first tabbable
    /// descendant, falling back to the first focusable descendant, falling
    /// back to the container itself.
    pub fn mount<Q>(
        &mut self,
        container: K,
        options: ScopeOptions,
        prev_focused: Option<K>,
        query: &Q,
        on_open_auto_focus: impl FnOnce(&mut Notification),
    ) -> (ScopeId, Option<K>)
    where
        Q: FocusQuery<K>,
    {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        let mut scope = Scope {
            id,
            container,
            wrap: options.wrap,
            paused: false,
            prev_focused,
            last_focused: None,
        };

        let already_inside = prev_focused.is_some_and(|node| query.is_within(&container, &node));
        if already_inside {
            scope.last_focused = prev_focused;
            self.scopes.push(scope);
            return (id, None);
        }

        let mut notification = Notification::default();
        on_open_auto_focus(&mut notification);
        if notification.default_prevented() {
            self.scopes.push(scope);
            return (id, None);
        }

        let target = first_candidate(query, &container);
        scope.last_focused = Some(target);
        self.scopes.push(scope);
        (id, Some(target))
    }

    /// Unmount a scope: fire the cancellable close-auto-focus
    /// notification, remove the scope, and — unless prevented — return the
    /// element focused just before mount as the restore target.
    ///
    /// Removal tolerates out-of-order teardown; the scope below the
    /// departing top becomes active again without re-firing its own
    /// open-auto-focus. Unknown ids return `None`.
    pub fn unmount(
        &mut self,
        id: ScopeId,
        on_close_auto_focus: impl FnOnce(&mut Notification),
    ) -> Option<K> {
        let index = self.scopes.iter().position(|scope| scope.id == id)?;
        let scope = self.scopes.remove(index);

        let mut notification = Notification::default();
        on_close_auto_focus(&mut notification);
        if notification.default_prevented() {
            return None;
        }
        scope.prev_focused
    }

    /// Suspend a scope without unmounting (for example while a nested
    /// non-trapping popup is open). The next unpaused scope down becomes
    /// active.
    pub fn pause(&mut self, id: ScopeId) -> bool {
        self.set_paused(id, true)
    }

    /// Resume a paused scope.
    pub fn resume(&mut self, id: ScopeId) -> bool {
        self.set_paused(id, false)
    }

    /// Report a focus change to `target` against scope `id`.
    ///
    /// While the scope is active: focus landing inside the container is
    /// remembered as last-known-good; focus escaping outside yields a
    /// redirect back to the last-known-good element, falling back to the
    /// first tabbable / focusable descendant, then the container.
    /// Inactive scopes ignore the report.
    pub fn focus_in<Q>(&mut self, id: ScopeId, target: K, query: &Q) -> Option<K>
    where
        Q: FocusQuery<K>,
    {
        if !self.is_active(id) {
            return None;
        }
        let scope = self.scopes.iter_mut().find(|scope| scope.id == id)?;
        if query.is_within(&scope.container, &target) {
            scope.last_focused = Some(target);
            return None;
        }
        let destination = scope
            .last_focused
            .unwrap_or_else(|| first_candidate(query, &scope.container));
        scope.last_focused = Some(destination);
        Some(destination)
    }

    /// Handle Tab/Shift+Tab pressed while `current` is focused inside
    /// scope `id`.
    ///
    /// Wraps between the first and last tabbable descendants when the
    /// scope's `wrap` option is on; blocks at the edges when off. Inside
    /// the sequence the key passes through to the host's own navigation.
    pub fn handle_tab<Q>(&mut self, id: ScopeId, current: K, shift: bool, query: &Q) -> TabAction<K>
    where
        Q: FocusQuery<K>,
    {
        if !self.is_active(id) {
            return TabAction::Pass;
        }
        let Some(scope) = self.scopes.iter_mut().find(|scope| scope.id == id) else {
            return TabAction::Pass;
        };
        let tabbables = query.tabbables(&scope.container);
        let (Some(first), Some(last)) = (tabbables.first().copied(), tabbables.last().copied())
        else {
            // Nothing tabbable: hold focus where it is.
            return TabAction::Block;
        };

        let at_edge = if shift { current == first } else { current == last };
        if !at_edge {
            return TabAction::Pass;
        }
        if !scope.wrap {
            return TabAction::Block;
        }
        let destination = if shift { last } else { first };
        scope.last_focused = Some(destination);
        TabAction::MoveTo(destination)
    }

    /// Report that `node` was removed from the tree.
    ///
    /// When the active scope's remembered focus disappears (the
    /// mutation-observer case), returns a valid replacement — first
    /// tabbable, first focusable, or the container.
    pub fn node_removed<Q>(&mut self, id: ScopeId, node: K, query: &Q) -> Option<K>
    where
        Q: FocusQuery<K>,
    {
        if !self.is_active(id) {
            return None;
        }
        let scope = self.scopes.iter_mut().find(|scope| scope.id == id)?;
        if scope.last_focused != Some(node) {
            return None;
        }
        let destination = first_candidate(query, &scope.container);
        scope.last_focused = Some(destination);
        Some(destination)
    }

    fn set_paused(&mut self, id: ScopeId, paused: bool) -> bool {
        match self.scopes.iter_mut().find(|scope| scope.id == id) {
            Some(scope) => {
                scope.paused = paused;
                true
            }
            None => false,
        }
    }
}

impl<K: Copy + Eq> Default for FocusScopeStack<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// First tabbable descendant, else first focusable descendant, else the
/// container itself. Never fails.
fn first_candidate<K: Copy + Eq, Q: FocusQuery<K>>(query: &Q, container: &K) -> K {
    query
        .tabbables(container)
        .first()
        .copied()
        .or_else(|| query.focusables(container).first().copied())
        .unwrap_or(*container)
}
