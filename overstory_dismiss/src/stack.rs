// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer registry and its two-phase outside-interaction resolution.
//!
//! ## Usage
//!
//! - Own one [`LayerStack`] per document/window; it is the shared registry.
//! - [`LayerStack::register`] on overlay mount, [`LayerStack::unregister`]
//!   on unmount — always paired, including abnormal teardown, or stale
//!   entries will corrupt responsibility resolution for every other layer.
//! - Feed every document-level pointer/touch event through
//!   [`LayerStack::dispatch`], then drain [`LayerStack::poll`] once the
//!   decision windows have elapsed (any later timestamp works; decisions
//!   simply wait until they are due).

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::types::{
    DismissBehavior, Hierarchy, InteractionClass, InteractionEvent, InteractionKind, Intercepted,
    LayerId, OutsideInteraction, is_within,
};

/// Window before an outside decision is finalized, in milliseconds.
///
/// Lets bubble work from inner layers (and their own dispatches) land
/// before an outer layer's decision is evaluated.
const DECISION_WINDOW_MS: u64 = 10;

/// Window before intercepted-event marks are cleared, in milliseconds.
///
/// Marks must outlive the decision window so a gesture that started inside
/// a layer cannot read as an outside interaction on release.
const RESET_WINDOW_MS: u64 = 20;

#[derive(Clone, Debug)]
struct Layer<K> {
    id: LayerId,
    container: K,
    behavior: DismissBehavior,
    intercepted: Intercepted,
    /// Responsibility snapshot taken at the last start event.
    responsible: bool,
}

#[derive(Clone, Debug)]
struct Pending<K> {
    layer: LayerId,
    kind: InteractionKind,
    target: K,
    due: u64,
    /// Touch deferral: released by the next `click` dispatch.
    held_for_click: bool,
}

/// The shared, ordered dismissable-layer registry.
///
/// Insertion order is stacking order; the registry is mutated only by
/// [`register`](Self::register)/[`unregister`](Self::unregister).
#[derive(Debug)]
pub struct LayerStack<K> {
    layers: Vec<Layer<K>>,
    pending: SmallVec<[Pending<K>; 4]>,
    reset_due: Option<u64>,
    next_id: u64,
}

impl<K: Copy + Eq> LayerStack<K> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            pending: SmallVec::new(),
            reset_due: None,
            next_id: 1,
        }
    }

    /// Register a layer for the overlay mounted in `container`.
    ///
    /// Layers stack in registration order; the returned id is never reused.
    pub fn register(&mut self, container: K, behavior: DismissBehavior) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            container,
            behavior,
            intercepted: Intercepted::empty(),
            responsible: false,
        });
        id
    }

    /// Remove a layer and any decisions still pending for it.
    ///
    /// Returns `false` when the id is unknown (already unregistered).
    pub fn unregister(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layers.iter().position(|layer| layer.id == id) else {
            return false;
        };
        self.layers.remove(index);
        self.pending.retain(|pending| pending.layer != id);
        true
    }

    /// Change a registered layer's behavior in place.
    pub fn set_behavior(&mut self, id: LayerId, behavior: DismissBehavior) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id == id) {
            Some(layer) => {
                layer.behavior = behavior;
                true
            }
            None => false,
        }
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether `id` is currently the responsible layer.
    ///
    /// Exactly one registered layer is responsible at any time: the most
    /// recently registered layer whose behavior claims responsibility
    /// (`Close` or `Ignore`), or the first-registered layer when every
    /// layer defers.
    pub fn is_responsible(&self, id: LayerId) -> bool {
        self.responsible_index()
            .and_then(|index| self.layers.get(index))
            .is_some_and(|layer| layer.id == id)
    }

    /// The layer Escape should be routed to: the topmost layer, regardless
    /// of behavior mode.
    pub fn escape_target(&self) -> Option<LayerId> {
        self.layers.last().map(|layer| layer.id)
    }

    /// Run both dispatch phases for one document-level event.
    ///
    /// The capture pass (interception marks, responsibility snapshots on
    /// start events) completes across every layer before the bubble pass
    /// queues any decision — the ordering the resolution depends on.
    /// Decisions come due one decision window (10 ms) later and are
    /// delivered by [`poll`](Self::poll).
    pub fn dispatch<H>(&mut self, event: InteractionEvent<K>, hierarchy: &H)
    where
        H: Hierarchy<K>,
    {
        let class = event.kind.class();

        // Capture pass.
        let responsible_index = self.responsible_index();
        for index in 0..self.layers.len() {
            if class == InteractionClass::Start {
                self.layers[index].responsible = responsible_index == Some(index);
            }
            if let Some(target) = event.target
                && is_within(hierarchy, self.layers[index].container, target)
            {
                self.layers[index].intercepted |= event.kind.flag();
            }
        }

        // The synthetic click after a touch releases held decisions.
        if event.kind == InteractionKind::Click {
            let due = event.timestamp.saturating_add(DECISION_WINDOW_MS);
            for pending in &mut self.pending {
                if pending.held_for_click {
                    pending.held_for_click = false;
                    pending.due = due;
                }
            }
        }

        // Bubble pass: queue a candidate decision per non-containing layer.
        if let Some(target) = event.target {
            let due = event.timestamp.saturating_add(DECISION_WINDOW_MS);
            let held = event.kind == InteractionKind::TouchStart;
            for index in 0..self.layers.len() {
                let container = self.layers[index].container;
                let id = self.layers[index].id;
                if is_within(hierarchy, container, target) {
                    continue;
                }
                self.queue_decision(id, event.kind, target, due, held);
            }
        }

        // Restart the intercepted-mark reset window.
        self.reset_due = Some(event.timestamp.saturating_add(RESET_WINDOW_MS));
    }

    /// Deliver due notifications and clear due intercepted marks, in
    /// deadline order.
    ///
    /// Each due decision is re-evaluated at delivery time — the layer must
    /// still be registered, have no intercepted events, hold the
    /// responsibility snapshot, and have a reacting behavior — then handed
    /// to `handler` as a cancellable [`OutsideInteraction`]. The flag is
    /// observed immediately after the handler returns. Returns the layers
    /// whose dismissal should proceed, deduplicated, in delivery order.
    pub fn poll(
        &mut self,
        now: u64,
        mut handler: impl FnMut(&mut OutsideInteraction<K>),
    ) -> Vec<LayerId> {
        let mut dismissals: Vec<LayerId> = Vec::new();
        loop {
            let decision = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, pending)| !pending.held_for_click && pending.due <= now)
                .min_by_key(|(_, pending)| pending.due)
                .map(|(index, pending)| (index, pending.due));
            let reset = self.reset_due.filter(|due| *due <= now);

            match (decision, reset) {
                // A reset strictly earlier than the next decision runs
                // first; on a tie the decision wins (it was queued first).
                (Some((_, due)), Some(reset_due)) if reset_due < due => self.clear_intercepted(),
                (Some((index, _)), _) => {
                    let pending = self.pending.remove(index);
                    if let Some(layer) = self.deliver(&pending, &mut handler)
                        && !dismissals.contains(&layer)
                    {
                        dismissals.push(layer);
                    }
                }
                (None, Some(_)) => self.clear_intercepted(),
                (None, None) => break,
            }
        }
        dismissals
    }

    fn responsible_index(&self) -> Option<usize> {
        if self.layers.is_empty() {
            return None;
        }
        self.layers
            .iter()
            .rposition(|layer| layer.behavior.claims_responsibility())
            .or(Some(0))
    }

    fn queue_decision(
        &mut self,
        layer: LayerId,
        kind: InteractionKind,
        target: K,
        due: u64,
        held: bool,
    ) {
        let class = kind.class();
        // Trailing-edge debounce: a newer event for the same slot replaces
        // the pending one.
        if let Some(existing) = self
            .pending
            .iter_mut()
            .find(|pending| pending.layer == layer && pending.kind.class() == class)
        {
            existing.kind = kind;
            existing.target = target;
            existing.due = due;
            existing.held_for_click = held;
        } else {
            self.pending.push(Pending {
                layer,
                kind,
                target,
                due,
                held_for_click: held,
            });
        }
    }

    fn clear_intercepted(&mut self) {
        self.reset_due = None;
        for layer in &mut self.layers {
            layer.intercepted = Intercepted::empty();
        }
    }

    fn deliver(
        &self,
        pending: &Pending<K>,
        handler: &mut impl FnMut(&mut OutsideInteraction<K>),
    ) -> Option<LayerId> {
        let layer = self.layers.iter().find(|layer| layer.id == pending.layer)?;
        // The decision gate, evaluated now rather than at dispatch time so
        // interleaved events could still suppress it.
        if !layer.intercepted.is_empty() || !layer.responsible || !layer.behavior.reacts() {
            return None;
        }
        let mut notification = OutsideInteraction {
            layer: layer.id,
            container: layer.container,
            kind: pending.kind,
            target: pending.target,
            default_prevented: false,
        };
        handler(&mut notification);
        (!notification.default_prevented).then_some(layer.id)
    }
}

impl<K: Copy + Eq> Default for LayerStack<K> {
    fn default() -> Self {
        Self::new()
    }
}
