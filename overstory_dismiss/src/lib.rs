// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Dismiss: the dismissable layer stack.
//!
//! ## Overview
//!
//! With several overlays open at once (say, a select inside a popover),
//! a single outside pointer or touch interaction must dismiss **exactly
//! one** of them. [`LayerStack`](stack::LayerStack) is the shared, ordered
//! registry that resolves this: overlays register a layer on mount
//! (insertion order is stacking order), deregister on unmount, and feed
//! document-level pointer events through [`LayerStack::dispatch`](stack::LayerStack::dispatch).
//!
//! ## Two-phase dispatch
//!
//! In the original DOM setting the resolution depends on capture-phase
//! handlers across all layers running before any layer's bubble-phase
//! handler. Outside the DOM that ordering has to be replicated explicitly,
//! so `dispatch` performs both phases itself, in order, for every event:
//!
//! - **Capture pass** — each layer whose container contains the event
//!   target marks the event type as intercepted on itself; on start events
//!   (`pointerdown`/`mousedown`/`touchstart`) every layer snapshots whether
//!   it is currently the responsible layer.
//! - **Bubble pass** — each layer whose container does *not* contain the
//!   target queues a candidate outside-interaction decision.
//!
//! Decisions are not final at dispatch time: they come due after a short
//! window (10 ms) and are evaluated and delivered by
//! [`LayerStack::poll`](stack::LayerStack::poll), with intercepted marks
//! cleared on their own window (20 ms). The windows are correctness, not
//! throttling — they are what lets events from inner layers land before an
//! outer layer's decision is finalized, and they are not configurable.
//!
//! ## Responsibility
//!
//! Exactly one layer is responsible per query: the most recently
//! registered layer whose behavior is [`DismissBehavior::Close`] or
//! [`DismissBehavior::Ignore`] (a layer that does not defer to the layers
//! above it), or the first-registered layer when every layer defers.
//! Only a responsible layer with a reacting behavior (`Close` or
//! `DeferOtherwiseClose`) is delivered an outside notification.
//!
//! ## Touch
//!
//! On touch devices the browser follows `touchstart` with a synthetic
//! `click` roughly 350 ms later. A decision born from a `touchstart` is
//! therefore held rather than scheduled, and released by the next `click`
//! dispatch, so that a touch either completes into a real outside
//! interaction or is superseded by whatever the click hit.
//!
//! ## Delivery
//!
//! [`LayerStack::poll`](stack::LayerStack::poll) hands each due
//! notification to a handler as a cancellable
//! [`OutsideInteraction`](types::OutsideInteraction); the stack observes
//! `default_prevented` immediately after the handler returns and reports
//! the layers whose dismissal should proceed. The stack never closes
//! anything itself — the owning overlay does.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod stack;
pub mod types;

pub use stack::LayerStack;
pub use types::{
    DismissBehavior, Hierarchy, InteractionClass, InteractionEvent, InteractionKind, LayerId,
    OutsideInteraction, is_within,
};
