// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layer stack: identifiers, behaviors, events, and
//! the ancestry seam.

/// Identifier for a registered layer. Never reused within a stack.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

/// How a layer reacts to interactions outside its container.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DismissBehavior {
    /// React to outside interactions, and claim responsibility from the
    /// layers registered before it.
    Close,
    /// Claim responsibility like `Close`, but never react — outside
    /// interactions are swallowed while this layer is topmost.
    Ignore,
    /// Defer to the layers registered after it; react only when no layer
    /// above claims responsibility.
    DeferOtherwiseClose,
}

impl DismissBehavior {
    /// Whether this behavior claims responsibility from layers below.
    pub(crate) fn claims_responsibility(self) -> bool {
        matches!(self, Self::Close | Self::Ignore)
    }

    /// Whether a responsible layer with this behavior reacts to outside
    /// interactions.
    pub(crate) fn reacts(self) -> bool {
        matches!(self, Self::Close | Self::DeferOtherwiseClose)
    }
}

/// Pointer/touch event types the stack distinguishes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InteractionKind {
    /// `pointerdown`.
    PointerDown,
    /// `mousedown`.
    MouseDown,
    /// `touchstart`.
    TouchStart,
    /// `pointerup`.
    PointerUp,
    /// `mouseup`.
    MouseUp,
    /// `touchend`.
    TouchEnd,
    /// `click`, including the synthetic click a browser emits after touch.
    Click,
}

/// The two interaction classes a gesture is split into.
///
/// Start events begin a press; end events complete it. Each class feeds a
/// separate outside-notification slot on the owning overlay.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InteractionClass {
    /// `pointerdown` / `mousedown` / `touchstart`.
    Start,
    /// `pointerup` / `mouseup` / `touchend` / `click`.
    End,
}

impl InteractionKind {
    /// The class this event kind belongs to.
    pub const fn class(self) -> InteractionClass {
        match self {
            Self::PointerDown | Self::MouseDown | Self::TouchStart => InteractionClass::Start,
            Self::PointerUp | Self::MouseUp | Self::TouchEnd | Self::Click => InteractionClass::End,
        }
    }

    pub(crate) const fn flag(self) -> Intercepted {
        match self {
            Self::PointerDown => Intercepted::POINTER_DOWN,
            Self::MouseDown => Intercepted::MOUSE_DOWN,
            Self::TouchStart => Intercepted::TOUCH_START,
            Self::PointerUp => Intercepted::POINTER_UP,
            Self::MouseUp => Intercepted::MOUSE_UP,
            Self::TouchEnd => Intercepted::TOUCH_END,
            Self::Click => Intercepted::CLICK,
        }
    }
}

bitflags::bitflags! {
    /// Per-layer record of event types that passed through the layer's own
    /// container. Cleared on the reset window.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub(crate) struct Intercepted: u8 {
        const POINTER_DOWN = 1 << 0;
        const MOUSE_DOWN   = 1 << 1;
        const TOUCH_START  = 1 << 2;
        const POINTER_UP   = 1 << 3;
        const MOUSE_UP     = 1 << 4;
        const TOUCH_END    = 1 << 5;
        const CLICK        = 1 << 6;
    }
}

/// A single pointer/touch event as observed at the document level.
#[derive(Copy, Clone, Debug)]
pub struct InteractionEvent<K> {
    /// What kind of event this is.
    pub kind: InteractionKind,
    /// The event target, or `None` when the target is no longer in the
    /// document (a teardown race; such events decide nothing).
    pub target: Option<K>,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
}

/// Host-provided ancestry lookup used to resolve containment.
pub trait Hierarchy<K> {
    /// The parent of `node`, or `None` at a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Whether `node` is `container` or one of its descendants.
///
/// Walks `parent_of` toward the root; the host guarantees acyclic ancestry.
pub fn is_within<K, H>(hierarchy: &H, container: K, node: K) -> bool
where
    K: Copy + Eq,
    H: Hierarchy<K>,
{
    let mut current = node;
    loop {
        if current == container {
            return true;
        }
        match hierarchy.parent_of(&current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

/// A cancellable outside-interaction notification.
///
/// Delivered by [`LayerStack::poll`](crate::stack::LayerStack::poll); the
/// consumer may call [`prevent_default`](Self::prevent_default) to keep the
/// interaction from being treated as a dismissal. The stack observes the
/// flag immediately after the handler returns.
#[derive(Clone, Debug)]
pub struct OutsideInteraction<K> {
    /// The layer whose outside slot is firing.
    pub layer: LayerId,
    /// That layer's container.
    pub container: K,
    /// The kind of the original event.
    pub kind: InteractionKind,
    /// The original event's target.
    pub target: K,
    pub(crate) default_prevented: bool,
}

impl<K> OutsideInteraction<K> {
    /// Which notification slot this delivery belongs to.
    pub fn class(&self) -> InteractionClass {
        self.kind.class()
    }

    /// Suppress the default effect (treating the interaction as a
    /// dismissal).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the default effect has been suppressed.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parents;
    impl Hierarchy<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            match node {
                3 => Some(2),
                2 => Some(1),
                _ => None,
            }
        }
    }

    #[test]
    fn is_within_walks_ancestry() {
        assert!(is_within(&Parents, 1, 3));
        assert!(is_within(&Parents, 2, 3));
        assert!(is_within(&Parents, 3, 3), "containment is inclusive");
        assert!(!is_within(&Parents, 3, 1));
        assert!(!is_within(&Parents, 2, 9));
    }

    #[test]
    fn kind_classes_split_start_and_end() {
        use InteractionKind::*;
        for kind in [PointerDown, MouseDown, TouchStart] {
            assert_eq!(kind.class(), InteractionClass::Start);
        }
        for kind in [PointerUp, MouseUp, TouchEnd, Click] {
            assert_eq!(kind.class(), InteractionClass::End);
        }
    }
}
