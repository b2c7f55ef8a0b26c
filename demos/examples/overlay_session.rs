// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted overlay session composing the four Overstory engines.
//!
//! The "document" is a tiny parent-map node world holding a popover with a
//! nested menu, plus a tooltip trigger. The script walks through:
//! - focus trapping and restoration (`overstory_focus_scope`),
//! - arrow-key navigation over the menu items (`overstory_roving`),
//! - outside-interaction resolution across stacked overlays
//!   (`overstory_dismiss`),
//! - pointer transit from the tooltip trigger to its content
//!   (`overstory_grace`).
//!
//! Run:
//! - `cargo run -p overstory_demos --example overlay_session`

use std::collections::HashMap;

use kurbo::{Point, Rect};
use overstory_dismiss::{
    DismissBehavior, Hierarchy, InteractionEvent, InteractionKind, LayerStack,
};
use overstory_focus_scope::{FocusQuery, FocusScopeStack, ScopeOptions};
use overstory_grace::{GraceArea, PointerOver, Transit};
use overstory_polygon::point_in_polygon;
use overstory_roving::{Candidate, NavKey, Orientation, RovingFocus};

/// A node in the simulated document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Node(&'static str);

const DOC: Node = Node("document");
const PAGE_BUTTON: Node = Node("page-button");
const POPOVER: Node = Node("popover");
const CLOSE_BUTTON: Node = Node("popover-close");
const MENU_BUTTON: Node = Node("popover-menu-button");
const MENU: Node = Node("menu");
const ITEMS: [Node; 3] = [Node("item-cut"), Node("item-copy"), Node("item-paste")];

struct World {
    parents: HashMap<Node, Node>,
}

impl World {
    fn new() -> Self {
        let mut parents = HashMap::new();
        for node in [PAGE_BUTTON, POPOVER, MENU] {
            parents.insert(node, DOC);
        }
        for node in [CLOSE_BUTTON, MENU_BUTTON] {
            parents.insert(node, POPOVER);
        }
        for item in ITEMS {
            parents.insert(item, MENU);
        }
        Self { parents }
    }
}

impl Hierarchy<Node> for World {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.parents.get(node).copied()
    }
}

impl FocusQuery<Node> for World {
    fn is_within(&self, container: &Node, node: &Node) -> bool {
        overstory_dismiss::is_within(self, *container, *node)
    }
    fn tabbables(&self, container: &Node) -> Vec<Node> {
        match *container {
            POPOVER => vec![CLOSE_BUTTON, MENU_BUTTON],
            MENU => ITEMS.to_vec(),
            _ => vec![],
        }
    }
    fn focusables(&self, container: &Node) -> Vec<Node> {
        self.tabbables(container)
    }
}

fn pointer_pair(stack: &mut LayerStack<Node>, world: &World, target: Node, at: u64) {
    for (kind, offset) in [
        (InteractionKind::PointerDown, 0),
        (InteractionKind::PointerUp, 80),
    ] {
        stack.dispatch(
            InteractionEvent {
                kind,
                target: Some(target),
                timestamp: at + offset,
            },
            world,
        );
    }
}

fn main() {
    let world = World::new();
    let mut layers: LayerStack<Node> = LayerStack::new();
    let mut scopes: FocusScopeStack<Node> = FocusScopeStack::new();

    // 1. Open the popover: register its layer, trap focus inside it.
    println!("== open popover ==");
    let popover_layer = layers.register(POPOVER, DismissBehavior::Close);
    let (popover_scope, focus) = scopes.mount(
        POPOVER,
        ScopeOptions::default(),
        Some(PAGE_BUTTON),
        &world,
        |_| {},
    );
    println!("auto-focus lands on {:?}", focus);

    // 2. Open the menu inside it and walk the items with arrow keys.
    println!("\n== open menu, arrow through items ==");
    let menu_layer = layers.register(MENU, DismissBehavior::Close);
    let mut roving: RovingFocus<Node> = RovingFocus::new(Orientation::Vertical);
    roving.wrap = true;
    let items: Vec<Candidate<Node>> = ITEMS
        .iter()
        .map(|item| Candidate {
            id: *item,
            enabled: true,
        })
        .collect();
    let mut focused = roving.focus_first(&items).expect("menu has items");
    for key in [NavKey::ArrowDown, NavKey::ArrowDown, NavKey::ArrowDown] {
        if let Some(next) = roving.handle_key(&focused, key, &items) {
            println!("{key:?}: {:?} -> {:?}", focused, next);
            focused = next;
        }
    }

    // 3. Click on the popover body: outside the menu, inside the popover.
    //    Only the menu (the responsible layer) is dismissed.
    println!("\n== click the popover body ==");
    pointer_pair(&mut layers, &world, MENU_BUTTON, 1_000);
    let dismissed = layers.poll(2_000, |outside| {
        println!(
            "outside {:?} for layer {:?} (target {:?})",
            outside.kind, outside.layer, outside.target
        );
    });
    assert_eq!(dismissed, vec![menu_layer]);
    layers.unregister(menu_layer);
    println!("menu closed; popover stays open ({} layer left)", layers.len());

    // 4. Hover from the tooltip trigger toward its content, crossing the
    //    gap through the grace hull, then wander off.
    println!("\n== tooltip grace area ==");
    let trigger = Rect::new(40.0, 40.0, 120.0, 64.0);
    let content = Rect::new(140.0, 30.0, 260.0, 90.0);
    let mut grace = GraceArea::new();
    grace.begin_transit(Point::new(120.0, 52.0), &trigger, &content, 3_000);
    if let Some(hull) = grace.polygon() {
        println!(
            "grace hull has {} vertices; gap midpoint inside: {}",
            hull.len(),
            point_in_polygon(Point::new(130.0, 52.0), hull)
        );
    }
    for (point, over, at) in [
        (Point::new(128.0, 52.0), PointerOver::Outside, 3_020),
        (Point::new(136.0, 54.0), PointerOver::Outside, 3_040),
        (Point::new(150.0, 56.0), PointerOver::Content, 3_060),
    ] {
        println!("move to {point:?}: {:?}", grace.pointer_move(point, over, at));
    }
    // Leave the content downward, away from the trigger.
    grace.begin_transit(Point::new(150.0, 90.0), &content, &trigger, 3_200);
    let exit = grace.pointer_move(Point::new(150.0, 200.0), PointerOver::Outside, 3_220);
    assert_eq!(exit, Transit::Exited);
    println!("wandered off: {exit:?} (tooltip closes)");

    // 5. Click the page background: the popover is now responsible, gets
    //    dismissed, and focus is restored to the page button.
    println!("\n== click the page background ==");
    pointer_pair(&mut layers, &world, PAGE_BUTTON, 4_000);
    let dismissed = layers.poll(5_000, |_| {});
    assert_eq!(dismissed, vec![popover_layer]);
    layers.unregister(popover_layer);
    let restore = scopes.unmount(popover_scope, |_| {});
    println!("popover dismissed; focus restored to {:?}", restore);
}
