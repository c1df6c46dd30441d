//! Window/pane layout tree (§3, §4.5): `LayoutNode` tree with alternating
//! split direction, divider drag, and the directional `focus_pane`
//! resolution deferred here from [`crate::input::action`] since only this
//! module carries the pane geometry that resolution needs.

use crate::input::action::PaneFocusDirection;
use crate::wire::inbound::{LayoutTemplate, ServerMessage, WireLayoutNode, WireWindow};
use crate::wire::outbound::LayoutEditNode;

/// Minimum share, as a percentage, either side of a divider may shrink to
/// (§4.5: "clamped to ≥ 5% per side").
const MIN_SIDE_PCT: f32 = 5.0;

/// A node in a window's split tree (§3). Direction alternates by depth:
/// even depths (root = 0) split horizontally, odd depths split vertically.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// A leaf occupied by (at most) one pane.
    Pane {
        /// The occupying pane, or `None` for an empty split slot.
        pane_id: Option<u32>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
    /// A split container.
    Container {
        /// Child nodes, in order.
        children: Vec<LayoutNode>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
}

impl LayoutNode {
    fn from_wire(node: &WireLayoutNode) -> Self {
        match node {
            WireLayoutNode::Pane { pane_id, width_pct, height_pct } => {
                LayoutNode::Pane { pane_id: *pane_id, width_pct: *width_pct, height_pct: *height_pct }
            }
            WireLayoutNode::Container { children, width_pct, height_pct } => LayoutNode::Container {
                children: children.iter().map(LayoutNode::from_wire).collect(),
                width_pct: *width_pct,
                height_pct: *height_pct,
            },
        }
    }

    fn to_edit(&self) -> LayoutEditNode {
        match self {
            LayoutNode::Pane { pane_id, width_pct, height_pct } => {
                LayoutEditNode::Pane { pane_id: *pane_id, width_pct: *width_pct, height_pct: *height_pct }
            }
            LayoutNode::Container { children, width_pct, height_pct } => LayoutEditNode::Container {
                children: children.iter().map(LayoutNode::to_edit).collect(),
                width_pct: *width_pct,
                height_pct: *height_pct,
            },
        }
    }
}

/// One window: an ordered list of owned panes plus its split tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Window identifier.
    pub id: u32,
    /// Currently focused pane within this window.
    pub active_pane_id: Option<u32>,
    /// All panes owned by this window, in creation order (used as the
    /// tab-order fallback for `focus_pane next/prev`).
    pub panes: Vec<u32>,
    /// The split tree, if one has been established.
    pub layout: Option<LayoutNode>,
}

impl Window {
    fn from_wire(w: &WireWindow) -> Self {
        Window {
            id: w.id,
            active_pane_id: w.active_pane_id,
            panes: w.panes.clone(),
            layout: w.layout.as_ref().map(LayoutNode::from_wire),
        }
    }
}

/// Cached `layout` message state (§4.5: "On layout, cache
/// `{activeWindowId, windows[], templates[]}`").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutState {
    /// Currently active window.
    pub active_window_id: u32,
    /// All windows.
    pub windows: Vec<Window>,
    /// Saved layout templates.
    pub templates: Vec<LayoutTemplate>,
}

impl LayoutState {
    /// Apply an inbound `layout` message, replacing the cached state
    /// wholesale. Returns `None` if `msg` isn't a `Layout` variant.
    pub fn apply(msg: &ServerMessage) -> Option<LayoutState> {
        let ServerMessage::Layout { active_window_id, windows, templates } = msg else {
            return None;
        };
        Some(LayoutState {
            active_window_id: *active_window_id,
            windows: windows.iter().map(Window::from_wire).collect(),
            templates: templates.clone(),
        })
    }

    /// The window with the given id, if present.
    pub fn window(&self, window_id: u32) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == window_id)
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    fn center(self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

fn collect_leaf_rects(node: &LayoutNode, depth: u32, rect: Rect, out: &mut Vec<(u32, Rect)>) {
    match node {
        LayoutNode::Pane { pane_id: Some(id), .. } => out.push((*id, rect)),
        LayoutNode::Pane { pane_id: None, .. } => {}
        LayoutNode::Container { children, .. } => {
            let horizontal = depth % 2 == 0;
            let mut x = rect.x;
            let mut y = rect.y;
            for child in children {
                let (cw_pct, ch_pct) = match child {
                    LayoutNode::Pane { width_pct, height_pct, .. }
                    | LayoutNode::Container { width_pct, height_pct, .. } => (*width_pct, *height_pct),
                };
                let child_rect = if horizontal {
                    let w = rect.w * cw_pct / 100.0;
                    let r = Rect { x, y: rect.y, w, h: rect.h };
                    x += w;
                    r
                } else {
                    let h = rect.h * ch_pct / 100.0;
                    let r = Rect { x: rect.x, y, w: rect.w, h };
                    y += h;
                    r
                };
                collect_leaf_rects(child, depth + 1, child_rect, out);
            }
        }
    }
}

/// Flatten `layout`'s pane leaves into their `(paneId, rect)` geometry, in
/// a `[0, 100] x [0, 100]` coordinate space.
fn leaf_rects(layout: &LayoutNode) -> Vec<(u32, Rect)> {
    let mut out = Vec::new();
    collect_leaf_rects(layout, 0, Rect { x: 0.0, y: 0.0, w: 100.0, h: 100.0 }, &mut out);
    out
}

/// Resolve a `focus_pane` action against `window`'s current geometry and
/// active pane (§4.4, §4.5). Directional moves (`Up`/`Down`/`Left`/`Right`)
/// pick the geometrically nearest leaf in that half-plane from the active
/// pane's center; if none exists (e.g. only one column), or `window` has no
/// layout tree yet, falls back to `Next`. `Next`/`Prev` cycle through
/// `window.panes` in tab order.
pub fn resolve_focus_pane(window: &Window, direction: PaneFocusDirection) -> Option<u32> {
    if window.panes.len() < 2 {
        return None;
    }
    let active = window.active_pane_id?;

    let directional_target = |dir: PaneFocusDirection| -> Option<u32> {
        let layout = window.layout.as_ref()?;
        let rects = leaf_rects(layout);
        let (ax, ay) = rects.iter().find(|(id, _)| *id == active)?.1.center();

        rects
            .iter()
            .filter(|(id, _)| *id != active)
            .filter_map(|(id, rect)| {
                let (cx, cy) = rect.center();
                let in_direction = match dir {
                    PaneFocusDirection::Up => cy < ay,
                    PaneFocusDirection::Down => cy > ay,
                    PaneFocusDirection::Left => cx < ax,
                    PaneFocusDirection::Right => cx > ax,
                    PaneFocusDirection::Next | PaneFocusDirection::Prev => unreachable!(),
                };
                if !in_direction {
                    return None;
                }
                let dist = (cx - ax).powi(2) + (cy - ay).powi(2);
                Some((*id, dist))
            })
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(id, _)| id)
    };

    let tab_order_target = |forward: bool| -> Option<u32> {
        let pos = window.panes.iter().position(|&p| p == active)?;
        let len = window.panes.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        Some(window.panes[next])
    };

    match direction {
        PaneFocusDirection::Next => tab_order_target(true),
        PaneFocusDirection::Prev => tab_order_target(false),
        dir => directional_target(dir).or_else(|| tab_order_target(true)),
    }
}

/// Adjust a divider between `children[index]` and `children[index + 1]` by
/// `delta_pct` (positive grows the earlier side), clamped so neither side
/// drops below `MIN_SIDE_PCT` (§4.5).
pub fn drag_divider(children: &mut [LayoutNode], index: usize, delta_pct: f32, horizontal: bool) {
    if index + 1 >= children.len() {
        return;
    }
    let pct_of = |node: &LayoutNode| -> f32 {
        match node {
            LayoutNode::Pane { width_pct, height_pct, .. }
            | LayoutNode::Container { width_pct, height_pct, .. } => {
                if horizontal {
                    *width_pct
                } else {
                    *height_pct
                }
            }
        }
    };
    let set_pct = |node: &mut LayoutNode, value: f32| match node {
        LayoutNode::Pane { width_pct, height_pct, .. } | LayoutNode::Container { width_pct, height_pct, .. } => {
            if horizontal {
                *width_pct = value;
            } else {
                *height_pct = value;
            }
        }
    };

    let a = pct_of(&children[index]);
    let b = pct_of(&children[index + 1]);
    let total = a + b;
    let clamped_delta = delta_pct.clamp(MIN_SIDE_PCT - a, b - MIN_SIDE_PCT);
    let new_a = (a + clamped_delta).clamp(MIN_SIDE_PCT, total - MIN_SIDE_PCT);
    let new_b = total - new_a;
    set_pct(&mut children[index], new_a);
    set_pct(&mut children[index + 1], new_b);
}

/// Build the `resize_layout{windowId, nodes}` payload for a committed
/// divider drag (§4.5).
pub fn build_resize_layout_nodes(layout: &LayoutNode) -> LayoutEditNode {
    layout.to_edit()
}
