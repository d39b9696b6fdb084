// ABOUTME: Focus navigation between panes.
// ABOUTME: Tree-order stepping and directional search over virtual pane geometry.

use std::ops::ControlFlow;

use smux_core::{Axis, FocusDirection};

use crate::content::PaneContent;
use crate::node::{ChildSlot, NodeKind, PaneHandle, SplitPane};
use crate::tree::PaneTree;

const ADJACENCY_EPSILON: f32 = 1e-4;

/// A node's rectangle derived from split ratios alone.
///
/// Works before the tree was ever laid out: the root is `{0, 0, 1, 1}`
/// unless its real size is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanePoint {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl PanePoint {
    fn right(&self) -> f32 {
        self.x + self.scale_x
    }

    fn bottom(&self) -> f32 {
        self.y + self.scale_y
    }

    /// True if `other` borders this rectangle on the `direction` side and
    /// contains this rectangle's top-left corner along the shared edge
    pub fn is_adjacent(&self, other: &PanePoint, direction: FocusDirection) -> bool {
        let near = |a: f32, b: f32| (a - b).abs() < ADJACENCY_EPSILON;
        let within_height = self.y >= other.y && self.y < other.bottom();
        let within_width = self.x >= other.x && self.x < other.right();

        match direction {
            FocusDirection::Left => near(self.x, other.right()) && within_height,
            FocusDirection::Right => near(self.right(), other.x) && within_height,
            FocusDirection::Up => near(self.y, other.bottom()) && within_width,
            FocusDirection::Down => near(self.bottom(), other.y) && within_width,
            _ => false,
        }
    }

    fn split(self, split: &SplitPane) -> (PanePoint, PanePoint) {
        let mut first = self;
        let mut second = self;
        if split.orientation.axis() == Axis::Height {
            first.scale_y *= split.ratio;
            second.scale_y *= 1.0 - split.ratio;
            second.y += first.scale_y;
        } else {
            first.scale_x *= split.ratio;
            second.scale_x *= 1.0 - split.ratio;
            second.x += first.scale_x;
        }
        (first, second)
    }
}

#[derive(Debug, Clone, Copy)]
struct NeighborSearch {
    source: Option<PaneHandle>,
    neighbor: Option<PaneHandle>,
    source_offset: PanePoint,
}

impl<C: PaneContent> PaneTree<C> {
    /// Leaf following `target` in tree order, wrapping to the first leaf
    pub fn next_pane(&self, target: PaneHandle) -> Option<PaneHandle> {
        if self.is_leaf(self.root) != Some(false) {
            return None;
        }

        let mut first_leaf = None;
        let mut next = None;
        let mut found_target = false;
        self.walk_tree(|pane| {
            if first_leaf.is_none() && pane.is_leaf() {
                first_leaf = Some(pane.handle());
            }
            if found_target && pane.is_leaf() {
                next = Some(pane.handle());
                return ControlFlow::Break(());
            }
            if pane.handle() == target {
                found_target = true;
            }
            ControlFlow::Continue(())
        });

        next.or(if found_target { first_leaf } else { None })
    }

    /// Leaf preceding `target` in tree order, wrapping to the last leaf
    pub fn previous_pane(&self, target: PaneHandle) -> Option<PaneHandle> {
        if self.is_leaf(self.root) != Some(false) {
            return None;
        }

        let mut last_leaf = None;
        let mut found_target = false;
        self.walk_tree(|pane| {
            if pane.handle() == target {
                found_target = true;
                if last_leaf.is_some() {
                    return ControlFlow::Break(());
                }
            }
            if pane.is_leaf() {
                last_leaf = Some(pane.handle());
            }
            ControlFlow::Continue(())
        });

        if found_target {
            last_leaf
        } else {
            None
        }
    }

    /// Pane to move focus to from `source`.
    ///
    /// `mru` lists pane ids from most to least recently focused and is only
    /// consulted for `FocusDirection::Previous`.
    pub fn navigate_direction(
        &self,
        source: PaneHandle,
        direction: FocusDirection,
        mru: &[u32],
    ) -> Option<PaneHandle> {
        if self.is_leaf(self.root) != Some(false) {
            return None;
        }

        match direction {
            FocusDirection::None => None,
            FocusDirection::Previous => mru.get(1).and_then(|id| self.find_pane(*id)),
            FocusDirection::NextInOrder => self.next_pane(source),
            FocusDirection::PreviousInOrder => self.previous_pane(source),
            FocusDirection::First => self.first_leaf(self.root).filter(|first| *first != source),
            FocusDirection::Left | FocusDirection::Right | FocusDirection::Up | FocusDirection::Down => {
                let search = self.find_pane_and_neighbor(self.root, source, direction, self.root_offset());
                search.source.and(search.neighbor)
            }
        }
    }

    /// Virtual rectangle of `pane` within the root
    pub fn pane_offset(&self, pane: PaneHandle) -> Option<PanePoint> {
        let mut path = Vec::new();
        let mut current = pane;
        while let Some((parent, slot)) = self.parent_of(current) {
            path.push((parent, slot));
            current = parent;
        }
        if current != self.root {
            return None;
        }

        let mut offset = self.root_offset();
        for (parent, slot) in path.into_iter().rev() {
            let split = self.nodes.get(&parent)?.as_split()?;
            let (first, second) = offset.split(split);
            offset = match slot {
                ChildSlot::First => first,
                ChildSlot::Second => second,
            };
        }
        Some(offset)
    }

    fn root_offset(&self) -> PanePoint {
        let size = self
            .nodes
            .get(&self.root)
            .map(|node| node.last_size)
            .unwrap_or_default();
        PanePoint {
            x: 0.0,
            y: 0.0,
            scale_x: if size.width > 0.0 { size.width } else { 1.0 },
            scale_y: if size.height > 0.0 { size.height } else { 1.0 },
        }
    }

    fn find_pane_and_neighbor(
        &self,
        pane: PaneHandle,
        source: PaneHandle,
        direction: FocusDirection,
        offset: PanePoint,
    ) -> NeighborSearch {
        let not_found = NeighborSearch {
            source: None,
            neighbor: None,
            source_offset: offset,
        };
        if pane == source {
            return NeighborSearch {
                source: Some(pane),
                ..not_found
            };
        }
        let Some(NodeKind::Split(split)) = self.nodes.get(&pane).map(|node| &node.kind) else {
            return not_found;
        };

        let (first_offset, second_offset) = offset.split(split);
        let crosses = direction.crosses(split.orientation);

        let search = self.find_pane_and_neighbor(split.first, source, direction, first_offset);
        if search.source.is_some() {
            if search.neighbor.is_none() && crosses {
                return self.find_neighbor_for_pane(split.second, direction, search, false, second_offset);
            }
            return search;
        }

        let search = self.find_pane_and_neighbor(split.second, source, direction, second_offset);
        if search.source.is_some() {
            if search.neighbor.is_none() && crosses {
                return self.find_neighbor_for_pane(split.first, direction, search, true, first_offset);
            }
            return search;
        }

        not_found
    }

    fn find_neighbor_for_pane(
        &self,
        pane: PaneHandle,
        direction: FocusDirection,
        mut search: NeighborSearch,
        source_is_second: bool,
        offset: PanePoint,
    ) -> NeighborSearch {
        // Moving further out of the side the source sits on cannot reach this subtree
        let leaves_side = if source_is_second {
            matches!(direction, FocusDirection::Right | FocusDirection::Down)
        } else {
            matches!(direction, FocusDirection::Left | FocusDirection::Up)
        };
        if leaves_side {
            return search;
        }

        match self.nodes.get(&pane).map(|node| &node.kind) {
            Some(NodeKind::Leaf(_)) => {
                if search.source_offset.is_adjacent(&offset, direction) {
                    search.neighbor = Some(pane);
                }
                search
            }
            Some(NodeKind::Split(split)) => {
                let (first_offset, second_offset) = offset.split(split);
                let found =
                    self.find_neighbor_for_pane(split.first, direction, search, source_is_second, first_offset);
                if found.neighbor.is_some() {
                    return found;
                }
                self.find_neighbor_for_pane(split.second, direction, search, source_is_second, second_offset)
            }
            None => search,
        }
    }
}
