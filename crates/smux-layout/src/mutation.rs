// ABOUTME: Structural mutations of the pane tree.
// ABOUTME: Split, close, detach/attach, swap, orientation toggle, zoom and directional resize.

use std::collections::{BTreeMap, HashSet};

use smux_core::{Borders, Orientation, ResizeDirection, SplitRequest};
use tracing::{debug, warn};

use crate::content::PaneContent;
use crate::node::{ChildSlot, Node, NodeKind, PaneHandle, SplitPane};
use crate::tree::PaneTree;

impl<C: PaneContent> PaneTree<C> {
    /// Split the leaf `target`, placing `content` in a new second child.
    ///
    /// `split_size` is the fraction of the area given to the new pane. The
    /// existing content keeps `target`'s handle and becomes the first child.
    /// Returns the two leaves. If the request resolves to no split or the
    /// pane is too small for it, `content` is handed back unopened.
    pub fn split(
        &mut self,
        target: PaneHandle,
        request: SplitRequest,
        split_size: f32,
        content: C,
    ) -> Result<(PaneHandle, PaneHandle), C> {
        let Some(orientation) = self.check_split(target, request, split_size) else {
            return Err(content);
        };
        let Some(id) = self.allocate_id(&HashSet::new()) else {
            warn!("Split rejected: no pane id left");
            return Err(content);
        };

        let state = content.connection_state();
        let second = PaneHandle::next();
        self.nodes.insert(second, Node::leaf(content, Some(id), state));
        self.clear_zoom();
        self.link_split(target, orientation, split_size, second);
        self.refresh_layout();

        debug!(
            "Split {:?} {:?}, new pane {:?} with id {}",
            target, orientation, second, id
        );
        Ok((target, second))
    }

    /// Split `target` giving the new pane the configured default share
    pub fn split_default(
        &mut self,
        target: PaneHandle,
        request: SplitRequest,
        content: C,
    ) -> Result<(PaneHandle, PaneHandle), C> {
        let split_size = self.config.default_split_size;
        self.split(target, request, split_size, content)
    }

    /// Split the active leaf and focus the new pane
    pub fn split_active(
        &mut self,
        request: SplitRequest,
        split_size: f32,
        content: C,
    ) -> Result<(PaneHandle, PaneHandle), C> {
        let Some(active) = self.active_pane() else {
            return Err(content);
        };
        let (first, second) = self.split(active, request, split_size, content)?;
        self.set_active(second);
        Ok((first, second))
    }

    fn check_split(
        &self,
        target: PaneHandle,
        request: SplitRequest,
        split_size: f32,
    ) -> Option<Orientation> {
        let node = self.nodes.get(&target)?;
        if !node.is_leaf() {
            warn!("Split rejected: {:?} is not a leaf", target);
            return None;
        }
        if let Some(max) = self.config.max_panes {
            if self.leaf_count() >= max {
                warn!("Split rejected: pane limit of {} reached", max);
                return None;
            }
        }

        let orientation = request.resolve(node.last_size)?;
        let root_size = self.nodes.get(&self.root)?.last_size;
        if root_size.is_measured()
            && self.can_split(target, orientation.into(), split_size, root_size) != Some(true)
        {
            debug!("Split rejected: {:?} is too small", target);
            return None;
        }
        Some(orientation)
    }

    /// Replace `target` with a split holding `target` first and `second` second
    fn link_split(
        &mut self,
        target: PaneHandle,
        orientation: Orientation,
        split_size: f32,
        second: PaneHandle,
    ) {
        let parent = self.parent_of(target);
        let Some((borders, last_size)) = self
            .nodes
            .get(&target)
            .map(|node| (node.borders, node.last_size))
        else {
            return;
        };

        let split = PaneHandle::next();
        self.nodes.insert(
            split,
            Node {
                parent: None,
                borders,
                last_size,
                kind: NodeKind::Split(SplitPane {
                    orientation,
                    ratio: (1.0 - split_size).clamp(0.0, 1.0),
                    first: target,
                    second,
                }),
            },
        );
        self.relink(parent, split);
        for child in [target, second] {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent = Some(split);
            }
        }
        self.apply_split_definitions(split);
    }

    /// Close the leaf `pane`, merging its sibling into the parent's place
    pub fn close_pane(&mut self, pane: PaneHandle) -> bool {
        match self.parent_of(pane) {
            Some((parent, slot)) => self.close_child(parent, slot),
            None => false,
        }
    }

    /// Close one child of `parent`, releasing every leaf beneath it.
    ///
    /// A no-op returning false when `parent` is gone or is no longer a split,
    /// which happens when both children closed in quick succession.
    pub fn close_child(&mut self, parent: PaneHandle, slot: ChildSlot) -> bool {
        let Some(closed) = self.collapse(parent, slot) else {
            return false;
        };
        self.release_subtree(closed);
        self.refresh_layout();
        true
    }

    /// Unlink one child of `parent` and put the other child in the parent's place.
    /// The unlinked subtree stays in storage, parentless; returns its root.
    fn collapse(&mut self, parent: PaneHandle, slot: ChildSlot) -> Option<PaneHandle> {
        let Some(node) = self.nodes.get(&parent) else {
            warn!("Close ignored: {:?} no longer exists", parent);
            return None;
        };
        let Some(split) = node.as_split().copied() else {
            warn!("Close ignored: {:?} has already collapsed", parent);
            return None;
        };
        let parent_size = node.last_size;
        let grandparent = self.parent_of(parent);
        let closed = split.child(slot);
        let remaining = split.child(slot.other());
        let closed_had_focus = self.active_under(closed).is_some();
        let borders = self.common_borders(parent);

        self.clear_zoom();
        self.nodes.remove(&parent);
        if let Some(node) = self.nodes.get_mut(&closed) {
            node.parent = None;
        }
        if let Some(node) = self.nodes.get_mut(&remaining) {
            node.borders = borders;
            node.last_size = parent_size;
        }
        self.relink(grandparent, remaining);
        self.apply_split_definitions(remaining);

        if closed_had_focus {
            if let Some(first) = self.first_leaf(remaining) {
                self.set_active(first);
            }
        }

        debug!(
            "Removed {:?} from split {:?}, {:?} takes its place",
            closed, parent, remaining
        );
        Some(closed)
    }

    fn release_subtree(&mut self, pane: PaneHandle) {
        for handle in self.preorder(pane) {
            let Some(node) = self.nodes.remove(&handle) else {
                continue;
            };
            if let NodeKind::Leaf(mut leaf) = node.kind {
                leaf.content.close();
                let id = leaf.id;
                self.notify(|observer| observer.pane_closed(handle, id));
            }
        }
    }

    /// Remove `pane` and everything beneath it, returning it as its own tree.
    ///
    /// The root cannot be detached. Leaves keep their handles, ids and focus.
    pub fn detach(&mut self, pane: PaneHandle) -> Option<PaneTree<C>> {
        if pane == self.root {
            return None;
        }
        let (parent, slot) = self.parent_of(pane)?;
        let detached = self.collapse(parent, slot)?;

        let mut nodes = BTreeMap::new();
        for handle in self.preorder(detached) {
            if let Some(node) = self.nodes.remove(&handle) {
                nodes.insert(handle, node);
            }
        }
        for (handle, node) in &nodes {
            if let Some(leaf) = node.as_leaf() {
                let (handle, id) = (*handle, leaf.id);
                self.notify(|observer| observer.pane_detached(handle, id));
            }
        }
        self.refresh_layout();

        let mut subtree = PaneTree::from_nodes(detached, nodes, self.config.clone());
        if let Some(root) = subtree.nodes.get_mut(&detached) {
            root.borders = Borders::empty();
        }
        subtree.apply_split_definitions(detached);

        debug!("Detached {:?} with {} panes", detached, subtree.leaf_count());
        Some(subtree)
    }

    /// Split the leaf `target` with a previously detached tree as the second child.
    ///
    /// The subtree gets the configured default share of the area. Ids in
    /// `subtree` that are already used here are reassigned. If the subtree
    /// had a focused leaf it becomes the focused leaf of this tree.
    /// On failure the subtree is handed back untouched.
    pub fn attach_pane(
        &mut self,
        target: PaneHandle,
        mut subtree: PaneTree<C>,
        request: SplitRequest,
    ) -> Result<PaneHandle, PaneTree<C>> {
        let orientation = match self.nodes.get(&target) {
            Some(node) if node.is_leaf() => request.resolve(node.last_size),
            _ => None,
        };
        let Some(orientation) = orientation else {
            warn!("Attach rejected: {:?} cannot be split", target);
            return Err(subtree);
        };

        let taken: HashSet<u32> = self
            .leaves()
            .into_iter()
            .filter_map(|handle| self.pane_id(handle))
            .collect();
        let mut kept = HashSet::new();
        let mut renumber = Vec::new();
        for (handle, node) in &subtree.nodes {
            if let Some(leaf) = node.as_leaf() {
                match leaf.id {
                    Some(id) if !taken.contains(&id) && kept.insert(id) => {}
                    _ => renumber.push(*handle),
                }
            }
        }
        if let Some(highest) = kept.iter().max() {
            self.next_id = self.next_id.max(highest.saturating_add(1));
        }
        let mut fresh = Vec::with_capacity(renumber.len());
        for handle in renumber {
            let Some(id) = self.allocate_id(&kept) else {
                warn!("Attach rejected: no pane id left");
                return Err(subtree);
            };
            kept.insert(id);
            fresh.push((handle, id));
        }

        let attached = subtree.root;
        let focused = subtree.active_pane();
        let mut nodes = std::mem::take(&mut subtree.nodes);
        drop(subtree);
        for (handle, id) in fresh {
            if let Some(leaf) = nodes.get_mut(&handle).and_then(Node::as_leaf_mut) {
                leaf.id = Some(id);
            }
        }
        self.nodes.extend(nodes);

        self.clear_zoom();
        let split_size = self.config.default_split_size;
        self.link_split(target, orientation, split_size, attached);
        if let Some(focused) = focused {
            self.set_active(focused);
        }
        self.refresh_layout();

        debug!("Attached {:?} next to {:?}", attached, target);
        Ok(target)
    }

    /// Exchange the positions of two nodes. Fails for identical panes, a
    /// single-leaf tree, missing panes, or when one contains the other.
    pub fn swap_panes(&mut self, a: PaneHandle, b: PaneHandle) -> bool {
        if a == b || self.is_leaf(self.root) == Some(true) {
            return false;
        }
        let (Some((parent_a, slot_a)), Some((parent_b, slot_b))) =
            (self.parent_of(a), self.parent_of(b))
        else {
            warn!("Swap ignored: {:?} or {:?} has no parent", a, b);
            return false;
        };
        if self.is_within(a, b) || self.is_within(b, a) {
            return false;
        }

        self.clear_zoom();
        let Some((borders_a, size_a)) = self.nodes.get(&a).map(|n| (n.borders, n.last_size)) else {
            return false;
        };
        let Some((borders_b, size_b)) = self.nodes.get(&b).map(|n| (n.borders, n.last_size)) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(&a) {
            node.borders = borders_b;
            node.last_size = size_b;
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.borders = borders_a;
            node.last_size = size_a;
        }

        if parent_a == parent_b {
            if let Some(split) = self.nodes.get_mut(&parent_a).and_then(Node::as_split_mut) {
                std::mem::swap(&mut split.first, &mut split.second);
            }
            self.reapply_borders(parent_a);
        } else {
            self.relink(Some((parent_a, slot_a)), b);
            self.relink(Some((parent_b, slot_b)), a);
            self.reapply_borders(parent_a);
            self.reapply_borders(parent_b);
        }

        let focus = self.active_under(a).or_else(|| self.first_leaf(a));
        if let Some(focus) = focus {
            self.set_active(focus);
        }
        self.refresh_layout();

        debug!("Swapped {:?} and {:?}", a, b);
        true
    }

    fn reapply_borders(&mut self, split: PaneHandle) {
        let borders = self.positional_borders(split);
        if let Some(node) = self.nodes.get_mut(&split) {
            node.borders = borders;
        }
        self.apply_split_definitions(split);
    }

    /// Flip the orientation of the split directly holding the active leaf
    pub fn toggle_split_orientation(&mut self) -> bool {
        let Some(active) = self.active_pane() else {
            return false;
        };
        let Some((parent, _)) = self.parent_of(active) else {
            return false;
        };

        let borders = self.common_borders(parent);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.borders = borders;
            if let Some(split) = node.as_split_mut() {
                split.orientation = split.orientation.toggled();
            }
        }
        self.apply_split_definitions(parent);
        self.refresh_layout();
        true
    }

    /// Show `pane` over the whole area. The tree shape is not changed.
    pub fn zoom(&mut self, pane: PaneHandle) -> bool {
        if self.is_leaf(pane) != Some(true) {
            return false;
        }
        self.clear_zoom();
        if let Some(leaf) = self.nodes.get_mut(&pane).and_then(Node::as_leaf_mut) {
            leaf.zoomed = true;
        }
        self.zoomed = Some(pane);
        debug!("Zoomed {:?}", pane);
        true
    }

    pub fn restore(&mut self, pane: PaneHandle) -> bool {
        if self.zoomed != Some(pane) {
            return false;
        }
        self.clear_zoom();
        true
    }

    pub fn zoomed_pane(&self) -> Option<PaneHandle> {
        self.zoomed
    }

    fn clear_zoom(&mut self) {
        if let Some(pane) = self.zoomed.take() {
            if let Some(leaf) = self.nodes.get_mut(&pane).and_then(Node::as_leaf_mut) {
                leaf.zoomed = false;
            }
        }
    }

    /// Move the separator closest to the active leaf that runs across `direction`.
    ///
    /// Right and Down grow the first child, Left and Up shrink it. The ratio
    /// is clamped so both children keep their minimum size.
    pub fn resize_pane(&mut self, direction: ResizeDirection) -> bool {
        let Some(active) = self.active_pane() else {
            return false;
        };
        let mut current = active;
        while let Some((parent, _)) = self.parent_of(current) {
            let matches = self
                .nodes
                .get(&parent)
                .and_then(Node::as_split)
                .is_some_and(|split| direction.moves(split.orientation));
            if matches {
                return self.resize_split(parent, direction);
            }
            current = parent;
        }
        false
    }

    fn resize_split(&mut self, pane: PaneHandle, direction: ResizeDirection) -> bool {
        let Some(node) = self.nodes.get(&pane) else {
            return false;
        };
        let Some(split) = node.as_split().copied() else {
            return false;
        };

        let step = self.config.resize_step;
        let requested = if direction.grows_first() {
            split.ratio + step
        } else {
            split.ratio - step
        };
        let axis = split.orientation.axis();
        let total = node.last_size.get(axis);
        let ratio = if total > 0.0 {
            self.clamp_ratio(pane, axis, requested, total)
                .unwrap_or(requested)
        } else {
            requested
        }
        .clamp(0.0, 1.0);

        if let Some(split) = self.nodes.get_mut(&pane).and_then(Node::as_split_mut) {
            split.ratio = ratio;
        }
        debug!("Resized {:?} {:?} to ratio {:.3}", pane, direction, ratio);
        self.refresh_layout();
        true
    }
}
