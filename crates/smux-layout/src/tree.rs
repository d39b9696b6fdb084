// ABOUTME: Binary tree of terminal panes keyed by stable handles.
// ABOUTME: Owns node storage, focus bookkeeping, pane ids and border propagation.

use std::collections::{BTreeMap, HashSet};
use std::ops::ControlFlow;

use smux_core::{Borders, LayoutConfig};

use crate::content::PaneContent;
use crate::error::LayoutError;
use crate::node::{ChildSlot, Node, NodeKind, PaneHandle, PaneView};
use crate::observer::PaneObserver;

/// A tree of panes. Leaves host terminal content, splits divide their area
/// between exactly two children.
///
/// Every node is owned by the tree; callers refer to nodes through
/// [`PaneHandle`]s, which simply stop resolving once their node is gone.
pub struct PaneTree<C: PaneContent> {
    pub(crate) root: PaneHandle,
    pub(crate) nodes: BTreeMap<PaneHandle, Node<C>>,
    pub(crate) config: LayoutConfig,
    pub(crate) next_id: u32,
    pub(crate) zoomed: Option<PaneHandle>,
    pub(crate) observer: Option<Box<dyn PaneObserver>>,
}

impl<C: PaneContent> PaneTree<C> {
    /// Create a tree holding a single, focused leaf with id 0
    pub fn new(content: C, config: LayoutConfig) -> Self {
        let root = PaneHandle::next();
        let state = content.connection_state();
        let mut node = Node::leaf(content, Some(0), state);
        if let Some(leaf) = node.as_leaf_mut() {
            leaf.active = true;
        }

        let mut nodes = BTreeMap::new();
        nodes.insert(root, node);

        Self {
            root,
            nodes,
            config,
            next_id: 1,
            zoomed: None,
            observer: None,
        }
    }

    /// Assemble a tree from nodes already linked under `root`
    pub(crate) fn from_nodes(
        root: PaneHandle,
        nodes: BTreeMap<PaneHandle, Node<C>>,
        config: LayoutConfig,
    ) -> Self {
        let next_id = nodes
            .values()
            .filter_map(|node| node.as_leaf().and_then(|leaf| leaf.id))
            .max()
            .map_or(0, |max| max + 1);

        Self {
            root,
            nodes,
            config,
            next_id,
            zoomed: None,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn PaneObserver>) {
        self.observer = Some(observer);
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn PaneObserver>> {
        self.observer.take()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    pub fn root(&self) -> PaneHandle {
        self.root
    }

    pub fn contains(&self, pane: PaneHandle) -> bool {
        self.nodes.contains_key(&pane)
    }

    pub fn pane(&self, pane: PaneHandle) -> Option<PaneView<'_, C>> {
        self.nodes.get(&pane).map(|node| PaneView::new(pane, node))
    }

    pub fn is_leaf(&self, pane: PaneHandle) -> Option<bool> {
        self.nodes.get(&pane).map(Node::is_leaf)
    }

    pub fn content(&self, pane: PaneHandle) -> Option<&C> {
        self.nodes
            .get(&pane)
            .and_then(Node::as_leaf)
            .map(|leaf| &leaf.content)
    }

    pub fn content_mut(&mut self, pane: PaneHandle) -> Option<&mut C> {
        self.nodes
            .get_mut(&pane)
            .and_then(Node::as_leaf_mut)
            .map(|leaf| &mut leaf.content)
    }

    /// The split containing `pane` and the slot it occupies
    pub fn parent_of(&self, pane: PaneHandle) -> Option<(PaneHandle, ChildSlot)> {
        let parent = self.nodes.get(&pane)?.parent?;
        let slot = self.nodes.get(&parent)?.as_split()?.slot_of(pane)?;
        Some((parent, slot))
    }

    /// Visit every node in pre-order until the visitor breaks.
    ///
    /// Returns true if the walk was stopped early.
    pub fn walk_tree<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(PaneView<'_, C>) -> ControlFlow<()>,
    {
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(&handle) else {
                continue;
            };
            if visitor(PaneView::new(handle, node)).is_break() {
                return true;
            }
            if let Some(split) = node.as_split() {
                stack.push(split.second);
                stack.push(split.first);
            }
        }
        false
    }

    /// Handles of the subtree under `pane` in pre-order
    pub(crate) fn preorder(&self, pane: PaneHandle) -> Vec<PaneHandle> {
        let mut out = Vec::new();
        let mut stack = vec![pane];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(&handle) else {
                continue;
            };
            out.push(handle);
            if let Some(split) = node.as_split() {
                stack.push(split.second);
                stack.push(split.first);
            }
        }
        out
    }

    /// Leaves under `pane`, first to last
    pub fn leaves_under(&self, pane: PaneHandle) -> Vec<PaneHandle> {
        self.preorder(pane)
            .into_iter()
            .filter(|handle| self.is_leaf(*handle) == Some(true))
            .collect()
    }

    /// All leaves of the tree, first to last
    pub fn leaves(&self) -> Vec<PaneHandle> {
        self.leaves_under(self.root)
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.walk_tree(|pane| {
            if pane.is_leaf() {
                count += 1;
            }
            ControlFlow::Continue(())
        });
        count
    }

    pub fn first_leaf(&self, pane: PaneHandle) -> Option<PaneHandle> {
        let mut current = pane;
        loop {
            match &self.nodes.get(&current)?.kind {
                NodeKind::Leaf(_) => return Some(current),
                NodeKind::Split(split) => current = split.first,
            }
        }
    }

    /// True if `pane` is `ancestor` or lies somewhere beneath it
    pub fn is_within(&self, pane: PaneHandle, ancestor: PaneHandle) -> bool {
        let mut current = Some(pane);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(&handle).and_then(|node| node.parent);
        }
        false
    }

    pub fn active_pane(&self) -> Option<PaneHandle> {
        self.active_under(self.root)
    }

    pub(crate) fn active_under(&self, pane: PaneHandle) -> Option<PaneHandle> {
        self.preorder(pane).into_iter().find(|handle| {
            self.nodes
                .get(handle)
                .and_then(Node::as_leaf)
                .is_some_and(|leaf| leaf.active)
        })
    }

    pub fn pane_id(&self, pane: PaneHandle) -> Option<u32> {
        self.nodes.get(&pane)?.as_leaf()?.id
    }

    /// Assign a leaf id. Ids must stay unique within the tree.
    pub fn set_pane_id(&mut self, pane: PaneHandle, id: u32) -> Result<(), LayoutError> {
        let node = self.nodes.get(&pane).ok_or(LayoutError::UnknownPane(pane))?;
        if !node.is_leaf() {
            return Err(LayoutError::NotALeaf(pane));
        }
        if self.find_pane(id).is_some_and(|owner| owner != pane) {
            return Err(LayoutError::DuplicatePaneId(id));
        }

        if let Some(leaf) = self.nodes.get_mut(&pane).and_then(Node::as_leaf_mut) {
            leaf.id = Some(id);
        }
        self.next_id = self.next_id.max(id.saturating_add(1));
        Ok(())
    }

    /// Next id not used by a leaf of this tree nor listed in `reserved`.
    /// Wraps around once the counter runs out; `None` only if every id is taken.
    pub(crate) fn allocate_id(&mut self, reserved: &HashSet<u32>) -> Option<u32> {
        let used: HashSet<u32> = self
            .nodes
            .values()
            .filter_map(|node| node.as_leaf().and_then(|leaf| leaf.id))
            .chain(reserved.iter().copied())
            .collect();
        let start = self.next_id;
        let id = (start..=u32::MAX)
            .chain(0..start)
            .find(|id| !used.contains(id))?;
        self.next_id = id.wrapping_add(1);
        Some(id)
    }

    pub fn find_pane(&self, id: u32) -> Option<PaneHandle> {
        self.preorder(self.root)
            .into_iter()
            .find(|handle| self.pane_id(*handle) == Some(id))
    }

    pub fn contains_read_only(&self) -> bool {
        self.walk_tree(|pane| match pane.content() {
            Some(content) if content.is_read_only() => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        })
    }

    /// Make `pane` the single active leaf
    pub fn focus_pane(&mut self, pane: PaneHandle) -> bool {
        if self.is_leaf(pane) != Some(true) || !self.is_within(pane, self.root) {
            return false;
        }
        self.set_active(pane);
        true
    }

    pub fn focus_pane_id(&mut self, id: u32) -> bool {
        match self.find_pane(id) {
            Some(pane) => self.focus_pane(pane),
            None => false,
        }
    }

    pub(crate) fn set_active(&mut self, pane: PaneHandle) {
        for handle in self.leaves() {
            if handle == pane {
                continue;
            }
            let lost = match self.nodes.get_mut(&handle).and_then(Node::as_leaf_mut) {
                Some(leaf) if leaf.active => {
                    leaf.active = false;
                    true
                }
                _ => false,
            };
            if lost {
                self.notify(|observer| observer.focus_changed(handle, false));
            }
        }

        let found = match self.nodes.get_mut(&pane).and_then(Node::as_leaf_mut) {
            Some(leaf) => {
                leaf.active = true;
                true
            }
            None => false,
        };
        if found {
            self.notify(|observer| observer.focus_changed(pane, true));
        }
    }

    pub(crate) fn notify(&mut self, f: impl FnOnce(&mut dyn PaneObserver)) {
        if let Some(observer) = self.observer.as_deref_mut() {
            f(observer);
        }
    }

    /// Borders shared by every leaf under `pane`
    pub(crate) fn common_borders(&self, pane: PaneHandle) -> Borders {
        let Some(node) = self.nodes.get(&pane) else {
            return Borders::empty();
        };
        match &node.kind {
            NodeKind::Leaf(_) => node.borders,
            NodeKind::Split(split) => {
                self.common_borders(split.first) & self.common_borders(split.second)
            }
        }
    }

    /// Borders a node at this position would have, derived from its ancestry
    pub(crate) fn positional_borders(&self, pane: PaneHandle) -> Borders {
        let mut borders = Borders::empty();
        let mut current = pane;
        while let Some((parent, slot)) = self.parent_of(current) {
            if let Some(split) = self.nodes.get(&parent).and_then(Node::as_split) {
                let (first_edge, second_edge) = split.orientation.separator_edges();
                borders |= match slot {
                    ChildSlot::First => first_edge,
                    ChildSlot::Second => second_edge,
                };
            }
            current = parent;
        }
        borders
    }

    /// Push a split's pending borders down to its children, recursively
    pub(crate) fn apply_split_definitions(&mut self, pane: PaneHandle) {
        let Some(node) = self.nodes.get_mut(&pane) else {
            return;
        };
        let borders = node.borders;
        let Some(split) = node.as_split().copied() else {
            return;
        };
        node.borders = Borders::empty();

        let (first_edge, second_edge) = split.orientation.separator_edges();
        if let Some(first) = self.nodes.get_mut(&split.first) {
            first.borders = borders | first_edge;
        }
        if let Some(second) = self.nodes.get_mut(&split.second) {
            second.borders = borders | second_edge;
        }
        self.apply_split_definitions(split.first);
        self.apply_split_definitions(split.second);
    }

    /// Borders a renderer should draw for `pane`; a zoomed leaf is boxed on every edge
    pub fn effective_borders(&self, pane: PaneHandle) -> Option<Borders> {
        let node = self.nodes.get(&pane)?;
        if node.as_leaf().is_some_and(|leaf| leaf.zoomed) {
            Some(Borders::all())
        } else {
            Some(node.borders)
        }
    }

    /// Point `parent`'s child slot (or the root) at `child`
    pub(crate) fn relink(&mut self, parent: Option<(PaneHandle, ChildSlot)>, child: PaneHandle) {
        match parent {
            Some((parent, slot)) => {
                if let Some(split) = self.nodes.get_mut(&parent).and_then(Node::as_split_mut) {
                    split.set_child(slot, child);
                }
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.parent = Some(parent);
                }
            }
            None => {
                self.root = child;
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.parent = None;
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use smux_core::{Axis, ConnectionState, Size, TerminalArgs};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::content::PaneContent;

    /// Content with a fixed cell grid and shared close counter
    #[derive(Debug, Clone)]
    pub struct MockContent {
        pub name: String,
        pub cell: Size,
        pub min: Size,
        pub read_only: bool,
        pub state: ConnectionState,
        pub closes: Arc<AtomicUsize>,
    }

    impl MockContent {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                cell: Size::new(10.0, 20.0),
                min: Size::new(10.0, 20.0),
                read_only: false,
                state: ConnectionState::Connected,
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn close_count(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    impl PaneContent for MockContent {
        fn minimum_size(&self) -> Size {
            self.min
        }

        fn cell_size(&self) -> Size {
            self.cell
        }

        fn snap_to_grid(&self, axis: Axis, extent: f32) -> f32 {
            let cell = self.cell.get(axis);
            (extent / cell).floor() * cell
        }

        fn is_read_only(&self) -> bool {
            self.read_only
        }

        fn connection_state(&self) -> ConnectionState {
            self.state
        }

        fn terminal_args(&self) -> TerminalArgs {
            TerminalArgs::with_profile(self.name.clone())
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
