// ABOUTME: Node storage for the pane tree.
// ABOUTME: Handles, leaf/split payloads and the read-only view handed to callers.

use std::sync::atomic::{AtomicU64, Ordering};

use smux_core::{Borders, ConnectionState, Orientation, Size};

/// Process-wide handle counter; handles are never reused.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a node of a pane tree.
///
/// Holding a handle does not keep the node alive. Once the node is merged
/// away, closed or moved into another tree, lookups with the handle fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneHandle(u64);

impl PaneHandle {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Which child of a split a node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    First,
    Second,
}

impl ChildSlot {
    pub fn other(self) -> ChildSlot {
        match self {
            ChildSlot::First => ChildSlot::Second,
            ChildSlot::Second => ChildSlot::First,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LeafPane<C> {
    pub content: C,
    pub id: Option<u32>,
    pub active: bool,
    pub zoomed: bool,
    pub connection_state: ConnectionState,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitPane {
    pub orientation: Orientation,
    /// Fraction of the extent given to the first child
    pub ratio: f32,
    pub first: PaneHandle,
    pub second: PaneHandle,
}

impl SplitPane {
    pub fn child(&self, slot: ChildSlot) -> PaneHandle {
        match slot {
            ChildSlot::First => self.first,
            ChildSlot::Second => self.second,
        }
    }

    pub fn set_child(&mut self, slot: ChildSlot, handle: PaneHandle) {
        match slot {
            ChildSlot::First => self.first = handle,
            ChildSlot::Second => self.second = handle,
        }
    }

    pub fn slot_of(&self, handle: PaneHandle) -> Option<ChildSlot> {
        if self.first == handle {
            Some(ChildSlot::First)
        } else if self.second == handle {
            Some(ChildSlot::Second)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind<C> {
    Leaf(LeafPane<C>),
    Split(SplitPane),
}

#[derive(Debug)]
pub(crate) struct Node<C> {
    pub parent: Option<PaneHandle>,
    /// On a leaf: edges drawing a separator. On a split: edges not yet pushed down.
    pub borders: Borders,
    /// Size from the most recent layout pass; zero until measured
    pub last_size: Size,
    pub kind: NodeKind<C>,
}

impl<C> Node<C> {
    pub fn leaf(content: C, id: Option<u32>, connection_state: ConnectionState) -> Self {
        Self {
            parent: None,
            borders: Borders::empty(),
            last_size: Size::default(),
            kind: NodeKind::Leaf(LeafPane {
                content,
                id,
                active: false,
                zoomed: false,
                connection_state,
            }),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafPane<C>> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafPane<C>> {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitPane> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<&mut SplitPane> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }
}

/// Borrowed view of one node, handed out by lookups and tree walks
#[derive(Debug)]
pub struct PaneView<'a, C> {
    handle: PaneHandle,
    node: &'a Node<C>,
}

impl<'a, C> Clone for PaneView<'a, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, C> Copy for PaneView<'a, C> {}

impl<'a, C> PaneView<'a, C> {
    pub(crate) fn new(handle: PaneHandle, node: &'a Node<C>) -> Self {
        Self { handle, node }
    }

    pub fn handle(&self) -> PaneHandle {
        self.handle
    }

    pub fn parent(&self) -> Option<PaneHandle> {
        self.node.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Leaf id; splits never carry one
    pub fn id(&self) -> Option<u32> {
        self.node.as_leaf().and_then(|leaf| leaf.id)
    }

    pub fn borders(&self) -> Borders {
        self.node.borders
    }

    pub fn is_active(&self) -> bool {
        self.node.as_leaf().is_some_and(|leaf| leaf.active)
    }

    pub fn is_zoomed(&self) -> bool {
        self.node.as_leaf().is_some_and(|leaf| leaf.zoomed)
    }

    pub fn content(&self) -> Option<&'a C> {
        self.node.as_leaf().map(|leaf| &leaf.content)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.node.as_split().map(|split| split.orientation)
    }

    pub fn ratio(&self) -> Option<f32> {
        self.node.as_split().map(|split| split.ratio)
    }

    pub fn children(&self) -> Option<(PaneHandle, PaneHandle)> {
        self.node.as_split().map(|split| (split.first, split.second))
    }

    pub fn last_size(&self) -> Size {
        self.node.last_size
    }
}
