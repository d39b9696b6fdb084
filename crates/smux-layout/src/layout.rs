// ABOUTME: Lays the pane tree out over a concrete pixel area.
// ABOUTME: Records each node's last size and reports the rectangle of every leaf.

use smux_core::{Orientation, Rect, Size};

use crate::content::PaneContent;
use crate::node::{NodeKind, PaneHandle};
use crate::tree::PaneTree;

/// Result of a layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaneLayout {
    /// Area the tree was laid out over
    pub bounds: Rect,
    /// Every leaf and its rectangle, first to last
    pub panes: Vec<(PaneHandle, Rect)>,
    pub zoomed: Option<PaneHandle>,
}

impl PaneLayout {
    /// Rectangle a pane is drawn in; a zoomed pane covers the whole area
    pub fn rect(&self, pane: PaneHandle) -> Option<Rect> {
        if self.zoomed == Some(pane) {
            return Some(self.bounds);
        }
        self.panes
            .iter()
            .find(|(handle, _)| *handle == pane)
            .map(|(_, rect)| *rect)
    }

    /// Panes that should be drawn
    pub fn visible(&self) -> Vec<(PaneHandle, Rect)> {
        match self.zoomed {
            Some(pane) => vec![(pane, self.bounds)],
            None => self.panes.clone(),
        }
    }
}

impl<C: PaneContent> PaneTree<C> {
    /// Lay the tree out over `size`, snapping every split to its content grids
    pub fn resize_content(&mut self, size: Size) -> PaneLayout {
        let bounds = Rect::from_size(size);
        let mut panes = Vec::new();
        self.layout_node(self.root, bounds, &mut panes);
        PaneLayout {
            bounds,
            panes,
            zoomed: self.zoomed,
        }
    }

    /// Repeat the last layout pass; `None` if the tree was never laid out
    pub fn relayout(&mut self) -> Option<PaneLayout> {
        let size = self.nodes.get(&self.root)?.last_size;
        size.is_measured().then(|| self.resize_content(size))
    }

    pub(crate) fn refresh_layout(&mut self) {
        let _ = self.relayout();
    }

    fn layout_node(&mut self, pane: PaneHandle, rect: Rect, out: &mut Vec<(PaneHandle, Rect)>) {
        let Some(node) = self.nodes.get_mut(&pane) else {
            return;
        };
        node.last_size = rect.size();
        let split = match &node.kind {
            NodeKind::Leaf(_) => {
                out.push((pane, rect));
                return;
            }
            NodeKind::Split(split) => *split,
        };

        let extent = rect.size().get(split.orientation.axis());
        let (first, second) = match self.calc_children_sizes(pane, extent) {
            Ok(sizes) => sizes,
            Err(_) => (extent * split.ratio, extent * (1.0 - split.ratio)),
        };
        let second = second.max(0.0);

        let (first_rect, second_rect) = match split.orientation {
            Orientation::Vertical => (
                Rect::new(rect.x, rect.y, first, rect.height),
                Rect::new(rect.x + first, rect.y, second, rect.height),
            ),
            Orientation::Horizontal => (
                Rect::new(rect.x, rect.y, rect.width, first),
                Rect::new(rect.x, rect.y + first, rect.width, second),
            ),
        };
        self.layout_node(split.first, first_rect, out);
        self.layout_node(split.second, second_rect, out);
    }

    /// Last laid-out size of a node
    pub fn last_size(&self, pane: PaneHandle) -> Option<Size> {
        self.nodes.get(&pane).map(|node| node.last_size)
    }
}
