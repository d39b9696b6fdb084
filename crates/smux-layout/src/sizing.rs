// ABOUTME: Grid-snapped sizing of panes along one axis.
// ABOUTME: Minimum sizes, ratio clamping, monotonic child snapping and split feasibility.

use smux_core::{Axis, Orientation, Size, SplitRequest};
use tracing::warn;

use crate::content::PaneContent;
use crate::error::LayoutError;
use crate::node::{NodeKind, PaneHandle};
use crate::tree::PaneTree;

/// Nearest grid-aligned extents below and above a requested extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSize {
    pub lower: f32,
    pub higher: f32,
}

impl SnapSize {
    fn exact(value: f32) -> Self {
        Self {
            lower: value,
            higher: value,
        }
    }
}

/// Child extents of a split for the closest layouts below and above a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSizes {
    pub lower: (f32, f32),
    pub higher: (f32, f32),
}

/// Running size of one node while growing a layout cell by cell
#[derive(Debug, Clone, PartialEq)]
struct LayoutSizeNode {
    size: f32,
    is_minimum_size: bool,
    children: Option<Box<SizeChildren>>,
}

#[derive(Debug, Clone, PartialEq)]
struct SizeChildren {
    first: LayoutSizeNode,
    second: LayoutSizeNode,
    /// Each child advanced one step ahead, computed on demand
    next_first: Option<LayoutSizeNode>,
    next_second: Option<LayoutSizeNode>,
}

impl LayoutSizeNode {
    fn child_sizes(&self) -> (f32, f32) {
        self.children
            .as_ref()
            .map_or((0.0, 0.0), |c| (c.first.size, c.second.size))
    }
}

impl<C: PaneContent> PaneTree<C> {
    /// Smallest size `pane` can take: content minimum plus borders for a
    /// leaf; summed along a split's axis and maxed across it.
    pub fn min_size(&self, pane: PaneHandle) -> Size {
        let Some(node) = self.nodes.get(&pane) else {
            return Size::default();
        };
        match &node.kind {
            NodeKind::Leaf(leaf) => {
                let min = leaf.content.minimum_size();
                let border = self.config.border_size;
                Size::new(
                    min.width + node.borders.thickness_along(Axis::Width, border),
                    min.height + node.borders.thickness_along(Axis::Height, border),
                )
            }
            NodeKind::Split(split) => {
                let first = self.min_size(split.first);
                let second = self.min_size(split.second);
                match split.orientation {
                    Orientation::Vertical => Size::new(
                        first.width + second.width,
                        first.height.max(second.height),
                    ),
                    Orientation::Horizontal => Size::new(
                        first.width.max(second.width),
                        first.height + second.height,
                    ),
                }
            }
        }
    }

    /// Clamp a split ratio so both children keep their minimum extent
    pub fn clamp_ratio(
        &self,
        pane: PaneHandle,
        axis: Axis,
        requested: f32,
        total: f32,
    ) -> Result<f32, LayoutError> {
        let node = self.nodes.get(&pane).ok_or(LayoutError::UnknownPane(pane))?;
        let split = node.as_split().ok_or(LayoutError::NotASplit(pane))?;

        let min_first = self.min_size(split.first).get(axis);
        let min_second = self.min_size(split.second).get(axis);
        let low = min_first / total;
        let high = 1.0 - min_second / total;
        // max/min rather than clamp: the bounds cross when the split is already too small
        Ok(requested.max(low).min(high))
    }

    /// Child extents of the split `pane` snapped to their content grids, for
    /// the closest layouts not exceeding and at least reaching `extent`.
    ///
    /// Growing `extent` never shrinks either child.
    pub fn snap_children_sizes(
        &self,
        pane: PaneHandle,
        axis: Axis,
        extent: f32,
    ) -> Result<ChildSizes, LayoutError> {
        let node = self.nodes.get(&pane).ok_or(LayoutError::UnknownPane(pane))?;
        if node.is_leaf() {
            return Err(LayoutError::NotASplit(pane));
        }

        let mut size_tree = self.min_size_tree(pane, axis);
        let mut last = size_tree.clone();
        while extent.is_finite() && size_tree.size < extent {
            last = size_tree.clone();
            self.advance_snapped_dimension(pane, axis, &mut size_tree);
            if size_tree == last {
                // One cell no longer registers at this magnitude
                warn!("Snapping {:?} stalled at {} of {}", pane, last.size, extent);
                break;
            }
            if size_tree.size == extent {
                let exact = size_tree.child_sizes();
                return Ok(ChildSizes {
                    lower: exact,
                    higher: exact,
                });
            }
        }

        Ok(ChildSizes {
            lower: last.child_sizes(),
            higher: size_tree.child_sizes(),
        })
    }

    /// Extents of both children of a split laid out over `extent` along its
    /// own axis. The second child takes whatever the first leaves over.
    pub fn calc_children_sizes(
        &self,
        pane: PaneHandle,
        extent: f32,
    ) -> Result<(f32, f32), LayoutError> {
        let node = self.nodes.get(&pane).ok_or(LayoutError::UnknownPane(pane))?;
        let split = node.as_split().ok_or(LayoutError::NotASplit(pane))?;
        let sizes = self.snap_children_sizes(pane, split.orientation.axis(), extent)?;
        Ok((sizes.lower.0, extent - sizes.lower.0))
    }

    /// Grid-aligned extent of `pane` closest to `extent`
    pub fn calc_snapped_dimension(
        &self,
        pane: PaneHandle,
        axis: Axis,
        extent: f32,
    ) -> Result<f32, LayoutError> {
        let snapped = self.snapped_dimension(pane, axis, extent)?;
        Ok(if extent - snapped.lower < snapped.higher - extent {
            snapped.lower
        } else {
            snapped.higher
        })
    }

    /// Grid-aligned extents of `pane` just below and above `extent`
    pub fn snapped_dimension(
        &self,
        pane: PaneHandle,
        axis: Axis,
        extent: f32,
    ) -> Result<SnapSize, LayoutError> {
        let node = self.nodes.get(&pane).ok_or(LayoutError::UnknownPane(pane))?;
        match &node.kind {
            NodeKind::Leaf(leaf) => {
                let min = self.min_size(pane).get(axis);
                if extent <= min {
                    return Ok(SnapSize::exact(min));
                }
                let border = node.borders.thickness_along(axis, self.config.border_size);
                let lower = (leaf.content.snap_to_grid(axis, extent - border) + border).max(min);
                if lower == extent {
                    Ok(SnapSize::exact(lower))
                } else {
                    Ok(SnapSize {
                        lower,
                        higher: lower + cell_extent(&leaf.content, axis),
                    })
                }
            }
            NodeKind::Split(split) if split.orientation.axis() != axis => {
                // Children share this extent; each must land on its own grid
                let first = self.snapped_dimension(split.first, axis, extent)?;
                let second = self.snapped_dimension(split.second, axis, extent)?;
                Ok(SnapSize {
                    lower: first.lower.max(second.lower),
                    higher: first.higher.min(second.higher),
                })
            }
            NodeKind::Split(_) => {
                let sizes = self.snap_children_sizes(pane, axis, extent)?;
                Ok(SnapSize {
                    lower: sizes.lower.0 + sizes.lower.1,
                    higher: sizes.higher.0 + sizes.higher.1,
                })
            }
        }
    }

    fn min_size_tree(&self, pane: PaneHandle, axis: Axis) -> LayoutSizeNode {
        let children = self
            .nodes
            .get(&pane)
            .and_then(|node| node.as_split())
            .map(|split| {
                Box::new(SizeChildren {
                    first: self.min_size_tree(split.first, axis),
                    second: self.min_size_tree(split.second, axis),
                    next_first: None,
                    next_second: None,
                })
            });
        LayoutSizeNode {
            size: self.min_size(pane).get(axis),
            is_minimum_size: true,
            children,
        }
    }

    /// Grow `size_node` by exactly one grid step of one leaf
    fn advance_snapped_dimension(&self, pane: PaneHandle, axis: Axis, size_node: &mut LayoutSizeNode) {
        let Some(node) = self.nodes.get(&pane) else {
            return;
        };
        match &node.kind {
            NodeKind::Leaf(leaf) => {
                if size_node.is_minimum_size {
                    // A minimum size may sit off the grid, so snap upwards from just past it
                    if let Ok(snapped) = self.snapped_dimension(pane, axis, size_node.size + 1.0) {
                        size_node.size = snapped.higher;
                    }
                } else {
                    size_node.size += cell_extent(&leaf.content, axis);
                }
            }
            NodeKind::Split(split) => {
                let Some(children) = size_node.children.as_deref_mut() else {
                    return;
                };

                if children.next_first.is_none() {
                    let mut next = children.first.clone();
                    self.advance_snapped_dimension(split.first, axis, &mut next);
                    children.next_first = Some(next);
                }
                if children.next_second.is_none() {
                    let mut next = children.second.clone();
                    self.advance_snapped_dimension(split.second, axis, &mut next);
                    children.next_second = Some(next);
                }
                let next_first_size = children
                    .next_first
                    .as_ref()
                    .map_or(children.first.size, |next| next.size);
                let next_second_size = children
                    .next_second
                    .as_ref()
                    .map_or(children.second.size, |next| next.size);

                let shares_extent = split.orientation.axis() != axis;
                let advance_first = if shares_extent {
                    // Grow whichever child stays smaller, keeping the shared size minimal
                    next_first_size < next_second_size
                } else {
                    let first_size = children.first.size;
                    let second_size = children.second.size;
                    let deviation_first =
                        next_first_size - (next_first_size + second_size) * split.ratio;
                    let deviation_second =
                        -(first_size - (first_size + next_second_size) * split.ratio);
                    deviation_first <= deviation_second
                };

                if advance_first {
                    if let Some(mut next) = children.next_first.take() {
                        children.first = next.clone();
                        self.advance_snapped_dimension(split.first, axis, &mut next);
                        children.next_first = Some(next);
                    }
                } else if let Some(mut next) = children.next_second.take() {
                    children.second = next.clone();
                    self.advance_snapped_dimension(split.second, axis, &mut next);
                    children.next_second = Some(next);
                }

                size_node.size = if shares_extent {
                    children.first.size.max(children.second.size)
                } else {
                    children.first.size + children.second.size
                };
            }
        }
        size_node.is_minimum_size = false;
    }

    /// Whether splitting `target` would leave both halves above their minimum
    /// size, judged from virtual geometry starting at `available` for the root.
    ///
    /// Returns `None` if `target` is not in the tree.
    pub fn can_split(
        &self,
        target: PaneHandle,
        request: SplitRequest,
        split_size: f32,
        available: Size,
    ) -> Option<bool> {
        let orientation = match request {
            SplitRequest::Automatic => self.pre_calculate_auto_split(target, available)?,
            other => match other.resolve(available) {
                Some(orientation) => orientation,
                None => return Some(false),
            },
        };
        self.can_split_within(self.root, target, orientation, split_size, available)
    }

    fn can_split_within(
        &self,
        pane: PaneHandle,
        target: PaneHandle,
        orientation: Orientation,
        split_size: f32,
        available: Size,
    ) -> Option<bool> {
        let node = self.nodes.get(&pane)?;
        if pane == target {
            if !node.is_leaf() {
                return Some(false);
            }
            let axis = orientation.axis();
            let min = self.min_size(pane).get(axis);
            let usable = available.get(axis) - self.config.separator_size();
            let first = usable * (1.0 - split_size);
            let second = usable * split_size;
            return Some(first > min && second > min);
        }

        let split = node.as_split()?;
        let (first, second) = partition(available, split.orientation, split.ratio, self.config.border_size);
        self.can_split_within(split.first, target, orientation, split_size, first)
            .or_else(|| self.can_split_within(split.second, target, orientation, split_size, second))
    }

    /// Resolve an automatic split of `target` from virtual geometry: side by
    /// side when the pane is at least as wide as it is tall.
    pub fn pre_calculate_auto_split(&self, target: PaneHandle, available: Size) -> Option<Orientation> {
        self.auto_split_within(self.root, target, available)
    }

    fn auto_split_within(&self, pane: PaneHandle, target: PaneHandle, available: Size) -> Option<Orientation> {
        let node = self.nodes.get(&pane)?;
        if pane == target {
            return SplitRequest::Automatic.resolve(available);
        }
        let split = node.as_split()?;
        let (first, second) = partition(available, split.orientation, split.ratio, 0.0);
        self.auto_split_within(split.first, target, first)
            .or_else(|| self.auto_split_within(split.second, target, second))
    }
}

fn cell_extent<C: PaneContent>(content: &C, axis: Axis) -> f32 {
    // A zero-sized cell would stall the growth loop
    content.cell_size().get(axis).max(1.0)
}

/// Split `available` between two children by ratio, each losing one border along the split axis
fn partition(available: Size, orientation: Orientation, ratio: f32, border: f32) -> (Size, Size) {
    let axis = orientation.axis();
    let total = available.get(axis);
    let first = total * ratio - border;
    let second = total - first - border;
    (available.with(axis, first), available.with(axis, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::test_support::MockContent;
    use smux_core::LayoutConfig;

    fn two_columns() -> (PaneTree<MockContent>, PaneHandle, PaneHandle) {
        let mut tree = PaneTree::new(MockContent::new("a"), LayoutConfig::default());
        let a = tree.root();
        let (_, b) = tree
            .split(a, SplitRequest::Vertical, 0.5, MockContent::new("b"))
            .unwrap();
        (tree, a, b)
    }

    #[test]
    fn min_size_includes_borders() {
        let (tree, a, _) = two_columns();
        assert_eq!(tree.min_size(a), Size::new(12.0, 20.0));
        assert_eq!(tree.min_size(tree.root()), Size::new(24.0, 20.0));
    }

    #[test]
    fn clamp_ratio_keeps_minimums() {
        let (tree, a, _) = two_columns();
        let root = tree.root();
        let low = tree.clamp_ratio(root, Axis::Width, 0.01, 100.0).unwrap();
        let high = tree.clamp_ratio(root, Axis::Width, 0.99, 100.0).unwrap();
        assert!((low - 0.12).abs() < 1e-6);
        assert!((high - 0.88).abs() < 1e-6);
        assert_eq!(tree.clamp_ratio(root, Axis::Width, 0.5, 100.0), Ok(0.5));
        assert_eq!(
            tree.clamp_ratio(a, Axis::Width, 0.5, 100.0),
            Err(LayoutError::NotASplit(a))
        );
    }

    #[test]
    fn leaf_snaps_to_its_cell_grid() {
        let (tree, a, _) = two_columns();
        // 12px minimum, then 22, 32, ...
        assert_eq!(
            tree.snapped_dimension(a, Axis::Width, 27.0),
            Ok(SnapSize { lower: 22.0, higher: 32.0 })
        );
        assert_eq!(
            tree.snapped_dimension(a, Axis::Width, 32.0),
            Ok(SnapSize { lower: 32.0, higher: 32.0 })
        );
        assert_eq!(
            tree.snapped_dimension(a, Axis::Width, 5.0),
            Ok(SnapSize { lower: 12.0, higher: 12.0 })
        );
        assert_eq!(tree.calc_snapped_dimension(a, Axis::Width, 28.0), Ok(32.0));
        assert_eq!(tree.calc_snapped_dimension(a, Axis::Width, 26.0), Ok(22.0));
    }

    #[test]
    fn huge_panes_stop_growing() {
        let mut a = MockContent::new("a");
        a.min = Size::new(3.0e8, 20.0);
        let mut b = MockContent::new("b");
        b.min = a.min;
        let mut tree = PaneTree::new(a, LayoutConfig::default());
        let root = tree.root();
        tree.split(root, SplitRequest::Vertical, 0.5, b).unwrap();

        // A 10px cell is below f32 precision at this width
        let sizes = tree
            .snap_children_sizes(tree.root(), Axis::Width, 1.0e9)
            .unwrap();
        assert!(sizes.higher.0 >= 3.0e8);
        assert!(sizes.higher.0 + sizes.higher.1 < 1.0e9);
    }

    #[test]
    fn snapping_a_leaf_as_split_is_an_error() {
        let (tree, a, _) = two_columns();
        assert_eq!(
            tree.snap_children_sizes(a, Axis::Width, 100.0),
            Err(LayoutError::NotASplit(a))
        );
        let stale = PaneHandle::next();
        assert_eq!(
            tree.calc_children_sizes(stale, 100.0),
            Err(LayoutError::UnknownPane(stale))
        );
    }

    #[test]
    fn children_split_evenly_on_grid() {
        let (tree, _, _) = two_columns();
        let root = tree.root();
        let sizes = tree.snap_children_sizes(root, Axis::Width, 104.0).unwrap();
        assert_eq!(sizes.lower, (52.0, 52.0));
        assert_eq!(sizes.higher, (52.0, 52.0));

        let sizes = tree.snap_children_sizes(root, Axis::Width, 100.0).unwrap();
        // the first child is grown first on a tie
        assert_eq!(sizes.lower, (52.0, 42.0));
        assert_eq!(sizes.higher, (52.0, 52.0));
        assert_eq!(tree.calc_children_sizes(root, 100.0), Ok((52.0, 48.0)));
    }

    #[test]
    fn shared_axis_snaps_to_common_grid() {
        let (tree, _, _) = two_columns();
        let root = tree.root();
        // both columns share the height and need a multiple of 20
        assert_eq!(
            tree.snapped_dimension(root, Axis::Height, 50.0),
            Ok(SnapSize { lower: 40.0, higher: 60.0 })
        );
    }

    #[test]
    fn growing_never_shrinks_children() {
        let (tree, _, _) = two_columns();
        let root = tree.root();
        let mut previous = (0.0, 0.0);
        for extent in (24..400).step_by(7) {
            let sizes = tree
                .snap_children_sizes(root, Axis::Width, extent as f32)
                .unwrap();
            assert!(sizes.lower.0 >= previous.0 && sizes.lower.1 >= previous.1);
            previous = sizes.lower;
        }
    }

    #[test]
    fn can_split_uses_virtual_geometry() {
        let (tree, a, b) = two_columns();
        let available = Size::new(100.0, 600.0);
        // each column gets 48px; splitting again leaves (48 - 4) / 2 = 22 > 12
        assert_eq!(
            tree.can_split(a, SplitRequest::Vertical, 0.5, available),
            Some(true)
        );
        assert_eq!(
            tree.can_split(b, SplitRequest::Vertical, 0.5, Size::new(50.0, 600.0)),
            Some(false)
        );
        assert_eq!(
            tree.can_split(a, SplitRequest::None, 0.5, available),
            Some(false)
        );
        assert_eq!(
            tree.can_split(PaneHandle::next(), SplitRequest::Vertical, 0.5, available),
            None
        );
    }

    #[test]
    fn auto_split_picks_longer_side() {
        let (tree, a, _) = two_columns();
        assert_eq!(
            tree.pre_calculate_auto_split(a, Size::new(100.0, 600.0)),
            Some(Orientation::Horizontal)
        );
        assert_eq!(
            tree.pre_calculate_auto_split(a, Size::new(1600.0, 600.0)),
            Some(Orientation::Vertical)
        );
        assert_eq!(
            tree.pre_calculate_auto_split(tree.root(), Size::new(1.0, 1.0)),
            Some(Orientation::Vertical)
        );
    }
}
