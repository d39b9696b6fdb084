// ABOUTME: Persists a pane tree as replayable split and move-focus actions.
// ABOUTME: Builds the action list from a live tree and rebuilds a tree from one.

use smux_core::{FocusDirection, LayoutConfig, StartupAction, StartupLayout, TerminalArgs};
use tracing::info;

use crate::content::PaneContent;
use crate::error::LayoutError;
use crate::node::{NodeKind, PaneHandle};
use crate::tree::PaneTree;

/// Actions rebuilding one subtree, starting from its first leaf
#[derive(Debug, Clone, PartialEq)]
pub struct StartupState {
    pub actions: Vec<StartupAction>,
    /// The leaf every action of this subtree is rooted at
    pub first_leaf: PaneHandle,
    /// Id the focused leaf will have once the actions are replayed
    pub focused_id: Option<u32>,
    pub panes_created: u32,
}

impl<C: PaneContent> PaneTree<C> {
    /// Actions that rebuild the subtree under `pane` from a single leaf.
    ///
    /// Replayed panes are numbered in creation order: the subtree's first
    /// leaf gets `current_id` and the next pane created gets `next_id`.
    pub fn build_startup_actions(
        &self,
        pane: PaneHandle,
        current_id: u32,
        next_id: u32,
    ) -> Option<StartupState> {
        let node = self.nodes.get(&pane)?;
        let split = match &node.kind {
            NodeKind::Leaf(leaf) => {
                return Some(StartupState {
                    actions: Vec::new(),
                    first_leaf: pane,
                    focused_id: leaf.active.then_some(current_id),
                    panes_created: 0,
                });
            }
            NodeKind::Split(split) => *split,
        };

        let split_action = |new_pane: PaneHandle| {
            let args = self
                .content(new_pane)
                .map(PaneContent::terminal_args)
                .unwrap_or_default();
            StartupAction::split(split.orientation, 1.0 - split.ratio, args)
        };

        let first_is_leaf = self.is_leaf(split.first) == Some(true);
        let second_is_leaf = self.is_leaf(split.second) == Some(true);
        if first_is_leaf && second_is_leaf {
            let focused_id = if self.pane(split.first)?.is_active() {
                Some(current_id)
            } else if self.pane(split.second)?.is_active() {
                Some(next_id)
            } else {
                None
            };
            return Some(StartupState {
                actions: vec![split_action(split.second)],
                first_leaf: split.first,
                focused_id,
                panes_created: 1,
            });
        }

        let first = self.build_startup_actions(split.first, current_id, next_id + 1)?;
        let second =
            self.build_startup_actions(split.second, next_id, next_id + first.panes_created + 1)?;

        let mut actions = Vec::with_capacity(first.actions.len() + second.actions.len() + 3);
        actions.push(split_action(second.first_leaf));
        if !first.actions.is_empty() {
            actions.push(StartupAction::move_focus(FocusDirection::PreviousInOrder));
            actions.extend(first.actions);
            actions.push(StartupAction::move_focus(FocusDirection::NextInOrder));
        }
        actions.extend(second.actions);

        Some(StartupState {
            actions,
            first_leaf: first.first_leaf,
            focused_id: first.focused_id.or(second.focused_id),
            panes_created: first.panes_created + second.panes_created + 1,
        })
    }

    /// The whole tree as a persisted layout
    pub fn startup_layout(&self) -> StartupLayout {
        let Some(state) = self.build_startup_actions(self.root, 0, 1) else {
            return StartupLayout::default();
        };
        StartupLayout {
            root: self
                .content(state.first_leaf)
                .map(PaneContent::terminal_args)
                .unwrap_or_default(),
            actions: state.actions,
            focused_id: state.focused_id,
        }
    }

    /// Rebuild a tree by replaying startup actions against a single leaf.
    ///
    /// Each split focuses its new pane, which `spawn` creates from the
    /// action's arguments. Afterwards `focused_id`, if any, gets focus.
    pub fn replay_startup_actions<F>(
        root: C,
        config: LayoutConfig,
        actions: &[StartupAction],
        focused_id: Option<u32>,
        mut spawn: F,
    ) -> Result<Self, LayoutError>
    where
        F: FnMut(&TerminalArgs) -> C,
    {
        let mut tree = PaneTree::new(root, config);
        for (index, action) in actions.iter().enumerate() {
            match action {
                StartupAction::SplitPane {
                    orientation,
                    size,
                    args,
                } => {
                    if let Err(mut rejected) =
                        tree.split_active((*orientation).into(), *size, spawn(args))
                    {
                        rejected.close();
                        return Err(LayoutError::SplitRejected { index });
                    }
                }
                StartupAction::MoveFocus { direction } => {
                    let target = tree
                        .active_pane()
                        .and_then(|active| tree.navigate_direction(active, *direction, &[]));
                    if let Some(target) = target {
                        tree.focus_pane(target);
                    }
                }
            }
        }

        if let Some(id) = focused_id {
            tree.focus_pane_id(id);
        }
        info!("Replayed {} startup actions into {} panes", actions.len(), tree.leaf_count());
        Ok(tree)
    }

    /// Rebuild a tree from a persisted layout
    pub fn from_startup_layout<F>(
        layout: &StartupLayout,
        config: LayoutConfig,
        mut spawn: F,
    ) -> Result<Self, LayoutError>
    where
        F: FnMut(&TerminalArgs) -> C,
    {
        let root = spawn(&layout.root);
        Self::replay_startup_actions(root, config, &layout.actions, layout.focused_id, spawn)
    }
}
