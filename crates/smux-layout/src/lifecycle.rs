// ABOUTME: Reactions to terminal lifecycle events and tree teardown.
// ABOUTME: Connection-state close policy, bells, deferred closes and releasing content exactly once.

use smux_core::{CloseOnExitMode, ConnectionState};
use tracing::{debug, info, warn};

use crate::content::PaneContent;
use crate::node::{ChildSlot, Node, NodeKind, PaneHandle};
use crate::tree::PaneTree;

/// A close that was requested but not yet applied, e.g. while a close
/// animation runs. Applying it more than once has no further effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingClose {
    pub pane: PaneHandle,
    pub parent: PaneHandle,
    pub slot: ChildSlot,
}

impl<C: PaneContent> PaneTree<C> {
    /// Record where `pane` sits so it can be closed later
    pub fn request_close(&self, pane: PaneHandle) -> Option<PendingClose> {
        let (parent, slot) = self.parent_of(pane)?;
        Some(PendingClose { pane, parent, slot })
    }

    /// Apply a requested close. Returns false if the tree changed so that
    /// the request no longer applies, including when it was already applied.
    pub fn complete_close(&mut self, pending: PendingClose) -> bool {
        let still_there = self
            .nodes
            .get(&pending.parent)
            .and_then(Node::as_split)
            .is_some_and(|split| split.child(pending.slot) == pending.pane);
        if !still_there {
            warn!("Deferred close of {:?} no longer applies", pending.pane);
            return false;
        }
        self.close_child(pending.parent, pending.slot)
    }

    /// Track a leaf's connection state and close the leaf if the configured
    /// policy says so. Returns true if the pane was closed.
    ///
    /// The root leaf is never closed here; its owner decides when the last
    /// pane goes away.
    pub fn handle_connection_state(&mut self, pane: PaneHandle, state: ConnectionState) -> bool {
        let Some(leaf) = self.nodes.get_mut(&pane).and_then(Node::as_leaf_mut) else {
            return false;
        };
        let previous = std::mem::replace(&mut leaf.connection_state, state);

        if !state.is_terminal() {
            return false;
        }
        // A connection that never came up has nothing worth closing over
        if previous < ConnectionState::Connected && state == ConnectionState::Failed {
            debug!("{:?} failed before connecting, keeping it open", pane);
            return false;
        }

        let close = match self.config.close_on_exit {
            CloseOnExitMode::Always => true,
            CloseOnExitMode::Graceful => state == ConnectionState::Closed,
            CloseOnExitMode::Never => false,
        };
        if !close {
            return false;
        }

        debug!("Closing {:?} after its connection became {:?}", pane, state);
        self.close_pane(pane)
    }

    pub fn handle_bell(&mut self, pane: PaneHandle) -> bool {
        if self.is_leaf(pane) != Some(true) {
            return false;
        }
        self.notify(|observer| observer.bell(pane));
        true
    }

    /// Release every leaf's content and empty the tree
    pub fn shutdown(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        let mut released = 0;
        for (_, node) in nodes {
            if let NodeKind::Leaf(mut leaf) = node.kind {
                leaf.content.close();
                released += 1;
            }
        }
        if released > 0 {
            info!("Released {} panes", released);
        }
    }
}

impl<C: PaneContent> Drop for PaneTree<C> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{ChannelObserver, PaneEvent};
    use crate::tree::test_support::MockContent;
    use smux_core::{LayoutConfig, SplitRequest};
    use std::sync::atomic::Ordering;

    fn pair(mode: CloseOnExitMode) -> (PaneTree<MockContent>, PaneHandle, PaneHandle) {
        let config = LayoutConfig {
            close_on_exit: mode,
            ..LayoutConfig::default()
        };
        let mut tree = PaneTree::new(MockContent::new("a"), config);
        let a = tree.root();
        let (_, b) = tree
            .split(a, SplitRequest::Vertical, 0.5, MockContent::new("b"))
            .unwrap();
        (tree, a, b)
    }

    #[test]
    fn graceful_closes_only_clean_exits() {
        let (mut tree, _, b) = pair(CloseOnExitMode::Graceful);
        assert!(!tree.handle_connection_state(b, ConnectionState::Closing));
        assert!(!tree.handle_connection_state(b, ConnectionState::Failed));
        assert_eq!(tree.leaf_count(), 2);

        let (mut tree, _, b) = pair(CloseOnExitMode::Graceful);
        assert!(tree.handle_connection_state(b, ConnectionState::Closed));
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn always_closes_failures_after_connecting() {
        let (mut tree, _, b) = pair(CloseOnExitMode::Always);
        assert!(tree.handle_connection_state(b, ConnectionState::Failed));
        assert!(!tree.contains(b));
    }

    #[test]
    fn early_failure_keeps_pane() {
        let (mut tree, _, b) = pair(CloseOnExitMode::Always);
        tree.handle_connection_state(b, ConnectionState::Connecting);
        assert!(!tree.handle_connection_state(b, ConnectionState::Failed));
        assert!(tree.contains(b));
    }

    #[test]
    fn never_keeps_everything() {
        let (mut tree, a, _) = pair(CloseOnExitMode::Never);
        assert!(!tree.handle_connection_state(a, ConnectionState::Closed));
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn deferred_close_applies_once() {
        let (mut tree, a, b) = pair(CloseOnExitMode::Graceful);
        let first = tree.request_close(a).unwrap();
        let second = tree.request_close(b).unwrap();

        assert!(tree.complete_close(first));
        assert!(!tree.complete_close(first));
        assert!(!tree.complete_close(second));
        assert_eq!(tree.root(), b);
        assert!(tree.request_close(b).is_none());
    }

    #[test]
    fn observer_sees_focus_close_and_bell() {
        let (mut tree, a, b) = pair(CloseOnExitMode::Graceful);
        let (observer, events) = ChannelObserver::new();
        tree.set_observer(Box::new(observer));

        tree.focus_pane(b);
        assert!(tree.handle_bell(b));
        assert!(!tree.handle_bell(tree.root()));
        tree.close_pane(b);

        let events: Vec<PaneEvent> = events.try_iter().collect();
        assert_eq!(
            events,
            vec![
                PaneEvent::FocusLost(a),
                PaneEvent::FocusGained(b),
                PaneEvent::Bell(b),
                PaneEvent::FocusGained(a),
                PaneEvent::Closed(b, Some(1)),
            ]
        );
    }

    #[test]
    fn teardown_releases_each_leaf_once() {
        let (mut tree, a, _) = pair(CloseOnExitMode::Graceful);
        let c = MockContent::new("c");
        let counter = c.closes.clone();
        tree.split(a, SplitRequest::Horizontal, 0.5, c).unwrap();
        let a_counter = tree.content(a).unwrap().closes.clone();

        tree.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a_counter.load(Ordering::SeqCst), 1);

        let dropped = MockContent::new("d");
        let d_counter = dropped.closes.clone();
        drop(PaneTree::new(dropped, LayoutConfig::default()));
        assert_eq!(d_counter.load(Ordering::SeqCst), 1);
    }
}
