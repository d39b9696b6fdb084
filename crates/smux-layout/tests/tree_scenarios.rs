// ABOUTME: End-to-end scenarios for the pane tree through its public API.
// ABOUTME: Splitting, resizing, navigation, moving subtrees and concurrent closes.

mod common;

use std::thread;

use common::{shape, FakeTerminal};
use smux_core::{
    Borders, ConnectionState, FocusDirection, LayoutConfig, Orientation, ResizeDirection, Size,
    SplitRequest,
};
use smux_layout::{ChannelObserver, PaneEvent, PaneTree, SharedPaneTree};

fn tree() -> PaneTree<FakeTerminal> {
    PaneTree::new(FakeTerminal::new("a"), LayoutConfig::default())
}

#[test]
fn vertical_split_sets_borders() {
    let mut tree = tree();
    let a = tree.root();
    let (_, b) = tree
        .split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .unwrap();

    let root = tree.pane(tree.root()).unwrap();
    assert_eq!(root.orientation(), Some(Orientation::Vertical));
    assert_eq!(root.ratio(), Some(0.5));
    assert_eq!(root.children(), Some((a, b)));
    assert_eq!(tree.pane(a).unwrap().borders(), Borders::RIGHT);
    assert_eq!(tree.pane(b).unwrap().borders(), Borders::LEFT);
    assert_eq!(tree.leaf_count(), 2);
}

#[test]
fn resize_moves_separator_and_retiles() {
    let mut tree = tree();
    let a = tree.root();
    let (_, b) = tree
        .split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .unwrap();
    tree.resize_content(Size::new(400.0, 200.0));

    assert!(tree.resize_pane(ResizeDirection::Right));
    let ratio = tree.pane(tree.root()).unwrap().ratio().unwrap();
    assert!((ratio - 0.55).abs() < 1e-5);

    let layout = tree.relayout().unwrap();
    let (ra, rb) = (layout.rect(a).unwrap(), layout.rect(b).unwrap());
    assert_eq!(ra.right(), rb.x);
    assert_eq!(rb.right(), 400.0);
    assert!(ra.width > rb.width);

    assert!(!tree.resize_pane(ResizeDirection::Up));
}

#[test]
fn resize_stops_at_minimum_size() {
    let mut tree = tree();
    let a = tree.root();
    tree.split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .unwrap();
    tree.resize_content(Size::new(100.0, 100.0));

    for _ in 0..20 {
        tree.resize_pane(ResizeDirection::Right);
    }
    let ratio = tree.pane(tree.root()).unwrap().ratio().unwrap();
    // The second pane keeps one 10px cell plus its 2px border
    assert!((ratio - 0.88).abs() < 1e-5);
}

#[test]
fn right_of_a_follows_vertical_alignment() {
    let mut tree = tree();
    let a = tree.root();
    let (_, b) = tree
        .split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .unwrap();
    let (_, c) = tree
        .split(b, SplitRequest::Horizontal, 0.5, FakeTerminal::new("c"))
        .unwrap();
    assert_eq!(tree.navigate_direction(a, FocusDirection::Right, &[]), Some(b));

    let (_, d) = tree
        .split(a, SplitRequest::Horizontal, 0.5, FakeTerminal::new("d"))
        .unwrap();
    assert_eq!(tree.navigate_direction(a, FocusDirection::Right, &[]), Some(b));
    assert_eq!(tree.navigate_direction(d, FocusDirection::Right, &[]), Some(c));
    assert_eq!(tree.navigate_direction(c, FocusDirection::Left, &[]), Some(d));
    assert_eq!(tree.navigate_direction(b, FocusDirection::Down, &[]), Some(c));
    assert_eq!(tree.navigate_direction(b, FocusDirection::Up, &[]), None);
}

#[test]
fn detach_then_attach_is_isomorphic() {
    let mut tree = tree();
    let a = tree.root();
    let (_, b) = tree
        .split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .unwrap();
    tree.split(b, SplitRequest::Horizontal, 0.5, FakeTerminal::new("c"))
        .unwrap();
    let moved = tree.parent_of(b).unwrap().0;
    let before = shape(&tree, tree.root());
    let moved_shape = shape(&tree, moved);

    let subtree = tree.detach(moved).unwrap();
    assert_eq!(tree.leaf_count(), 1);
    assert_eq!(subtree.leaf_count(), 2);

    tree.attach_pane(a, subtree, SplitRequest::Vertical)
        .ok()
        .unwrap();
    assert_eq!(shape(&tree, tree.root()), before);
    assert_eq!(shape(&tree, moved), moved_shape);
}

#[test]
fn automatic_split_follows_aspect_ratio() {
    let mut tree = tree();
    let a = tree.root();
    tree.resize_content(Size::new(800.0, 200.0));
    tree.split(a, SplitRequest::Automatic, 0.5, FakeTerminal::new("b"))
        .unwrap();
    let root = tree.pane(tree.root()).unwrap();
    assert_eq!(root.orientation(), Some(Orientation::Vertical));

    tree.resize_content(Size::new(800.0, 600.0));
    let (_, c) = tree
        .split(a, SplitRequest::Automatic, 0.5, FakeTerminal::new("c"))
        .unwrap();
    let parent = tree.parent_of(c).unwrap().0;
    assert_eq!(
        tree.pane(parent).unwrap().orientation(),
        Some(Orientation::Horizontal)
    );
}

#[test]
fn tiny_panes_refuse_to_split() {
    let mut tree = tree();
    let a = tree.root();
    tree.resize_content(Size::new(20.0, 20.0));
    assert!(tree
        .split(a, SplitRequest::Vertical, 0.5, FakeTerminal::new("b"))
        .is_err());
    assert_eq!(tree.leaf_count(), 1);
}

#[test]
fn exiting_terminals_race_to_close() {
    let mut tree = tree();
    for i in 0..7 {
        let target = tree.leaves()[i % tree.leaf_count()];
        let request = if i % 2 == 0 {
            SplitRequest::Vertical
        } else {
            SplitRequest::Horizontal
        };
        tree.split(target, request, 0.5, FakeTerminal::new(format!("t{i}")))
            .unwrap();
    }
    let (observer, events) = ChannelObserver::new();
    tree.set_observer(Box::new(observer));
    let leaves = tree.leaves();
    assert_eq!(leaves.len(), 8);

    let shared = SharedPaneTree::new(tree);
    let workers: Vec<_> = leaves
        .into_iter()
        .map(|pane| {
            let shared = shared.clone();
            thread::spawn(move || shared.connection_state_changed(pane, ConnectionState::Closed))
        })
        .collect();
    let closed = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .filter(|closed| *closed)
        .count();

    assert_eq!(closed, 7);
    let tree = shared.into_inner().ok().unwrap();
    assert_eq!(tree.leaf_count(), 1);
    assert!(tree.active_pane().is_some());
    let closes = events
        .try_iter()
        .filter(|event| matches!(event, PaneEvent::Closed(..)))
        .count();
    assert_eq!(closes, 7);
}
