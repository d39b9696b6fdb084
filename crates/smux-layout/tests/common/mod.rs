// ABOUTME: Shared fixtures for the pane tree integration tests.
// ABOUTME: A fake terminal with a configurable grid and helpers to describe tree shape.

#![allow(dead_code)]

use smux_core::{Axis, Borders, ConnectionState, Orientation, Size, TerminalArgs};
use smux_layout::{PaneContent, PaneHandle, PaneTree};

#[derive(Debug, Clone)]
pub struct FakeTerminal {
    pub name: String,
    pub cell: Size,
    pub padding: f32,
}

impl FakeTerminal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: Size::new(10.0, 20.0),
            padding: 0.0,
        }
    }

    pub fn with_cell(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            cell: Size::new(width, height),
            ..Self::new(name)
        }
    }
}

impl PaneContent for FakeTerminal {
    fn minimum_size(&self) -> Size {
        Size::new(
            self.cell.width + self.padding,
            self.cell.height + self.padding,
        )
    }

    fn cell_size(&self) -> Size {
        self.cell
    }

    fn snap_to_grid(&self, axis: Axis, extent: f32) -> f32 {
        let cell = self.cell.get(axis);
        ((extent - self.padding) / cell).floor() * cell + self.padding
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    fn terminal_args(&self) -> TerminalArgs {
        TerminalArgs::with_profile(self.name.clone())
    }

    fn close(&mut self) {}
}

pub fn spawn(args: &TerminalArgs) -> FakeTerminal {
    FakeTerminal::new(args.profile.clone().unwrap_or_default())
}

/// Structure of a subtree, independent of walk order helpers in the crate
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Leaf {
        handle: PaneHandle,
        id: Option<u32>,
        borders: Borders,
    },
    Split {
        orientation: Orientation,
        ratio: f32,
        first: Box<Shape>,
        second: Box<Shape>,
    },
}

pub fn shape(tree: &PaneTree<FakeTerminal>, pane: PaneHandle) -> Shape {
    let view = tree.pane(pane).expect("pane in tree");
    match view.children() {
        None => Shape::Leaf {
            handle: pane,
            id: view.id(),
            borders: view.borders(),
        },
        Some((first, second)) => Shape::Split {
            orientation: view.orientation().expect("split orientation"),
            ratio: view.ratio().expect("split ratio"),
            first: Box::new(shape(tree, first)),
            second: Box::new(shape(tree, second)),
        },
    }
}

/// Leaves counted by recursing through child links
pub fn count_leaves(tree: &PaneTree<FakeTerminal>, pane: PaneHandle) -> usize {
    match tree.pane(pane).and_then(|view| view.children()) {
        None => 1,
        Some((first, second)) => count_leaves(tree, first) + count_leaves(tree, second),
    }
}

pub fn names(tree: &PaneTree<FakeTerminal>) -> Vec<String> {
    tree.leaves()
        .into_iter()
        .filter_map(|pane| tree.content(pane).map(|content| content.name.clone()))
        .collect()
}
