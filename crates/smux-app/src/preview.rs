// ABOUTME: Stand-in terminal used to lay out saved layouts without spawning shells.
// ABOUTME: Also formats a laid-out tree as one line per pane.

use std::fmt::Write as _;

use smux_core::{Axis, ConnectionState, Size, TerminalArgs};
use smux_layout::{PaneContent, PaneLayout, PaneTree};

/// Pane content with a fixed character grid and the arguments it was
/// spawned with
#[derive(Debug, Clone)]
pub struct PreviewTerminal {
    args: TerminalArgs,
    cell: Size,
    padding: f32,
}

impl PreviewTerminal {
    pub fn new(args: TerminalArgs, cell: Size, padding: f32) -> Self {
        Self {
            args,
            cell,
            padding,
        }
    }

    pub fn label(&self) -> &str {
        self.args
            .tab_title
            .as_deref()
            .or(self.args.profile.as_deref())
            .or(self.args.commandline.as_deref())
            .unwrap_or("default")
    }

    /// Whole columns and rows that fit into `size`
    pub fn grid(&self, size: Size) -> (u32, u32) {
        let cols = ((size.width - 2.0 * self.padding) / self.cell.width).max(0.0);
        let rows = ((size.height - 2.0 * self.padding) / self.cell.height).max(0.0);
        (cols as u32, rows as u32)
    }
}

impl PaneContent for PreviewTerminal {
    fn minimum_size(&self) -> Size {
        Size::new(
            self.cell.width + 2.0 * self.padding,
            self.cell.height + 2.0 * self.padding,
        )
    }

    fn cell_size(&self) -> Size {
        self.cell
    }

    fn snap_to_grid(&self, axis: Axis, extent: f32) -> f32 {
        let cell = self.cell.get(axis).max(1.0);
        let inner = extent - 2.0 * self.padding;
        (inner / cell).floor().max(0.0) * cell + 2.0 * self.padding
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    fn terminal_args(&self) -> TerminalArgs {
        self.args.clone()
    }

    fn close(&mut self) {}
}

/// One line per pane: id, label, rectangle, grid and a focus marker
pub fn describe(tree: &PaneTree<PreviewTerminal>, layout: &PaneLayout) -> String {
    let active = tree.active_pane();
    let mut out = String::new();
    for (pane, rect) in &layout.panes {
        let Some(content) = tree.content(*pane) else {
            continue;
        };
        let id = tree
            .pane_id(*pane)
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let (cols, rows) = content.grid(tree.last_size(*pane).unwrap_or(rect.size()));
        let _ = writeln!(
            out,
            "{:>3}  {:<16} {:>7.1} {:>7.1} {:>7.1} {:>7.1}  {}x{}{}",
            id,
            content.label(),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            cols,
            rows,
            if active == Some(*pane) { "  *" } else { "" }
        );
    }
    out
}
