// ABOUTME: Capabilities the engine needs from the terminal hosted in a leaf.
// ABOUTME: The terminal itself lives elsewhere; the tree only measures, describes and releases it.

use smux_core::{Axis, ConnectionState, Size, TerminalArgs};

/// A terminal surface owned by a leaf pane
pub trait PaneContent {
    /// Smallest size that still shows one character cell, padding included
    fn minimum_size(&self) -> Size;

    /// Size of one character cell
    fn cell_size(&self) -> Size;

    /// Largest grid-aligned extent not exceeding `extent`, padding included
    fn snap_to_grid(&self, axis: Axis, extent: f32) -> f32;

    fn is_read_only(&self) -> bool {
        false
    }

    fn connection_state(&self) -> ConnectionState;

    /// Arguments that would spawn an equivalent terminal
    fn terminal_args(&self) -> TerminalArgs;

    /// Release the terminal. Called exactly once, when its pane is closed or
    /// its tree is torn down.
    fn close(&mut self);
}

impl<T: PaneContent + ?Sized> PaneContent for Box<T> {
    fn minimum_size(&self) -> Size {
        (**self).minimum_size()
    }

    fn cell_size(&self) -> Size {
        (**self).cell_size()
    }

    fn snap_to_grid(&self, axis: Axis, extent: f32) -> f32 {
        (**self).snap_to_grid(axis, extent)
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }

    fn connection_state(&self) -> ConnectionState {
        (**self).connection_state()
    }

    fn terminal_args(&self) -> TerminalArgs {
        (**self).terminal_args()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
