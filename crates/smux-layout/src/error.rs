// ABOUTME: Error types for the pane layout engine.
// ABOUTME: Only contract violations and replay failures are errors; races and misses are not.

use crate::node::PaneHandle;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Pane {0:?} is not part of this tree")]
    UnknownPane(PaneHandle),

    #[error("Pane {0:?} is not a split")]
    NotASplit(PaneHandle),

    #[error("Pane {0:?} is not a leaf")]
    NotALeaf(PaneHandle),

    #[error("Pane id {0} is already used by another pane")]
    DuplicatePaneId(u32),

    #[error("Startup action {index} could not split the focused pane")]
    SplitRejected { index: usize },
}
