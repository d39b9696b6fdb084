// ABOUTME: Split orientations and the directional vocabulary used by pane actions.
// ABOUTME: Maps focus/resize directions onto the split axis they can cross.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Borders, Size};

/// Orientation of an existing split.
///
/// A vertical split places its children side by side (the separator line is
/// vertical), a horizontal split stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The axis this split divides between its children
    pub fn axis(self) -> Axis {
        match self {
            Orientation::Vertical => Axis::Width,
            Orientation::Horizontal => Axis::Height,
        }
    }

    pub fn toggled(self) -> Orientation {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }

    /// Border edges the first and second child gain from the separator
    pub fn separator_edges(self) -> (Borders, Borders) {
        match self {
            Orientation::Vertical => (Borders::RIGHT, Borders::LEFT),
            Orientation::Horizontal => (Borders::BOTTOM, Borders::TOP),
        }
    }
}

/// A requested split, which may still need to be resolved against a size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRequest {
    None,
    #[default]
    Automatic,
    Horizontal,
    Vertical,
}

impl SplitRequest {
    /// Resolve to a concrete orientation. `Automatic` splits side by side when
    /// the pane is at least as wide as it is tall; an unmeasured pane therefore
    /// splits vertically.
    pub fn resolve(self, size: Size) -> Option<Orientation> {
        match self {
            SplitRequest::None => None,
            SplitRequest::Horizontal => Some(Orientation::Horizontal),
            SplitRequest::Vertical => Some(Orientation::Vertical),
            SplitRequest::Automatic => Some(if size.width >= size.height {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            }),
        }
    }
}

impl From<Orientation> for SplitRequest {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => SplitRequest::Horizontal,
            Orientation::Vertical => SplitRequest::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusDirection {
    None,
    Left,
    Right,
    Up,
    Down,
    /// Most recently used pane before the current one
    Previous,
    NextInOrder,
    PreviousInOrder,
    First,
}

impl FocusDirection {
    /// True if moving this way can cross a separator of the given orientation
    pub fn crosses(self, orientation: Orientation) -> bool {
        match self {
            FocusDirection::Left | FocusDirection::Right => orientation == Orientation::Vertical,
            FocusDirection::Up | FocusDirection::Down => orientation == Orientation::Horizontal,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    None,
    Left,
    Right,
    Up,
    Down,
}

impl ResizeDirection {
    pub fn moves(self, orientation: Orientation) -> bool {
        match self {
            ResizeDirection::Left | ResizeDirection::Right => orientation == Orientation::Vertical,
            ResizeDirection::Up | ResizeDirection::Down => orientation == Orientation::Horizontal,
            ResizeDirection::None => false,
        }
    }

    /// Right and down push the separator away from the first child
    pub fn grows_first(self) -> bool {
        matches!(self, ResizeDirection::Right | ResizeDirection::Down)
    }
}
