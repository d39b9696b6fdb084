// ABOUTME: Pixel geometry primitives shared by the layout engine.
// ABOUTME: Sizes, rectangles, measurement axes and pane border sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The dimension a sizing query operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::Width => Axis::Height,
            Axis::Height => Axis::Width,
        }
    }
}

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    /// Copy of this size with the extent along `axis` replaced
    pub fn with(self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::Width => Self { width: value, ..self },
            Axis::Height => Self { height: value, ..self },
        }
    }

    /// True once something has actually been measured
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

bitflags! {
    /// Edges of a pane that draw a separator line
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Borders: u8 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}

impl Borders {
    /// Number of bordered edges that consume space along `axis`
    pub fn edges_along(self, axis: Axis) -> u8 {
        let pair = match axis {
            Axis::Width => [Borders::LEFT, Borders::RIGHT],
            Axis::Height => [Borders::TOP, Borders::BOTTOM],
        };
        pair.iter().filter(|edge| self.contains(**edge)).count() as u8
    }

    /// Total border thickness along `axis` for a given edge thickness
    pub fn thickness_along(self, axis: Axis, border_size: f32) -> f32 {
        self.edges_along(axis) as f32 * border_size
    }
}
