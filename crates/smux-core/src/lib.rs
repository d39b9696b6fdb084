// ABOUTME: Shared types and configuration for splitmux.
// ABOUTME: Defines geometry, split/focus directions, terminal args and config handling.

pub mod action;
pub mod config;
pub mod direction;
pub mod geometry;
pub mod terminal;

pub use action::{StartupAction, StartupLayout};
pub use config::{CloseOnExitMode, Config, ConfigError, LayoutConfig};
pub use direction::{FocusDirection, Orientation, ResizeDirection, SplitRequest};
pub use geometry::{Axis, Borders, Rect, Size};
pub use terminal::{ConnectionState, TerminalArgs};
