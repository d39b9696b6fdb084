// ABOUTME: Pane tree engine for a split-pane terminal window.
// ABOUTME: Splitting, closing, grid-snapped sizing, spatial navigation and startup layouts.

mod content;
mod error;
mod layout;
mod lifecycle;
mod mutation;
mod navigation;
mod node;
mod observer;
mod shared;
mod sizing;
mod startup;
mod tree;

pub use content::PaneContent;
pub use error::LayoutError;
pub use layout::PaneLayout;
pub use lifecycle::PendingClose;
pub use navigation::PanePoint;
pub use node::{ChildSlot, PaneHandle, PaneView};
pub use observer::{ChannelObserver, PaneEvent, PaneObserver};
pub use shared::SharedPaneTree;
pub use sizing::{ChildSizes, SnapSize};
pub use startup::StartupState;
pub use tree::PaneTree;
