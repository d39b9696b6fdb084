// ABOUTME: Descriptions of the terminal content hosted in a pane.
// ABOUTME: Terminal arguments for recreating a pane and its connection lifecycle states.

use serde::{Deserialize, Serialize};

/// Arguments sufficient to spawn an equivalent terminal in a new pane
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalArgs {
    pub profile: Option<String>,
    pub commandline: Option<String>,
    pub starting_directory: Option<String>,
    pub tab_title: Option<String>,
    /// Tab color as `#rrggbb`
    pub tab_color: Option<String>,
    pub color_scheme: Option<String>,
    pub suppress_application_title: bool,
}

impl TerminalArgs {
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
            ..Self::default()
        }
    }
}

/// Lifecycle of a terminal connection, ordered from fresh to finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    NotConnected,
    Connecting,
    Connected,
    Closing,
    Closed,
    Failed,
}

impl ConnectionState {
    /// Closed or failed
    pub fn is_terminal(self) -> bool {
        self >= ConnectionState::Closed
    }
}
