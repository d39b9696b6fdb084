// ABOUTME: Replayable actions that rebuild a pane layout at startup.
// ABOUTME: A layout is persisted only as a sequence of split and move-focus actions.

use serde::{Deserialize, Serialize};

use crate::direction::{FocusDirection, Orientation};
use crate::terminal::TerminalArgs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StartupAction {
    /// Split the focused pane; `size` is the fraction given to the new pane
    SplitPane {
        orientation: Orientation,
        size: f32,
        args: TerminalArgs,
    },
    /// Move focus in tree order (only `NextInOrder`/`PreviousInOrder` are emitted)
    MoveFocus { direction: FocusDirection },
}

impl StartupAction {
    pub fn split(orientation: Orientation, size: f32, args: TerminalArgs) -> Self {
        StartupAction::SplitPane {
            orientation,
            size,
            args,
        }
    }

    pub fn move_focus(direction: FocusDirection) -> Self {
        StartupAction::MoveFocus { direction }
    }
}

/// A persisted pane layout: the first pane's arguments, the actions that
/// split it into the full layout, and the id of the pane to focus afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupLayout {
    pub root: TerminalArgs,
    pub actions: Vec<StartupAction>,
    pub focused_id: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_tagged_json() {
        let actions = vec![
            StartupAction::split(Orientation::Vertical, 0.5, TerminalArgs::with_profile("cmd")),
            StartupAction::move_focus(FocusDirection::PreviousInOrder),
        ];
        let json = serde_json::to_string(&actions).unwrap();
        assert!(json.contains(r#""action":"split_pane""#));
        assert!(json.contains(r#""direction":"previous_in_order""#));

        let parsed: Vec<StartupAction> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, actions);
    }

    #[test]
    fn layout_fields_are_optional() {
        let layout: StartupLayout = serde_json::from_str(r#"{"actions": []}"#).unwrap();
        assert_eq!(layout, StartupLayout::default());

        let layout: StartupLayout = serde_json::from_str(
            r#"{
                "root": {"profile": "bash"},
                "actions": [{"action": "split_pane", "orientation": "horizontal", "size": 0.25, "args": {}}],
                "focused_id": 1
            }"#,
        )
        .unwrap();
        assert_eq!(layout.root.profile.as_deref(), Some("bash"));
        assert_eq!(
            layout.actions,
            vec![StartupAction::split(Orientation::Horizontal, 0.25, TerminalArgs::default())]
        );
        assert_eq!(layout.focused_id, Some(1));
    }
}
