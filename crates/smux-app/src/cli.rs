// ABOUTME: Command line arguments for the layout tool.
// ABOUTME: Subcommands for showing, normalizing and navigating a saved startup layout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use smux_core::{FocusDirection, Size};

/// Inspect split-pane layouts saved as startup actions
#[derive(Parser, Debug)]
#[command(name = "smux-layout")]
#[command(version)]
pub struct Cli {
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a layout and print the rectangle of every pane
    Show {
        /// Layout file (JSON); `-` reads standard input
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Replay a layout and print the actions that rebuild it
    Normalize {
        file: PathBuf,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Replay a layout and print which pane focus would move to
    Navigate {
        file: PathBuf,

        /// Pane id to start from; defaults to the focused pane
        #[arg(long)]
        from: Option<u32>,

        #[arg(long, value_enum)]
        direction: Direction,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct WindowArgs {
    /// Window width in pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Window height in pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,

    /// Character cell width in pixels
    #[arg(long, default_value_t = 8.0)]
    pub cell_width: f32,

    /// Character cell height in pixels
    #[arg(long, default_value_t = 16.0)]
    pub cell_height: f32,

    /// Padding around the grid inside each pane
    #[arg(long, default_value_t = 0.0)]
    pub padding: f32,
}

impl WindowArgs {
    pub fn window(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn cell(&self) -> Size {
        Size::new(self.cell_width, self.cell_height)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Next,
    Prev,
    First,
}

impl From<Direction> for FocusDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => FocusDirection::Left,
            Direction::Right => FocusDirection::Right,
            Direction::Up => FocusDirection::Up,
            Direction::Down => FocusDirection::Down,
            Direction::Next => FocusDirection::NextInOrder,
            Direction::Prev => FocusDirection::PreviousInOrder,
            Direction::First => FocusDirection::First,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_navigate() {
        let cli = Cli::try_parse_from([
            "smux-layout",
            "navigate",
            "layout.json",
            "--direction",
            "right",
            "--from",
            "2",
            "--width",
            "640",
        ])
        .unwrap();
        match cli.command {
            Command::Navigate {
                from,
                direction,
                window,
                ..
            } => {
                assert_eq!(from, Some(2));
                assert_eq!(FocusDirection::from(direction), FocusDirection::Right);
                assert_eq!(window.window(), Size::new(640.0, 800.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
