// ABOUTME: Main entry point for the layout tool.
// ABOUTME: Loads config and a saved layout, replays it and prints the requested view.

mod cli;
mod preview;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use smux_core::{Config, Size, StartupLayout};
use smux_layout::PaneTree;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use preview::{describe, PreviewTerminal};

fn read_layout(path: &Path) -> Result<StartupLayout> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read layout from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout {}", path.display()))?
    };
    serde_json::from_str(&text).context("Failed to parse layout")
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn replay(
    layout: &StartupLayout,
    config: &Config,
    cell: Size,
    padding: f32,
) -> Result<PaneTree<PreviewTerminal>> {
    PaneTree::from_startup_layout(layout, config.layout.clone(), |args| {
        PreviewTerminal::new(args.clone(), cell, padding)
    })
    .context("Failed to replay layout")
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    NoNeighbor,
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Show { file, window } => {
            let layout = read_layout(&file)?;
            let mut tree = replay(&layout, &config, window.cell(), window.padding)?;
            let panes = tree.resize_content(window.window());
            print!("{}", describe(&tree, &panes));
        }
        Command::Normalize { file, pretty } => {
            let layout = read_layout(&file)?;
            // Actions do not depend on pixel sizes, any grid will do
            let tree = replay(&layout, &config, Size::new(8.0, 16.0), 0.0)?;
            let normalized = tree.startup_layout();
            let json = if pretty {
                serde_json::to_string_pretty(&normalized)?
            } else {
                serde_json::to_string(&normalized)?
            };
            println!("{json}");
        }
        Command::Navigate {
            file,
            from,
            direction,
            window,
        } => {
            let layout = read_layout(&file)?;
            let mut tree = replay(&layout, &config, window.cell(), window.padding)?;
            tree.resize_content(window.window());

            let source = match from {
                Some(id) => tree
                    .find_pane(id)
                    .with_context(|| format!("No pane with id {id}"))?,
                None => tree.active_pane().context("Layout has no focused pane")?,
            };
            match tree.navigate_direction(source, direction.into(), &[]) {
                Some(target) => match tree.pane_id(target) {
                    Some(id) => println!("{id}"),
                    None => println!("-"),
                },
                None => {
                    tracing::info!("No pane {:?} of the source pane", direction);
                    return Ok(Outcome::NoNeighbor);
                }
            }
        }
    }
    Ok(Outcome::Done)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("Running {:?}", cli.command);
    Ok(match run(cli)? {
        Outcome::Done => ExitCode::SUCCESS,
        Outcome::NoNeighbor => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigate(layout: &str, direction: &str) -> Result<Outcome> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("layout.json");
        std::fs::write(&file, layout).unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        let cli = Cli::try_parse_from([
            "smux-layout",
            "--config",
            config.to_str().unwrap(),
            "navigate",
            file.to_str().unwrap(),
            "--direction",
            direction,
        ])
        .unwrap();
        run(cli)
    }

    #[test]
    fn single_pane_has_no_neighbor() {
        assert_eq!(navigate("{}", "right").unwrap(), Outcome::NoNeighbor);
    }

    #[test]
    fn split_pane_finds_neighbor() {
        let layout = r#"{"actions":[{"action":"split_pane","orientation":"vertical","size":0.5,"args":{}}]}"#;
        assert_eq!(navigate(layout, "left").unwrap(), Outcome::Done);
    }
}
