use std::io::{
  self,
  IsTerminal
};
use std::path::PathBuf;

use anyhow::Context;
use bujo_gui_shared::{
  ProjectId,
  TaskId
};
use clap::{
  ArgAction,
  Parser,
  Subcommand
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(
  name = "bujo",
  version,
  about = "Bullet journal task lifecycle \
           client",
  disable_help_subcommand = true
)]
pub struct GlobalCli {
  #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
  pub verbose: u8,

  #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
  pub quiet: u8,

  #[arg(long = "config", global = true)]
  pub config: Option<PathBuf>,

  /// Account state served by the local authority (JSON).
  #[arg(long = "snapshot", global = true)]
  pub snapshot: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Task rows, active items first.
  List {
    #[arg(long = "project")]
    project: Option<ProjectId>
  },
  /// Action menu for a task's current view.
  Menu { id: TaskId },
  Complete { id: TaskId },
  Uncomplete { id: TaskId },
  /// Deletes the task and its subtasks.
  Delete {
    id:  TaskId,
    #[arg(long = "yes", short = 'y')]
    yes: bool
  },
  Refresh {
    /// Run the lighter on-mount fetch set.
    #[arg(long = "mount")]
    mount: bool
  },
  /// Resolves a label icon name.
  Icon { name: String }
}

/// `-v` and `-q` cancel out; what is left moves the level away from
/// `warn`. `RUST_LOG`, when set, adds its own directives on top.
pub fn log_level(
  verbose: u8,
  quiet: u8
) -> LevelFilter {
  match i16::from(verbose) - i16::from(quiet) {
    | ..=-1 => LevelFilter::ERROR,
    | 0 => LevelFilter::WARN,
    | 1 => LevelFilter::INFO,
    | 2 => LevelFilter::DEBUG,
    | _ => LevelFilter::TRACE
  }
}

pub fn init_tracing(
  verbose: u8,
  quiet: u8
) -> anyhow::Result<()> {
  let level = log_level(verbose, quiet);
  let filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env()
    .context("RUST_LOG is not a valid filter")?;

  let stderr = io::stderr();
  let installed = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_ansi(stderr.is_terminal())
    .with_thread_ids(true)
    .try_init();

  match installed {
    | Ok(()) => {
      debug!(%level, "log subscriber installed");
    }
    | Err(error) => {
      debug!(
        %error,
        "log subscriber was already installed"
      );
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn global_flags_follow_the_subcommand() {
    let cli = GlobalCli::parse_from([
      "bujo",
      "delete",
      "7",
      "--yes",
      "-vv",
      "--snapshot",
      "state.json",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(
      cli.snapshot,
      Some(PathBuf::from("state.json"))
    );
    assert_eq!(cli.command, Command::Delete {
      id:  7,
      yes: true
    });
  }

  #[test]
  fn list_takes_an_optional_project() {
    let cli =
      GlobalCli::parse_from(["bujo", "list"]);
    assert_eq!(cli.command, Command::List {
      project: None
    });
    let cli = GlobalCli::parse_from([
      "bujo",
      "list",
      "--project",
      "3",
    ]);
    assert_eq!(cli.command, Command::List {
      project: Some(3)
    });
  }

  #[test]
  fn verbose_and_quiet_cancel_out() {
    assert_eq!(log_level(0, 0), LevelFilter::WARN);
    assert_eq!(log_level(1, 0), LevelFilter::INFO);
    assert_eq!(log_level(2, 0), LevelFilter::DEBUG);
    assert_eq!(log_level(5, 0), LevelFilter::TRACE);
    assert_eq!(log_level(0, 1), LevelFilter::ERROR);
    assert_eq!(log_level(2, 1), LevelFilter::INFO);
    assert_eq!(log_level(1, 1), LevelFilter::WARN);
  }
}
