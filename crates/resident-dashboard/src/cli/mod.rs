//! Command-line interface for the resident dashboard.
//!
//! This module provides the CLI structure for the `residash` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminCommand, ConfigCommand, EventCommand, EventFields, PhotoCommand, ShowCommand,
    StatusCommand, SurfaceArg, WatchCommand,
};

/// residash - Today's meals, events and photos at a glance
///
/// Renders the resident dashboard in the terminal and edits the local
/// override that sits on top of the shared base data.
#[derive(Debug, Parser)]
#[command(name = "residash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the dashboard once
    Show(ShowCommand),

    /// Run a surface, redrawing on every tick
    Watch(WatchCommand),

    /// Show data source and override status
    Status(StatusCommand),

    /// Edit meals, events and photos on this device
    #[command(subcommand)]
    Admin(AdminCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "residash");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_defaults() {
        let cli = Cli::try_parse_from(["residash", "show"]).unwrap();
        let Command::Show(show) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(show.surface, SurfaceArg::Slideshow);
        assert!(show.at.is_none());
        assert!(!show.json);
    }

    #[test]
    fn test_parse_show_at_frame() {
        let cli = Cli::try_parse_from([
            "residash",
            "show",
            "--surface",
            "frame",
            "--at",
            "2026-10-18 09:30",
        ])
        .unwrap();
        let Command::Show(show) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(show.surface, SurfaceArg::Frame);
        assert_eq!(show.at.as_deref(), Some("2026-10-18 09:30"));
    }

    #[test]
    fn test_parse_watch_ticks() {
        let cli = Cli::try_parse_from(["residash", "watch", "-s", "hero", "--ticks", "5"]).unwrap();
        let Command::Watch(watch) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(watch.surface, SurfaceArg::Hero);
        assert_eq!(watch.ticks, Some(5));
    }

    #[test]
    fn test_parse_admin_meals() {
        let cli =
            Cli::try_parse_from(["residash", "admin", "meals", "--lunch", "Tomato soup"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Admin(AdminCommand::Meals { lunch: Some(ref l), breakfast: None, dinner: None })
                if l == "Tomato soup"
        ));
    }

    #[test]
    fn test_parse_admin_event_update() {
        let cli = Cli::try_parse_from([
            "residash", "admin", "event", "update", "evt-1", "--time", "15:30",
        ])
        .unwrap();
        let Command::Admin(AdminCommand::Event(EventCommand::Update { id, fields })) = cli.command
        else {
            panic!("expected event update");
        };
        assert_eq!(id, "evt-1");
        assert_eq!(fields.time.as_deref(), Some("15:30"));
    }

    #[test]
    fn test_parse_admin_photo_rejects_zero() {
        let result = Cli::try_parse_from(["residash", "admin", "photo", "remove", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_admin_export_default_output() {
        let cli = Cli::try_parse_from(["residash", "admin", "export"]).unwrap();
        let Command::Admin(AdminCommand::Export { output }) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(output, PathBuf::from("dashboard.json"));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["residash", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["residash", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["residash", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
