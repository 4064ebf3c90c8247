//! Command-line interface for trafficwatch.
//!
//! This module provides the CLI structure for the `trafwatch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, HomeCommand, LanesCommand, LimitAssignment, NotificationArg, ReportsCommand,
    SettingsCommand, SpeedRangeArg, TimeFrameArg, ViolationsCommand,
};

/// trafwatch - Lane density and speed violations from the terminal
///
/// Shows live traffic density per lane, a recent density chart, the
/// speed-violation log and traffic reports from the traffic control backend.
#[derive(Debug, Parser)]
#[command(name = "trafwatch")]
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
    /// Lane statuses and the recent density chart
    Home(HomeCommand),

    /// Speed-violation log
    Violations(ViolationsCommand),

    /// Lanes present in the violation log
    Lanes(LanesCommand),

    /// Traffic and violation report
    Reports(ReportsCommand),

    /// Speed limits, notifications and theme
    Settings(SettingsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn home() -> Command {
        Command::Home(HomeCommand {
            json: false,
            watch: false,
        })
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "trafwatch");
    }

    #[test]
    fn test_verbosity_quiet_wins() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: true,
            command: home(),
        };
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        for (verbose, expected) in [
            (0, Verbosity::Normal),
            (1, Verbosity::Verbose),
            (2, Verbosity::Trace),
            (5, Verbosity::Trace),
        ] {
            let cli = Cli {
                config: None,
                verbose,
                quiet: false,
                command: home(),
            };
            assert_eq!(cli.verbosity(), expected);
        }
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_home_watch() {
        let cli = Cli::try_parse_from(["trafwatch", "home", "--watch"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Home(HomeCommand {
                watch: true,
                json: false
            })
        ));
    }

    #[test]
    fn test_parse_violations_filters() {
        let cli = Cli::try_parse_from([
            "trafwatch",
            "violations",
            "--date",
            "2023-03-15",
            "--speed",
            "30+",
            "--lane",
            "Lane 2",
        ])
        .unwrap();

        let Command::Violations(cmd) = cli.command else {
            panic!("expected violations command");
        };
        assert_eq!(cmd.date.as_deref(), Some("2023-03-15"));
        assert_eq!(cmd.speed, SpeedRangeArg::AtLeast30);
        assert_eq!(cmd.lane.as_deref(), Some("Lane 2"));
    }

    #[test]
    fn test_parse_violations_default_speed() {
        let cli = Cli::try_parse_from(["trafwatch", "violations"]).unwrap();
        let Command::Violations(cmd) = cli.command else {
            panic!("expected violations command");
        };
        assert_eq!(cmd.speed, SpeedRangeArg::All);
    }

    #[test]
    fn test_parse_rejects_unknown_speed_band() {
        let result = Cli::try_parse_from(["trafwatch", "violations", "--speed", "40-50"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_reports_time_frame() {
        let cli = Cli::try_parse_from(["trafwatch", "reports", "-t", "weekly"]).unwrap();
        let Command::Reports(cmd) = cli.command else {
            panic!("expected reports command");
        };
        assert_eq!(cmd.time_frame, TimeFrameArg::Weekly);
    }

    #[test]
    fn test_parse_settings_overrides() {
        let cli = Cli::try_parse_from([
            "trafwatch",
            "settings",
            "--set-limit",
            "Lane 2=30",
            "--toggle",
            "camera-offline",
        ])
        .unwrap();

        let Command::Settings(cmd) = cli.command else {
            panic!("expected settings command");
        };
        assert_eq!(cmd.set_limit.len(), 1);
        assert_eq!(cmd.set_limit[0].lane, "Lane 2");
        assert_eq!(cmd.toggle, vec![NotificationArg::CameraOffline]);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["trafwatch", "config", "validate", "--file", "/tmp/x.toml"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["trafwatch", "-c", "/custom/config.toml", "lanes"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trafwatch", "home", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["trafwatch", "lanes", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
