//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::{FilterState, SpeedRange};
use crate::reports::TimeFrame;
use crate::settings::NotificationKind;

/// Home view arguments.
#[derive(Debug, Args)]
pub struct HomeCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Keep refreshing at the configured interval until interrupted
    #[arg(short, long)]
    pub watch: bool,
}

/// Violation log arguments.
#[derive(Debug, Args)]
pub struct ViolationsCommand {
    /// Only violations on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Only violations in this speed band
    #[arg(short, long, value_enum, default_value = "all")]
    pub speed: SpeedRangeArg,

    /// Only violations on this lane ("all" for every lane)
    #[arg(short, long)]
    pub lane: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ViolationsCommand {
    /// Filter selection described by the arguments.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new().with_speed_range(self.speed.into());
        if let Some(date) = &self.date {
            state = state.with_date(date.as_str());
        }
        if let Some(lane) = &self.lane {
            state = state.with_lane(lane.as_str());
        }
        state
    }
}

/// Lane listing arguments.
#[derive(Debug, Args)]
pub struct LanesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report arguments.
#[derive(Debug, Args)]
pub struct ReportsCommand {
    /// Report period
    #[arg(short, long, value_enum, default_value = "daily")]
    pub time_frame: TimeFrameArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Settings arguments. Changes apply to this run only.
#[derive(Debug, Args)]
pub struct SettingsCommand {
    /// Override a lane's speed limit, e.g. --set-limit "Lane 2=30"
    #[arg(long, value_name = "LANE=KMH")]
    pub set_limit: Vec<LimitAssignment>,

    /// Flip a notification switch
    #[arg(long, value_enum)]
    pub toggle: Vec<NotificationArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Speed band argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpeedRangeArg {
    /// Any speed
    All,
    /// 20 to 25 km/h
    #[value(name = "20-25")]
    From20To25,
    /// 25 to 30 km/h
    #[value(name = "25-30")]
    From25To30,
    /// 30 km/h and above
    #[value(name = "30+")]
    AtLeast30,
}

impl From<SpeedRangeArg> for SpeedRange {
    fn from(arg: SpeedRangeArg) -> Self {
        match arg {
            SpeedRangeArg::All => Self::All,
            SpeedRangeArg::From20To25 => Self::From20To25,
            SpeedRangeArg::From25To30 => Self::From25To30,
            SpeedRangeArg::AtLeast30 => Self::AtLeast30,
        }
    }
}

/// Report period argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeFrameArg {
    /// Every three hours of the day
    Daily,
    /// Every day of the week
    Weekly,
    /// Every week of the month
    Monthly,
}

impl From<TimeFrameArg> for TimeFrame {
    fn from(arg: TimeFrameArg) -> Self {
        match arg {
            TimeFrameArg::Daily => Self::Daily,
            TimeFrameArg::Weekly => Self::Weekly,
            TimeFrameArg::Monthly => Self::Monthly,
        }
    }
}

/// Notification switch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotificationArg {
    /// Speed violation alerts
    SpeedViolations,
    /// Congestion alerts
    CongestionAlerts,
    /// Camera offline alerts
    CameraOffline,
    /// Daily report notifications
    DailyReports,
}

impl From<NotificationArg> for NotificationKind {
    fn from(arg: NotificationArg) -> Self {
        match arg {
            NotificationArg::SpeedViolations => Self::SpeedViolations,
            NotificationArg::CongestionAlerts => Self::CongestionAlerts,
            NotificationArg::CameraOffline => Self::CameraOffline,
            NotificationArg::DailyReports => Self::DailyReports,
        }
    }
}

/// A `LANE=VALUE` pair from the command line.
///
/// The value is kept as typed; range checking happens when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitAssignment {
    /// Lane name.
    pub lane: String,
    /// Raw limit text.
    pub value: String,
}

impl FromStr for LimitAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lane, value) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected LANE=KMH, got {s:?}"))?;
        let lane = lane.trim();
        if lane.is_empty() {
            return Err(format!("missing lane name in {s:?}"));
        }
        Ok(Self {
            lane: lane.to_string(),
            value: value.trim().to_string(),
        })
    }
}
