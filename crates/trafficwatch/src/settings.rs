//! Local dashboard settings: per-lane speed limits, notification toggles and
//! theme.
//!
//! Settings come from the config file and may be adjusted for the current
//! session. Nothing is written back.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Smallest speed limit a lane can have, in km/h.
pub const MIN_SPEED_LIMIT: u32 = 5;

/// Largest speed limit a lane can have, in km/h.
pub const MAX_SPEED_LIMIT: u32 = 120;

/// Limit every lane starts with.
const DEFAULT_SPEED_LIMIT: u32 = 20;

/// Speed limit for one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSetting {
    /// Lane name as it appears in violation records.
    pub name: String,
    /// Limit in km/h.
    pub speed_limit: u32,
}

/// Which alerts the user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Alert on speed violations.
    pub speed_violations: bool,
    /// Alert on congestion.
    pub congestion_alerts: bool,
    /// Alert when a camera goes offline.
    pub camera_offline: bool,
    /// Send a daily report.
    pub daily_reports: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            speed_violations: true,
            congestion_alerts: true,
            camera_offline: false,
            daily_reports: true,
        }
    }
}

/// A single notification switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Speed violation alerts.
    SpeedViolations,
    /// Congestion alerts.
    CongestionAlerts,
    /// Camera offline alerts.
    CameraOffline,
    /// Daily report notifications.
    DailyReports,
}

impl NotificationKind {
    /// Every switch, in display order.
    pub const ALL: [NotificationKind; 4] = [
        Self::SpeedViolations,
        Self::CongestionAlerts,
        Self::CameraOffline,
        Self::DailyReports,
    ];

    /// Label shown next to the switch.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SpeedViolations => "Speed Violation Alerts",
            Self::CongestionAlerts => "Congestion Alerts",
            Self::CameraOffline => "Camera Offline Alerts",
            Self::DailyReports => "Daily Report Notifications",
        }
    }
}

impl NotificationSettings {
    /// Current value of a switch.
    #[must_use]
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::SpeedViolations => self.speed_violations,
            NotificationKind::CongestionAlerts => self.congestion_alerts,
            NotificationKind::CameraOffline => self.camera_offline,
            NotificationKind::DailyReports => self.daily_reports,
        }
    }

    fn slot(&mut self, kind: NotificationKind) -> &mut bool {
        match kind {
            NotificationKind::SpeedViolations => &mut self.speed_violations,
            NotificationKind::CongestionAlerts => &mut self.congestion_alerts,
            NotificationKind::CameraOffline => &mut self.camera_offline,
            NotificationKind::DailyReports => &mut self.daily_reports,
        }
    }

    /// Flip a switch and return its new value.
    pub fn toggle(&mut self, kind: NotificationKind) -> bool {
        let slot = self.slot(kind);
        *slot = !*slot;
        *slot
    }
}

/// Colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    Dark,
    /// Follow the terminal or OS.
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

/// All local settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-lane speed limits.
    pub lanes: Vec<LaneSetting>,
    /// Notification switches.
    pub notifications: NotificationSettings,
    /// Colour scheme.
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lanes: (1..=4)
                .map(|n| LaneSetting {
                    name: format!("Lane {n}"),
                    speed_limit: DEFAULT_SPEED_LIMIT,
                })
                .collect(),
            notifications: NotificationSettings::default(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Validate lane names and limits.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or duplicate lane name, or a limit
    /// outside [`MIN_SPEED_LIMIT`]..=[`MAX_SPEED_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        for (i, lane) in self.lanes.iter().enumerate() {
            if lane.name.trim().is_empty() {
                return Err(Error::config_validation(format!(
                    "lane #{} has an empty name",
                    i + 1
                )));
            }
            if self.lanes[..i].iter().any(|other| other.name == lane.name) {
                return Err(Error::config_validation(format!(
                    "duplicate lane name: {}",
                    lane.name
                )));
            }
            check_speed_limit(
                &lane.name,
                i64::from(lane.speed_limit),
                &lane.speed_limit.to_string(),
            )?;
        }
        Ok(())
    }

    /// Speed limit configured for a lane.
    #[must_use]
    pub fn speed_limit_for(&self, lane: &str) -> Option<u32> {
        self.lanes
            .iter()
            .find(|l| l.name == lane)
            .map(|l| l.speed_limit)
    }

    /// Set a lane's limit from user input.
    ///
    /// Input is read like a form field: leading whitespace is skipped and the
    /// leading integer is taken; anything unparseable counts as 0, which is
    /// then rejected by the range check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLane`] if no lane has this name, whatever
    /// the input, and [`Error::InvalidSpeedLimit`] carrying the input as
    /// typed if the value is out of range. The setting is unchanged on error.
    pub fn set_speed_limit(&mut self, lane: &str, input: &str) -> Result<u32> {
        let setting = self
            .lanes
            .iter_mut()
            .find(|l| l.name == lane)
            .ok_or_else(|| Error::UnknownLane {
                lane: lane.to_string(),
            })?;

        let value = check_speed_limit(lane, parse_leading_int(input), input.trim())?;

        debug!(lane, old = setting.speed_limit, new = value, "Speed limit changed");
        setting.speed_limit = value;
        Ok(value)
    }

    /// Flip a notification switch and return its new value.
    pub fn toggle(&mut self, kind: NotificationKind) -> bool {
        let value = self.notifications.toggle(kind);
        debug!(switch = kind.label(), enabled = value, "Notification toggled");
        value
    }
}

/// Range-check a parsed limit; `raw` is what goes into the error.
fn check_speed_limit(lane: &str, value: i64, raw: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (MIN_SPEED_LIMIT..=MAX_SPEED_LIMIT).contains(v))
        .ok_or_else(|| Error::InvalidSpeedLimit {
            lane: lane.to_string(),
            value: raw.to_string(),
            min: MIN_SPEED_LIMIT,
            max: MAX_SPEED_LIMIT,
        })
}

/// Leading integer of `input`, or 0 if there is none.
fn parse_leading_int(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().unwrap_or(0);

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.lanes.len(), 4);
        assert!(settings.lanes.iter().all(|l| l.speed_limit == 20));
        assert_eq!(settings.lanes[2].name, "Lane 3");
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_notifications() {
        let n = NotificationSettings::default();
        assert!(n.speed_violations);
        assert!(n.congestion_alerts);
        assert!(!n.camera_offline);
        assert!(n.daily_reports);
    }

    #[test]
    fn test_speed_limit_for() {
        let settings = Settings::default();
        assert_eq!(settings.speed_limit_for("Lane 1"), Some(20));
        assert_eq!(settings.speed_limit_for("Lane 9"), None);
    }

    #[test]
    fn test_set_speed_limit() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_speed_limit("Lane 2", "45").unwrap(), 45);
        assert_eq!(settings.speed_limit_for("Lane 2"), Some(45));
    }

    #[test]
    fn test_set_speed_limit_parses_leading_digits() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_speed_limit("Lane 1", " 60km/h").unwrap(), 60);
    }

    #[test]
    fn test_set_speed_limit_rejects_garbage_and_range() {
        let mut settings = Settings::default();

        let err = settings.set_speed_limit("Lane 1", "fast").unwrap_err();
        assert!(matches!(err, Error::InvalidSpeedLimit { ref value, .. } if value == "fast"));

        assert!(settings.set_speed_limit("Lane 1", "4").is_err());
        assert!(settings.set_speed_limit("Lane 1", "121").is_err());
        assert!(settings.set_speed_limit("Lane 1", "-30").is_err());
        assert!(settings.set_speed_limit("Lane 1", "5").is_ok());
        assert!(settings.set_speed_limit("Lane 1", "120").is_ok());
        assert_eq!(settings.speed_limit_for("Lane 1"), Some(120));
    }

    #[test]
    fn test_set_speed_limit_unknown_lane() {
        let mut settings = Settings::default();
        let err = settings.set_speed_limit("Lane 7", "30").unwrap_err();
        assert!(matches!(err, Error::UnknownLane { .. }));
    }

    #[test]
    fn test_set_speed_limit_unknown_lane_before_range() {
        let mut settings = Settings::default();
        let err = settings.set_speed_limit("Lane 9", "500").unwrap_err();
        assert!(matches!(err, Error::UnknownLane { ref lane } if lane == "Lane 9"));
    }

    #[test]
    fn test_set_speed_limit_error_keeps_input() {
        let mut settings = Settings::default();

        let negative = settings.set_speed_limit("Lane 2", "-30").unwrap_err();
        assert!(negative.to_string().contains("'-30'"));

        let huge = settings
            .set_speed_limit("Lane 2", " 99999999999999999999")
            .unwrap_err();
        assert!(huge.to_string().contains("'99999999999999999999'"));

        assert_eq!(settings.speed_limit_for("Lane 2"), Some(20));
    }

    #[test]
    fn test_toggle() {
        let mut settings = Settings::default();
        assert!(settings.toggle(NotificationKind::CameraOffline));
        assert!(settings.notifications.get(NotificationKind::CameraOffline));
        assert!(!settings.toggle(NotificationKind::CameraOffline));
        assert!(!settings.toggle(NotificationKind::DailyReports));
    }

    #[test]
    fn test_validate_duplicate_lane() {
        let mut settings = Settings::default();
        settings.lanes[1].name = "Lane 1".to_string();
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_validate_empty_lane_name() {
        let mut settings = Settings::default();
        settings.lanes[0].name = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  7 "), 7);
        assert_eq!(parse_leading_int("-12abc"), -12);
        assert_eq!(parse_leading_int("+9"), 9);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("abc"), 0);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let json = r#"{"theme": "dark", "notifications": {"camera_offline": true}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.notifications.camera_offline);
        assert!(settings.notifications.speed_violations);
        assert_eq!(settings.lanes.len(), 4);
    }
}
