//! Traffic and violation reports over a time frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    /// One point every three hours.
    #[default]
    Daily,
    /// One point per weekday.
    Weekly,
    /// One point per week.
    Monthly,
}

impl TimeFrame {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Name of the x-axis for this period.
    #[must_use]
    pub fn axis_label(self) -> &'static str {
        match self {
            Self::Daily => "hour",
            Self::Weekly => "day",
            Self::Monthly => "week",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(Error::InvalidTimeFrame {
                value: s.to_string(),
            }),
        }
    }
}

/// One bar of a report.
///
/// The backend names the label field after the period (`hour`, `day` or
/// `week`); all three are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPoint {
    /// Hour, weekday or week label.
    #[serde(alias = "hour", alias = "day", alias = "week")]
    pub label: String,
    /// Traffic volume index.
    pub traffic: u32,
    /// Violations recorded.
    pub violations: u32,
}

impl ReportPoint {
    fn new(label: &str, traffic: u32, violations: u32) -> Self {
        Self {
            label: label.to_string(),
            traffic,
            violations,
        }
    }
}

/// Totals over a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportTotals {
    /// Sum of violations.
    pub violations: u32,
    /// Highest traffic value, if any points.
    pub peak_traffic: Option<u32>,
}

/// Sum violations and find the traffic peak.
#[must_use]
pub fn totals(points: &[ReportPoint]) -> ReportTotals {
    ReportTotals {
        violations: points.iter().map(|p| p.violations).sum(),
        peak_traffic: points.iter().map(|p| p.traffic).max(),
    }
}

/// Report shown when the reports endpoint cannot be reached.
#[must_use]
pub fn fallback_report(time_frame: TimeFrame) -> Vec<ReportPoint> {
    let rows: &[(&str, u32, u32)] = match time_frame {
        TimeFrame::Daily => &[
            ("00:00", 10, 2),
            ("03:00", 5, 0),
            ("06:00", 25, 3),
            ("09:00", 65, 12),
            ("12:00", 45, 8),
            ("15:00", 55, 10),
            ("18:00", 70, 15),
            ("21:00", 30, 5),
        ],
        TimeFrame::Weekly => &[
            ("Mon", 45, 8),
            ("Tue", 50, 10),
            ("Wed", 55, 12),
            ("Thu", 60, 14),
            ("Fri", 70, 18),
            ("Sat", 40, 7),
            ("Sun", 30, 5),
        ],
        TimeFrame::Monthly => &[
            ("Week 1", 48, 42),
            ("Week 2", 52, 45),
            ("Week 3", 58, 50),
            ("Week 4", 62, 55),
        ],
    };

    rows.iter()
        .map(|&(label, traffic, violations)| ReportPoint::new(label, traffic, violations))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_frame_parse() {
        assert_eq!("daily".parse::<TimeFrame>().unwrap(), TimeFrame::Daily);
        assert_eq!("Weekly".parse::<TimeFrame>().unwrap(), TimeFrame::Weekly);
        assert_eq!(" monthly ".parse::<TimeFrame>().unwrap(), TimeFrame::Monthly);
        assert!("yearly".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_fallback_sizes() {
        assert_eq!(fallback_report(TimeFrame::Daily).len(), 8);
        assert_eq!(fallback_report(TimeFrame::Weekly).len(), 7);
        assert_eq!(fallback_report(TimeFrame::Monthly).len(), 4);
    }

    #[test]
    fn test_report_point_label_aliases() {
        let hour: ReportPoint =
            serde_json::from_str(r#"{"hour": "09:00", "traffic": 65, "violations": 12}"#).unwrap();
        let day: ReportPoint =
            serde_json::from_str(r#"{"day": "Fri", "traffic": 70, "violations": 18}"#).unwrap();
        let week: ReportPoint =
            serde_json::from_str(r#"{"week": "Week 2", "traffic": 52, "violations": 45}"#).unwrap();

        assert_eq!(hour.label, "09:00");
        assert_eq!(day.label, "Fri");
        assert_eq!(week.label, "Week 2");
    }

    #[test]
    fn test_totals() {
        let report = totals(&fallback_report(TimeFrame::Monthly));
        assert_eq!(report.violations, 42 + 45 + 50 + 55);
        assert_eq!(report.peak_traffic, Some(62));
        assert_eq!(totals(&[]), ReportTotals::default());
    }

    #[test]
    fn test_axis_label() {
        assert_eq!(TimeFrame::Daily.axis_label(), "hour");
        assert_eq!(TimeFrame::Weekly.axis_label(), "day");
        assert_eq!(TimeFrame::Monthly.axis_label(), "week");
    }
}
