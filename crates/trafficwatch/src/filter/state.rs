//! Filter selections for the violation log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Named inclusive speed bands. `20-25` and `25-30` both include 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpeedRange {
    /// No speed restriction.
    #[default]
    #[serde(rename = "all")]
    All,
    /// 20 to 25 km/h.
    #[serde(rename = "20-25")]
    From20To25,
    /// 25 to 30 km/h.
    #[serde(rename = "25-30")]
    From25To30,
    /// 30 km/h and above.
    #[serde(rename = "30+")]
    AtLeast30,
}

impl SpeedRange {
    /// Every band, `All` first.
    pub const ALL: [SpeedRange; 4] = [
        Self::All,
        Self::From20To25,
        Self::From25To30,
        Self::AtLeast30,
    ];

    /// Inclusive bounds of the band; `None` for `All`. An open upper bound
    /// is `None` too.
    fn bounds(self) -> Option<(i32, Option<i32>)> {
        match self {
            Self::All => None,
            Self::From20To25 => Some((20, Some(25))),
            Self::From25To30 => Some((25, Some(30))),
            Self::AtLeast30 => Some((30, None)),
        }
    }

    /// Whether a speed falls in this band.
    #[must_use]
    pub fn contains(self, speed: i32) -> bool {
        match self.bounds() {
            None => true,
            Some((low, high)) => speed >= low && high.map_or(true, |high| speed <= high),
        }
    }

    /// Name used on the command line and in JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::From20To25 => "20-25",
            Self::From25To30 => "25-30",
            Self::AtLeast30 => "30+",
        }
    }
}

impl fmt::Display for SpeedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeedRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "20-25" => Ok(Self::From20To25),
            "25-30" => Ok(Self::From25To30),
            "30+" => Ok(Self::AtLeast30),
            other => Err(Error::InvalidSpeedRange {
                value: other.to_string(),
            }),
        }
    }
}

/// Lane selection. Matching is exact and case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LaneFilter {
    /// Every lane.
    #[default]
    All,
    /// Only the lane with exactly this name.
    Named(String),
}

impl LaneFilter {
    /// Whether a lane name passes this filter.
    #[must_use]
    pub fn matches(&self, lane: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == lane,
        }
    }
}

impl From<&str> for LaneFilter {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }
}

impl From<String> for LaneFilter {
    fn from(value: String) -> Self {
        if value.is_empty() || value == "all" {
            Self::All
        } else {
            Self::Named(value)
        }
    }
}

impl From<LaneFilter> for String {
    fn from(value: LaneFilter) -> Self {
        match value {
            LaneFilter::All => "all".to_string(),
            LaneFilter::Named(name) => name,
        }
    }
}

impl fmt::Display for LaneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The full set of active filter selections.
///
/// A value type: build a new one to change the selection, then hand it to
/// the filter engine together with the unfiltered violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Exact calendar date string (`YYYY-MM-DD`) to keep.
    pub date: Option<String>,
    /// Speed band to keep.
    pub speed_range: SpeedRange,
    /// Lane to keep.
    pub lane: LaneFilter,
}

impl FilterState {
    /// A state with no active criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same state with a date criterion. An empty string clears it.
    #[must_use]
    pub fn with_date(self, date: impl Into<String>) -> Self {
        let date = date.into();
        Self {
            date: (!date.is_empty()).then_some(date),
            ..self
        }
    }

    /// Same state with a speed band.
    #[must_use]
    pub fn with_speed_range(self, speed_range: SpeedRange) -> Self {
        Self {
            speed_range,
            ..self
        }
    }

    /// Same state with a lane selection.
    #[must_use]
    pub fn with_lane(self, lane: impl Into<LaneFilter>) -> Self {
        Self {
            lane: lane.into(),
            ..self
        }
    }

    /// Same state without a date criterion.
    #[must_use]
    pub fn without_date(self) -> Self {
        Self { date: None, ..self }
    }

    /// The date criterion, treating an empty string as absent.
    #[must_use]
    pub fn active_date(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.is_empty())
    }

    /// True when no criterion would remove anything.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.active_date().is_none()
            && self.speed_range == SpeedRange::All
            && self.lane == LaneFilter::All
    }
}
