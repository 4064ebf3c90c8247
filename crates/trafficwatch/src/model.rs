//! Core record types for trafficwatch.
//!
//! Raw records mirror the JSON the traffic backend sends; view records are
//! what the mapper, aggregator and filter engine hand to the screens.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of lanes that get a column in the density chart (lanes 1 to 4).
pub const CHART_LANES: usize = 4;

/// A single density observation for one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReading {
    /// Backend identifier of the reading.
    pub id: u64,
    /// Lane the reading belongs to (1-based).
    pub lane_id: u32,
    /// Congestion proxy, nominally 0-100. Not clamped.
    pub density: i32,
    /// When the reading was taken.
    #[serde(rename = "date", deserialize_with = "deserialize_timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl DensityReading {
    /// Create a reading.
    #[must_use]
    pub fn new(id: u64, lane_id: u32, density: i32, observed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            lane_id,
            density,
            observed_at,
        }
    }

    /// Display label of this reading's lane, e.g. `Lane 3`.
    #[must_use]
    pub fn lane_label(&self) -> String {
        lane_label(self.lane_id)
    }
}

/// Display label for a lane id.
#[must_use]
pub fn lane_label(lane_id: u32) -> String {
    format!("Lane {lane_id}")
}

/// Accept RFC 3339 timestamps, and offset-less ones which are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Three-level congestion classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityStatus {
    /// Below 30.
    Low,
    /// 30 up to (not including) 70.
    Moderate,
    /// 70 and above.
    High,
}

impl std::fmt::Display for DensityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Current status of one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneStatus {
    /// `Lane N`.
    pub lane_label: String,
    /// Classified status.
    pub status: DensityStatus,
    /// The density the status was derived from.
    pub density: i32,
}

/// One row of the density chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// `HH:MM` label of the bucket.
    pub time_bucket: String,
    /// Timestamp of the first reading seen for this bucket; used for ordering.
    pub bucket_start: DateTime<Utc>,
    /// Density per chart lane, index 0 is lane 1.
    pub per_lane_density: [i32; CHART_LANES],
}

impl ChartPoint {
    /// Density for a lane, or `None` if the lane has no chart column.
    #[must_use]
    pub fn density_for(&self, lane_id: u32) -> Option<i32> {
        chart_column(lane_id).map(|column| self.per_lane_density[column])
    }
}

/// Column index for a lane, if the lane is charted.
pub(crate) fn chart_column(lane_id: u32) -> Option<usize> {
    let column = usize::try_from(lane_id).ok()?.checked_sub(1)?;
    (column < CHART_LANES).then_some(column)
}

/// A violation exactly as the backend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViolation {
    /// Backend identifier.
    pub id: String,
    /// Lane name, e.g. `Lane 2`.
    pub lane_name: String,
    /// Measured speed in km/h.
    pub speed: i32,
    /// Limit in force in km/h.
    pub speed_limit: i32,
    /// Preformatted time, e.g. `10:15 AM`.
    pub violation_time_string: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub violation_date_string: String,
    /// Evidence image, if the backend has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A violation ready for listing and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Unique identifier.
    pub id: String,
    /// Lane name.
    pub lane: String,
    /// Measured speed in km/h.
    pub speed: i32,
    /// Limit in force in km/h.
    pub speed_limit: i32,
    /// Calendar date string, compared verbatim by the date filter.
    pub observed_date: String,
    /// Display time.
    pub observed_time: String,
    /// Where the violation happened. The backend has no separate field, so
    /// this is the lane name.
    pub location: String,
    /// Evidence image; a placeholder when the backend sent none.
    pub image_url: String,
}

impl ViolationRecord {
    /// How far over the limit the vehicle was. Negative if under.
    #[must_use]
    pub fn excess_speed(&self) -> i32 {
        self.speed - self.speed_limit
    }
}
