//! Density aggregation for the home view.
//!
//! A batch of readings becomes one [`LaneStatus`] per lane (latest reading
//! wins) and a chart table of per-minute buckets, one density column per
//! chart lane, limited to the most recent [`MAX_CHART_POINTS`] buckets.
//!
//! Each batch stands alone. A lane missing from the batch has no status in
//! the result, even if an earlier batch had one.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::mapper::map_density_for_display;
use crate::model::{chart_column, ChartPoint, DensityReading, LaneStatus, CHART_LANES};

/// Number of chart buckets kept after sorting.
pub const MAX_CHART_POINTS: usize = 8;

/// Chart buckets are one minute wide.
const BUCKET_SECONDS: i64 = 60;

/// Everything the home view renders from one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DensitySnapshot {
    /// One entry per lane, sorted by lane label.
    pub lanes: Vec<LaneStatus>,
    /// Chart rows, oldest first.
    pub chart: Vec<ChartPoint>,
}

impl DensitySnapshot {
    /// True when the batch had no readings. Render "no data", not an empty
    /// chart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty() && self.chart.is_empty()
    }

    /// Status of a lane by label, if it was in the batch.
    #[must_use]
    pub fn lane(&self, label: &str) -> Option<&LaneStatus> {
        self.lanes.iter().find(|l| l.lane_label == label)
    }
}

/// Aggregate a batch of readings.
#[must_use]
pub fn aggregate(readings: &[DensityReading]) -> DensitySnapshot {
    let lanes = latest_lane_statuses(readings);
    let chart = chart_points(readings);

    debug!(
        readings = readings.len(),
        lanes = lanes.len(),
        chart_points = chart.len(),
        "Aggregated density batch"
    );

    DensitySnapshot { lanes, chart }
}

/// One status per lane from that lane's latest reading, sorted by label.
///
/// A reading replaces the stored one only when its timestamp is strictly
/// later, so among equal timestamps the first in input order is kept.
#[must_use]
pub fn latest_lane_statuses(readings: &[DensityReading]) -> Vec<LaneStatus> {
    let mut latest: HashMap<u32, &DensityReading> = HashMap::new();

    for reading in readings {
        match latest.get(&reading.lane_id) {
            Some(current) if reading.observed_at <= current.observed_at => {}
            _ => {
                latest.insert(reading.lane_id, reading);
            }
        }
    }

    let mut statuses: Vec<LaneStatus> = latest
        .into_values()
        .map(map_density_for_display)
        .collect();
    statuses.sort_by(|a, b| a.lane_label.cmp(&b.lane_label));
    statuses
}

/// Chart rows for the most recent [`MAX_CHART_POINTS`] minute buckets.
///
/// Within a bucket the last reading for a lane in input order wins. Rows are
/// ordered by the timestamp of each bucket's first-seen reading.
#[must_use]
pub fn chart_points(readings: &[DensityReading]) -> Vec<ChartPoint> {
    let mut buckets: HashMap<i64, ChartPoint> = HashMap::new();

    for reading in readings {
        let key = reading.observed_at.timestamp().div_euclid(BUCKET_SECONDS);
        let point = buckets.entry(key).or_insert_with(|| ChartPoint {
            time_bucket: reading.observed_at.format("%H:%M").to_string(),
            bucket_start: reading.observed_at,
            per_lane_density: [0; CHART_LANES],
        });

        match chart_column(reading.lane_id) {
            Some(column) => point.per_lane_density[column] = reading.density,
            None => trace!(lane_id = reading.lane_id, "Lane has no chart column"),
        }
    }

    let mut points: Vec<ChartPoint> = buckets.into_values().collect();
    points.sort_by_key(|p| p.bucket_start);

    let excess = points.len().saturating_sub(MAX_CHART_POINTS);
    points.drain(..excess);
    points
}
