//! Pure filter functions over violation records.
//!
//! Each filter keeps a subset of its input and never reorders it, so any
//! composition of them gives the same result regardless of order.

use tracing::trace;

use super::state::{FilterState, LaneFilter, SpeedRange};
use crate::model::ViolationRecord;

/// Keep records observed on exactly `date`. `None` or empty keeps everything.
#[must_use]
pub fn filter_by_date(violations: &[ViolationRecord], date: Option<&str>) -> Vec<ViolationRecord> {
    match date.filter(|d| !d.is_empty()) {
        None => violations.to_vec(),
        Some(date) => violations
            .iter()
            .filter(|v| v.observed_date == date)
            .cloned()
            .collect(),
    }
}

/// Keep records whose speed is inside `range`.
#[must_use]
pub fn filter_by_speed_range(
    violations: &[ViolationRecord],
    range: SpeedRange,
) -> Vec<ViolationRecord> {
    violations
        .iter()
        .filter(|v| range.contains(v.speed))
        .cloned()
        .collect()
}

/// Keep records on exactly the selected lane.
#[must_use]
pub fn filter_by_lane(violations: &[ViolationRecord], lane: &LaneFilter) -> Vec<ViolationRecord> {
    violations
        .iter()
        .filter(|v| lane.matches(&v.lane))
        .cloned()
        .collect()
}

/// Apply date, speed and lane filters in sequence.
#[must_use]
pub fn apply_all_filters(
    violations: &[ViolationRecord],
    state: &FilterState,
) -> Vec<ViolationRecord> {
    let by_date = filter_by_date(violations, state.active_date());
    let by_speed = filter_by_speed_range(&by_date, state.speed_range);
    let result = filter_by_lane(&by_speed, &state.lane);

    trace!(
        input = violations.len(),
        after_date = by_date.len(),
        after_speed = by_speed.len(),
        output = result.len(),
        "Applied violation filters"
    );
    result
}
