//! Fixed datasets substituted when the backend cannot be reached.

use chrono::{DateTime, Utc};

use crate::mapper::placeholder_image_url;
use crate::model::{DensityReading, RawViolation};

/// One reading per lane 1-4 with densities 25, 55, 85 and 30, stamped `now`.
#[must_use]
pub fn fallback_density_readings(now: DateTime<Utc>) -> Vec<DensityReading> {
    [(1, 25), (2, 55), (3, 85), (4, 30)]
        .into_iter()
        .map(|(lane_id, density)| DensityReading::new(u64::from(lane_id), lane_id, density, now))
        .collect()
}

/// (id, lane, speed, time, date)
const FALLBACK_VIOLATIONS: [(&str, &str, i32, &str, &str); 10] = [
    ("v001", "Lane 2", 38, "10:15 AM", "2023-03-15"),
    ("v002", "Lane 4", 32, "10:32 AM", "2023-03-15"),
    ("v003", "Lane 1", 25, "11:05 AM", "2023-03-15"),
    ("v004", "Lane 3", 28, "11:47 AM", "2023-03-14"),
    ("v005", "Lane 2", 29, "09:15 AM", "2023-03-14"),
    ("v006", "Lane 1", 32, "08:45 AM", "2023-03-13"),
    ("v007", "Lane 4", 25, "07:30 AM", "2023-03-13"),
    ("v008", "Lane 3", 35, "02:20 PM", "2023-03-12"),
    ("v009", "Lane 1", 27, "04:15 PM", "2023-03-12"),
    ("v010", "Lane 4", 31, "06:45 PM", "2023-03-11"),
];

const FALLBACK_SPEED_LIMIT: i32 = 20;

/// Ten violations across lanes 1-4 between 2023-03-11 and 2023-03-15.
#[must_use]
pub fn fallback_violations() -> Vec<RawViolation> {
    FALLBACK_VIOLATIONS
        .iter()
        .map(|&(id, lane, speed, time, date)| RawViolation {
            id: id.to_string(),
            lane_name: lane.to_string(),
            speed,
            speed_limit: FALLBACK_SPEED_LIMIT,
            violation_time_string: time.to_string(),
            violation_date_string: date.to_string(),
            image_url: Some(placeholder_image_url(lane)),
        })
        .collect()
}
