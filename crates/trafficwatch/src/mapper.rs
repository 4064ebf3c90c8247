//! Raw API records to display records.
//!
//! All functions here are pure. Out-of-range densities are classified as-is:
//! negatives are `Low`, anything at or above 70 (including > 100) is `High`.

use crate::model::{DensityReading, DensityStatus, LaneStatus, RawViolation, ViolationRecord};

/// Densities below this are `Low`.
pub const MODERATE_THRESHOLD: i32 = 30;

/// Densities at or above this are `High`.
pub const HIGH_THRESHOLD: i32 = 70;

/// Classify a density into the three-level status.
#[must_use]
pub fn classify(density: i32) -> DensityStatus {
    if density < MODERATE_THRESHOLD {
        DensityStatus::Low
    } else if density < HIGH_THRESHOLD {
        DensityStatus::Moderate
    } else {
        DensityStatus::High
    }
}

/// Map a density reading to its lane status.
#[must_use]
pub fn map_density_for_display(reading: &DensityReading) -> LaneStatus {
    LaneStatus {
        lane_label: reading.lane_label(),
        status: classify(reading.density),
        density: reading.density,
    }
}

/// Placeholder image reference for a lane without evidence.
#[must_use]
pub fn placeholder_image_url(lane: &str) -> String {
    format!("/placeholder.svg?height=60&width=80&text={lane}")
}

/// Map a raw violation to a display record.
#[must_use]
pub fn map_violation_for_display(raw: RawViolation) -> ViolationRecord {
    let image_url = match raw.image_url {
        Some(url) if !url.is_empty() => url,
        _ => placeholder_image_url(&raw.lane_name),
    };

    ViolationRecord {
        id: raw.id,
        location: raw.lane_name.clone(),
        lane: raw.lane_name,
        speed: raw.speed,
        speed_limit: raw.speed_limit,
        observed_date: raw.violation_date_string,
        observed_time: raw.violation_time_string,
        image_url,
    }
}

/// Legend entry describing a status for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLegend {
    /// One-word label.
    pub short_label: &'static str,
    /// Label with a hint about the flow.
    pub label: &'static str,
    /// Sentence shown under the label.
    pub description: &'static str,
    /// Sensor value band the status covers.
    pub sensor_band: &'static str,
}

impl DensityStatus {
    /// All statuses, lowest first.
    pub const ALL: [DensityStatus; 3] = [Self::Low, Self::Moderate, Self::High];

    /// Legend entry for this status.
    #[must_use]
    pub fn legend(self) -> StatusLegend {
        match self {
            Self::Low => StatusLegend {
                short_label: "Low",
                label: "Low Traffic (Smooth flow)",
                description: "Traffic is moving freely with no delays",
                sensor_band: "0-30",
            },
            Self::Moderate => StatusLegend {
                short_label: "Moderate",
                label: "Moderate Traffic (Busy but moving)",
                description: "Some congestion but traffic is still flowing",
                sensor_band: "31-70",
            },
            Self::High => StatusLegend {
                short_label: "High",
                label: "High Congestion (Heavy traffic)",
                description: "Significant delays expected due to heavy traffic",
                sensor_band: "71-100",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(lane: &str, image_url: Option<&str>) -> RawViolation {
        RawViolation {
            id: "v100".to_string(),
            lane_name: lane.to_string(),
            speed: 33,
            speed_limit: 20,
            violation_time_string: "08:45 AM".to_string(),
            violation_date_string: "2023-03-13".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn test_classify_thresholds() {
        for d in -50..=150 {
            let expected = if d < 30 {
                DensityStatus::Low
            } else if d < 70 {
                DensityStatus::Moderate
            } else {
                DensityStatus::High
            };
            assert_eq!(classify(d), expected, "density {d}");
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(29), DensityStatus::Low);
        assert_eq!(classify(30), DensityStatus::Moderate);
        assert_eq!(classify(69), DensityStatus::Moderate);
        assert_eq!(classify(70), DensityStatus::High);
    }

    #[test]
    fn test_classify_out_of_range_not_clamped() {
        assert_eq!(classify(-5), DensityStatus::Low);
        assert_eq!(classify(250), DensityStatus::High);
        assert_eq!(classify(i32::MIN), DensityStatus::Low);
        assert_eq!(classify(i32::MAX), DensityStatus::High);
    }

    #[test]
    fn test_map_density_for_display() {
        let reading = DensityReading::new(9, 3, 85, Utc::now());
        let status = map_density_for_display(&reading);

        assert_eq!(status.lane_label, "Lane 3");
        assert_eq!(status.status, DensityStatus::High);
        assert_eq!(status.density, 85);
    }

    #[test]
    fn test_map_violation_keeps_image() {
        let record = map_violation_for_display(raw("Lane 2", Some("https://cdn/x.jpg")));
        assert_eq!(record.image_url, "https://cdn/x.jpg");
        assert_eq!(record.lane, "Lane 2");
        assert_eq!(record.location, "Lane 2");
        assert_eq!(record.observed_date, "2023-03-13");
        assert_eq!(record.observed_time, "08:45 AM");
        assert_eq!(record.speed, 33);
        assert_eq!(record.speed_limit, 20);
    }

    #[test]
    fn test_map_violation_placeholder_when_missing() {
        let record = map_violation_for_display(raw("Lane 4", None));
        assert_eq!(
            record.image_url,
            "/placeholder.svg?height=60&width=80&text=Lane 4"
        );
    }

    #[test]
    fn test_map_violation_placeholder_when_empty() {
        let record = map_violation_for_display(raw("Lane 1", Some("")));
        assert_eq!(record.image_url, placeholder_image_url("Lane 1"));
    }

    #[test]
    fn test_legend_bands() {
        let bands: Vec<_> = DensityStatus::ALL
            .iter()
            .map(|s| s.legend().sensor_band)
            .collect();
        assert_eq!(bands, vec!["0-30", "31-70", "71-100"]);
        assert_eq!(DensityStatus::Moderate.legend().short_label, "Moderate");
    }
}
