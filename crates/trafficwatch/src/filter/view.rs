//! The violation log: the full fetched set plus its filtered view.

use serde::Serialize;
use tracing::debug;

use super::engine::apply_all_filters;
use super::state::FilterState;
use crate::model::ViolationRecord;

/// Holds every violation from the last fetch and the view under the current
/// filters. Changing filters recomputes the view from the full set, so no
/// refetch is needed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViolationLog {
    all: Vec<ViolationRecord>,
    filters: FilterState,
    filtered: Vec<ViolationRecord>,
}

impl ViolationLog {
    /// Build a log with no filters applied.
    #[must_use]
    pub fn new(all: Vec<ViolationRecord>) -> Self {
        Self::with_filters(all, FilterState::default())
    }

    /// Build a log with an initial filter selection.
    #[must_use]
    pub fn with_filters(all: Vec<ViolationRecord>, filters: FilterState) -> Self {
        let filtered = apply_all_filters(&all, &filters);
        Self {
            all,
            filters,
            filtered,
        }
    }

    /// Swap in a freshly fetched set and reapply the current filters.
    pub fn replace_all(&mut self, all: Vec<ViolationRecord>) {
        self.all = all;
        self.refresh();
    }

    /// Change the filter selection.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.filtered = apply_all_filters(&self.all, &self.filters);
        debug!(
            total = self.all.len(),
            shown = self.filtered.len(),
            "Violation view recomputed"
        );
    }

    /// Every violation, unfiltered.
    #[must_use]
    pub fn all(&self) -> &[ViolationRecord] {
        &self.all
    }

    /// Violations passing the current filters, in fetch order.
    #[must_use]
    pub fn filtered(&self) -> &[ViolationRecord] {
        &self.filtered
    }

    /// The current filter selection.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Distinct lane names in the full set, sorted. Feeds the lane picker.
    #[must_use]
    pub fn unique_lanes(&self) -> Vec<String> {
        let mut lanes: Vec<String> = self.all.iter().map(|v| v.lane.clone()).collect();
        lanes.sort();
        lanes.dedup();
        lanes
    }

    /// `Showing N of M violations`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} violations",
            self.filtered.len(),
            self.all.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SpeedRange;

    fn violation(id: &str, lane: &str, speed: i32) -> ViolationRecord {
        ViolationRecord {
            id: id.to_string(),
            lane: lane.to_string(),
            speed,
            speed_limit: 20,
            observed_date: "2023-03-15".to_string(),
            observed_time: "10:00 AM".to_string(),
            location: lane.to_string(),
            image_url: String::new(),
        }
    }

    fn sample() -> Vec<ViolationRecord> {
        vec![
            violation("1", "Lane 3", 35),
            violation("2", "Lane 1", 22),
            violation("3", "Lane 3", 27),
            violation("4", "Lane 2", 31),
        ]
    }

    #[test]
    fn test_new_shows_everything() {
        let log = ViolationLog::new(sample());
        assert_eq!(log.filtered(), log.all());
        assert_eq!(log.summary(), "Showing 4 of 4 violations");
    }

    #[test]
    fn test_set_filters_keeps_full_set() {
        let mut log = ViolationLog::new(sample());
        log.set_filters(FilterState::new().with_lane("Lane 3"));

        assert_eq!(log.filtered().len(), 2);
        assert_eq!(log.all().len(), 4);
        assert_eq!(log.summary(), "Showing 2 of 4 violations");

        log.set_filters(FilterState::default());
        assert_eq!(log.filtered().len(), 4);
    }

    #[test]
    fn test_replace_all_reapplies_filters() {
        let mut log = ViolationLog::with_filters(
            sample(),
            FilterState::new().with_speed_range(SpeedRange::AtLeast30),
        );
        assert_eq!(log.filtered().len(), 2);

        log.replace_all(vec![violation("9", "Lane 4", 26)]);
        assert!(log.filtered().is_empty());
        assert_eq!(log.filters().speed_range, SpeedRange::AtLeast30);
    }

    #[test]
    fn test_unique_lanes_sorted_and_deduplicated() {
        let log = ViolationLog::new(sample());
        assert_eq!(log.unique_lanes(), vec!["Lane 1", "Lane 2", "Lane 3"]);
    }

    #[test]
    fn test_empty_log() {
        let log = ViolationLog::default();
        assert!(log.unique_lanes().is_empty());
        assert_eq!(log.summary(), "Showing 0 of 0 violations");
    }
}
