//! Views assembled from fetched data.
//!
//! Home: density readings through the aggregator. Violation log: raw
//! violations through the mapper, then the filter engine.

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{aggregate, DensitySnapshot};
use crate::api::{Fetched, TrafficApi};
use crate::error::Result;
use crate::filter::{FilterState, ViolationLog};
use crate::mapper::map_violation_for_display;
use crate::poll::{PollStats, Poller};
use crate::reports::{ReportPoint, TimeFrame};

/// Fetch density readings and aggregate them for the home view.
pub async fn load_home<A>(api: &A) -> Fetched<DensitySnapshot>
where
    A: TrafficApi + ?Sized,
{
    let fetched = api.fetch_density_readings().await;
    if fetched.is_fallback() {
        warn!("Home view is showing fallback density data");
    }
    fetched.map(|readings| aggregate(&readings))
}

/// Fetch, map and filter violations for the violation log.
pub async fn load_violation_log<A>(api: &A, filters: FilterState) -> Fetched<ViolationLog>
where
    A: TrafficApi + ?Sized,
{
    let fetched = api.fetch_violations().await;
    if fetched.is_fallback() {
        warn!("Violation log is showing fallback records");
    }
    fetched.map(|raw| {
        let mapped = raw.into_iter().map(map_violation_for_display).collect();
        let log = ViolationLog::with_filters(mapped, filters);
        debug!(summary = %log.summary(), "Violation log loaded");
        log
    })
}

/// Fetch the report for a period.
pub async fn load_report<A>(api: &A, time_frame: TimeFrame) -> Fetched<Vec<ReportPoint>>
where
    A: TrafficApi + ?Sized,
{
    api.fetch_report(time_frame).await
}

/// Refresh the home view on the poller's interval until it is cancelled.
/// `render` receives every fresh snapshot.
pub async fn watch_home<A, R>(api: &A, poller: Poller, render: R) -> PollStats
where
    A: TrafficApi + ?Sized,
    R: FnMut(Fetched<DensitySnapshot>),
{
    poller.run(|| load_home(api), render).await
}

/// Render any view as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if the value cannot be serialized.
pub fn to_json<T: Serialize + ?Sized>(view: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}
