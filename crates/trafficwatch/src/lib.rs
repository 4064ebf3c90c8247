//! `trafficwatch` - Traffic density and speed-violation dashboard client
//!
//! This library fetches lane density readings and speed-violation records
//! from the traffic control backend and turns them into the views the
//! `trafwatch` binary renders: per-lane status, a recent density chart and a
//! filterable violation log.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod poll;
pub mod reports;
pub mod settings;

pub use aggregate::{aggregate, DensitySnapshot};
pub use api::{ApiClient, FetchOrigin, Fetched, TrafficApi};
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{apply_all_filters, FilterState, LaneFilter, SpeedRange, ViolationLog};
pub use logging::init_logging;
pub use model::{ChartPoint, DensityReading, DensityStatus, LaneStatus, ViolationRecord};
pub use poll::{PollHandle, Poller};
pub use settings::Settings;
