//! Client-side filtering of violation records.
//!
//! The backend returns every violation; narrowing happens here:
//!
//! - **Date**: exact string match on the record's calendar date.
//! - **Speed band**: inclusive bands `20-25`, `25-30` and `30+`.
//! - **Lane**: exact lane name.
//!
//! Criteria combine conjunctively and an absent criterion keeps everything.
//!
//! # Example
//!
//! ```
//! use trafficwatch::filter::{apply_all_filters, FilterState, SpeedRange};
//!
//! let state = FilterState::new()
//!     .with_lane("Lane 2")
//!     .with_speed_range(SpeedRange::AtLeast30);
//!
//! let shown = apply_all_filters(&[], &state);
//! assert!(shown.is_empty());
//! ```

mod engine;
mod state;
mod view;

pub use engine::{apply_all_filters, filter_by_date, filter_by_lane, filter_by_speed_range};
pub use state::{FilterState, LaneFilter, SpeedRange};
pub use view::ViolationLog;
