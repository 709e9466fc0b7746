//! Domain types for the route planner.
//!
//! Station codes and query times are validated at construction, so code
//! that receives these types can trust their validity.

mod station;
mod time;

pub use station::{InvalidStationCode, LineId, StationCode};
pub use time::{QUERY_TIME_FORMAT, QueryTime, TimeError, TimeWindow, is_weekday_name, weekday_name};
