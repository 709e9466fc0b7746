//! Rail network graph.
//!
//! Stations are held in an arena and addressed by [`StationId`]. Same-line
//! ordering and transfer relationships are stored as indices, so the built
//! graph is immutable and can be shared across threads without locking.

mod error;
mod graph;
mod loader;

pub use error::NetworkError;
pub use graph::{HopKind, NetworkBuilder, NetworkGraph, Station, StationId, StationRecord};
pub use loader::{load_network, read_station_records};
