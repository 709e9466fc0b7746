//! Route planner using bidirectional BFS.
//!
//! This module answers "how do I get from station A to station B": it
//! searches from both ends at once, prices every hop with the operational
//! rules, and assembles each meeting point into a described route.

mod assemble;
mod search;


pub use assemble::{SuggestedRoute, assemble_routes, describe_hop, station_sequence};
pub use search::{NodeId, Planner, RouteNode, RouteQuery, SearchError, SearchOutcome};
