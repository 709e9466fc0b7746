//! Route reconstruction and description.

use crate::network::{HopKind, NetworkGraph, StationId};

use super::search::{RouteNode, RouteQuery, SearchOutcome};

/// A candidate route ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedRoute {
    /// Code of the station where the two search directions met.
    pub meeting_station: String,

    /// Station codes from source to destination.
    pub stations: Vec<String>,

    /// One human-readable step per consecutive station pair.
    pub descriptions: Vec<String>,

    /// Same-line hops travelled.
    pub stops: u32,

    /// Estimated travel time; zero when the query had no time.
    pub minutes: u32,

    /// Best among the candidates: fewest stops without a query time,
    /// fewest minutes with one. Ties are all marked.
    pub best: bool,
}

/// Turn every completed route into a [`SuggestedRoute`] and mark the best.
pub fn assemble_routes(
    graph: &NetworkGraph,
    outcome: &SearchOutcome,
    query: &RouteQuery,
) -> Vec<SuggestedRoute> {
    let mut routes: Vec<SuggestedRoute> = outcome
        .meetings()
        .map(|(meeting, node)| {
            let path = station_sequence(outcome, node);
            SuggestedRoute {
                meeting_station: graph.station(meeting).code().to_string(),
                stations: path
                    .iter()
                    .map(|&s| graph.station(s).code().to_string())
                    .collect(),
                descriptions: path
                    .windows(2)
                    .map(|pair| describe_hop(graph, pair[0], pair[1]))
                    .collect(),
                stops: node.stops,
                minutes: node.minutes,
                best: false,
            }
        })
        .collect();

    let min_stops = routes.iter().map(|r| r.stops).min();
    let min_minutes = routes.iter().map(|r| r.minutes).min();

    for route in &mut routes {
        route.best = match query.at {
            None => Some(route.stops) == min_stops,
            Some(_) => Some(route.minutes) == min_minutes,
        };
    }

    routes
}

/// Full station sequence through a completed node: back-links to the
/// source, reversed, then forward-links to the destination.
pub fn station_sequence(outcome: &SearchOutcome, node: &RouteNode) -> Vec<StationId> {
    let mut path = vec![node.station];

    let mut cursor = node.back;
    while let Some(id) = cursor {
        let prev = outcome.node(id);
        path.push(prev.station);
        cursor = prev.back;
    }
    path.reverse();

    let mut cursor = node.forward;
    while let Some(id) = cursor {
        let next = outcome.node(id);
        path.push(next.station);
        cursor = next.forward;
    }

    path
}

/// Describe moving between two adjacent stations.
pub fn describe_hop(graph: &NetworkGraph, from: StationId, to: StationId) -> String {
    let from = graph.station(from);
    let to = graph.station(to);

    match HopKind::between(from.line(), to.line()) {
        HopKind::SameLine => format!(
            "traveling on line {} from {} to {}",
            from.line(),
            from.name(),
            to.name()
        ),
        HopKind::Transfer => format!("transfer from line {} to line {}", from.line(), to.line()),
    }
}
