//! Bidirectional BFS route search.
//!
//! Two frontiers grow in lockstep, one hop per round: forward from every
//! station carrying the source name, backward from every station carrying
//! the destination name. A station reached by both directions is a meeting
//! point and yields one candidate route. Each frontier keeps the first node
//! that reached a station; later arrivals are dropped.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::QueryTime;
use crate::network::{NetworkGraph, StationId};
use crate::rules::{OperationalRules, RulesError};

use super::assemble::{SuggestedRoute, assemble_routes};

/// Error from route search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No station carries this name
    #[error("unknown station {name:?}")]
    UnknownStation { name: String },

    /// A hop could not be priced
    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl SearchError {
    /// Returns true if the caller sent a bad query, rather than the
    /// service being misconfigured.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::UnknownStation { .. })
    }
}

/// A validated route query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    /// Display name of the origin station.
    pub source: String,

    /// Display name of the destination station.
    pub destination: String,

    /// Travel time. Without it routes are compared by stop count only.
    pub at: Option<QueryTime>,
}

impl RouteQuery {
    /// Create a new route query.
    pub fn new(source: &str, destination: &str, at: Option<QueryTime>) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            at,
        }
    }
}

/// Index of a node in a search's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One station reached during a search.
///
/// `back` leads toward the source, `forward` toward the destination. A
/// forward-frontier node only has `back` set until it completes a route,
/// and the reverse for the backward frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteNode {
    pub station: StationId,
    pub back: Option<NodeId>,
    pub forward: Option<NodeId>,
    /// Same-line hops accumulated so far.
    pub stops: u32,
    /// Estimated minutes accumulated so far.
    pub minutes: u32,
    /// The hop into this node runs on a closed line.
    pub closed: bool,
}

impl RouteNode {
    fn seed(station: StationId) -> Self {
        Self {
            station,
            back: None,
            forward: None,
            stops: 0,
            minutes: 0,
            closed: false,
        }
    }
}

/// Completed routes of one search, keyed by meeting station.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    nodes: Vec<RouteNode>,
    completed: BTreeMap<StationId, NodeId>,
}

impl SearchOutcome {
    /// Number of candidate routes.
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Returns true if no route was found.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// Meeting stations and their completed nodes, in station order.
    pub fn meetings(&self) -> impl Iterator<Item = (StationId, &RouteNode)> + '_ {
        self.completed
            .iter()
            .map(|(&station, &node)| (station, self.node(node)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Default)]
struct Frontier {
    /// First node to reach each station.
    visited: HashMap<StationId, NodeId>,
    /// Nodes to process next round.
    pending: Vec<NodeId>,
}

/// Per-query search state. Never shared between queries.
#[derive(Debug, Default)]
struct SearchState {
    nodes: Vec<RouteNode>,
    forward: Frontier,
    backward: Frontier,
    completed: BTreeMap<StationId, NodeId>,
}

impl SearchState {
    fn seed(&mut self, direction: Direction, stations: &[StationId]) {
        let frontier = match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        };
        for &station in stations {
            if frontier.visited.contains_key(&station) {
                continue;
            }
            let id = NodeId(self.nodes.len());
            self.nodes.push(RouteNode::seed(station));
            frontier.visited.insert(station, id);
            frontier.pending.push(id);
        }
    }

    fn is_exhausted(&self) -> bool {
        self.forward.pending.is_empty() && self.backward.pending.is_empty()
    }
}

/// Route planner over a shared network and rule table.
pub struct Planner<'a> {
    graph: &'a NetworkGraph,
    rules: &'a OperationalRules,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a NetworkGraph, rules: &'a OperationalRules) -> Self {
        Self { graph, rules }
    }

    /// Search for routes and assemble them for presentation.
    pub fn plan(&self, query: &RouteQuery) -> Result<Vec<SuggestedRoute>, SearchError> {
        let outcome = self.search(query)?;
        Ok(assemble_routes(self.graph, &outcome, query))
    }

    /// Run the bidirectional search.
    ///
    /// Fails before searching if either name is unknown. An empty outcome
    /// means every path is blocked by closures or none exists.
    pub fn search(&self, query: &RouteQuery) -> Result<SearchOutcome, SearchError> {
        let sources = self.resolve(&query.source)?;
        let destinations = self.resolve(&query.destination)?;
        let at = query.at.as_ref();

        let mut state = SearchState::default();
        state.seed(Direction::Forward, sources);
        state.seed(Direction::Backward, destinations);

        let mut round = 0;
        while !state.is_exhausted() {
            round += 1;
            self.advance(&mut state, Direction::Forward, at)?;
            self.advance(&mut state, Direction::Backward, at)?;

            debug!(
                round,
                forward = state.forward.pending.len(),
                backward = state.backward.pending.len(),
                routes = state.completed.len(),
                "search round complete"
            );
        }

        debug!(
            source = %query.source,
            destination = %query.destination,
            routes = state.completed.len(),
            nodes = state.nodes.len(),
            "search finished"
        );

        Ok(SearchOutcome {
            nodes: state.nodes,
            completed: state.completed,
        })
    }

    fn resolve(&self, name: &str) -> Result<&'a [StationId], SearchError> {
        let stations = self.graph.stations_named(name);
        if stations.is_empty() {
            return Err(SearchError::UnknownStation {
                name: name.to_string(),
            });
        }
        Ok(stations)
    }

    /// Process one direction's pending nodes: complete routes where the
    /// opposite frontier was already reached, otherwise expand one hop.
    fn advance(
        &self,
        state: &mut SearchState,
        direction: Direction,
        at: Option<&QueryTime>,
    ) -> Result<(), SearchError> {
        let SearchState {
            nodes,
            forward,
            backward,
            completed,
        } = state;
        let (own, other) = match direction {
            Direction::Forward => (forward, &*backward),
            Direction::Backward => (backward, &*forward),
        };

        for id in std::mem::take(&mut own.pending) {
            let node = nodes[id.0];
            if node.closed {
                continue;
            }

            // A station the other side already reached is never expanded here
            if let Some(&meeting) = other.visited.get(&node.station) {
                if !completed.contains_key(&node.station) && !nodes[meeting.0].closed {
                    splice(nodes, direction, id, meeting);
                    completed.insert(node.station, id);
                    debug!(
                        station = %self.graph.station(node.station).code(),
                        ?direction,
                        "frontiers met"
                    );
                }
                continue;
            }

            let line = self.graph.station(node.station).line();
            for (neighbor, hop) in self.graph.neighbors(node.station) {
                if own.visited.contains_key(&neighbor) {
                    continue;
                }

                let cost = self.rules.estimate(line, hop, at)?;
                let (back, forward) = match direction {
                    Direction::Forward => (Some(id), None),
                    Direction::Backward => (None, Some(id)),
                };

                let child = NodeId(nodes.len());
                nodes.push(RouteNode {
                    station: neighbor,
                    back,
                    forward,
                    stops: node.stops + hop.stops(),
                    minutes: node.minutes + cost.minutes,
                    closed: cost.closed,
                });
                own.visited.insert(neighbor, child);
                own.pending.push(child);
            }
        }

        Ok(())
    }
}

/// Join the half-route ending at `arriving` with the opposite half at
/// `meeting`; both sit on the same station.
fn splice(nodes: &mut [RouteNode], direction: Direction, arriving: NodeId, meeting: NodeId) {
    let other = nodes[meeting.0];
    let node = &mut nodes[arriving.0];

    node.stops += other.stops;
    node.minutes += other.minutes;
    match direction {
        Direction::Forward => node.forward = other.forward,
        Direction::Backward => node.back = other.back,
    }
}
