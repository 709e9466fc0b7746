//! Station arena and graph construction.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use tracing::{info, warn};

use crate::domain::{LineId, StationCode};

use super::error::NetworkError;

/// Stable index of a station in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(usize);

impl StationId {
    /// Position of the station in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One row of the station list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRecord {
    pub code: String,
    pub name: String,
    pub opening_date: String,
}

impl StationRecord {
    /// Create a record from its columns.
    pub fn new(code: &str, name: &str, opening_date: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            opening_date: opening_date.to_string(),
        }
    }
}

/// Kind of move between two adjacent stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopKind {
    /// Ride to the neighbouring station on the same line.
    SameLine,
    /// Change lines at an interchange.
    Transfer,
}

impl HopKind {
    /// Classify a hop by comparing the lines at either end.
    pub fn between(from: LineId, to: LineId) -> Self {
        if from == to {
            HopKind::SameLine
        } else {
            HopKind::Transfer
        }
    }

    /// Stops this hop adds to a route: one per same-line ride, none per transfer.
    pub fn stops(self) -> u32 {
        match self {
            HopKind::SameLine => 1,
            HopKind::Transfer => 0,
        }
    }
}

/// A station in the network.
#[derive(Debug, Clone)]
pub struct Station {
    code: StationCode,
    name: String,
    opening_date: String,
    prev: Option<StationId>,
    next: Option<StationId>,
    transfers: Vec<StationId>,
}

impl Station {
    pub fn code(&self) -> &StationCode {
        &self.code
    }

    pub fn line(&self) -> LineId {
        self.code.line()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opening date exactly as listed. Not used for routing.
    pub fn opening_date(&self) -> &str {
        &self.opening_date
    }

    /// Preceding station on the same line, if any.
    pub fn prev(&self) -> Option<StationId> {
        self.prev
    }

    /// Following station on the same line, if any.
    pub fn next(&self) -> Option<StationId> {
        self.next
    }

    /// Stations on other lines sharing this station's name.
    pub fn transfers(&self) -> &[StationId] {
        &self.transfers
    }
}

/// Immutable rail network.
///
/// Built once at startup through [`NetworkBuilder`] and shared read-only by
/// every query.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    stations: Vec<Station>,
    by_code: HashMap<String, StationId>,
    by_name: HashMap<String, Vec<StationId>>,
    lines: BTreeMap<LineId, BTreeMap<u32, StationId>>,
}

impl NetworkGraph {
    /// Build a graph from station records in any order.
    pub fn from_records<I>(records: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = StationRecord>,
    {
        let mut builder = NetworkBuilder::new();
        for record in records {
            builder.insert(record)?;
        }
        Ok(builder.build())
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the network has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Look up a station by id.
    ///
    /// Ids are only ever handed out by this graph, so indexing cannot fail
    /// for ids obtained from it.
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.0]
    }

    /// Find a station by its exact code.
    pub fn find_code(&self, code: &str) -> Option<StationId> {
        self.by_code.get(code).copied()
    }

    /// All stations with the given display name, in insertion order.
    pub fn stations_named(&self, name: &str) -> &[StationId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if any station has the given display name.
    pub fn has_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Stations of one line in sequence order.
    pub fn line(&self, line: LineId) -> impl Iterator<Item = StationId> + '_ {
        self.lines
            .get(&line)
            .into_iter()
            .flat_map(|ordered| ordered.values().copied())
    }

    /// Adjacent stations in expansion order: same-line successor, same-line
    /// predecessor, then each transfer peer.
    pub fn neighbors(&self, id: StationId) -> impl Iterator<Item = (StationId, HopKind)> + '_ {
        let station = self.station(id);
        let line = station.line();
        station
            .next
            .into_iter()
            .chain(station.prev)
            .chain(station.transfers.iter().copied())
            .map(move |n| (n, HopKind::between(line, self.station(n).line())))
    }

    /// How two stations are connected, if they are adjacent at all.
    pub fn hop_between(&self, from: StationId, to: StationId) -> Option<HopKind> {
        self.neighbors(from)
            .find(|(n, _)| *n == to)
            .map(|(_, kind)| kind)
    }
}

/// Incremental graph builder.
///
/// Records may arrive in any order; each insert splices the new station
/// between its nearest lower and higher sequence neighbours on its line and
/// links it to every earlier station with the same name.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    graph: NetworkGraph,
}

impl NetworkBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one station.
    ///
    /// Returns `Ok(None)` when a station with the same code (or the same
    /// line and sequence number) was already inserted; the first row wins.
    pub fn insert(&mut self, record: StationRecord) -> Result<Option<StationId>, NetworkError> {
        let code = StationCode::parse(record.code.trim())?;
        let graph = &mut self.graph;

        if graph.by_code.contains_key(code.as_str()) {
            warn!(code = %code, "duplicate station code, keeping first row");
            return Ok(None);
        }

        let ordered = graph.lines.entry(code.line()).or_default();
        if let Some(existing) = ordered.get(&code.sequence()) {
            warn!(
                code = %code,
                existing = %graph.stations[existing.0].code,
                "station sequence already taken on line, keeping first row"
            );
            return Ok(None);
        }

        let id = StationId(graph.stations.len());
        let prev = ordered
            .range(..code.sequence())
            .next_back()
            .map(|(_, &s)| s);
        let next = ordered
            .range((Bound::Excluded(code.sequence()), Bound::Unbounded))
            .next()
            .map(|(_, &s)| s);
        ordered.insert(code.sequence(), id);

        if let Some(p) = prev {
            graph.stations[p.0].next = Some(id);
        }
        if let Some(n) = next {
            graph.stations[n.0].prev = Some(id);
        }

        let peers = graph.by_name.entry(record.name.clone()).or_default();
        for &peer in peers.iter() {
            graph.stations[peer.0].transfers.push(id);
        }
        let transfers = peers.clone();
        peers.push(id);

        graph.by_code.insert(code.as_str().to_string(), id);
        graph.stations.push(Station {
            code,
            name: record.name,
            opening_date: record.opening_date,
            prev,
            next,
            transfers,
        });

        Ok(Some(id))
    }

    /// Finish building.
    pub fn build(self) -> NetworkGraph {
        let graph = self.graph;
        let interchanges = graph.by_name.values().filter(|ids| ids.len() > 1).count();
        info!(
            stations = graph.len(),
            lines = graph.line_count(),
            interchanges,
            "network graph built"
        );
        graph
    }
}
