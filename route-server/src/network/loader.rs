//! Station list loading.
//!
//! The station list is a CSV file with a header row followed by
//! `code,name,opening date` rows. Columns are read by position so the header
//! wording does not matter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::error::NetworkError;
use super::graph::{NetworkGraph, StationRecord};

/// Read station records from CSV, skipping the header row.
pub fn read_station_records<R: Read>(reader: R) -> Result<Vec<StationRecord>, NetworkError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        // +2: one for the header, one for 1-based numbering
        records.push(to_record(&row, idx + 2)?);
    }
    Ok(records)
}

/// Load the station list at `path` and build the network graph.
pub fn load_network(path: impl AsRef<Path>) -> Result<NetworkGraph, NetworkError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| NetworkError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records = read_station_records(file)?;
    debug!(path = %path.display(), rows = records.len(), "read station list");

    NetworkGraph::from_records(records)
}

fn to_record(row: &StringRecord, row_number: usize) -> Result<StationRecord, NetworkError> {
    let field = |idx: usize, name: &'static str| {
        row.get(idx)
            .filter(|value| !value.is_empty())
            .ok_or(NetworkError::MissingField {
                row: row_number,
                field: name,
            })
    };

    Ok(StationRecord::new(
        field(0, "code")?,
        field(1, "name")?,
        field(2, "opening date")?,
    ))
}
