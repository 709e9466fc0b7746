//! Network construction error types.

use crate::domain::InvalidStationCode;

/// Errors that can occur while building the network graph.
///
/// Every variant is fatal: a graph is never served partially built.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// A station code did not match `<2 letters><integer>`
    #[error("invalid code format: {0}")]
    InvalidCodeFormat(#[from] InvalidStationCode),

    /// The station list could not be read as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The station list file could not be opened
    #[error("failed to open station list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row is missing one of the code, name or opening date columns
    #[error("row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },
}
