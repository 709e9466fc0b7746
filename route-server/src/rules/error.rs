//! Rule configuration error types.

use crate::domain::TimeError;

/// Errors from loading or evaluating operational rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Neither a line-specific nor a default rule applies
    #[error("missing train line config for line {line}")]
    MissingLineConfig { line: String },

    /// A configured window string could not be parsed
    #[error(transparent)]
    InvalidTimeWindow(#[from] TimeError),

    /// The rule table is not valid JSON
    #[error("rule table JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rule table file could not be read
    #[error("failed to read rule table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
