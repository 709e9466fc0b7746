//! Application state for the web layer.

use std::sync::Arc;

use crate::network::NetworkGraph;
use crate::rules::OperationalRules;

/// Shared application state.
///
/// Both members are read-only after startup; each request builds its own
/// search state.
#[derive(Clone)]
pub struct AppState {
    /// Station network
    pub graph: Arc<NetworkGraph>,

    /// Operational rule table
    pub rules: Arc<OperationalRules>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: NetworkGraph, rules: OperationalRules) -> Self {
        Self {
            graph: Arc::new(graph),
            rules: Arc::new(rules),
        }
    }
}
