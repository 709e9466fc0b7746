//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::SuggestedRoute;

/// Query string for a route search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Source station display name
    #[serde(default)]
    pub source: String,

    /// Destination station display name
    #[serde(default)]
    pub destination: String,

    /// Travel time as `YYYY-MM-DDThh:mm`; empty means none
    pub start_time: Option<String>,
}

impl RouteRequest {
    /// The start time, if one was given.
    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref().filter(|s| !s.is_empty())
    }
}

/// Response to a route search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub source: String,
    pub destination: String,
    pub suggested_routes: Vec<SuggestedRouteResult>,
}

/// One candidate route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedRouteResult {
    /// Same-line hops travelled
    pub stations_travelled: u32,

    /// Station codes from source to destination
    pub route: Vec<String>,

    /// Step-by-step instructions
    pub verbose_route: Vec<String>,

    /// Zero when no start time was given
    pub estimated_time_in_minutes: u32,

    /// Best among the suggestions
    pub shortest_route: bool,
}

impl From<SuggestedRoute> for SuggestedRouteResult {
    fn from(route: SuggestedRoute) -> Self {
        Self {
            stations_travelled: route.stops,
            route: route.stations,
            verbose_route: route.descriptions,
            estimated_time_in_minutes: route.minutes,
            shortest_route: route.best,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    pub message: String,
}
