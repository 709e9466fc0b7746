//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, info, warn};

use crate::domain::QueryTime;
use crate::planner::{Planner, RouteQuery, SearchError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(get_routes))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Suggest routes between two stations.
async fn get_routes(
    State(state): State<AppState>,
    query: Result<Query<RouteRequest>, QueryRejection>,
) -> Result<Json<RoutesResponse>, AppError> {
    let Query(req) = query.map_err(|rejection| AppError::BadRequest {
        message: rejection.body_text(),
    })?;

    let at = req
        .start_time()
        .map(QueryTime::parse)
        .transpose()
        .map_err(|_| AppError::BadRequest {
            message: "invalid start time".to_string(),
        })?;

    if !state.graph.has_name(&req.source) {
        return Err(AppError::BadRequest {
            message: "invalid source station".to_string(),
        });
    }
    if !state.graph.has_name(&req.destination) {
        return Err(AppError::BadRequest {
            message: "invalid destination station".to_string(),
        });
    }

    // Each search runs on the blocking pool with its own state
    let query = RouteQuery::new(&req.source, &req.destination, at);
    let (query, routes) = tokio::task::spawn_blocking(move || {
        let routes = Planner::new(&state.graph, &state.rules).plan(&query);
        (query, routes)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })?;
    let routes = routes?;

    info!(
        source = %query.source,
        destination = %query.destination,
        start_time = req.start_time().unwrap_or("-"),
        routes = routes.len(),
        "planned routes"
    );

    Ok(Json(RoutesResponse {
        source: query.source,
        destination: query.destination,
        suggested_routes: routes.into_iter().map(SuggestedRouteResult::from).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        if e.is_client_error() {
            AppError::BadRequest {
                message: e.to_string(),
            }
        } else {
            AppError::Internal {
                message: e.to_string(),
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}
