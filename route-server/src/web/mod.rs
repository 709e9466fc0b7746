//! Web layer for the route server.
//!
//! Provides HTTP endpoints for health checks and route suggestions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
