//! HTTP route handlers.

use axum::Router;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub mod category;
pub mod health;
pub mod menu;

/// Every API route, without middleware layers.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(category::router())
}

/// Parse a UUID from a path segment or query value.
pub(crate) fn parse_uuid(name: &str, value: &str) -> AppResult<Uuid> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be a UUID")))
}
