//! Category and tag API routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::menu::{LocalizedCategory, LocalizedTag};
use crate::middleware::RequestLocale;
use crate::state::AppState;

use super::parse_uuid;

/// Create the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/{id}", get(get_tag))
}

async fn list_categories(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<Vec<LocalizedCategory>>> {
    let categories = state.catalog().list_categories(locale).await?;
    Ok(Json(categories.as_ref().clone()))
}

async fn get_category(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> AppResult<Json<LocalizedCategory>> {
    let id = parse_uuid("id", &id)?;
    let category = state
        .catalog()
        .get_category(id, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(category))
}

async fn list_tags(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<Vec<LocalizedTag>>> {
    let tags = state.catalog().list_tags(locale).await?;
    Ok(Json(tags.as_ref().clone()))
}

async fn get_tag(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> AppResult<Json<LocalizedTag>> {
    let id = parse_uuid("id", &id)?;
    let tag = state
        .catalog()
        .get_tag(id, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}
