//! Menu item API routes.
//!
//! Read-only JSON endpoints over [`MenuService`](crate::menu::MenuService).
//! Query values arrive as strings and are validated here, so malformed
//! numbers and ids become `400 Bad Request` rather than being clamped.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::menu::{
    DEFAULT_FEATURED_LIMIT, EnrichedMenuItem, MenuCriteria, MenuItemTranslations, MenuPage,
};
use crate::middleware::RequestLocale;
use crate::state::AppState;

use super::parse_uuid;

/// Create the menu router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/menu", get(list_menu))
        .route("/api/menu/count", get(count_menu))
        .route("/api/menu/featured", get(featured_menu))
        .route("/api/menu/{id}", get(get_menu_item))
        .route("/api/menu/{id}/translations", get(get_menu_item_translations))
}

// -------------------------------------------------------------------------
// Request types
// -------------------------------------------------------------------------

/// Raw listing parameters.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub available: Option<String>,
    pub tags: Option<String>,
    pub exclude: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl MenuQuery {
    /// Validate the parameters into listing criteria.
    pub fn into_criteria(self) -> AppResult<MenuCriteria> {
        let mut criteria = MenuCriteria::new();

        if let Some(category) = non_empty(self.category.as_deref()) {
            criteria = criteria.in_category(parse_uuid("category", category)?);
        }

        if parse_flag("available", self.available.as_deref())? {
            criteria = criteria.available_only();
        }

        criteria = criteria
            .with_tags(parse_uuid_list("tags", self.tags.as_deref())?)
            .without_tags(parse_uuid_list("exclude", self.exclude.as_deref())?);

        if let Some(search) = non_empty(self.search.as_deref()) {
            criteria = criteria.search(search);
        }

        criteria.limit = parse_count("limit", self.limit.as_deref())?;
        criteria.offset = parse_count("offset", self.offset.as_deref())?.unwrap_or(0);

        Ok(criteria)
    }
}

#[derive(Debug, Deserialize)]
struct FeaturedQuery {
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct CountResponse {
    total: usize,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_uuid_list(name: &str, value: Option<&str>) -> AppResult<Vec<Uuid>> {
    let Some(value) = non_empty(value) else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_uuid(name, s))
        .collect()
}

fn parse_flag(name: &str, value: Option<&str>) -> AppResult<bool> {
    match non_empty(value).map(str::to_ascii_lowercase).as_deref() {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(_) => Err(AppError::BadRequest(format!("{name} must be true or false"))),
    }
}

fn parse_count(name: &str, value: Option<&str>) -> AppResult<Option<usize>> {
    non_empty(value)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                AppError::BadRequest(format!("{name} must be a non-negative integer"))
            })
        })
        .transpose()
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

async fn list_menu(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<MenuPage>> {
    let criteria = query.into_criteria()?;
    let page = state.menu().list_menu_page(locale, &criteria).await?;
    Ok(Json(page))
}

async fn count_menu(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<CountResponse>> {
    let criteria = query.into_criteria()?;
    let total = state.menu().count_menu_items(locale, &criteria).await?;
    Ok(Json(CountResponse { total }))
}

async fn featured_menu(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<FeaturedQuery>,
) -> AppResult<Json<Vec<EnrichedMenuItem>>> {
    let limit = parse_count("limit", query.limit.as_deref())?.unwrap_or(DEFAULT_FEATURED_LIMIT);
    let items = state.menu().featured_menu_items(locale, limit).await?;
    Ok(Json(items))
}

async fn get_menu_item(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> AppResult<Json<EnrichedMenuItem>> {
    let id = parse_uuid("id", &id)?;
    let item = state
        .menu()
        .get_menu_item_by_id(id, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(item))
}

async fn get_menu_item_translations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItemTranslations>> {
    let id = parse_uuid("id", &id)?;
    let item = state
        .menu()
        .get_menu_item_translations(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(item))
}
