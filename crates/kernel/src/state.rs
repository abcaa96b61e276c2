//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::menu::{CatalogService, MenuService, MenuStore, PgMenuStore};
use crate::models::Locale;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Storage backend shared by the services.
    store: Arc<dyn MenuStore>,

    /// Menu item queries.
    menu: MenuService,

    /// Cached category and tag listings.
    catalog: CatalogService,

    /// Locale used when negotiation finds nothing supported.
    default_locale: Locale,
}

impl AppState {
    /// Connect to PostgreSQL and build the services on top of it.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;
        info!("Connected to PostgreSQL");

        let store: Arc<dyn MenuStore> = Arc::new(PgMenuStore::new(pool));
        Ok(Self::with_store(
            store,
            config.default_locale,
            config.catalog_cache_ttl,
        ))
    }

    /// Build state over an existing store.
    pub fn with_store(
        store: Arc<dyn MenuStore>,
        default_locale: Locale,
        catalog_cache_ttl: Duration,
    ) -> Self {
        let menu = MenuService::new(Arc::clone(&store));
        let catalog = CatalogService::new(Arc::clone(&store), catalog_cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                store,
                menu,
                catalog,
                default_locale,
            }),
        }
    }

    /// Get the menu store.
    pub fn store(&self) -> &Arc<dyn MenuStore> {
        &self.inner.store
    }

    /// Get the menu query service.
    pub fn menu(&self) -> &MenuService {
        &self.inner.menu
    }

    /// Get the catalog service.
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get the fallback locale.
    pub fn default_locale(&self) -> Locale {
        self.inner.default_locale
    }

    /// Check if the store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.ping().await
    }
}
