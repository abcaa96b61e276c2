#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! This module provides test infrastructure that uses the REAL kernel code.
//! Most tests run over an in-memory store: fixtures from `omakase-test-utils`
//! are turned into store rows here, so every test exercises the actual
//! services and routes.
//!
//! ## PostgreSQL
//!
//! [`test_db`] connects to `DATABASE_URL` once, applies migrations and
//! truncates every menu table before handing out the pool. Point it at a
//! disposable database. When `DATABASE_URL` is unset the database tests
//! return early.
//!
//! The pool lives on [`SHARED_RT`], a runtime that outlives every test, and
//! database tests run on it via [`run_test`] so connections are never reused
//! across runtimes.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use omakase_kernel::db;
use omakase_kernel::menu::{CatalogService, MemoryStore, MenuService, MenuStore, PgMenuStore};
use omakase_kernel::seed::{self, SeedFile};
use omakase_kernel::models::{Category, Locale, MenuItem, Tag, TagKind, TranslationKind};
use omakase_kernel::routes;
use omakase_kernel::state::AppState;
use omakase_test_utils::{TestCategory, TestMenuItem, TestTag, TestTranslation};

/// A menu backed by [`MemoryStore`], filled from test fixtures.
pub struct TestMenu {
    pub store: Arc<MemoryStore>,
}

impl Default for TestMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMenu {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Add a category and its translations.
    pub fn category(&self, category: &TestCategory) -> &Self {
        self.store.put_category(Category {
            id: category.id,
            slug: category.slug.clone(),
            image_url: category.image_url.clone(),
            created_at: category.created_at,
            updated_at: category.created_at,
        });
        self.translations(TranslationKind::Category, category.id, &category.translations);
        self
    }

    /// Add a tag and its translations.
    pub fn tag(&self, tag: &TestTag) -> &Self {
        self.store.put_tag(Tag {
            id: tag.id,
            slug: tag.slug.clone(),
            icon: tag.icon.clone(),
            color: tag.color.clone(),
            kind: TagKind::from_str(&tag.kind).expect("valid tag kind"),
            created_at: tag.created_at,
            updated_at: tag.created_at,
        });
        self.translations(TranslationKind::Tag, tag.id, &tag.translations);
        self
    }

    /// Add an item, its tag links and its translations.
    pub fn item(&self, item: &TestMenuItem) -> &Self {
        self.store.put_item(MenuItem {
            id: item.id,
            slug: item.slug.clone(),
            price: Decimal::from_str(&item.price).expect("valid price"),
            price_eur: item
                .price_eur
                .as_deref()
                .map(|p| Decimal::from_str(p).expect("valid EUR price")),
            pieces: item.pieces,
            image_url: item.image_url.clone(),
            category_id: item.category_id,
            available: item.available,
            created_at: item.created_at,
            updated_at: item.created_at,
        });
        for tag_id in &item.tag_ids {
            self.store.link(item.id, *tag_id);
        }
        self.translations(TranslationKind::MenuItem, item.id, &item.translations);
        self
    }

    fn translations(
        &self,
        kind: TranslationKind,
        owner_id: uuid::Uuid,
        translations: &[TestTranslation],
    ) {
        for t in translations {
            let locale = Locale::from_str(t.locale).expect("supported locale");
            self.store
                .put_translation(kind, owner_id, locale, &t.name, t.description.as_deref());
        }
    }

    fn dyn_store(&self) -> Arc<dyn MenuStore> {
        self.store.clone()
    }

    /// A menu service over this store.
    pub fn service(&self) -> MenuService {
        MenuService::new(self.dyn_store())
    }

    /// A catalog service over this store.
    pub fn catalog(&self, ttl: Duration) -> CatalogService {
        CatalogService::new(self.dyn_store(), ttl)
    }

    /// Application state with caching disabled.
    pub fn state(&self, default_locale: Locale) -> AppState {
        AppState::with_store(self.dyn_store(), default_locale, Duration::ZERO)
    }

    /// The full API router over this store.
    pub fn router(&self) -> Router {
        routes::router().with_state(self.state(Locale::Bg))
    }
}

/// Send a request through a router.
pub async fn request(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request")
}

/// GET `uri` and return status plus parsed JSON body.
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = request(router, Request::get(uri).body(Body::empty()).unwrap()).await;
    let status = response.status();
    (status, response_json(response).await)
}

/// Parse a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

/// Names of items in a JSON array, in order.
pub fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("JSON array")
        .iter()
        .map(|i| i["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

// -------------------------------------------------------------------------
// PostgreSQL
// -------------------------------------------------------------------------

/// Shared Tokio runtime that outlives all individual test runtimes.
pub static SHARED_RT: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build shared test runtime")
});

/// Pool shared by every database test; `None` without `DATABASE_URL`.
static SHARED_POOL: OnceLock<Option<PgPool>> = OnceLock::new();

/// Database tests truncate shared tables, so they run one at a time.
static DB_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Run an async test body on [`SHARED_RT`].
pub fn run_test<F: std::future::Future<Output = ()> + Send>(f: F) {
    SHARED_RT.block_on(f);
}

async fn connect() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to DATABASE_URL");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// An empty, migrated database held exclusively by one test.
pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Get exclusive access to an empty menu database.
pub async fn test_db() -> Option<TestDb> {
    let pool = SHARED_POOL
        .get_or_init(|| {
            let handle = SHARED_RT.handle().clone();
            std::thread::spawn(move || handle.block_on(connect()))
                .join()
                .expect("Database init thread panicked")
        })
        .clone()?;

    let guard = DB_LOCK.lock().await;
    seed::apply(&pool, &SeedFile::default(), true)
        .await
        .expect("Failed to clear menu tables");

    Some(TestDb {
        pool,
        _guard: guard,
    })
}

impl TestDb {
    fn store(&self) -> Arc<dyn MenuStore> {
        Arc::new(PgMenuStore::new(self.pool.clone()))
    }

    /// A menu service over this database.
    pub fn service(&self) -> MenuService {
        MenuService::new(self.store())
    }

    /// An uncached catalog service over this database.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.store(), Duration::ZERO)
    }

    /// Row count of a menu table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}
