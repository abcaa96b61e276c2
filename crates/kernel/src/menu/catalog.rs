//! Category and tag listings with a short-lived per-locale cache.
//!
//! Categories and tags change rarely and are read on every menu page, so the
//! localized lists are kept in a Moka cache keyed by locale. A zero TTL
//! disables caching.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use super::resolver::TranslationIndex;
use super::store::MenuStore;
use super::types::{LocalizedCategory, LocalizedTag};
use crate::models::{Locale, TranslationKind};

/// One entry per supported locale.
const MAX_CAPACITY: u64 = 16;

/// Localized category and tag listings.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn MenuStore>,
    categories: Option<Cache<Locale, Arc<Vec<LocalizedCategory>>>>,
    tags: Option<Cache<Locale, Arc<Vec<LocalizedTag>>>>,
}

impl CatalogService {
    /// Create a service caching listings for `ttl`.
    pub fn new(store: Arc<dyn MenuStore>, ttl: Duration) -> Self {
        let (categories, tags) = if ttl.is_zero() {
            (None, None)
        } else {
            (
                Some(
                    Cache::builder()
                        .max_capacity(MAX_CAPACITY)
                        .time_to_live(ttl)
                        .build(),
                ),
                Some(
                    Cache::builder()
                        .max_capacity(MAX_CAPACITY)
                        .time_to_live(ttl)
                        .build(),
                ),
            )
        };

        Self {
            store,
            categories,
            tags,
        }
    }

    /// All categories in creation order.
    pub async fn list_categories(&self, locale: Locale) -> Result<Arc<Vec<LocalizedCategory>>> {
        if let Some(cache) = &self.categories
            && let Some(hit) = cache.get(&locale).await
        {
            debug!(locale = %locale, "category cache hit");
            return Ok(hit);
        }

        let categories = self.store.fetch_categories(None).await?;
        let ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
        let text = TranslationIndex::new(
            self.store
                .fetch_translations(TranslationKind::Category, &ids, locale)
                .await?,
        );

        let localized: Arc<Vec<LocalizedCategory>> = Arc::new(
            categories
                .into_iter()
                .map(|category| {
                    let resolved = text.resolve(category.id);
                    LocalizedCategory {
                        id: category.id,
                        slug: category.slug_or_id(),
                        image_url: category.image_url,
                        name: resolved.name,
                        description: resolved.description,
                        created_at: category.created_at,
                        updated_at: category.updated_at,
                    }
                })
                .collect(),
        );

        if let Some(cache) = &self.categories {
            cache.insert(locale, Arc::clone(&localized)).await;
        }

        Ok(localized)
    }

    /// A single category.
    pub async fn get_category(&self, id: Uuid, locale: Locale) -> Result<Option<LocalizedCategory>> {
        let categories = self.list_categories(locale).await?;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    /// All tags ordered by kind, then slug.
    pub async fn list_tags(&self, locale: Locale) -> Result<Arc<Vec<LocalizedTag>>> {
        if let Some(cache) = &self.tags
            && let Some(hit) = cache.get(&locale).await
        {
            debug!(locale = %locale, "tag cache hit");
            return Ok(hit);
        }

        let tags = self.store.fetch_tags(None).await?;
        let ids: Vec<Uuid> = tags.iter().map(|t| t.id).collect();
        let text = TranslationIndex::new(
            self.store
                .fetch_translations(TranslationKind::Tag, &ids, locale)
                .await?,
        );

        let localized: Arc<Vec<LocalizedTag>> = Arc::new(
            tags.into_iter()
                .map(|tag| LocalizedTag {
                    id: tag.id,
                    name: text.name(tag.id),
                    slug: tag.slug,
                    icon: tag.icon,
                    color: tag.color,
                    kind: tag.kind,
                    created_at: tag.created_at,
                    updated_at: tag.updated_at,
                })
                .collect(),
        );

        if let Some(cache) = &self.tags {
            cache.insert(locale, Arc::clone(&localized)).await;
        }

        Ok(localized)
    }

    /// A single tag.
    pub async fn get_tag(&self, id: Uuid, locale: Locale) -> Result<Option<LocalizedTag>> {
        let tags = self.list_tags(locale).await?;
        Ok(tags.iter().find(|t| t.id == id).cloned())
    }

    /// Drop every cached listing.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.categories {
            cache.invalidate_all();
        }
        if let Some(cache) = &self.tags {
            cache.invalidate_all();
        }
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("cached", &self.categories.is_some())
            .finish()
    }
}
