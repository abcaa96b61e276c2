//! Menu seeding from a JSON document.
//!
//! A seed file lists tags and categories, each category carrying its items.
//! Items reference tags by slug. Every tag, category and item must carry a
//! unique slug: applying a seed matches existing rows by slug and updates
//! them in place, so re-running a seed never duplicates rows.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::intl::bgn_to_eur;
use crate::models::{
    Category, Locale, MenuItem, Tag, TagKind, TranslationInput, UpsertCategory, UpsertMenuItem,
    UpsertTag,
};

/// Tables cleared by a reset, children first.
const RESET_TABLES: &str = "menu_item_tags, menu_item_translations, menu_items, \
     tag_translations, tags, category_translations, categories";

/// A complete seed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub tags: Vec<SeedTag>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTag {
    pub slug: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "category")]
    pub kind: TagKind,
    #[serde(default)]
    pub translations: BTreeMap<Locale, TranslationInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub slug: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub translations: BTreeMap<Locale, TranslationInput>,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub slug: String,
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub pieces: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub translations: BTreeMap<Locale, TranslationInput>,
}

fn default_available() -> bool {
    true
}

impl SeedItem {
    /// The euro price, derived from the lev price when not given.
    pub fn resolved_price_eur(&self) -> Decimal {
        self.price_eur.unwrap_or_else(|| bgn_to_eur(self.price))
    }
}

/// Row counts written by [`apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tags: usize,
    pub categories: usize,
    pub items: usize,
}

impl SeedFile {
    /// Parse a seed document.
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Self = serde_json::from_str(json).context("invalid seed document")?;
        seed.validate()?;
        Ok(seed)
    }

    /// Read and parse a seed file.
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Check slugs and cross references: every slug is present and unique
    /// within its kind, and every item tag exists.
    pub fn validate(&self) -> Result<()> {
        let mut tags = HashSet::with_capacity(self.tags.len());
        for tag in &self.tags {
            require_slug("tag", &tag.slug)?;
            if !tags.insert(tag.slug.as_str()) {
                bail!("duplicate tag slug '{}'", tag.slug);
            }
        }

        let mut categories = HashSet::with_capacity(self.categories.len());
        let mut items = HashSet::with_capacity(self.item_count());
        for category in &self.categories {
            require_slug("category", &category.slug)?;
            if !categories.insert(category.slug.as_str()) {
                bail!("duplicate category slug '{}'", category.slug);
            }

            for item in &category.items {
                require_slug("item", &item.slug)?;
                if !items.insert(item.slug.as_str()) {
                    bail!("duplicate item slug '{}'", item.slug);
                }
                if let Some(unknown) = item.tags.iter().find(|s| !tags.contains(s.as_str())) {
                    bail!("item '{}' references unknown tag '{unknown}'", item.slug);
                }
                if item.price.is_sign_negative() {
                    bail!("item '{}' has a negative price", item.slug);
                }
            }
        }

        Ok(())
    }

    /// Total number of items across categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

fn require_slug(kind: &str, slug: &str) -> Result<()> {
    if slug.trim().is_empty() {
        bail!("every {kind} needs a non-empty slug");
    }
    Ok(())
}

/// Write a seed document to the database.
///
/// With `reset`, every menu table is truncated first.
pub async fn apply(pool: &PgPool, seed: &SeedFile, reset: bool) -> Result<SeedReport> {
    seed.validate()?;

    if reset {
        sqlx::query(&format!("TRUNCATE TABLE {RESET_TABLES} CASCADE"))
            .execute(pool)
            .await
            .context("failed to truncate menu tables")?;
        info!("Menu tables cleared");
    }

    let mut report = SeedReport::default();
    let mut tag_ids: HashMap<&str, Uuid> = HashMap::with_capacity(seed.tags.len());

    for tag in &seed.tags {
        let existing = Tag::find_by_slug(pool, &tag.slug).await?;
        let saved = Tag::upsert(
            pool,
            UpsertTag {
                id: existing.map(|t| t.id),
                slug: tag.slug.clone(),
                icon: tag.icon.clone(),
                color: tag.color.clone(),
                kind: tag.kind,
                translations: tag.translations.clone(),
            },
        )
        .await?;

        tag_ids.insert(tag.slug.as_str(), saved.id);
        report.tags += 1;
    }

    for category in &seed.categories {
        let existing = Category::find_by_slug(pool, &category.slug).await?;
        let saved = Category::upsert(
            pool,
            UpsertCategory {
                id: existing.map(|c| c.id),
                slug: Some(category.slug.clone()),
                image_url: category.image_url.clone(),
                translations: category.translations.clone(),
            },
        )
        .await?;
        report.categories += 1;

        for item in &category.items {
            let existing = MenuItem::find_by_slug(pool, &item.slug).await?;
            let item_tags = item
                .tags
                .iter()
                .map(|slug| {
                    tag_ids
                        .get(slug.as_str())
                        .copied()
                        .with_context(|| format!("unknown tag '{slug}'"))
                })
                .collect::<Result<Vec<_>>>()?;

            let saved_item = MenuItem::upsert(
                pool,
                UpsertMenuItem {
                    id: existing.map(|i| i.id),
                    slug: Some(item.slug.clone()),
                    price: item.price,
                    price_eur: Some(item.resolved_price_eur()),
                    pieces: item.pieces,
                    image_url: item.image_url.clone(),
                    category_id: Some(saved.id),
                    available: item.available,
                    translations: item.translations.clone(),
                    tag_ids: Some(item_tags),
                },
            )
            .await?;

            debug!(id = %saved_item.id, slug = ?saved_item.slug, "seeded menu item");
            report.items += 1;
        }
    }

    info!(
        tags = report.tags,
        categories = report.categories,
        items = report.items,
        "Seed applied"
    );

    Ok(report)
}
