//! Menu item model and write operations.
//!
//! Prices are stored as `NUMERIC(10,2)`. `price` is in BGN; `price_eur` is
//! an independently stored secondary price and is never derived on read.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::translation::{TranslationInput, TranslationKind, upsert_translation};
use super::Locale;

/// A menu item row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Language-neutral URL key. Readers fall back to the id when unset.
    pub slug: Option<String>,

    /// Price in BGN.
    pub price: Decimal,

    /// Price in EUR, when supplied.
    pub price_eur: Option<Decimal>,

    /// Number of pieces per serving (e.g., 8 for a roll).
    pub pieces: Option<i32>,

    pub image_url: Option<String>,

    /// Category this item belongs to.
    pub category_id: Option<Uuid>,

    /// Whether the item is currently offered.
    pub available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row between a menu item and a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemTagLink {
    pub menu_item_id: Uuid,
    pub tag_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a menu item.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMenuItem {
    /// Existing id to update; a new id is generated when absent.
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub pieces: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub available: bool,

    /// Translations to upsert. Locales not listed are left untouched.
    pub translations: BTreeMap<Locale, TranslationInput>,

    /// Replacement tag set. `None` keeps the existing links.
    pub tag_ids: Option<Vec<Uuid>>,
}

pub(crate) const MENU_ITEM_COLUMNS: &str = "id, slug, price, price_eur, pieces, image_url, \
     category_id, available, created_at, updated_at";

impl MenuItem {
    /// The slug, or the id when no slug was set.
    pub fn slug_or_id(&self) -> String {
        self.slug.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Find a menu item by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let item = sqlx::query_as::<_, Self>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu item")?;

        Ok(item)
    }

    /// Find the oldest menu item with the given slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let item = sqlx::query_as::<_, Self>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE slug = $1 \
             ORDER BY created_at, id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu item by slug")?;

        Ok(item)
    }

    /// Insert or update a menu item, its translations and (optionally) its
    /// tag set in one transaction.
    pub async fn upsert(pool: &PgPool, input: UpsertMenuItem) -> Result<Self> {
        let now = Utc::now();
        let id = input.id.unwrap_or_else(Uuid::now_v7);

        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let item = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO menu_items
                (id, slug, price, price_eur, pieces, image_url, category_id, available,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                price = EXCLUDED.price,
                price_eur = EXCLUDED.price_eur,
                pieces = EXCLUDED.pieces,
                image_url = EXCLUDED.image_url,
                category_id = EXCLUDED.category_id,
                available = EXCLUDED.available,
                updated_at = EXCLUDED.updated_at
            RETURNING {MENU_ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(input.price)
        .bind(input.price_eur)
        .bind(input.pieces)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(input.available)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .context("failed to upsert menu item")?;

        for (locale, translation) in &input.translations {
            upsert_translation(&mut tx, TranslationKind::MenuItem, id, *locale, translation)
                .await?;
        }

        if let Some(tag_ids) = &input.tag_ids {
            sqlx::query("DELETE FROM menu_item_tags WHERE menu_item_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("failed to clear menu item tags")?;

            // Link timestamps keep the given order
            for (position, tag_id) in tag_ids.iter().enumerate() {
                let linked_at = now + TimeDelta::microseconds(position as i64);
                sqlx::query(
                    r#"
                    INSERT INTO menu_item_tags (menu_item_id, tag_id, created_at)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (menu_item_id, tag_id) DO NOTHING
                    "#,
                )
                .bind(id)
                .bind(tag_id)
                .bind(linked_at)
                .execute(&mut *tx)
                .await
                .context("failed to link menu item tag")?;
            }
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok(item)
    }

    /// Delete a menu item. Translations and tag links cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete menu item")?;

        Ok(result.rows_affected() > 0)
    }
}
