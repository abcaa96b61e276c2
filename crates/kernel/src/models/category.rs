//! Menu category model and write operations.
//!
//! Categories group menu items (e.g., "Uramaki", "Nigiri"). Display names
//! live in `category_translations`, one row per locale.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::translation::{TranslationInput, TranslationKind, upsert_translation};
use super::Locale;

/// A menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Language-neutral URL key. Readers fall back to the id when unset.
    pub slug: Option<String>,

    /// Optional cover image.
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertCategory {
    /// Existing id to update; a new id is generated when absent.
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub translations: BTreeMap<Locale, TranslationInput>,
}

const CATEGORY_COLUMNS: &str = "id, slug, image_url, created_at, updated_at";

impl Category {
    /// The slug, or the id when no slug was set.
    pub fn slug_or_id(&self) -> String {
        self.slug.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Find the oldest category with the given slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1 \
             ORDER BY created_at, id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category by slug")?;

        Ok(category)
    }

    /// Insert or update a category and its translations in one transaction.
    pub async fn upsert(pool: &PgPool, input: UpsertCategory) -> Result<Self> {
        let now = Utc::now();
        let id = input.id.unwrap_or_else(Uuid::now_v7);

        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let category = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO categories (id, slug, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.image_url)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .context("failed to upsert category")?;

        for (locale, translation) in &input.translations {
            upsert_translation(&mut tx, TranslationKind::Category, id, *locale, translation)
                .await?;
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok(category)
    }

    /// Delete a category. Translations cascade; items keep existing with no
    /// category.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_defaults_to_id() {
        let id = Uuid::now_v7();
        let mut category = Category {
            id,
            slug: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(category.slug_or_id(), id.to_string());

        category.slug = Some("uramaki".to_string());
        assert_eq!(category.slug_or_id(), "uramaki");
    }
}
