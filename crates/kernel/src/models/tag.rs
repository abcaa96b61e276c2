//! Tag model and write operations.
//!
//! Tags mark dietary properties, spice level, specials and allergens. The
//! `popular` tag is special only in that listings sort it first.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::translation::{TranslationInput, TranslationKind, upsert_translation};
use super::Locale;

/// Slug of the tag that promotes items to the top of listings.
pub const POPULAR_TAG_SLUG: &str = "popular";

/// Error for unknown tag kinds.
#[derive(Debug, Error)]
#[error("unknown tag kind '{0}': expected dietary, spice, special or allergen")]
pub struct UnknownTagKind(pub String);

/// Fixed classification of tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Dietary,
    Spice,
    Special,
    Allergen,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Dietary => "dietary",
            TagKind::Spice => "spice",
            TagKind::Special => "special",
            TagKind::Allergen => "allergen",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagKind {
    type Err = UnknownTagKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dietary" => Ok(TagKind::Dietary),
            "spice" => Ok(TagKind::Spice),
            "special" => Ok(TagKind::Special),
            "allergen" => Ok(TagKind::Allergen),
            other => Err(UnknownTagKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for TagKind {
    type Error = UnknownTagKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Unique, language-neutral identifier.
    pub slug: String,

    /// Optional display glyph.
    pub icon: Option<String>,

    /// Optional display color.
    pub color: Option<String>,

    /// Classification (stored in the `category` column).
    #[sqlx(rename = "category", try_from = "String")]
    pub kind: TagKind,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTag {
    pub id: Option<Uuid>,
    pub slug: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub kind: TagKind,
    pub translations: BTreeMap<Locale, TranslationInput>,
}

const TAG_COLUMNS: &str = "id, slug, icon, color, category, created_at, updated_at";

impl Tag {
    /// Whether this is the sort-priority tag.
    pub fn is_popular(&self) -> bool {
        self.slug == POPULAR_TAG_SLUG
    }

    /// Find a tag by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let tag =
            sqlx::query_as::<_, Self>(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(pool)
                .await
                .context("failed to fetch tag by slug")?;

        Ok(tag)
    }

    /// Insert or update a tag and its translations in one transaction.
    pub async fn upsert(pool: &PgPool, input: UpsertTag) -> Result<Self> {
        let now = Utc::now();
        let id = input.id.unwrap_or_else(Uuid::now_v7);

        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let tag = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO tags (id, slug, icon, color, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                icon = EXCLUDED.icon,
                color = EXCLUDED.color,
                category = EXCLUDED.category,
                updated_at = EXCLUDED.updated_at
            RETURNING {TAG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.icon)
        .bind(&input.color)
        .bind(input.kind.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to upsert tag '{}'", input.slug))?;

        for (locale, translation) in &input.translations {
            upsert_translation(&mut tx, TranslationKind::Tag, id, *locale, translation).await?;
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok(tag)
    }

    /// Delete a tag. Translations and item links cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete tag")?;

        Ok(result.rows_affected() > 0)
    }
}
