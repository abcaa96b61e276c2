//! Localized view records returned to callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Locale, TagKind};

/// Name and description resolved for one locale.
///
/// Both are empty strings when the entity has no translation in that locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub name: String,
    pub description: String,
}

/// Category reference embedded in a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

/// Tag reference embedded in a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub kind: TagKind,
}

/// A menu item with its translation, category and tags resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMenuItem {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub pieces: Option<i32>,
    pub image_url: Option<String>,
    pub available: bool,
    pub category: Option<CategorySummary>,
    pub tags: Vec<TagSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrichedMenuItem {
    /// Whether the item carries a tag with the given id.
    pub fn has_tag(&self, tag_id: Uuid) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Whether the item carries the `popular` tag.
    pub fn is_popular(&self) -> bool {
        self.tags
            .iter()
            .any(|t| t.slug == crate::models::POPULAR_TAG_SLUG)
    }
}

/// A category resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedCategory {
    pub id: Uuid,
    pub slug: String,
    pub image_url: Option<String>,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedTag {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub kind: TagKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A menu item with every stored translation, for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemTranslations {
    pub id: Uuid,
    pub slug: String,
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub pieces: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub available: bool,
    pub translations: BTreeMap<Locale, LocalizedText>,
    pub tag_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a menu listing with the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPage {
    pub items: Vec<EnrichedMenuItem>,
    pub total: usize,
}
