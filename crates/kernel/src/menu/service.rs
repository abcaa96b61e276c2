//! Menu item query service.
//!
//! Every listing follows the same pipeline: fetch candidates with the
//! storage-level predicates, enrich them for the requested locale, apply the
//! tag and search filters, sort, and only then cut the pagination window.
//! Counting runs the same pipeline without the window, so a count always
//! equals the length of the matching unpaginated listing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

use super::criteria::MenuCriteria;
use super::filter::{apply_filters, paginate, sort_popular_first};
use super::resolver::TranslationIndex;
use super::store::{CandidateQuery, MenuStore};
use super::types::{
    CategorySummary, EnrichedMenuItem, LocalizedText, MenuItemTranslations, MenuPage, TagSummary,
};
use crate::models::{Locale, MenuItem, Tag, TranslationKind};

/// Default number of items returned by [`MenuService::featured_menu_items`].
pub const DEFAULT_FEATURED_LIMIT: usize = 4;

/// Read-only queries over the menu.
#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn MenuStore>,
}

impl MenuService {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self { store }
    }

    /// List enriched items matching `criteria`, popular first.
    pub async fn list_menu_items(
        &self,
        locale: Locale,
        criteria: &MenuCriteria,
    ) -> Result<Vec<EnrichedMenuItem>> {
        Ok(self.list_menu_page(locale, criteria).await?.items)
    }

    /// One page of items together with the unpaginated match count.
    pub async fn list_menu_page(&self, locale: Locale, criteria: &MenuCriteria) -> Result<MenuPage> {
        let matching = self.matching_items(locale, criteria).await?;
        let total = matching.len();
        let items = paginate(matching, criteria.offset, criteria.limit);

        debug!(
            locale = %locale,
            total,
            returned = items.len(),
            offset = criteria.offset,
            limit = ?criteria.limit,
            "listed menu items"
        );

        Ok(MenuPage { items, total })
    }

    /// Number of items matching `criteria`, ignoring its pagination window.
    ///
    /// The locale matters because search runs against localized text.
    pub async fn count_menu_items(&self, locale: Locale, criteria: &MenuCriteria) -> Result<usize> {
        let matching = self.matching_items(locale, criteria).await?;
        Ok(matching.len())
    }

    /// A single enriched item, or `None` when it does not exist.
    pub async fn get_menu_item_by_id(
        &self,
        id: Uuid,
        locale: Locale,
    ) -> Result<Option<EnrichedMenuItem>> {
        let Some(item) = self.store.fetch_item(id).await? else {
            return Ok(None);
        };

        let mut enriched = self.enrich(vec![item], locale).await?;
        Ok(enriched.pop())
    }

    /// Available items in listing order, capped at `limit`.
    pub async fn featured_menu_items(
        &self,
        locale: Locale,
        limit: usize,
    ) -> Result<Vec<EnrichedMenuItem>> {
        let criteria = MenuCriteria::new().available_only().paginate(limit, 0);
        self.list_menu_items(locale, &criteria).await
    }

    /// An item with the translations stored for every locale.
    pub async fn get_menu_item_translations(
        &self,
        id: Uuid,
    ) -> Result<Option<MenuItemTranslations>> {
        let Some(item) = self.store.fetch_item(id).await? else {
            return Ok(None);
        };

        let rows = self
            .store
            .fetch_all_translations(TranslationKind::MenuItem, &[id])
            .await?;
        let translations = rows
            .into_iter()
            .map(|row| {
                (
                    row.locale,
                    LocalizedText {
                        name: row.name,
                        description: row.description.unwrap_or_default(),
                    },
                )
            })
            .collect();

        let tag_ids = self
            .store
            .fetch_tag_links(&[id])
            .await?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();

        Ok(Some(MenuItemTranslations {
            id: item.id,
            slug: item.slug_or_id(),
            price: item.price,
            price_eur: item.price_eur,
            pieces: item.pieces,
            image_url: item.image_url,
            category_id: item.category_id,
            available: item.available,
            translations,
            tag_ids,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }))
    }

    /// Every item matching `criteria`, filtered and sorted, unpaginated.
    async fn matching_items(
        &self,
        locale: Locale,
        criteria: &MenuCriteria,
    ) -> Result<Vec<EnrichedMenuItem>> {
        let candidates = self
            .store
            .fetch_items(CandidateQuery {
                category_id: criteria.category_id,
                available_only: criteria.available_only,
            })
            .await?;
        let fetched = candidates.len();

        let enriched = self.enrich(candidates, locale).await?;
        let mut matching = apply_filters(enriched, criteria);
        sort_popular_first(&mut matching);

        debug!(fetched, matching = matching.len(), "filtered menu items");
        Ok(matching)
    }

    /// Resolve translations, category and tags for a batch of items.
    ///
    /// Uses a fixed number of bulk reads regardless of batch size.
    async fn enrich(&self, items: Vec<MenuItem>, locale: Locale) -> Result<Vec<EnrichedMenuItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let item_text = TranslationIndex::new(
            self.store
                .fetch_translations(TranslationKind::MenuItem, &item_ids, locale)
                .await?,
        );

        let category_ids: Vec<Uuid> = items
            .iter()
            .filter_map(|i| i.category_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let known_categories: HashSet<Uuid> = self
            .store
            .fetch_categories(Some(&category_ids))
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let category_text = TranslationIndex::new(
            self.store
                .fetch_translations(TranslationKind::Category, &category_ids, locale)
                .await?,
        );

        let links = self.store.fetch_tag_links(&item_ids).await?;
        let tag_ids: Vec<Uuid> = links
            .iter()
            .map(|l| l.tag_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let tags: HashMap<Uuid, Tag> = self
            .store
            .fetch_tags(Some(&tag_ids))
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let tag_text = TranslationIndex::new(
            self.store
                .fetch_translations(TranslationKind::Tag, &tag_ids, locale)
                .await?,
        );

        let mut tags_by_item: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
        for link in &links {
            // Links to tags that no longer exist are skipped.
            let Some(tag) = tags.get(&link.tag_id) else {
                continue;
            };
            tags_by_item
                .entry(link.menu_item_id)
                .or_default()
                .push(TagSummary {
                    id: tag.id,
                    slug: tag.slug.clone(),
                    name: tag_text.name(tag.id),
                    icon: tag.icon.clone(),
                    color: tag.color.clone(),
                    kind: tag.kind,
                });
        }

        let enriched = items
            .into_iter()
            .map(|item| {
                let text = item_text.resolve(item.id);
                let slug = item.slug_or_id();
                let category = item
                    .category_id
                    .filter(|id| known_categories.contains(id))
                    .map(|id| CategorySummary {
                        id,
                        name: category_text.name(id),
                    });

                EnrichedMenuItem {
                    id: item.id,
                    slug,
                    name: text.name,
                    description: text.description,
                    price: item.price,
                    price_eur: item.price_eur,
                    pieces: item.pieces,
                    image_url: item.image_url,
                    available: item.available,
                    category,
                    tags: tags_by_item.remove(&item.id).unwrap_or_default(),
                    created_at: item.created_at,
                    updated_at: item.updated_at,
                }
            })
            .collect();

        Ok(enriched)
    }
}

impl std::fmt::Debug for MenuService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuService").finish()
    }
}
