//! In-memory implementation of [`MenuStore`].
//!
//! Mirrors the ordering guarantees of the PostgreSQL store so listings built
//! on top of it behave the same. Used by tests and local fixtures.

use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{CandidateQuery, MenuStore};
use crate::models::{
    Category, ItemTagLink, Locale, MenuItem, Tag, TranslationKind, TranslationRow,
};

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    items: Vec<MenuItem>,
    tags: Vec<Tag>,
    links: Vec<ItemTagLink>,
    translations: Vec<(TranslationKind, TranslationRow)>,
}

/// Menu store holding every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut tables)
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        f(&tables)
    }

    fn check_online(&self) -> Result<()> {
        if *self.offline.read().unwrap_or_else(PoisonError::into_inner) {
            anyhow::bail!("memory store is offline");
        }
        Ok(())
    }

    /// Make every read fail, to exercise storage-failure paths.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.write().unwrap_or_else(PoisonError::into_inner) = offline;
    }

    /// Insert or replace a category.
    pub fn put_category(&self, category: Category) {
        self.write(|t| {
            t.categories.retain(|c| c.id != category.id);
            t.categories.push(category);
        });
    }

    /// Insert or replace a menu item.
    pub fn put_item(&self, item: MenuItem) {
        self.write(|t| {
            t.items.retain(|i| i.id != item.id);
            t.items.push(item);
        });
    }

    /// Insert or replace a tag.
    pub fn put_tag(&self, tag: Tag) {
        self.write(|t| {
            t.tags.retain(|existing| existing.id != tag.id);
            t.tags.push(tag);
        });
    }

    /// Link an item to a tag. Linking the same pair twice is a no-op.
    pub fn link(&self, menu_item_id: Uuid, tag_id: Uuid) {
        self.write(|t| {
            if !t
                .links
                .iter()
                .any(|l| l.menu_item_id == menu_item_id && l.tag_id == tag_id)
            {
                t.links.push(ItemTagLink {
                    menu_item_id,
                    tag_id,
                    created_at: Utc::now(),
                });
            }
        });
    }

    /// Insert or replace the translation for (kind, owner, locale).
    pub fn put_translation(
        &self,
        kind: TranslationKind,
        owner_id: Uuid,
        locale: Locale,
        name: &str,
        description: Option<&str>,
    ) {
        let description = if kind.has_description() {
            description.map(str::to_string)
        } else {
            None
        };
        self.write(|t| {
            t.translations.retain(|(k, row)| {
                !(*k == kind && row.owner_id == owner_id && row.locale == locale)
            });
            t.translations.push((
                kind,
                TranslationRow {
                    owner_id,
                    locale,
                    name: name.to_string(),
                    description,
                },
            ));
        });
    }

    /// Remove an item with its translations and links.
    pub fn remove_item(&self, id: Uuid) {
        self.write(|t| {
            t.items.retain(|i| i.id != id);
            t.links.retain(|l| l.menu_item_id != id);
            t.translations
                .retain(|(k, row)| !(*k == TranslationKind::MenuItem && row.owner_id == id));
        });
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn fetch_items(&self, query: CandidateQuery) -> Result<Vec<MenuItem>> {
        self.check_online()?;
        let mut items: Vec<MenuItem> = self.read(|t| {
            t.items
                .iter()
                .filter(|i| query.category_id.is_none_or(|c| i.category_id == Some(c)))
                .filter(|i| !query.available_only || i.available)
                .cloned()
                .collect()
        });
        items.sort_by_key(|i| (i.created_at, i.id));
        Ok(items)
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        self.check_online()?;
        Ok(self.read(|t| t.items.iter().find(|i| i.id == id).cloned()))
    }

    async fn fetch_categories(&self, ids: Option<&[Uuid]>) -> Result<Vec<Category>> {
        self.check_online()?;
        let mut categories: Vec<Category> = self.read(|t| {
            t.categories
                .iter()
                .filter(|c| ids.is_none_or(|ids| ids.contains(&c.id)))
                .cloned()
                .collect()
        });
        categories.sort_by_key(|c| (c.created_at, c.id));
        Ok(categories)
    }

    async fn fetch_tags(&self, ids: Option<&[Uuid]>) -> Result<Vec<Tag>> {
        self.check_online()?;
        let mut tags: Vec<Tag> = self.read(|t| {
            t.tags
                .iter()
                .filter(|tag| ids.is_none_or(|ids| ids.contains(&tag.id)))
                .cloned()
                .collect()
        });
        tags.sort_by(|a, b| {
            a.kind
                .as_str()
                .cmp(b.kind.as_str())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(tags)
    }

    async fn fetch_tag_links(&self, item_ids: &[Uuid]) -> Result<Vec<ItemTagLink>> {
        self.check_online()?;
        let mut links: Vec<ItemTagLink> = self.read(|t| {
            t.links
                .iter()
                .filter(|l| item_ids.contains(&l.menu_item_id))
                .cloned()
                .collect()
        });
        links.sort_by_key(|l| (l.created_at, l.tag_id));
        Ok(links)
    }

    async fn fetch_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
        locale: Locale,
    ) -> Result<Vec<TranslationRow>> {
        self.check_online()?;
        Ok(self.read(|t| {
            t.translations
                .iter()
                .filter(|(k, row)| {
                    *k == kind && row.locale == locale && owner_ids.contains(&row.owner_id)
                })
                .map(|(_, row)| row.clone())
                .collect()
        }))
    }

    async fn fetch_all_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
    ) -> Result<Vec<TranslationRow>> {
        self.check_online()?;
        let mut rows: Vec<TranslationRow> = self.read(|t| {
            t.translations
                .iter()
                .filter(|(k, row)| *k == kind && owner_ids.contains(&row.owner_id))
                .map(|(_, row)| row.clone())
                .collect()
        });
        rows.sort_by_key(|r| (r.owner_id, r.locale.as_str()));
        Ok(rows)
    }

    async fn ping(&self) -> bool {
        self.check_online().is_ok()
    }
}
