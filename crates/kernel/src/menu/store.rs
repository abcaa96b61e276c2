//! Storage boundary for menu reads.
//!
//! The query services only need a handful of bulk reads. Everything is keyed
//! by id sets so enrichment costs a fixed number of round trips per request,
//! independent of how many items are returned.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Category, ItemTagLink, Locale, MenuItem, Tag, TranslationKind, TranslationRow};

/// Database-level predicates for the candidate item fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateQuery {
    /// `category_id = ?` when set.
    pub category_id: Option<Uuid>,

    /// `available = TRUE` when set.
    pub available_only: bool,
}

/// Read access to the menu entity store.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Items matching the predicates, ordered by creation time then id.
    async fn fetch_items(&self, query: CandidateQuery) -> Result<Vec<MenuItem>>;

    /// A single item.
    async fn fetch_item(&self, id: Uuid) -> Result<Option<MenuItem>>;

    /// Categories by id, or all categories ordered by creation time when
    /// `ids` is `None`.
    async fn fetch_categories(&self, ids: Option<&[Uuid]>) -> Result<Vec<Category>>;

    /// Tags by id, or all tags ordered by kind then slug when `ids` is `None`.
    async fn fetch_tags(&self, ids: Option<&[Uuid]>) -> Result<Vec<Tag>>;

    /// Tag links for the given items, ordered by link creation time.
    async fn fetch_tag_links(&self, item_ids: &[Uuid]) -> Result<Vec<ItemTagLink>>;

    /// Translation rows of one kind for one locale.
    async fn fetch_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
        locale: Locale,
    ) -> Result<Vec<TranslationRow>>;

    /// Translation rows of one kind in every locale.
    async fn fetch_all_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
    ) -> Result<Vec<TranslationRow>>;

    /// Whether the store is reachable.
    async fn ping(&self) -> bool;
}
