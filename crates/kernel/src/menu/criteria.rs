//! Filter criteria for menu listings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Criteria for listing and counting menu items.
///
/// Every field is optional and filters combine with AND. Empty tag sets and
/// an empty search string mean "no filter", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCriteria {
    /// Restrict to one category.
    pub category_id: Option<Uuid>,

    /// Restrict to items currently offered.
    #[serde(default)]
    pub available_only: bool,

    /// Item must carry at least one of these tags.
    #[serde(default)]
    pub include_tag_ids: HashSet<Uuid>,

    /// Item must carry none of these tags.
    #[serde(default)]
    pub exclude_tag_ids: HashSet<Uuid>,

    /// Case-insensitive substring of the localized name or description.
    pub search: Option<String>,

    /// Maximum number of items to return. `None` returns everything.
    pub limit: Option<usize>,

    /// Number of sorted, filtered items to skip.
    #[serde(default)]
    pub offset: usize,
}

impl MenuCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.include_tag_ids.extend(tag_ids);
        self
    }

    pub fn without_tags(mut self, tag_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.exclude_tag_ids.extend(tag_ids);
        self
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn paginate(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// The search needle, lowercased, or `None` when searching is a no-op.
    pub fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// The same criteria with the pagination window removed.
    pub fn unpaginated(&self) -> Self {
        Self {
            limit: None,
            offset: 0,
            ..self.clone()
        }
    }
}
