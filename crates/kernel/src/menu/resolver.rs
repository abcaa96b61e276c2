//! Translation resolution.
//!
//! Joins locale-neutral rows with the translation rows fetched for one
//! locale. Missing translations resolve to empty strings; they never fail a
//! request.

use std::collections::HashMap;

use uuid::Uuid;

use super::types::LocalizedText;
use crate::models::TranslationRow;

/// Translations for one locale, indexed by owner id.
#[derive(Debug, Default)]
pub struct TranslationIndex {
    by_owner: HashMap<Uuid, TranslationRow>,
}

impl TranslationIndex {
    /// Build an index from rows already filtered to one locale.
    ///
    /// When an owner has several rows, the first one wins.
    pub fn new(rows: Vec<TranslationRow>) -> Self {
        let mut by_owner = HashMap::with_capacity(rows.len());
        for row in rows {
            by_owner.entry(row.owner_id).or_insert(row);
        }
        Self { by_owner }
    }

    /// Resolved name and description for `owner_id`.
    pub fn resolve(&self, owner_id: Uuid) -> LocalizedText {
        self.by_owner
            .get(&owner_id)
            .map(|row| LocalizedText {
                name: row.name.clone(),
                description: row.description.clone().unwrap_or_default(),
            })
            .unwrap_or_default()
    }

    /// Resolved name only.
    pub fn name(&self, owner_id: Uuid) -> String {
        self.by_owner
            .get(&owner_id)
            .map(|row| row.name.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }
}
