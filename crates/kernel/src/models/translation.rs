//! Per-locale translation rows.
//!
//! Categories, menu items and tags each own a parallel translation table
//! keyed by (owner, locale). The tables share a shape, so reads and upserts
//! go through [`TranslationKind`] instead of three copies of the same SQL.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

use super::Locale;

/// Which translation table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKind {
    Category,
    MenuItem,
    Tag,
}

impl TranslationKind {
    /// Translation table name.
    pub fn table(self) -> &'static str {
        match self {
            TranslationKind::Category => "category_translations",
            TranslationKind::MenuItem => "menu_item_translations",
            TranslationKind::Tag => "tag_translations",
        }
    }

    /// Column referencing the owning entity.
    pub fn owner_column(self) -> &'static str {
        match self {
            TranslationKind::Category => "category_id",
            TranslationKind::MenuItem => "menu_item_id",
            TranslationKind::Tag => "tag_id",
        }
    }

    /// Tag translations carry a name only.
    pub fn has_description(self) -> bool {
        !matches!(self, TranslationKind::Tag)
    }

    /// Column list for SELECTs, aliased to the [`TranslationRow`] shape.
    pub(crate) fn select_columns(self) -> String {
        let description = if self.has_description() {
            "description"
        } else {
            "NULL::TEXT AS description"
        };
        format!(
            "{} AS owner_id, locale, name, {description}",
            self.owner_column()
        )
    }
}

/// A translation row, normalized across the three tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TranslationRow {
    /// Id of the owning category, menu item or tag.
    pub owner_id: Uuid,

    /// Locale of this translation.
    #[sqlx(try_from = "String")]
    pub locale: Locale,

    /// Display name.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,
}

/// Input for one locale of an upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TranslationInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Insert or update one translation row inside an open transaction.
///
/// Empty descriptions are stored as NULL.
pub(crate) async fn upsert_translation(
    conn: &mut PgConnection,
    kind: TranslationKind,
    owner_id: Uuid,
    locale: Locale,
    input: &TranslationInput,
) -> Result<()> {
    let now = Utc::now();
    let owner = kind.owner_column();
    let table = kind.table();

    if kind.has_description() {
        let description = input.description.as_deref().filter(|d| !d.is_empty());
        let sql = format!(
            r#"
            INSERT INTO {table} ({owner}, locale, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT ({owner}, locale) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = EXCLUDED.updated_at
            "#
        );
        sqlx::query(&sql)
            .bind(owner_id)
            .bind(locale.as_str())
            .bind(&input.name)
            .bind(description)
            .bind(now)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("failed to upsert {locale} row in {table}"))?;
    } else {
        let sql = format!(
            r#"
            INSERT INTO {table} ({owner}, locale, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT ({owner}, locale) DO UPDATE SET
                name = EXCLUDED.name,
                updated_at = EXCLUDED.updated_at
            "#
        );
        sqlx::query(&sql)
            .bind(owner_id)
            .bind(locale.as_str())
            .bind(&input.name)
            .bind(now)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("failed to upsert {locale} row in {table}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_translations_select_null_description() {
        let cols = TranslationKind::Tag.select_columns();
        assert!(cols.starts_with("tag_id AS owner_id"));
        assert!(cols.contains("NULL::TEXT AS description"));
    }

    #[test]
    fn item_translations_select_description() {
        let cols = TranslationKind::MenuItem.select_columns();
        assert_eq!(cols, "menu_item_id AS owner_id, locale, name, description");
        assert_eq!(TranslationKind::MenuItem.table(), "menu_item_translations");
    }

    #[test]
    fn input_builder() {
        let input = TranslationInput::new("Sake nigiri").with_description("Salmon on rice");
        assert_eq!(input.name, "Sake nigiri");
        assert_eq!(input.description.as_deref(), Some("Salmon on rice"));
    }
}
