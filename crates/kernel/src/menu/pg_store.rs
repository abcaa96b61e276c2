//! PostgreSQL implementation of [`MenuStore`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_query::{Alias, Expr, Order, PostgresQueryBuilder, Query};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::store::{CandidateQuery, MenuStore};
use crate::db;
use crate::models::{
    Category, ItemTagLink, Locale, MenuItem, Tag, TranslationKind, TranslationRow,
};

const ITEM_COLUMNS: [&str; 10] = [
    "id",
    "slug",
    "price",
    "price_eur",
    "pieces",
    "image_url",
    "category_id",
    "available",
    "created_at",
    "updated_at",
];

/// Build the candidate item query.
///
/// Only the category and availability predicates are pushed to SQL; tag and
/// search filters need joined data and run in memory.
pub fn build_candidate_query(query: CandidateQuery) -> String {
    let mut select = Query::select();
    select
        .columns(ITEM_COLUMNS.iter().map(|c| Alias::new(*c)))
        .from(Alias::new("menu_items"));

    if let Some(category_id) = query.category_id {
        select.and_where(Expr::col(Alias::new("category_id")).eq(category_id));
    }

    if query.available_only {
        select.and_where(Expr::col(Alias::new("available")).eq(true));
    }

    select
        .order_by(Alias::new("created_at"), Order::Asc)
        .order_by(Alias::new("id"), Order::Asc);

    select.to_string(PostgresQueryBuilder)
}

/// Menu store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl std::fmt::Debug for PgMenuStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgMenuStore").finish()
    }
}

#[async_trait]
impl MenuStore for PgMenuStore {
    async fn fetch_items(&self, query: CandidateQuery) -> Result<Vec<MenuItem>> {
        let sql = build_candidate_query(query);
        debug!(sql = %sql, "fetching candidate menu items");

        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch menu items")?;

        Ok(items)
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        MenuItem::find_by_id(&self.pool, id).await
    }

    async fn fetch_categories(&self, ids: Option<&[Uuid]>) -> Result<Vec<Category>> {
        let categories = match ids {
            Some([]) => Vec::new(),
            Some(ids) => sqlx::query_as::<_, Category>(
                "SELECT id, slug, image_url, created_at, updated_at \
                 FROM categories WHERE id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch categories")?,
            None => sqlx::query_as::<_, Category>(
                "SELECT id, slug, image_url, created_at, updated_at \
                 FROM categories ORDER BY created_at, id",
            )
            .fetch_all(&self.pool)
            .await
            .context("failed to list categories")?,
        };

        Ok(categories)
    }

    async fn fetch_tags(&self, ids: Option<&[Uuid]>) -> Result<Vec<Tag>> {
        let tags = match ids {
            Some([]) => Vec::new(),
            Some(ids) => sqlx::query_as::<_, Tag>(
                "SELECT id, slug, icon, color, category, created_at, updated_at \
                 FROM tags WHERE id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch tags")?,
            None => sqlx::query_as::<_, Tag>(
                "SELECT id, slug, icon, color, category, created_at, updated_at \
                 FROM tags ORDER BY category, slug",
            )
            .fetch_all(&self.pool)
            .await
            .context("failed to list tags")?,
        };

        Ok(tags)
    }

    async fn fetch_tag_links(&self, item_ids: &[Uuid]) -> Result<Vec<ItemTagLink>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = sqlx::query_as::<_, ItemTagLink>(
            r#"
            SELECT menu_item_id, tag_id, created_at
            FROM menu_item_tags
            WHERE menu_item_id = ANY($1)
            ORDER BY created_at, tag_id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch menu item tags")?;

        Ok(links)
    }

    async fn fetch_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
        locale: Locale,
    ) -> Result<Vec<TranslationRow>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ANY($1) AND locale = $2",
            kind.select_columns(),
            kind.table(),
            kind.owner_column()
        );

        let rows = sqlx::query_as::<_, TranslationRow>(&sql)
            .bind(owner_ids)
            .bind(locale.as_str())
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to fetch {}", kind.table()))?;

        Ok(rows)
    }

    async fn fetch_all_translations(
        &self,
        kind: TranslationKind,
        owner_ids: &[Uuid],
    ) -> Result<Vec<TranslationRow>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ANY($1) ORDER BY {}, locale",
            kind.select_columns(),
            kind.table(),
            kind.owner_column(),
            kind.owner_column()
        );

        let rows = sqlx::query_as::<_, TranslationRow>(&sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to fetch {}", kind.table()))?;

        Ok(rows)
    }

    async fn ping(&self) -> bool {
        db::check_health(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_query_without_predicates() {
        let sql = build_candidate_query(CandidateQuery::default());

        assert!(sql.starts_with("SELECT"));
        assert!(sql.contains(r#"FROM "menu_items""#));
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains(r#""created_at" ASC"#));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn candidate_query_with_category() {
        let id = Uuid::now_v7();
        let sql = build_candidate_query(CandidateQuery {
            category_id: Some(id),
            available_only: false,
        });

        assert!(sql.contains("WHERE"));
        assert!(sql.contains(r#""category_id""#));
        assert!(sql.contains(&id.to_string()));
        assert!(!sql.contains(r#""available" ="#));
    }

    #[test]
    fn candidate_query_with_availability() {
        let sql = build_candidate_query(CandidateQuery {
            category_id: None,
            available_only: true,
        });

        assert!(sql.contains("WHERE"));
        assert!(sql.contains(r#""available""#));
        assert!(sql.contains("TRUE"));
    }

    #[test]
    fn candidate_query_selects_all_item_columns() {
        let sql = build_candidate_query(CandidateQuery::default());
        for column in ITEM_COLUMNS {
            assert!(sql.contains(&format!("\"{column}\"")), "missing {column}");
        }
    }
}
