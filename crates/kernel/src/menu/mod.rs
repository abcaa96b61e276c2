//! Menu query engine.
//!
//! Reads menu items, categories and tags from a [`MenuStore`], resolves their
//! translations for one locale, and applies filtering, ordering and
//! pagination:
//! - [`MenuService`] lists, counts and fetches enriched menu items
//! - [`CatalogService`] lists categories and tags, with caching
//! - [`PgMenuStore`] and [`MemoryStore`] are the storage backends

mod catalog;
mod criteria;
mod filter;
mod memory;
mod pg_store;
mod resolver;
mod service;
mod store;
mod types;

pub use catalog::CatalogService;
pub use criteria::MenuCriteria;
pub use filter::{apply_filters, paginate, sort_popular_first};
pub use memory::MemoryStore;
pub use pg_store::{PgMenuStore, build_candidate_query};
pub use resolver::TranslationIndex;
pub use service::{DEFAULT_FEATURED_LIMIT, MenuService};
pub use store::{CandidateQuery, MenuStore};
pub use types::{
    CategorySummary, EnrichedMenuItem, LocalizedCategory, LocalizedTag, LocalizedText,
    MenuItemTranslations, MenuPage, TagSummary,
};
