//! Database models.

pub mod category;
pub mod locale;
pub mod menu_item;
pub mod tag;
pub mod translation;

pub use category::{Category, UpsertCategory};
pub use locale::{Locale, UnsupportedLocale};
pub use menu_item::{ItemTagLink, MenuItem, UpsertMenuItem};
pub use tag::{POPULAR_TAG_SLUG, Tag, TagKind, UnknownTagKind, UpsertTag};
pub use translation::{TranslationInput, TranslationKind, TranslationRow};
