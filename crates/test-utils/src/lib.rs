//! Omakase test utilities.
//!
//! Helpers for integration testing: menu fixtures and assertion utilities.
//! Fixtures are plain data; the kernel's test harness turns them into store
//! rows.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Midnight UTC on the given date.
///
/// Out-of-range dates fall back to the Unix epoch.
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// One translated name (and optional description).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTranslation {
    pub locale: &'static str,
    pub name: String,
    pub description: Option<String>,
}

/// Create a test category with default values.
pub fn test_category(slug: &str) -> TestCategory {
    TestCategory {
        id: Uuid::now_v7(),
        slug: Some(slug.to_string()),
        image_url: None,
        created_at: date(2024, 1, 1),
        translations: Vec::new(),
    }
}

/// A test category builder.
#[derive(Debug, Clone)]
pub struct TestCategory {
    pub id: Uuid,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub translations: Vec<TestTranslation>,
}

impl TestCategory {
    /// Drop the slug so readers fall back to the id.
    pub fn without_slug(mut self) -> Self {
        self.slug = None;
        self
    }

    /// Set the creation time.
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Add a translation.
    pub fn named(mut self, locale: &'static str, name: &str, description: &str) -> Self {
        self.translations.push(TestTranslation {
            locale,
            name: name.to_string(),
            description: Some(description.to_string()),
        });
        self
    }
}

/// Create a test tag. `kind` is one of dietary, spice, special, allergen.
pub fn test_tag(slug: &str, kind: &str) -> TestTag {
    TestTag {
        id: Uuid::now_v7(),
        slug: slug.to_string(),
        kind: kind.to_string(),
        icon: None,
        color: None,
        created_at: date(2024, 1, 1),
        translations: Vec::new(),
    }
}

/// The sort-priority tag.
pub fn popular_tag() -> TestTag {
    test_tag("popular", "special")
        .named("en", "Popular")
        .named("bg", "Популярно")
}

/// A test tag builder.
#[derive(Debug, Clone)]
pub struct TestTag {
    pub id: Uuid,
    pub slug: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub translations: Vec<TestTranslation>,
}

impl TestTag {
    /// Set icon and color.
    pub fn styled(mut self, icon: &str, color: &str) -> Self {
        self.icon = Some(icon.to_string());
        self.color = Some(color.to_string());
        self
    }

    /// Add a translated name.
    pub fn named(mut self, locale: &'static str, name: &str) -> Self {
        self.translations.push(TestTranslation {
            locale,
            name: name.to_string(),
            description: None,
        });
        self
    }
}

/// Create an available test menu item priced in leva (e.g. `"12.50"`).
pub fn test_menu_item(slug: &str, price: &str) -> TestMenuItem {
    TestMenuItem {
        id: Uuid::now_v7(),
        slug: Some(slug.to_string()),
        price: price.to_string(),
        price_eur: None,
        pieces: None,
        image_url: None,
        category_id: None,
        available: true,
        created_at: date(2024, 1, 1),
        tag_ids: Vec::new(),
        translations: Vec::new(),
    }
}

/// A test menu item builder.
#[derive(Debug, Clone)]
pub struct TestMenuItem {
    pub id: Uuid,
    pub slug: Option<String>,
    pub price: String,
    pub price_eur: Option<String>,
    pub pieces: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub tag_ids: Vec<Uuid>,
    pub translations: Vec<TestTranslation>,
}

impl TestMenuItem {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Place the item in a category.
    pub fn in_category(mut self, category: &TestCategory) -> Self {
        self.category_id = Some(category.id);
        self
    }

    /// Reference a category id that may not exist.
    pub fn in_category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Link a tag.
    pub fn with_tag(mut self, tag: &TestTag) -> Self {
        self.tag_ids.push(tag.id);
        self
    }

    /// Set the euro price.
    pub fn with_price_eur(mut self, price_eur: &str) -> Self {
        self.price_eur = Some(price_eur.to_string());
        self
    }

    /// Set the piece count.
    pub fn with_pieces(mut self, pieces: i32) -> Self {
        self.pieces = Some(pieces);
        self
    }

    /// Mark as not currently offered.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Set the creation time.
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Add a translation.
    pub fn named(mut self, locale: &'static str, name: &str, description: &str) -> Self {
        self.translations.push(TestTranslation {
            locale,
            name: name.to_string(),
            description: Some(description.to_string()),
        });
        self
    }
}

/// Assertion helpers for JSON responses.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual, expected,
            "JSON mismatch:\nactual: {actual:#}\nexpected: {expected:#}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a JSON array holds exactly `len` elements.
    pub fn array_len(value: &Value, len: usize) {
        let actual = value.as_array().map(Vec::len);
        assert_eq!(actual, Some(len), "Expected array of {len}, got: {value}");
    }
}
