//! In-memory filtering, ordering and pagination of enriched menu items.
//!
//! Tag and search filters run here rather than in SQL because they depend on
//! joined and locale-resolved data. The window is always cut last, from the
//! fully filtered and sorted list.

use super::criteria::MenuCriteria;
use super::types::EnrichedMenuItem;

/// Apply the include-tags, exclude-tags and search filters, in that order.
pub fn apply_filters(
    items: Vec<EnrichedMenuItem>,
    criteria: &MenuCriteria,
) -> Vec<EnrichedMenuItem> {
    let needle = criteria.search_needle();

    items
        .into_iter()
        .filter(|item| {
            criteria.include_tag_ids.is_empty()
                || item.tags.iter().any(|t| criteria.include_tag_ids.contains(&t.id))
        })
        .filter(|item| {
            criteria.exclude_tag_ids.is_empty()
                || !item.tags.iter().any(|t| criteria.exclude_tag_ids.contains(&t.id))
        })
        .filter(|item| match &needle {
            Some(needle) => {
                item.name.to_lowercase().contains(needle.as_str())
                    || item.description.to_lowercase().contains(needle.as_str())
            }
            None => true,
        })
        .collect()
}

/// Popular items first, then oldest first.
///
/// Stable, so items with equal keys keep their storage order.
pub fn sort_popular_first(items: &mut [EnrichedMenuItem]) {
    items.sort_by_key(|item| (!item.is_popular(), item.created_at));
}

/// Cut the `offset`/`limit` window out of an already sorted list.
pub fn paginate(
    items: Vec<EnrichedMenuItem>,
    offset: usize,
    limit: Option<usize>,
) -> Vec<EnrichedMenuItem> {
    items
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::menu::types::TagSummary;
    use crate::models::TagKind;

    fn tag(slug: &str) -> TagSummary {
        TagSummary {
            id: Uuid::now_v7(),
            slug: slug.to_string(),
            name: slug.to_string(),
            icon: None,
            color: None,
            kind: TagKind::Special,
        }
    }

    fn item(name: &str, year: i32, tags: Vec<TagSummary>) -> EnrichedMenuItem {
        let created = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single().unwrap_or_default();
        EnrichedMenuItem {
            id: Uuid::now_v7(),
            slug: name.to_lowercase(),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            price_eur: None,
            pieces: None,
            image_url: None,
            available: true,
            category: None,
            tags,
            created_at: created,
            updated_at: created,
        }
    }

    fn names(items: &[EnrichedMenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn include_tags_use_or_semantics() {
        let vegan = tag("vegan");
        let spicy = tag("spicy");
        let items = vec![
            item("A", 2024, vec![vegan.clone()]),
            item("B", 2024, vec![spicy.clone()]),
            item("C", 2024, vec![]),
        ];
        let criteria = MenuCriteria::new().with_tags([vegan.id, spicy.id]);

        assert_eq!(names(&apply_filters(items, &criteria)), ["A", "B"]);
    }

    #[test]
    fn exclude_tags_drop_any_match() {
        let fish = tag("fish");
        let sesame = tag("sesame");
        let items = vec![
            item("A", 2024, vec![fish.clone()]),
            item("B", 2024, vec![sesame.clone(), tag("vegan")]),
            item("C", 2024, vec![tag("vegan")]),
        ];
        let criteria = MenuCriteria::new().without_tags([fish.id, sesame.id]);

        assert_eq!(names(&apply_filters(items, &criteria)), ["C"]);
    }

    #[test]
    fn search_matches_name_or_description() {
        let mut roll = item("Philadelphia", 2024, vec![]);
        roll.description = "Smoked SALMON roll".to_string();
        let items = vec![roll, item("Salmon nigiri", 2024, vec![]), item("Kappa", 2024, vec![])];
        let criteria = MenuCriteria::new().search("salmon");

        assert_eq!(
            names(&apply_filters(items, &criteria)),
            ["Philadelphia", "Salmon nigiri"]
        );
    }

    #[test]
    fn popular_sorts_first_then_oldest() {
        let popular = tag("popular");
        let mut items = vec![
            item("A", 2024, vec![popular.clone()]),
            item("B", 2023, vec![]),
            item("C", 2025, vec![popular.clone()]),
            item("D", 2022, vec![]),
        ];
        sort_popular_first(&mut items);

        assert_eq!(names(&items), ["A", "C", "D", "B"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut items = vec![item("first", 2024, vec![]), item("second", 2024, vec![])];
        sort_popular_first(&mut items);
        assert_eq!(names(&items), ["first", "second"]);
    }

    #[test]
    fn paginate_slices_window() {
        let items: Vec<_> = (0..5).map(|i| item(&i.to_string(), 2024, vec![])).collect();

        assert_eq!(names(&paginate(items.clone(), 1, Some(2))), ["1", "2"]);
        assert_eq!(names(&paginate(items.clone(), 4, Some(10))), ["4"]);
        assert!(paginate(items.clone(), 9, Some(2)).is_empty());
        assert_eq!(paginate(items, 0, None).len(), 5);
    }
}
