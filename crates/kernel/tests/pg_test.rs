#![allow(clippy::unwrap_used, clippy::expect_used)]
//! PostgreSQL integration tests.
//!
//! Exercise the write side (upserts, deletes, seeding) and `PgMenuStore`
//! reads against a real database. Skipped when `DATABASE_URL` is unset.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use omakase_kernel::menu::MenuCriteria;
use omakase_kernel::models::{
    Category, Locale, MenuItem, Tag, TagKind, TranslationInput, UpsertCategory, UpsertMenuItem,
    UpsertTag,
};
use omakase_kernel::seed::{self, SeedFile};

mod common;
use common::{TestDb, run_test, test_db};

fn translations(en: &str, bg: &str) -> BTreeMap<Locale, TranslationInput> {
    BTreeMap::from([
        (Locale::En, TranslationInput::new(en)),
        (Locale::Bg, TranslationInput::new(bg)),
    ])
}

fn price(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn tag(db: &TestDb, slug: &str, kind: TagKind) -> Tag {
    Tag::upsert(
        &db.pool,
        UpsertTag {
            id: None,
            slug: slug.to_string(),
            icon: None,
            color: None,
            kind,
            translations: translations(slug, &slug.to_uppercase()),
        },
    )
    .await
    .unwrap()
}

async fn category(db: &TestDb, slug: &str, en: &str) -> Category {
    Category::upsert(
        &db.pool,
        UpsertCategory {
            slug: Some(slug.to_string()),
            translations: translations(en, &en.to_uppercase()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

fn kappa(category_id: Option<Uuid>, tag_ids: Option<Vec<Uuid>>) -> UpsertMenuItem {
    UpsertMenuItem {
        id: None,
        slug: Some("kappa-maki".to_string()),
        price: price("6.90"),
        price_eur: Some(price("3.53")),
        pieces: Some(8),
        image_url: None,
        category_id,
        available: true,
        translations: BTreeMap::from([
            (
                Locale::En,
                TranslationInput::new("Kappa Maki").with_description("Cucumber roll"),
            ),
            (
                Locale::Bg,
                TranslationInput::new("Капа маки").with_description("Ролка с краставица"),
            ),
        ]),
        tag_ids,
    }
}

async fn tag_slugs(db: &TestDb, id: Uuid) -> Vec<String> {
    db.service()
        .get_menu_item_by_id(id, Locale::En)
        .await
        .unwrap()
        .expect("item exists")
        .tags
        .into_iter()
        .map(|t| t.slug)
        .collect()
}

// -------------------------------------------------------------------------
// Upserts
// -------------------------------------------------------------------------

#[test]
fn menu_item_upsert_round_trip() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let rolls = category(&db, "hosomaki", "Hosomaki").await;
        let vegan = tag(&db, "vegan", TagKind::Dietary).await;
        let sesame = tag(&db, "sesame", TagKind::Allergen).await;

        let saved = MenuItem::upsert(
            &db.pool,
            kappa(Some(rolls.id), Some(vec![vegan.id, sesame.id])),
        )
        .await
        .unwrap();

        let item = db
            .service()
            .get_menu_item_by_id(saved.id, Locale::Bg)
            .await
            .unwrap()
            .expect("item exists");
        assert_eq!(item.slug, "kappa-maki");
        assert_eq!(item.name, "Капа маки");
        assert_eq!(item.description, "Ролка с краставица");
        assert_eq!(item.price, price("6.90"));
        assert_eq!(item.price_eur, Some(price("3.53")));
        assert_eq!(item.pieces, Some(8));
        assert_eq!(item.category.map(|c| c.name), Some("HOSOMAKI".to_string()));

        // Links come back in the order they were given
        assert_eq!(tag_slugs(&db, saved.id).await, ["vegan", "sesame"]);
    });
}

#[test]
fn translation_upsert_updates_in_place() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let saved = MenuItem::upsert(&db.pool, kappa(None, None)).await.unwrap();

        let mut update = kappa(None, None);
        update.id = Some(saved.id);
        update.price = price("7.20");
        update.translations = BTreeMap::from([(Locale::En, TranslationInput::new("Cucumber Maki"))]);
        MenuItem::upsert(&db.pool, update).await.unwrap();

        assert_eq!(db.count("menu_items").await, 1);
        assert_eq!(db.count("menu_item_translations").await, 2);

        let view = db
            .service()
            .get_menu_item_translations(saved.id)
            .await
            .unwrap()
            .expect("item exists");
        assert_eq!(view.price, price("7.20"));
        assert_eq!(view.translations[&Locale::En].name, "Cucumber Maki");
        // No description given means NULL, read back as blank
        assert_eq!(view.translations[&Locale::En].description, "");
        // Locales not listed are left untouched
        assert_eq!(view.translations[&Locale::Bg].name, "Капа маки");
    });
}

#[test]
fn tag_set_is_replaced_only_when_given() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let vegan = tag(&db, "vegan", TagKind::Dietary).await;
        let sesame = tag(&db, "sesame", TagKind::Allergen).await;
        let saved = MenuItem::upsert(&db.pool, kappa(None, Some(vec![vegan.id, sesame.id])))
            .await
            .unwrap();

        let mut keep = kappa(None, None);
        keep.id = Some(saved.id);
        MenuItem::upsert(&db.pool, keep).await.unwrap();
        assert_eq!(tag_slugs(&db, saved.id).await, ["vegan", "sesame"]);

        let mut reorder = kappa(None, Some(vec![sesame.id, vegan.id]));
        reorder.id = Some(saved.id);
        MenuItem::upsert(&db.pool, reorder).await.unwrap();
        assert_eq!(tag_slugs(&db, saved.id).await, ["sesame", "vegan"]);

        let mut clear = kappa(None, Some(Vec::new()));
        clear.id = Some(saved.id);
        MenuItem::upsert(&db.pool, clear).await.unwrap();
        assert!(tag_slugs(&db, saved.id).await.is_empty());
        assert_eq!(db.count("menu_item_tags").await, 0);
    });
}

// -------------------------------------------------------------------------
// Deletes
// -------------------------------------------------------------------------

#[test]
fn category_delete_leaves_items_uncategorised() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let rolls = category(&db, "hosomaki", "Hosomaki").await;
        let saved = MenuItem::upsert(&db.pool, kappa(Some(rolls.id), None))
            .await
            .unwrap();

        assert!(Category::delete(&db.pool, rolls.id).await.unwrap());
        assert!(!Category::delete(&db.pool, rolls.id).await.unwrap());

        let item = db
            .service()
            .get_menu_item_by_id(saved.id, Locale::En)
            .await
            .unwrap()
            .expect("item survives its category");
        assert_eq!(item.category, None);
        assert_eq!(db.count("category_translations").await, 0);

        let criteria = MenuCriteria::new().in_category(rolls.id);
        let count = db.service().count_menu_items(Locale::En, &criteria).await.unwrap();
        assert_eq!(count, 0);
    });
}

#[test]
fn tag_delete_drops_links() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let vegan = tag(&db, "vegan", TagKind::Dietary).await;
        let sesame = tag(&db, "sesame", TagKind::Allergen).await;
        let saved = MenuItem::upsert(&db.pool, kappa(None, Some(vec![vegan.id, sesame.id])))
            .await
            .unwrap();

        assert!(Tag::delete(&db.pool, vegan.id).await.unwrap());

        assert_eq!(tag_slugs(&db, saved.id).await, ["sesame"]);
        assert_eq!(db.count("tag_translations").await, 2);
    });
}

// -------------------------------------------------------------------------
// Seeding and listing
// -------------------------------------------------------------------------

async fn sample_seed() -> SeedFile {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("seed/menu.json");
    SeedFile::load(&path).await.unwrap()
}

#[test]
fn seeding_twice_does_not_duplicate_rows() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        let seed = sample_seed().await;

        let first = seed::apply(&db.pool, &seed, false).await.unwrap();
        let links = db.count("menu_item_tags").await;
        let second = seed::apply(&db.pool, &seed, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.items, 8);
        assert_eq!(db.count("tags").await, 11);
        assert_eq!(db.count("categories").await, 3);
        assert_eq!(db.count("menu_items").await, 8);
        assert_eq!(db.count("menu_item_tags").await, links);
        assert_eq!(db.count("menu_item_translations").await, 16);

        let all = MenuCriteria::new();
        let count = db.service().count_menu_items(Locale::En, &all).await.unwrap();
        assert_eq!(count, 8);
    });
}

#[test]
fn seeded_menu_lists_through_postgres() {
    run_test(async {
        let Some(db) = test_db().await else { return };
        seed::apply(&db.pool, &sample_seed().await, true).await.unwrap();
        let service = db.service();

        let available = MenuCriteria::new().available_only();
        let items = service.list_menu_items(Locale::En, &available).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[..3], ["Philadelphia", "California", "Miso Soup"]);

        let uramaki = Category::find_by_slug(&db.pool, "uramaki")
            .await
            .unwrap()
            .expect("seeded category");
        let in_uramaki = MenuCriteria::new().in_category(uramaki.id);
        assert_eq!(service.count_menu_items(Locale::En, &in_uramaki).await.unwrap(), 4);
        let available_uramaki = in_uramaki.available_only();
        assert_eq!(
            service
                .count_menu_items(Locale::En, &available_uramaki)
                .await
                .unwrap(),
            3
        );

        let page = service
            .list_menu_page(Locale::En, &MenuCriteria::new().paginate(2, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 8);
        assert_eq!(page.items.len(), 2);

        let catalog = db.catalog();
        assert_eq!(catalog.list_categories(Locale::Bg).await.unwrap().len(), 3);
        assert_eq!(catalog.list_tags(Locale::En).await.unwrap().len(), 11);
    });
}
