use chrono::{TimeZone, Utc};
use recipe_sync::store::{default_bundled, default_seeds, RecipeRepository, SqliteRepository};
use recipe_sync::{NormalizedImport, Recipe, RecipeStore, PLACEHOLDER_IMAGE};

fn sqlite_store() -> RecipeStore {
    RecipeStore::new(Box::new(SqliteRepository::open_in_memory().unwrap()))
}

fn stored(id: &str, favorite: bool, created_secs: i64, category: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        summary: Some("Weeknight dinner".to_string()),
        category: Some(category.to_string()),
        ingredients: Some("Rice\nBeans".to_string()),
        steps: Some("Cook".to_string()),
        image_reference: None,
        difficulty: Some("Easy".to_string()),
        duration_minutes: 20,
        is_favorite: favorite,
        created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
        last_cooked_at: None,
    }
}

fn ids(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_default_order_favorites_then_newest() {
    let mut repo = SqliteRepository::open_in_memory().unwrap();
    repo.save_all(&[
        stored("A", false, 2_000, "Dinner"),
        stored("B", true, 1_000, "Dinner"),
        stored("C", true, 3_000, "Dinner"),
    ])
    .unwrap();
    let store = RecipeStore::new(Box::new(repo));

    let recipes = store.query(None, None).unwrap();
    assert_eq!(ids(&recipes), vec!["C", "B", "A"]);
}

#[test]
fn test_favorites_filter_ignores_category() {
    let mut repo = SqliteRepository::open_in_memory().unwrap();
    repo.save_all(&[
        stored("drink", true, 1, "Drinks"),
        stored("salad", false, 2, "Salad"),
        stored("dinner", true, 3, "Dinner"),
    ])
    .unwrap();
    let store = RecipeStore::new(Box::new(repo));

    let favorites = store.query(None, Some("Favorites")).unwrap();
    assert_eq!(ids(&favorites), vec!["dinner", "drink"]);

    let all = store.query(Some("   "), Some("All")).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn test_search_matches_title_summary_or_ingredients() {
    let mut store = sqlite_store();
    store.seed_if_needed(&default_seeds()).unwrap();

    let by_title = store.query(Some("mojito"), None).unwrap();
    assert_eq!(ids(&by_title), vec!["drink-02-mojito"]);

    let by_summary = store.query(Some("GRAB-AND-GO"), None).unwrap();
    assert_eq!(ids(&by_summary), vec!["8bf054e7-6ee2-46df-9ae2-14a87d0d46fc"]);

    let by_ingredient = store.query(Some("balsamic"), None).unwrap();
    assert_eq!(ids(&by_ingredient), vec!["app-01-bruschetta"]);

    let narrowed = store.query(Some("olive oil"), Some("Salad")).unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].title, "Citrus Kale Salad");
}

#[test]
fn test_seed_rerun_performs_no_mutation() {
    let mut store = sqlite_store();
    let seeds = default_seeds();

    assert_eq!(store.seed_if_needed(&seeds).unwrap(), seeds.len());
    assert_eq!(store.count().unwrap(), seeds.len());
    let first = store.query(None, None).unwrap();

    assert_eq!(store.seed_if_needed(&seeds).unwrap(), 0);
    assert!(!store.has_pending());
    assert_eq!(store.query(None, None).unwrap(), first);
}

#[test]
fn test_seed_backfills_placeholder_images_only() {
    let seeds = default_seeds();
    let mut placeholder = seeds[0].clone().into_recipe(Utc.timestamp_opt(10, 0).unwrap());
    placeholder.image_reference = Some(PLACEHOLDER_IMAGE.to_string());
    placeholder.is_favorite = true;
    placeholder.last_cooked_at = Some(Utc.timestamp_opt(20, 0).unwrap());

    let mut custom = seeds[1].clone().into_recipe(Utc.timestamp_opt(10, 0).unwrap());
    custom.image_reference = Some("my-photo".to_string());

    let mut repo = SqliteRepository::open_in_memory().unwrap();
    repo.save_all(&[placeholder.clone(), custom.clone()]).unwrap();
    let mut store = RecipeStore::new(Box::new(repo));

    assert_eq!(store.seed_if_needed(&seeds).unwrap(), 1);
    assert_eq!(store.count().unwrap(), 2);

    let patched = store.get(&placeholder.id).unwrap().unwrap();
    assert_eq!(patched.image_reference.as_deref(), Some(seeds[0].image_name.as_str()));
    assert!(patched.is_favorite);
    assert_eq!(patched.last_cooked_at, placeholder.last_cooked_at);
    assert_eq!(patched.created_at, placeholder.created_at);

    assert_eq!(store.get(&custom.id).unwrap().unwrap(), custom);
    assert_eq!(store.seed_if_needed(&seeds).unwrap(), 0);
}

#[test]
fn test_seed_with_placeholder_artwork_stays_clean() {
    let mut seeds = default_seeds();
    seeds[0].image_name = PLACEHOLDER_IMAGE.to_string();
    let mut store = sqlite_store();

    assert_eq!(store.seed_if_needed(&seeds).unwrap(), seeds.len());
    assert_eq!(store.seed_if_needed(&seeds).unwrap(), 0);
    assert!(!store.has_pending());

    let kept = store.get(&seeds[0].id).unwrap().unwrap();
    assert_eq!(kept.image_reference.as_deref(), Some(PLACEHOLDER_IMAGE));
}

#[test]
fn test_search_folds_non_ascii_case_on_sqlite() {
    let mut soup = stored("soup", false, 100, "Dinner");
    soup.title = "ÇORBA Soup".to_string();
    soup.summary = Some("Kırmızı MERCİMEK".to_string());

    let mut repo = SqliteRepository::open_in_memory().unwrap();
    repo.save_all(&[soup, stored("rice", false, 200, "Dinner")]).unwrap();
    let store = RecipeStore::new(Box::new(repo));

    assert_eq!(ids(&store.query(Some("çorba"), None).unwrap()), vec!["soup"]);
    assert_eq!(ids(&store.query(Some("ÇORBA"), Some("Dinner")).unwrap()), vec!["soup"]);
    assert_eq!(ids(&store.query(Some("kırmızı"), None).unwrap()), vec!["soup"]);
    assert!(store.query(Some("çorba"), Some("Drinks")).unwrap().is_empty());
}

#[test]
fn test_bundled_import_is_idempotent() {
    let mut store = sqlite_store();
    let samples = default_bundled();

    assert_eq!(store.import_bundled(&samples).unwrap(), samples.len());
    let first = store.query(None, Some("Imported")).unwrap();
    assert_eq!(first.len(), samples.len());

    assert_eq!(store.import_bundled(&samples).unwrap(), 0);
    let second = store.query(None, Some("Imported")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_bundled_sample_mapping() {
    let mut store = sqlite_store();
    let samples = default_bundled();
    store.import_bundled(&samples).unwrap();

    let lassi = store.query(Some("lassi"), None).unwrap().remove(0);
    assert_eq!(lassi.category.as_deref(), Some("Imported"));
    assert_eq!(lassi.summary.as_deref(), Some("Servings: 2"));
    assert_eq!(lassi.ingredients_list().len(), 5);
    assert_eq!(lassi.steps_list().len(), 3);
    assert!(lassi.image_reference.is_none());

    let wedges = store.query(Some("sweet potato"), None).unwrap().remove(0);
    assert_eq!(wedges.summary.as_deref(), Some("Servings: 2"));
}

#[test]
fn test_import_keys_never_touch_seeds() {
    let mut store = sqlite_store();
    store.seed_if_needed(&default_seeds()).unwrap();

    let lookalike = NormalizedImport {
        title: "Classic Mojito".to_string(),
        ingredients: "Fresh mint leaves".to_string(),
        instructions: "Muddle.".to_string(),
        servings: None,
        image: None,
    };
    store.import_online(&[lookalike], "Drinks").unwrap();

    let drinks = store.query(Some("mojito"), Some("Drinks")).unwrap();
    assert_eq!(drinks.len(), 2);
    let seed = store.get("drink-02-mojito").unwrap().unwrap();
    assert_eq!(seed.difficulty.as_deref(), Some("Easy"));
}

#[test]
fn test_same_record_in_two_categories_moves() {
    let mut store = sqlite_store();
    let record = NormalizedImport {
        title: "Pancakes".to_string(),
        ingredients: "Flour\nEggs".to_string(),
        instructions: "Whisk. Fry.".to_string(),
        servings: Some("2".to_string()),
        image: None,
    };

    store.import_bundled(&[record.clone()]).unwrap();
    store.import_online(&[record.clone()], "Breakfast").unwrap();

    assert_eq!(store.count().unwrap(), 1);
    let recipe = store.get(&record.stable_key()).unwrap().unwrap();
    assert_eq!(recipe.category.as_deref(), Some("Breakfast"));
}

#[test]
fn test_toggle_and_cook_persist() {
    let path = std::env::temp_dir().join(format!(
        "recipe-sync-test-{}-{}.db",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));

    {
        let mut store = RecipeStore::open(&path).unwrap();
        store.seed_if_needed(&default_seeds()).unwrap();
        let toggled = store.toggle_favorite("app-01-bruschetta").unwrap().unwrap();
        assert!(toggled.is_favorite);
        let cooked = store.mark_cooked("app-01-bruschetta").unwrap().unwrap();
        assert!(cooked.last_cooked_at.is_some());
        assert!(cooked.is_favorite);
    }

    let store = RecipeStore::open(&path).unwrap();
    let recipes = store.query(None, None).unwrap();
    assert_eq!(recipes.len(), 8);
    assert_eq!(recipes[0].id, "app-01-bruschetta");
    assert!(recipes[0].last_cooked_at.is_some());

    drop(store);
    let _ = std::fs::remove_file(&path);
}
