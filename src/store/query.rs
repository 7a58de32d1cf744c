use std::cmp::Ordering;

use crate::model::{Recipe, FILTER_ALL, FILTER_FAVORITES};

/// Category predicate derived from the list filter label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Favorites,
    Exact(String),
}

/// Conjunctive recipe filter. Results are always ordered favorites first,
/// then newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    pub category: CategoryFilter,
    /// Lowercased, trimmed search needle; `None` when the search box is blank
    pub needle: Option<String>,
}

impl RecipeQuery {
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        let category = match category {
            None | Some(FILTER_ALL) => CategoryFilter::Any,
            Some(FILTER_FAVORITES) => CategoryFilter::Favorites,
            Some(other) => CategoryFilter::Exact(other.to_string()),
        };

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Self { category, needle }
    }

    pub fn all() -> Self {
        Self::new(None, None)
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_ok = match &self.category {
            CategoryFilter::Any => true,
            CategoryFilter::Favorites => recipe.is_favorite,
            CategoryFilter::Exact(category) => recipe.category.as_deref() == Some(category.as_str()),
        };

        category_ok
            && self.needle.as_deref().map_or(true, |needle| {
                contains_folded(Some(&recipe.title), needle)
                    || contains_folded(recipe.summary.as_deref(), needle)
                    || contains_folded(recipe.ingredients.as_deref(), needle)
            })
    }
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// Favorites first, then `created_at` descending. Ties fall back to id so
/// every backend returns the same order.
pub fn display_order(a: &Recipe, b: &Recipe) -> Ordering {
    b.is_favorite
        .cmp(&a.is_favorite)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_for_display(recipes: &mut [Recipe]) {
    recipes.sort_by(display_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn recipe(id: &str, category: &str, favorite: bool) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Title {id}"),
            summary: Some("Crunchy and Bright".to_string()),
            category: Some(category.to_string()),
            ingredients: Some("1 Lime\nMint".to_string()),
            steps: None,
            image_reference: None,
            difficulty: None,
            duration_minutes: 0,
            is_favorite: favorite,
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            last_cooked_at: None,
        }
    }

    #[test]
    fn test_all_and_none_skip_category() {
        assert_eq!(RecipeQuery::new(None, Some("All")).category, CategoryFilter::Any);
        assert_eq!(RecipeQuery::new(None, None).category, CategoryFilter::Any);
    }

    #[test]
    fn test_favorites_ignores_category_field() {
        let query = RecipeQuery::new(None, Some("Favorites"));
        assert!(query.matches(&recipe("a", "Drinks", true)));
        assert!(!query.matches(&recipe("b", "Favorites", false)));
    }

    #[test]
    fn test_exact_category() {
        let query = RecipeQuery::new(None, Some("Drinks"));
        assert!(query.matches(&recipe("a", "Drinks", false)));
        assert!(!query.matches(&recipe("b", "drinks", false)));
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        let r = recipe("a", "Drinks", false);
        assert!(RecipeQuery::new(Some("  lime "), None).matches(&r));
        assert!(RecipeQuery::new(Some("BRIGHT"), None).matches(&r));
        assert!(RecipeQuery::new(Some("title A"), None).matches(&r));
        assert!(!RecipeQuery::new(Some("basil"), None).matches(&r));
        assert_eq!(RecipeQuery::new(Some("   "), None).needle, None);
    }

    #[test]
    fn test_search_and_category_combine() {
        let query = RecipeQuery::new(Some("mint"), Some("Salad"));
        assert!(!query.matches(&recipe("a", "Drinks", false)));
        assert!(query.matches(&recipe("b", "Salad", false)));
    }

    #[test]
    fn test_display_order() {
        let mut a = recipe("a", "X", false);
        a.created_at = Utc.timestamp_opt(200, 0).unwrap();
        let mut b = recipe("b", "X", true);
        b.created_at = Utc.timestamp_opt(100, 0).unwrap();
        let mut c = recipe("c", "X", true);
        c.created_at = Utc.timestamp_opt(300, 0).unwrap();

        let mut list = vec![a, b, c];
        sort_for_display(&mut list);
        let ids: Vec<_> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }
}
