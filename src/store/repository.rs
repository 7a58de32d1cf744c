use std::collections::BTreeMap;

use super::query::{sort_for_display, RecipeQuery};
use crate::error::SyncError;
use crate::model::Recipe;

/// Storage backend for recipes, keyed by `Recipe::id`
pub trait RecipeRepository: Send {
    fn count(&self) -> Result<usize, SyncError>;

    fn get(&self, id: &str) -> Result<Option<Recipe>, SyncError>;

    /// Matching recipes in display order
    fn fetch(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, SyncError>;

    /// Insert or replace every recipe by id. Either all are written or none.
    fn save_all(&mut self, recipes: &[Recipe]) -> Result<(), SyncError>;
}

/// Volatile backend, mostly for tests and previews
#[derive(Debug, Default)]
pub struct MemoryRepository {
    recipes: BTreeMap<String, Recipe>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecipeRepository for MemoryRepository {
    fn count(&self) -> Result<usize, SyncError> {
        Ok(self.recipes.len())
    }

    fn get(&self, id: &str) -> Result<Option<Recipe>, SyncError> {
        Ok(self.recipes.get(id).cloned())
    }

    fn fetch(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, SyncError> {
        let mut found: Vec<Recipe> = self
            .recipes
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        sort_for_display(&mut found);
        Ok(found)
    }

    fn save_all(&mut self, recipes: &[Recipe]) -> Result<(), SyncError> {
        for recipe in recipes {
            self.recipes.insert(recipe.id.clone(), recipe.clone());
        }
        Ok(())
    }
}
