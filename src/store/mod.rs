mod query;
mod repository;
mod seed;
mod sqlite;

pub use query::{display_order, sort_for_display, CategoryFilter, RecipeQuery};
pub use repository::{MemoryRepository, RecipeRepository};
pub use seed::{default_bundled, default_seeds, load_bundled};
pub use sqlite::SqliteRepository;

use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SyncError;
use crate::model::{NormalizedImport, Recipe, RecipeSeed, PLACEHOLDER_IMAGE};
use crate::sync::{BucketResult, SyncOrchestrator, SyncReport};

/// Category given to recipes from the bundled sample asset.
pub const BUNDLED_CATEGORY: &str = "Imported";

const IMPORTED_DIFFICULTY: &str = "—";
const DEFAULT_SERVINGS: &str = "2";

/// Counts shown above the recipe list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LibraryStats {
    pub recipes: usize,
    pub favorites: usize,
}

impl LibraryStats {
    pub fn of(recipes: &[Recipe]) -> Self {
        Self {
            recipes: recipes.len(),
            favorites: recipes.iter().filter(|r| r.is_favorite).count(),
        }
    }
}

/// Owns every recipe and is the only place they are mutated.
///
/// Mutations are staged and written by [`RecipeStore::save`]. A failed write
/// keeps them staged for the next save; queries see staged changes either way.
pub struct RecipeStore {
    repo: Box<dyn RecipeRepository>,
    pending: BTreeMap<String, Recipe>,
}

impl RecipeStore {
    pub fn new(repo: Box<dyn RecipeRepository>) -> Self {
        Self {
            repo,
            pending: BTreeMap::new(),
        }
    }

    /// Open a store backed by a SQLite file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        Ok(Self::new(Box::new(SqliteRepository::open(path)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryRepository::new()))
    }

    pub fn get(&self, id: &str) -> Result<Option<Recipe>, SyncError> {
        match self.pending.get(id) {
            Some(recipe) => Ok(Some(recipe.clone())),
            None => self.repo.get(id),
        }
    }

    pub fn count(&self) -> Result<usize, SyncError> {
        let mut count = self.repo.count()?;
        for id in self.pending.keys() {
            if self.repo.get(id)?.is_none() {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn stage(&mut self, recipe: Recipe) {
        self.pending.insert(recipe.id.clone(), recipe);
    }

    /// Write staged mutations. Returns `true` when something was committed.
    ///
    /// Failures are logged and swallowed.
    pub fn save(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }

        let batch: Vec<Recipe> = self.pending.values().cloned().collect();
        match self.repo.save_all(&batch) {
            Ok(()) => {
                debug!("Committed {} recipes", batch.len());
                self.pending.clear();
                true
            }
            Err(e) => {
                error!("Failed to save {} recipes: {}", batch.len(), e);
                false
            }
        }
    }

    /// Insert the seed recipes into an empty store. On a populated store only
    /// back-fill images of seeds still showing the placeholder.
    ///
    /// Returns the number of recipes written.
    pub fn seed_if_needed(&mut self, seeds: &[RecipeSeed]) -> Result<usize, SyncError> {
        let mut changed = 0;

        if self.count()? == 0 {
            let now = Utc::now();
            for seed in seeds {
                self.stage(seed.clone().into_recipe(now));
                changed += 1;
            }
            info!("Seeded {} recipes", changed);
        } else {
            for seed in seeds {
                let Some(mut existing) = self.get(&seed.id)? else {
                    continue;
                };
                if existing.image_reference.as_deref() == Some(PLACEHOLDER_IMAGE)
                    && seed.image_name != PLACEHOLDER_IMAGE
                {
                    existing.image_reference = Some(seed.image_name.clone());
                    self.stage(existing);
                    changed += 1;
                }
            }
            if changed > 0 {
                info!("Back-filled images on {} seed recipes", changed);
            }
        }

        self.save();
        Ok(changed)
    }

    /// Merge the bundled sample records under the "Imported" category
    pub fn import_bundled(&mut self, records: &[NormalizedImport]) -> Result<usize, SyncError> {
        self.import_online(records, BUNDLED_CATEGORY)
    }

    /// Merge fetched records under `category`. Returns the number of recipes
    /// created or changed; re-importing identical records changes nothing.
    pub fn import_online(
        &mut self,
        records: &[NormalizedImport],
        category: &str,
    ) -> Result<usize, SyncError> {
        let mut changed = 0;
        for record in records {
            if self.upsert_import(record, category)? {
                changed += 1;
            }
        }
        debug!(
            "Merged {} of {} records into {}",
            changed,
            records.len(),
            category
        );
        self.save();
        Ok(changed)
    }

    fn upsert_import(
        &mut self,
        record: &NormalizedImport,
        category: &str,
    ) -> Result<bool, SyncError> {
        let id = record.stable_key();
        let existing = self.get(&id)?;

        let merged = Recipe {
            id,
            title: record.title.clone(),
            summary: Some(format!(
                "Servings: {}",
                record.servings.as_deref().unwrap_or(DEFAULT_SERVINGS)
            )),
            category: Some(category.to_string()),
            ingredients: Some(ingredient_lines(&record.ingredients)),
            steps: Some(step_lines(&record.instructions)),
            image_reference: record.image.clone(),
            difficulty: Some(IMPORTED_DIFFICULTY.to_string()),
            duration_minutes: 0,
            is_favorite: existing.as_ref().is_some_and(|r| r.is_favorite),
            created_at: existing.as_ref().map_or_else(Utc::now, |r| r.created_at),
            last_cooked_at: existing.as_ref().and_then(|r| r.last_cooked_at),
        };

        if existing.as_ref() == Some(&merged) {
            return Ok(false);
        }
        self.stage(merged);
        Ok(true)
    }

    /// Run every sync bucket and merge each one as soon as it completes.
    /// Resolves once all buckets and their lookups have finished.
    pub async fn sync_online(&mut self, orchestrator: &SyncOrchestrator) -> SyncReport {
        let mut buckets = orchestrator.spawn_buckets();
        let mut report = SyncReport::default();

        while let Some(joined) = buckets.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!("Bucket task aborted: {}", e);
                    continue;
                }
            };

            self.merge_bucket(&result);
            report.buckets.push(result);
        }

        info!("Online sync merged {} records", report.total_records());
        report
    }

    /// Merge one finished bucket under its label. Failures are logged.
    pub fn merge_bucket(&mut self, result: &BucketResult) -> usize {
        let label = result.bucket.label();
        self.import_online(&result.records, label).unwrap_or_else(|e| {
            warn!("Failed to merge {} recipes: {}", label, e);
            0
        })
    }

    /// Recipes matching the search text and category filter, favorites first
    /// and newest first.
    pub fn query(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Recipe>, SyncError> {
        let query = RecipeQuery::new(search, category);
        let mut found = self.repo.fetch(&query)?;

        if !self.pending.is_empty() {
            found.retain(|r| !self.pending.contains_key(&r.id));
            found.extend(self.pending.values().filter(|r| query.matches(r)).cloned());
            sort_for_display(&mut found);
        }
        Ok(found)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<Option<Recipe>, SyncError> {
        self.mutate(id, |recipe| recipe.is_favorite = !recipe.is_favorite)
    }

    pub fn mark_cooked(&mut self, id: &str) -> Result<Option<Recipe>, SyncError> {
        self.mutate(id, |recipe| recipe.last_cooked_at = Some(Utc::now()))
    }

    fn mutate(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut Recipe),
    ) -> Result<Option<Recipe>, SyncError> {
        let Some(mut recipe) = self.get(id)? else {
            return Ok(None);
        };
        change(&mut recipe);
        self.stage(recipe.clone());
        self.save();
        Ok(Some(recipe))
    }
}

/// Bundled records separate ingredients with `|`, fetched ones with newlines.
fn ingredient_lines(ingredients: &str) -> String {
    ingredients
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One sentence per line.
fn step_lines(instructions: &str) -> String {
    instructions.replace(". ", ".\n").trim().to_string()
}
