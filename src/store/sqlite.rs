use chrono::{DateTime, Utc};
use log::info;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;

use super::query::{CategoryFilter, RecipeQuery};
use super::repository::RecipeRepository;
use crate::error::SyncError;
use crate::model::Recipe;

const COLUMNS: &str = "id, title, summary, category, ingredients, steps, image_reference,
     difficulty, duration_minutes, is_favorite, created_at, last_cooked_at";

/// SQLite-backed recipe table. Timestamps are stored as Unix milliseconds.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open or create the database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!("Recipe database opened at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, SyncError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, SyncError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS recipes (
                id               TEXT PRIMARY KEY NOT NULL,
                title            TEXT NOT NULL,
                summary          TEXT,
                category         TEXT,
                ingredients      TEXT,
                steps            TEXT,
                image_reference  TEXT,
                difficulty       TEXT,
                duration_minutes INTEGER NOT NULL DEFAULT 0,
                is_favorite      INTEGER NOT NULL DEFAULT 0,
                created_at       INTEGER NOT NULL,
                last_cooked_at   INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_recipes_display
                ON recipes(is_favorite DESC, created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_recipes_category
                ON recipes(category);",
        )?;
        Ok(Self { conn })
    }
}

fn timestamp(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

fn recipe_from_row(row: &Row) -> rusqlite::Result<Recipe> {
    let created_at: i64 = row.get(10)?;
    let last_cooked_at: Option<i64> = row.get(11)?;

    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        category: row.get(3)?,
        ingredients: row.get(4)?,
        steps: row.get(5)?,
        image_reference: row.get(6)?,
        difficulty: row.get(7)?,
        duration_minutes: row.get(8)?,
        is_favorite: row.get(9)?,
        created_at: timestamp(10, created_at)?,
        last_cooked_at: last_cooked_at.map(|ms| timestamp(11, ms)).transpose()?,
    })
}

impl RecipeRepository for SqliteRepository {
    fn count(&self) -> Result<usize, SyncError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn get(&self, id: &str) -> Result<Option<Recipe>, SyncError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM recipes WHERE id = ?1"))?;
        let mut rows = stmt.query_map([id], recipe_from_row)?;
        Ok(rows.next().transpose()?)
    }

    fn fetch(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, SyncError> {
        let mut sql = format!("SELECT {COLUMNS} FROM recipes WHERE 1 = 1");
        let mut args: Vec<SqlValue> = Vec::new();

        match &query.category {
            CategoryFilter::Any => {}
            CategoryFilter::Favorites => sql.push_str(" AND is_favorite = 1"),
            CategoryFilter::Exact(category) => {
                sql.push_str(" AND category = ?");
                args.push(SqlValue::Text(category.clone()));
            }
        }

        sql.push_str(" ORDER BY is_favorite DESC, created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_from_iter(args), recipe_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // SQLite's lower() only folds ASCII, so text search runs here
        if query.needle.is_none() {
            return Ok(recipes);
        }
        Ok(recipes.into_iter().filter(|r| query.matches(r)).collect())
    }

    fn save_all(&mut self, recipes: &[Recipe]) -> Result<(), SyncError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO recipes ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    summary = excluded.summary,
                    category = excluded.category,
                    ingredients = excluded.ingredients,
                    steps = excluded.steps,
                    image_reference = excluded.image_reference,
                    difficulty = excluded.difficulty,
                    duration_minutes = excluded.duration_minutes,
                    is_favorite = excluded.is_favorite,
                    created_at = excluded.created_at,
                    last_cooked_at = excluded.last_cooked_at"
            ))?;

            for recipe in recipes {
                stmt.execute(params![
                    recipe.id,
                    recipe.title,
                    recipe.summary,
                    recipe.category,
                    recipe.ingredients,
                    recipe.steps,
                    recipe.image_reference,
                    recipe.difficulty,
                    recipe.duration_minutes,
                    recipe.is_favorite,
                    recipe.created_at.timestamp_millis(),
                    recipe.last_cooked_at.map(|t| t.timestamp_millis()),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
