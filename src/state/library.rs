use rusqlite::backup::Backup;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

use super::data::{value_to_text, FoodRecord};
use crate::error::{Error, Result};

/// Maximum number of rows a search returns
pub const RESULT_LIMIT: usize = 10;

const SEARCH_SQL: &str = "SELECT code, product_name, brands, nova_group, sugars, salt, fat,
        carbohydrates, proteins, energy_kcal, ingredients_text
 FROM foods
 WHERE product_name LIKE ?1
 LIMIT ?2";

/// The FoodStore is the read-only, in-memory copy of the bundled dataset.
///
/// It is cheap to clone: clones share one connection. The connection is
/// switched to `query_only` right after loading, so nothing can write to it.
#[derive(Clone)]
pub struct FoodStore {
    conn: Arc<Mutex<Connection>>,
    source: PathBuf,
    row_count: i64,
}

impl FoodStore {
    /// Copy the dataset file into a fresh in-memory database.
    ///
    /// The file is opened read-only, so a missing file is an error rather
    /// than a silently created empty database.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatasetMissing(path.display().to_string()));
        }

        let source = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let mut conn = Connection::open_in_memory()?;
        {
            let backup = Backup::new(&source, &mut conn)?;
            backup.run_to_completion(256, Duration::ZERO, None)?;
        }

        conn.pragma_update(None, "query_only", true)?;

        // Fails with "no such table" on a file that isn't a foods dataset
        let row_count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;

        Ok(FoodStore {
            conn: Arc::new(Mutex::new(conn)),
            source: path.to_path_buf(),
            row_count,
        })
    }

    /// Path of the file this store was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of rows in the `foods` table
    pub fn row_count(&self) -> i64 {
        self.row_count
    }

    /// Find up to [`RESULT_LIMIT`] foods whose name contains `query`.
    ///
    /// Matching is SQLite `LIKE`, so it is case-insensitive for ASCII and
    /// `%`/`_` in the query act as wildcards. Rows come back in table order.
    pub fn search(&self, query: &str) -> Result<Vec<FoodRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(SEARCH_SQL)?;

        let pattern = format!("%{query}%");
        let food_iter = stmt.query_map(rusqlite::params![pattern, RESULT_LIMIT as i64], |row| {
            Ok(FoodRecord {
                code: value_to_text(row.get(0)?),
                product_name: value_to_text(row.get(1)?),
                brands: value_to_text(row.get(2)?),
                nova_group: value_to_text(row.get(3)?),
                sugars: value_to_text(row.get(4)?),
                salt: value_to_text(row.get(5)?),
                fat: value_to_text(row.get(6)?),
                carbohydrates: value_to_text(row.get(7)?),
                proteins: value_to_text(row.get(8)?),
                energy_kcal: value_to_text(row.get(9)?),
                ingredients_text: value_to_text(row.get(10)?),
            })
        })?;

        let mut foods = Vec::new();
        for food in food_iter {
            foods.push(food?);
        }

        Ok(foods)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock can't leave a read-only connection inconsistent
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for FoodStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodStore")
            .field("source", &self.source)
            .field("row_count", &self.row_count)
            .finish()
    }
}

/// Load the dataset on a blocking worker.
///
/// This is the startup task: it runs once, in the background, and its
/// result is only ever delivered to the readiness handle.
pub async fn load_dataset(path: PathBuf) -> Result<FoodStore> {
    let store = tokio::task::spawn_blocking(move || FoodStore::open(&path)).await??;

    info!(
        "✅ Dataset loaded: {} foods from {}",
        store.row_count(),
        store.source().display()
    );

    Ok(store)
}

/// Whether the dataset can serve queries yet
///
/// A failed load never recovers; it refuses queries exactly like a
/// pending one.
#[derive(Debug, Clone, Default)]
pub enum Readiness {
    #[default]
    Loading,
    Ready(FoodStore),
    Failed,
}

impl Readiness {
    /// The store, if loading finished successfully
    pub fn store(&self) -> Option<&FoodStore> {
        match self {
            Readiness::Ready(store) => Some(store),
            Readiness::Loading | Readiness::Failed => None,
        }
    }
}
