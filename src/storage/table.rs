//! Generic JSON-backed table
//!
//! Each table file holds the next id to assign and every row:
//!
//! ```json
//! { "next_id": 4, "rows": [ ... ] }
//! ```
//!
//! Rows live in memory behind an `RwLock` between `load` and `save`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

use super::file_io::{read_json, write_json_atomic};

/// A row type stored in a [`Table`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Ord + From<u64> + Into<u64>;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableData<T> {
    #[serde(default)]
    next_id: u64,
    #[serde(default = "Vec::new")]
    rows: Vec<T>,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

struct TableState<T: Record> {
    next_id: u64,
    rows: BTreeMap<T::Id, T>,
}

/// In-memory rows persisted to one JSON file
pub struct Table<T: Record> {
    path: PathBuf,
    state: RwLock<TableState<T>>,
}

impl<T: Record> Table<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(TableState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> FleetResult<std::sync::RwLockReadGuard<'_, TableState<T>>> {
        self.state
            .read()
            .map_err(|e| FleetError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> FleetResult<std::sync::RwLockWriteGuard<'_, TableState<T>>> {
        self.state
            .write()
            .map_err(|e| FleetError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load rows from disk, replacing what is in memory
    pub fn load(&self) -> FleetResult<()> {
        let file_data: TableData<T> = read_json(&self.path)?;
        let mut state = self.write()?;

        state.rows.clear();
        let mut highest: u64 = 0;
        for row in file_data.rows {
            let raw: u64 = row.id().into();
            highest = highest.max(raw);
            state.rows.insert(row.id(), row);
        }
        // Never hand out an id that is already on disk
        state.next_id = file_data.next_id.max(highest + 1).max(1);

        Ok(())
    }

    /// Save rows to disk
    pub fn save(&self) -> FleetResult<()> {
        let state = self.read()?;
        let file_data = TableData {
            next_id: state.next_id,
            rows: state.rows.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: T::Id) -> FleetResult<Option<T>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    /// All rows ordered by id
    pub fn all(&self) -> FleetResult<Vec<T>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    /// Rows matching a predicate, ordered by id
    pub fn filter<F>(&self, predicate: F) -> FleetResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    /// First row matching a predicate
    pub fn find<F>(&self, predicate: F) -> FleetResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.rows.values().find(|row| predicate(row)).cloned())
    }

    /// Assign the next id and insert the row `build` makes from it.
    ///
    /// The id is only consumed when `build` succeeds.
    pub fn insert_with<F>(&self, build: F) -> FleetResult<T>
    where
        F: FnOnce(T::Id) -> FleetResult<T>,
    {
        let mut state = self.write()?;
        let row = build(T::Id::from(state.next_id))?;
        state.next_id += 1;
        state.rows.insert(row.id(), row.clone());
        Ok(row)
    }

    /// Insert or replace a row
    pub fn upsert(&self, row: T) -> FleetResult<()> {
        let mut state = self.write()?;
        let raw: u64 = row.id().into();
        if raw >= state.next_id {
            state.next_id = raw + 1;
        }
        state.rows.insert(row.id(), row);
        Ok(())
    }

    /// Remove a row, returning it if it existed
    pub fn delete(&self, id: T::Id) -> FleetResult<Option<T>> {
        Ok(self.write()?.rows.remove(&id))
    }

    /// Remove every row matching a predicate, returning the removed rows
    pub fn delete_where<F>(&self, predicate: F) -> FleetResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut state = self.write()?;
        let doomed: Vec<T::Id> = state
            .rows
            .values()
            .filter(|row| predicate(row))
            .map(|row| row.id())
            .collect();

        Ok(doomed
            .into_iter()
            .filter_map(|id| state.rows.remove(&id))
            .collect())
    }

    pub fn exists(&self, id: T::Id) -> FleetResult<bool> {
        Ok(self.read()?.rows.contains_key(&id))
    }

    pub fn count(&self) -> FleetResult<usize> {
        Ok(self.read()?.rows.len())
    }
}
