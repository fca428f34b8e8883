//! In-memory institution table served by the local lookup path.
//!
//! The table is an immutable snapshot behind an `Arc`. Readers clone the
//! `Arc` under a short read lock; `load` builds the replacement off to the
//! side and swaps the pointer under the write lock, so a reader sees either
//! the old table or the new one in full.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{BankList, Record};

type Table = BTreeMap<String, String>;

/// Snapshot table mapping institution code to display name.
///
/// No eviction and no TTL: the table holds exactly what the last `load`
/// supplied.
///
/// # Examples
///
/// ```
/// use bankbridge_core::{Record, RecordStore};
///
/// let store = RecordStore::new();
/// store.load(vec![Record::new("1234", "Royal Bank of Boredom").unwrap()]);
/// assert_eq!(store.get("1234").unwrap().name, "Royal Bank of Boredom");
///
/// store.load(vec![Record::new("5678", "Credit Sweets").unwrap()]);
/// assert!(store.get("1234").is_none());
/// ```
#[derive(Debug, Default)]
pub struct RecordStore {
    table: RwLock<Arc<Table>>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole table with `records`. Returns the number of rows now visible.
    ///
    /// Records with a blank id are dropped. Later duplicates of an id win.
    pub fn load<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let mut next = Table::new();
        for record in records {
            if !record.is_valid() {
                warn!("Skipping bank record with empty id (name: {:?})", record.name);
                continue;
            }
            next.insert(record.id, record.name);
        }

        let count = next.len();
        let previous = std::mem::replace(&mut *self.table.write(), Arc::new(next));
        // Free the old table, if this was its last reference, outside the lock.
        drop(previous);
        count
    }

    /// Reads the seed file at `path` and replaces the table with its rows.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreInit` if the file is missing, unreadable or
    /// malformed. The visible table is left untouched in that case.
    pub fn load_from_path(&self, path: &Path) -> Result<usize, AppError> {
        let records = read_seed_file(path)?;
        let count = self.load(records);
        info!("Loaded {} banks from {}", count, path.display());
        Ok(count)
    }

    /// Returns a consistent snapshot of every row.
    pub fn all_entries(&self) -> Vec<Record> {
        let snapshot = self.snapshot();
        snapshot
            .iter()
            .map(|(id, name)| Record {
                id: id.clone(),
                name: name.clone(),
            })
            .collect()
    }

    /// Point lookup. Absence is not an error.
    pub fn get(&self, id: &str) -> Option<Record> {
        self.snapshot().get(id).map(|name| Record {
            id: id.to_string(),
            name: name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn snapshot(&self) -> Arc<Table> {
        Arc::clone(&*self.table.read())
    }
}

/// Parses a `{ "banks": [...] }` seed file into records, skipping rows
/// without an institution code.
pub fn read_seed_file(path: &Path) -> Result<Vec<Record>, AppError> {
    let store_init = |reason: String| AppError::StoreInit {
        path: path.display().to_string(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| store_init(e.to_string()))?;
    let list: BankList = serde_json::from_str(&raw).map_err(|e| store_init(e.to_string()))?;

    let records = list
        .banks
        .into_iter()
        .filter_map(|entry| match entry.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping seed row in {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    Ok(records)
}
