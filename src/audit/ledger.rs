//! Append-only change ledger
//!
//! [`JsonlLedger`] stores one [`ChangeRecord`] per line and flushes every
//! append. The only rewrite is a clear, which replaces the file atomically.
//! Record ids come from the ledger and never repeat, even after a clear:
//! the highest id ever handed out is kept in a small sidecar file.
//!
//! Appends and clears hold an exclusive lock on `<ledger>.lock` and read the
//! high-water mark from disk each time, so several processes can share one
//! ledger file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{FleetError, FleetResult};
use crate::models::{ChangeRecordId, UserId};
use crate::storage::file_io::{
    append_json_line, read_json, read_json_lines, write_json_atomic, write_json_lines_atomic,
};

use super::entry::{ChangeRecord, EntityType, NewChangeRecord};

/// Query over the ledger; every unset field matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<u64>,
    pub actor_id: Option<UserId>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn entity_id(mut self, entity_id: u64) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn actor(mut self, actor_id: UserId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &ChangeRecord) -> bool {
        self.entity_type.map_or(true, |t| record.entity_type == t)
            && self.entity_id.map_or(true, |id| record.entity_id == id)
            && self.actor_id.map_or(true, |actor| record.actor_id == actor)
    }

    /// Filter, order newest first and truncate
    pub fn apply<'r, I>(&self, records: I) -> Vec<ChangeRecord>
    where
        I: IntoIterator<Item = &'r ChangeRecord>,
    {
        let mut matched: Vec<ChangeRecord> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// Which records a clear removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Only records written by this actor
    Actor(UserId),
    /// Everything
    All,
}

impl ClearScope {
    fn covers(&self, record: &ChangeRecord) -> bool {
        match self {
            ClearScope::Actor(actor) => record.actor_id == *actor,
            ClearScope::All => true,
        }
    }
}

/// Timestamp descending, id descending on ties
pub fn sort_newest_first(records: &mut [ChangeRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

/// Storage for change records
pub trait ChangeLedger: Send + Sync {
    /// Persist a record, assigning its id (and its timestamp when unset)
    fn append(&self, record: NewChangeRecord) -> FleetResult<ChangeRecord>;

    /// Records matching the filter, newest first
    fn list(&self, filter: &HistoryFilter) -> FleetResult<Vec<ChangeRecord>>;

    /// Remove records in scope, returning how many were removed
    fn clear(&self, scope: ClearScope) -> FleetResult<usize>;

    fn count(&self) -> FleetResult<usize>;
}

fn poisoned() -> FleetError {
    FleetError::Storage("history lock poisoned".into())
}

/// Line-delimited JSON ledger on disk
pub struct JsonlLedger {
    path: PathBuf,
    seq_path: PathBuf,
    lock_path: PathBuf,
    /// Serializes writers within this process
    writer: Mutex<()>,
}

/// Held while an append or clear is in progress; unlocks on drop
struct WriteLock {
    _file: File,
}

impl JsonlLedger {
    pub fn new(path: PathBuf, seq_path: PathBuf) -> Self {
        let lock_path = path.with_extension("lock");
        Self {
            path,
            seq_path,
            lock_path,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in file order (oldest first)
    pub fn read_all(&self) -> FleetResult<Vec<ChangeRecord>> {
        read_json_lines(&self.path)
    }

    fn lock_file(&self) -> FleetResult<WriteLock> {
        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| {
                FleetError::Storage(format!("Failed to open {}: {}", self.lock_path.display(), e))
            })?;
        file.lock()
            .map_err(|e| FleetError::Storage(format!("Failed to lock history: {}", e)))?;
        Ok(WriteLock { _file: file })
    }

    /// Highest id ever assigned, read fresh from disk
    ///
    /// Only meaningful while the write lock is held.
    fn high_water_mark(&self) -> FleetResult<u64> {
        let from_seq: u64 = read_json(&self.seq_path)?;
        let from_file = self
            .read_all()?
            .iter()
            .map(|r| r.id.get())
            .max()
            .unwrap_or(0);
        Ok(from_seq.max(from_file))
    }
}

impl ChangeLedger for JsonlLedger {
    fn append(&self, record: NewChangeRecord) -> FleetResult<ChangeRecord> {
        let _guard = self.writer.lock().map_err(|_| poisoned())?;
        let _lock = self.lock_file()?;
        let next = self.high_water_mark()? + 1;

        let record = record.into_record(ChangeRecordId::new(next));
        append_json_line(&self.path, &record)?;

        debug!(
            id = next,
            action = record.action.as_str(),
            entity_type = %record.entity_type,
            entity_id = record.entity_id,
            "appended change record"
        );
        Ok(record)
    }

    fn list(&self, filter: &HistoryFilter) -> FleetResult<Vec<ChangeRecord>> {
        let records = self.read_all()?;
        Ok(filter.apply(&records))
    }

    fn clear(&self, scope: ClearScope) -> FleetResult<usize> {
        let _guard = self.writer.lock().map_err(|_| poisoned())?;
        let _lock = self.lock_file()?;
        let last = self.high_water_mark()?;

        let records = self.read_all()?;
        let before = records.len();
        let kept: Vec<ChangeRecord> = records.into_iter().filter(|r| !scope.covers(r)).collect();
        let removed = before - kept.len();

        if removed == 0 {
            return Ok(0);
        }

        // Sidecar first: a crash between the two writes must not let ids repeat
        write_json_atomic(&self.seq_path, &last)?;
        write_json_lines_atomic(&self.path, &kept)?;

        info!(removed, remaining = kept.len(), ?scope, "cleared history");
        Ok(removed)
    }

    fn count(&self) -> FleetResult<usize> {
        Ok(self.read_all()?.len())
    }
}

/// In-memory ledger for tests and dry runs
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<(u64, Vec<ChangeRecord>)>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeLedger for MemoryLedger {
    fn append(&self, record: NewChangeRecord) -> FleetResult<ChangeRecord> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        state.0 += 1;
        let record = record.into_record(ChangeRecordId::new(state.0));
        state.1.push(record.clone());
        Ok(record)
    }

    fn list(&self, filter: &HistoryFilter) -> FleetResult<Vec<ChangeRecord>> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(filter.apply(&state.1))
    }

    fn clear(&self, scope: ClearScope) -> FleetResult<usize> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        let before = state.1.len();
        state.1.retain(|r| !scope.covers(r));
        Ok(before - state.1.len())
    }

    fn count(&self) -> FleetResult<usize> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state.1.len())
    }
}
