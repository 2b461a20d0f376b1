//! In-process record store used for embedding and tests.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use lodge_domain::Record;

use crate::{
    storage::{RecordFilter, RecordStore},
    CoreError,
};

/// Keeps records in insertion order behind a read/write lock.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with records whose identifiers are already assigned.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, CoreError> {
        self.records
            .read()
            .map_err(|_| CoreError::Storage(format!("{} store lock poisoned", T::COLLECTION)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, CoreError> {
        self.records
            .write()
            .map_err(|_| CoreError::Storage(format!("{} store lock poisoned", T::COLLECTION)))
    }
}

impl<T: Record> RecordStore<T> for MemoryStore<T> {
    fn insert(&self, mut record: T) -> Result<Uuid, CoreError> {
        let id = Uuid::new_v4();
        record.assign_id(id);
        self.write()?.push(record);
        Ok(id)
    }

    fn find_all(&self, filter: Option<&RecordFilter>) -> Result<Vec<T>, CoreError> {
        let records = self.read()?;
        Ok(records
            .iter()
            .filter(|record| filter.map_or(true, |f| f.matches(*record)))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<T>, CoreError> {
        Ok(self.read()?.iter().find(|record| record.id() == id).cloned())
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}
