use chrono::{DateTime, Utc};
use uuid::Uuid;

use lodge_domain::Record;

use crate::CoreError;

/// Optional `created_at` window applied by [`RecordStore::find_all`]. Both bounds inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn created_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            created_from: Some(from),
            created_to: Some(to),
        }
    }

    pub fn matches<T: Record>(&self, record: &T) -> bool {
        let created = record.created_at();
        self.created_from.map_or(true, |from| created >= from)
            && self.created_to.map_or(true, |to| created <= to)
    }
}

/// Abstraction over persistence backends holding one collection of records.
///
/// Implementations assign identifiers on insertion. A failing call is terminal for
/// the caller's operation; nothing here retries.
pub trait RecordStore<T: Record>: Send + Sync {
    fn insert(&self, record: T) -> Result<Uuid, CoreError>;
    fn find_all(&self, filter: Option<&RecordFilter>) -> Result<Vec<T>, CoreError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<T>, CoreError>;
    /// Returns `false` when no record had that identifier.
    fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError>;
}
