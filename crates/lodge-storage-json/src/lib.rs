//! lodge-storage-json
//!
//! File-backed [`RecordStore`] keeping one pretty-printed JSON array per collection,
//! with atomic replacement and rotating timestamped backups.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lodge_core::{CoreError, RecordFilter, RecordStore};
use lodge_domain::Record;

const DATA_EXTENSION: &str = "json";
const BACKUP_DATE_FORMAT: &str = "%Y%m%d";
const BACKUP_TIME_FORMAT: &str = "%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Directories used by a store: live collection files and their backups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<base>/data` and `<base>/backups`.
    pub fn under(base: &Path) -> Self {
        Self {
            data_root: base.join("data"),
            backup_root: base.join("backups"),
        }
    }
}

/// A backup file of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub collection: String,
    /// File name, unique within the collection's backup directory.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

/// JSON persistence for the records of type `T`, stored at `<data_root>/<collection>.json`.
///
/// Read-modify-write cycles are serialized by an in-process mutex. Each overwrite first
/// copies the previous file into the backup directory and prunes backups beyond the
/// retention count.
pub struct JsonRecordStore<T> {
    paths: StoragePaths,
    retention: usize,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record> JsonRecordStore<T> {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
            lock: Mutex::new(()),
            _records: PhantomData,
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn collection_path(&self) -> PathBuf {
        self.paths
            .data_root
            .join(format!("{}.{}", canonical_name(T::COLLECTION), DATA_EXTENSION))
    }

    fn backup_dir(&self) -> PathBuf {
        self.paths.backup_root.join(canonical_name(T::COLLECTION))
    }

    /// Copies the current collection file into a labelled backup.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let _guard = self.guard()?;
        let source = self.collection_path();
        if !source.exists() {
            write_atomic(&source, &serialize_records::<T>(&[])?)?;
        }
        let info = self.copy_to_backup(&source, note)?;
        info!(collection = T::COLLECTION, backup = %info.id, "backup created");
        Ok(info)
    }

    /// Backups of this collection, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let collection = canonical_name(T::COLLECTION);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DATA_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BackupInfo {
                    collection: collection.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Replaces the live collection with the contents of `backup` and returns them.
    ///
    /// The backup is parsed before anything is overwritten; the replaced file is
    /// itself backed up first.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<Vec<T>, CoreError> {
        let _guard = self.guard()?;
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let records: Vec<T> = load_records(&backup.path)?;
        self.save_all(&records)?;
        info!(
            collection = T::COLLECTION,
            backup = %backup.id,
            records = records.len(),
            "backup restored"
        );
        Ok(records)
    }

    pub fn delete_backup(&self, backup: &BackupInfo) -> Result<(), CoreError> {
        if backup.path.exists() {
            fs::remove_file(&backup.path)?;
        }
        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.lock
            .lock()
            .map_err(|_| CoreError::Storage(format!("{} store lock poisoned", T::COLLECTION)))
    }

    fn load_all(&self) -> Result<Vec<T>, CoreError> {
        let path = self.collection_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_records(&path)
    }

    fn save_all(&self, records: &[T]) -> Result<(), CoreError> {
        let path = self.collection_path();
        if path.exists() {
            self.copy_to_backup(&path, None)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_records(records)?)?;
        fs::rename(&tmp, &path)?;
        debug!(
            collection = T::COLLECTION,
            records = records.len(),
            "collection written"
        );
        Ok(())
    }

    fn copy_to_backup(&self, source: &Path, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let dir = self.backup_dir();
        fs::create_dir_all(&dir)?;
        let collection = canonical_name(T::COLLECTION);
        let label = sanitize_backup_note(note);
        let taken: Vec<DateTime<Utc>> = self
            .list_backups()?
            .into_iter()
            .filter_map(|info| info.created_at)
            .collect();
        let mut stamp = Utc::now();
        let (file_name, path) = loop {
            let mut stem = format!(
                "{}_{}_{}",
                collection,
                stamp.format(BACKUP_DATE_FORMAT),
                stamp.format(BACKUP_TIME_FORMAT)
            );
            if let Some(label) = label.as_deref() {
                stem.push('_');
                stem.push_str(label);
            }
            let file_name = format!("{}.{}", stem, DATA_EXTENSION);
            let path = dir.join(&file_name);
            let free = parse_backup_timestamp(&file_name).map_or(true, |at| !taken.contains(&at));
            if free && !path.exists() {
                break (file_name, path);
            }
            stamp += Duration::milliseconds(1);
        };
        fs::copy(source, &path)?;
        self.prune_backups()?;
        Ok(BackupInfo {
            collection,
            created_at: parse_backup_timestamp(&file_name),
            id: file_name,
            path,
        })
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl<T: Record> RecordStore<T> for JsonRecordStore<T> {
    fn insert(&self, mut record: T) -> Result<Uuid, CoreError> {
        let _guard = self.guard()?;
        let mut records = self.load_all()?;
        let id = Uuid::new_v4();
        record.assign_id(id);
        records.push(record);
        self.save_all(&records)?;
        Ok(id)
    }

    fn find_all(&self, filter: Option<&RecordFilter>) -> Result<Vec<T>, CoreError> {
        let _guard = self.guard()?;
        let records = self.load_all()?;
        Ok(match filter {
            Some(filter) => records.into_iter().filter(|r| filter.matches(r)).collect(),
            None => records,
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<T>, CoreError> {
        let _guard = self.guard()?;
        Ok(self.load_all()?.into_iter().find(|record| record.id() == id))
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError> {
        let _guard = self.guard()?;
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_all(&records)?;
        Ok(true)
    }
}

/// Reads a JSON array of records from `path`.
pub fn load_records<T: Record>(path: &Path) -> Result<Vec<T>, CoreError> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&data)?)
}

fn serialize_records<T: Record>(records: &[T]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        })
        .collect();
    if sanitized.trim_matches('-').is_empty() {
        "records".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads `<collection>_<YYYYMMDD>_<HHMMSSmmm>[_<note>].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", DATA_EXTENSION))?;
    let mut segments = stem.split('_').skip(1);
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    let (clock, millis) = time.split_at(6);
    let naive = NaiveDateTime::parse_from_str(&format!("{date}{clock}"), "%Y%m%d%H%M%S").ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
