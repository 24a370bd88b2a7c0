//! Local filesystem record store
//!
//! Keeps the whole audit table in one JSON file. Each transaction holds an
//! exclusive advisory lock on a sidecar `<table>.lock` file, reads the
//! table, applies its change, writes a uniquely named temp file next to it,
//! syncs it, and renames it over the table. Separate processes sharing the
//! table therefore never hand out the same id, and a crash leaves either the
//! old or the new table on disk.

use super::RecordStore;
use crate::error::{HistoryError, HistoryResult};
use crate::record::{AuditRecord, AuditRecordPayload};
use async_trait::async_trait;
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// On-disk layout version
const TABLE_VERSION: u32 = 1;

/// Serialized audit table
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditTable {
    version: u32,
    /// Next id to hand out; survives clears so ids are never reused
    next_id: u64,
    records: Vec<AuditRecord>,
}

impl Default for AuditTable {
    fn default() -> Self {
        Self {
            version: TABLE_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Exclusive lock on the table, released when dropped
struct TableLock {
    _file: File,
}

impl TableLock {
    /// Block until the lock file at `path` is exclusively ours
    async fn acquire(path: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || -> io::Result<Self> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(Self { _file: file })
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// Write `content` to a fresh temp file beside `path`, then rename it over `path`
fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// File-backed audit record store
///
/// Obtain one through [`super::StoreOpener`] so the table is opened once
/// per process. Handles in other processes may share the same table.
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    lock_path: PathBuf,
    /// Serializes transactions within this handle
    txn: Mutex<()>,
}

impl FileRecordStore {
    /// Open the table at `path`, creating the directory and an empty table
    /// when missing.
    pub async fn open(path: &Path) -> HistoryResult<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| {
                HistoryError::StorageUnavailable(format!("cannot create {:?}: {}", dir, e))
            })?;
        }

        let store = Self {
            path: path.to_path_buf(),
            lock_path: sidecar_path(path, ".lock"),
            txn: Mutex::new(()),
        };

        let _lock = store
            .lock()
            .await
            .map_err(|e| {
                HistoryError::StorageUnavailable(format!("cannot lock {:?}: {}", store.lock_path, e))
            })?;

        match store.read_table().await {
            Ok(Some(table)) => {
                debug!(
                    "Opened audit table {:?} with {} records",
                    store.path,
                    table.records.len()
                );
            }
            Ok(None) => {
                store
                    .write_table(&AuditTable::default())
                    .await
                    .map_err(|e| HistoryError::StorageUnavailable(e.to_string()))?;
                debug!("Created audit table {:?}", store.path);
            }
            Err(e) => return Err(HistoryError::StorageUnavailable(e.to_string())),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn lock(&self) -> io::Result<TableLock> {
        TableLock::acquire(self.lock_path.clone()).await
    }

    /// Read the table; `None` when the file does not exist yet
    async fn read_table(&self) -> HistoryResult<Option<AuditTable>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HistoryError::Read(format!("{:?}: {}", self.path, e)));
            }
        };

        let table: AuditTable = serde_json::from_str(&content)
            .map_err(|e| HistoryError::Read(format!("corrupt audit table {:?}: {}", self.path, e)))?;

        if table.version > TABLE_VERSION {
            return Err(HistoryError::Read(format!(
                "audit table version {} is newer than supported version {}",
                table.version, TABLE_VERSION
            )));
        }

        Ok(Some(table))
    }

    async fn load_table(&self) -> HistoryResult<AuditTable> {
        Ok(self.read_table().await?.unwrap_or_default())
    }

    /// Replace the table on disk atomically
    async fn write_table(&self, table: &AuditTable) -> HistoryResult<()> {
        let content = serde_json::to_vec_pretty(table)
            .map_err(|e| HistoryError::Write(format!("serialize audit table: {}", e)))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &content))
            .await
            .map_err(io::Error::other)
            .and_then(|written| written)
            .map_err(|e| HistoryError::Write(format!("{:?}: {}", self.path, e)))
    }
}

/// `path` with `suffix` appended to its file name
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn add(&self, payload: AuditRecordPayload) -> HistoryResult<AuditRecord> {
        let _txn = self.txn.lock().await;
        let _lock = self
            .lock()
            .await
            .map_err(|e| HistoryError::Write(format!("cannot lock {:?}: {}", self.lock_path, e)))?;

        let mut table = self
            .load_table()
            .await
            .map_err(|e| HistoryError::Write(e.to_string()))?;

        let record = payload.into_record(table.next_id);
        table.next_id += 1;
        table.records.push(record.clone());

        self.write_table(&table).await?;
        debug!("Stored audit {} for {}", record.id, record.source);

        Ok(record)
    }

    async fn list_all(&self) -> HistoryResult<Vec<AuditRecord>> {
        let _txn = self.txn.lock().await;
        let _lock = self
            .lock()
            .await
            .map_err(|e| HistoryError::Read(format!("cannot lock {:?}: {}", self.lock_path, e)))?;
        let table = self.load_table().await?;
        debug!("Loaded {} audits from {:?}", table.records.len(), self.path);
        Ok(table.records)
    }

    async fn clear_all(&self) -> HistoryResult<()> {
        let _txn = self.txn.lock().await;
        let _lock = self
            .lock()
            .await
            .map_err(|e| HistoryError::Write(format!("cannot lock {:?}: {}", self.lock_path, e)))?;

        let mut table = self
            .load_table()
            .await
            .map_err(|e| HistoryError::Write(e.to_string()))?;

        let removed = table.records.len();
        table.records.clear();
        self.write_table(&table).await?;
        debug!("Cleared {} audits from {:?}", removed, self.path);

        Ok(())
    }
}
