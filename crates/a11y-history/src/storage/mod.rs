//! Audit record storage abstraction and implementations
//!
//! Provides a trait-based record table with a local file implementation,
//! an in-memory implementation, and a placeholder used when storage could
//! not be opened at startup.

mod local;
mod memory;

pub use local::FileRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::{HistoryError, HistoryResult};
use crate::record::{AuditRecord, AuditRecordPayload};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Default file name of the audit table
pub const DEFAULT_TABLE_FILE: &str = "audits.json";

/// Record table keyed by a store-assigned, strictly increasing id.
///
/// Every operation is one transaction: it either fully applies or leaves
/// the table untouched. A `list_all` issued after an `add` has completed
/// observes that record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Assign the next id and append the record
    async fn add(&self, payload: AuditRecordPayload) -> HistoryResult<AuditRecord>;

    /// Every stored record, in no particular order
    async fn list_all(&self) -> HistoryResult<Vec<AuditRecord>>;

    /// Delete every record; ids are not reused afterwards
    async fn clear_all(&self) -> HistoryResult<()>;
}

/// Shared handle to an opened record store
pub type StoreHandle = Arc<dyn RecordStore>;

/// Default directory for the audit table (`~/.a11y-audit`)
pub fn default_store_dir() -> HistoryResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".a11y-audit"))
        .ok_or_else(|| HistoryError::StorageUnavailable("home directory not available".to_string()))
}

/// Opens the file-backed store exactly once.
///
/// Concurrent and repeated `open` calls share one initialization and
/// receive the same handle.
pub struct StoreOpener {
    path: PathBuf,
    handle: OnceCell<Arc<FileRecordStore>>,
}

impl StoreOpener {
    /// Opener for the table file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: OnceCell::new(),
        }
    }

    /// Opener for `~/.a11y-audit/audits.json`
    pub fn at_default_location() -> HistoryResult<Self> {
        Ok(Self::new(default_store_dir()?.join(DEFAULT_TABLE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open (or create) the table, reusing the handle from an earlier open
    pub async fn open(&self) -> HistoryResult<Arc<FileRecordStore>> {
        let store = self
            .handle
            .get_or_try_init(|| async {
                debug!("Opening audit table at {:?}", self.path);
                FileRecordStore::open(&self.path).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(store))
    }
}

/// Re-insert exported records into `store`, oldest first.
///
/// The store assigns fresh ids, so insertion order follows capture order.
/// Returns the stored records with their new ids.
pub async fn import_records(
    store: &dyn RecordStore,
    records: Vec<AuditRecord>,
) -> HistoryResult<Vec<AuditRecord>> {
    let mut oldest_first = crate::projector::sort_by_recency(records);
    oldest_first.reverse();

    let mut stored = Vec::with_capacity(oldest_first.len());
    for record in oldest_first {
        record.verify_integrity()?;
        stored.push(store.add(record.into_payload()).await?);
    }

    debug!("Imported {} audits", stored.len());
    Ok(stored)
}

/// Stand-in for a store that failed to open
///
/// Every operation reports [`HistoryError::StorageUnavailable`] so the
/// history surface can show itself as unavailable instead of empty.
#[derive(Debug, Clone)]
pub struct UnavailableRecordStore {
    reason: String,
}

impl UnavailableRecordStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> HistoryError {
        HistoryError::StorageUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl RecordStore for UnavailableRecordStore {
    async fn add(&self, _payload: AuditRecordPayload) -> HistoryResult<AuditRecord> {
        Err(self.error())
    }

    async fn list_all(&self) -> HistoryResult<Vec<AuditRecord>> {
        Err(self.error())
    }

    async fn clear_all(&self) -> HistoryResult<()> {
        Err(self.error())
    }
}
