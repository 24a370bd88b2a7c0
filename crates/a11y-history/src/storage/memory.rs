//! In-memory record store
//!
//! Same id semantics as the file store without touching disk. Useful for
//! ephemeral sessions and tests.

use super::RecordStore;
use crate::error::HistoryResult;
use crate::record::{AuditRecord, AuditRecordPayload};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Debug)]
struct MemoryTable {
    next_id: u64,
    records: Vec<AuditRecord>,
}

/// Volatile audit record store
#[derive(Debug)]
pub struct MemoryRecordStore {
    table: Mutex<MemoryTable>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MemoryTable {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn add(&self, payload: AuditRecordPayload) -> HistoryResult<AuditRecord> {
        let mut table = self.table.lock().await;
        let record = payload.into_record(table.next_id);
        table.next_id += 1;
        table.records.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> HistoryResult<Vec<AuditRecord>> {
        Ok(self.table.lock().await.records.clone())
    }

    async fn clear_all(&self) -> HistoryResult<()> {
        self.table.lock().await.records.clear();
        Ok(())
    }
}
