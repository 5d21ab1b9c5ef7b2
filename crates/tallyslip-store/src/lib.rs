mod json_file;
mod persisted;

use async_trait::async_trait;
use tallyslip_core::{ReceiptRecord, ReceiptStatus, ReceiptStore, StoreError};
use tokio::sync::RwLock;

pub use json_file::JsonFileReceiptStore;

/// Receipts kept for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryReceiptStore {
    records: RwLock<Vec<ReceiptRecord>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn append(&self, record: ReceiptRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        records.push(record);
        Ok(())
    }

    async fn list_all(&self) -> Vec<ReceiptRecord> {
        self.records.read().await.clone()
    }

    async fn find(&self, id: &str) -> Option<ReceiptRecord> {
        let records = self.records.read().await;
        records.iter().find(|record| record.id == id).cloned()
    }

    async fn update_status(
        &self,
        id: &str,
        next: ReceiptStatus,
    ) -> Result<ReceiptRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.status = record.status.transition_to(next)?;
        Ok(record.clone())
    }
}
