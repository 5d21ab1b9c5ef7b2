use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ReceiptRecord, ReceiptStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("receipt '{0}' already exists")]
    DuplicateId(String),
    #[error("receipt '{0}' not found")]
    NotFound(String),
    #[error("cannot move receipt from {from} to {to}")]
    InvalidTransition {
        from: ReceiptStatus,
        to: ReceiptStatus,
    },
    #[error("receipt storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode receipts: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only receipt history.
///
/// `list_all` never fails: unreadable backing data is reported as an empty history.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    async fn append(&self, record: ReceiptRecord) -> Result<(), StoreError>;
    async fn list_all(&self) -> Vec<ReceiptRecord>;
    async fn find(&self, id: &str) -> Option<ReceiptRecord>;
    async fn update_status(
        &self,
        id: &str,
        next: ReceiptStatus,
    ) -> Result<ReceiptRecord, StoreError>;

    async fn mark_paid(&self, id: &str) -> Result<ReceiptRecord, StoreError> {
        self.update_status(id, ReceiptStatus::Paid).await
    }

    async fn cancel(&self, id: &str) -> Result<ReceiptRecord, StoreError> {
        self.update_status(id, ReceiptStatus::Cancelled).await
    }
}
