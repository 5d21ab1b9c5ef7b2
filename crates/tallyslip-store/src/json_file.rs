use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tallyslip_core::{ReceiptRecord, ReceiptStatus, ReceiptStore, StoreError};
use tokio::{fs, sync::Mutex};
use tracing::{info, warn};

use crate::persisted::StoredReceipt;

enum LoadError {
    Io(std::io::Error),
    Corrupt(serde_json::Error),
}

impl From<LoadError> for StoreError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io(err) => StoreError::Io(err),
            LoadError::Corrupt(err) => StoreError::Serialize(err),
        }
    }
}

/// Receipts kept as one JSON array on disk.
///
/// Derived totals are recomputed from each record's inputs on every read.
pub struct JsonFileReceiptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileReceiptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    async fn load(&self) -> Result<Vec<ReceiptRecord>, LoadError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(LoadError::Io(err)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredReceipt> =
            serde_json::from_slice(&bytes).map_err(LoadError::Corrupt)?;
        Ok(stored.into_iter().map(StoredReceipt::into_record).collect())
    }

    /// Loads for a write. A corrupt file is moved aside rather than overwritten.
    async fn load_for_write(&self) -> Result<Vec<ReceiptRecord>, StoreError> {
        match self.load().await {
            Ok(records) => Ok(records),
            Err(LoadError::Corrupt(err)) => {
                let quarantine = self.sibling(".corrupt");
                warn!(
                    "receipt file {} is corrupt ({err}); moving it to {}",
                    self.path.display(),
                    quarantine.display()
                );
                fs::rename(&self.path, &quarantine).await?;
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, records: &[ReceiptRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let stored: Vec<StoredReceipt> = records.iter().map(StoredReceipt::from).collect();
        let payload = serde_json::to_vec_pretty(&stored)?;
        let staging = self.sibling(".tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReceiptStore for JsonFileReceiptStore {
    async fn append(&self, record: ReceiptRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_for_write().await?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        let id = record.id.clone();
        records.push(record);
        self.persist(&records).await?;
        info!("stored receipt {} ({} total)", id, records.len());
        Ok(())
    }

    async fn list_all(&self) -> Vec<ReceiptRecord> {
        match self.load().await {
            Ok(records) => records,
            Err(LoadError::Io(err)) => {
                warn!("cannot read receipt file {}: {err}", self.path.display());
                Vec::new()
            }
            Err(LoadError::Corrupt(err)) => {
                warn!("ignoring corrupt receipt file {}: {err}", self.path.display());
                Vec::new()
            }
        }
    }

    async fn find(&self, id: &str) -> Option<ReceiptRecord> {
        self.list_all()
            .await
            .into_iter()
            .find(|record| record.id == id)
    }

    async fn update_status(
        &self,
        id: &str,
        next: ReceiptStatus,
    ) -> Result<ReceiptRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.status = record.status.transition_to(next)?;
        let updated = record.clone();
        self.persist(&records).await?;
        info!("receipt {} is now {}", updated.id, updated.status);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::Value;

    use super::*;
    use crate::fixtures::receipt;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileReceiptStore {
        JsonFileReceiptStore::new(dir.path().join("receipts.json"))
    }

    #[tokio::test]
    async fn missing_file_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list_all().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn records_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let first = receipt("Northwind", dec!(500));
        let second = receipt("Contoso", dec!(120));

        let store = store_in(&dir);
        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let reopened = store_in(&dir);
        let listed = reopened.list_all().await;
        assert_eq!(listed, vec![first, second.clone()]);
        assert_eq!(listed.last().map(|r| r.id.as_str()), Some(second.id.as_str()));
        assert_eq!(reopened.find(&second.id).await, Some(second));
    }

    #[tokio::test]
    async fn writes_camel_case_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(receipt("Northwind", dec!(500))).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["payableAmount"].as_f64(), Some(1000.0));
        assert_eq!(entry["dueAmount"].as_f64(), Some(800.0));
        assert_eq!(entry["status"], Value::from("Pending"));
        assert_eq!(entry["date"], Value::from("2026-10-16"));
    }

    #[tokio::test]
    async fn amounts_keep_every_decimal_digit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut record = receipt("Northwind", dec!(1234567890.123456789));
        record.input.services[0].unit = dec!(0.333333333333);
        record.input.tax = dec!(7.125);
        tallyslip_finance::refresh_totals(&mut record);
        store.append(record.clone()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"price\": 1234567890.123456789"));
        assert!(raw.contains("\"unit\": 0.333333333333"));

        let listed = store_in(&dir).list_all().await;
        assert_eq!(listed, vec![record.clone()]);
        assert_eq!(listed[0].input.services[0].price, dec!(1234567890.123456789));
        assert_eq!(listed[0].totals, record.totals);
    }

    #[tokio::test]
    async fn quoted_amounts_in_older_files_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = receipt("Northwind", dec!(500));
        store.append(record.clone()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let mut value: Value = serde_json::from_str(&raw).unwrap();
        value[0]["services"][0]["price"] = Value::from("500.00");
        value[0]["tax"] = Value::from("5");
        value[0]["total"] = Value::from("1000");
        value[0].as_object_mut().unwrap().remove("depositAmount");
        std::fs::write(store.path(), value.to_string()).unwrap();

        let listed = store.list_all().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].input.services[0].price, dec!(500.00));
        assert_eq!(listed[0].input.tax, dec!(5));
        assert_eq!(listed[0].input.deposit_amount, dec!(0));
        assert_eq!(listed[0].totals.subtotal, dec!(1000));
    }

    #[tokio::test]
    async fn corrupt_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "[{ not json").unwrap();

        assert!(store.list_all().await.is_empty());
        assert!(store.find("anything").await.is_none());
    }

    #[tokio::test]
    async fn append_after_corruption_keeps_the_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "garbage").unwrap();
        let record = receipt("Northwind", dec!(500));

        store.append(record.clone()).await.unwrap();

        assert_eq!(store.list_all().await, vec![record]);
        let quarantined = dir.path().join("receipts.json.corrupt");
        assert_eq!(std::fs::read_to_string(quarantined).unwrap(), "garbage");
    }

    #[tokio::test]
    async fn stale_totals_are_recomputed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = receipt("Northwind", dec!(500));
        store.append(record.clone()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let mut value: Value = serde_json::from_str(&raw).unwrap();
        value[0]["dueAmount"] = Value::from(1);
        value[0]["subtotal"] = Value::from(3);
        std::fs::write(store.path(), value.to_string()).unwrap();

        let listed = store.list_all().await;
        assert_eq!(listed[0].totals, record.totals);
        assert_eq!(listed[0].totals.due_amount, dec!(800));
    }

    #[tokio::test]
    async fn status_changes_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = receipt("Northwind", dec!(500));
        store.append(record.clone()).await.unwrap();

        let cancelled = store.cancel(&record.id).await.unwrap();
        assert_eq!(cancelled.status, ReceiptStatus::Cancelled);

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.find(&record.id).await.map(|r| r.status),
            Some(ReceiptStatus::Cancelled)
        );
        assert!(matches!(
            reopened.mark_paid(&record.id).await,
            Err(StoreError::InvalidTransition { .. })
        ));
        assert!(matches!(
            reopened.mark_paid("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = receipt("Northwind", dec!(500));

        store.append(record.clone()).await.unwrap();
        assert!(matches!(
            store.append(record).await,
            Err(StoreError::DuplicateId(_))
        ));
        assert_eq!(store.list_all().await.len(), 1);
    }
}
