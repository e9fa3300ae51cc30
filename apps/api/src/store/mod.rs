//! Record store: the job table lives in one flat file that is the sole source of truth.
//!
//! Handlers receive an `Arc<dyn JobStore>` through `AppState`, so the reload-per-request
//! policy of `CsvJobStore` can be swapped for `CachedJobStore` at startup.

pub mod cached;
pub mod csv_store;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::job::JobRecord;

pub use cached::CachedJobStore;
pub use csv_store::CsvJobStore;

/// Whole-table persistence. No partial load or save exists.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Reads every record. Fails with `StorageUnavailable` when the table is absent or malformed.
    async fn load(&self) -> Result<Vec<JobRecord>, AppError>;

    /// Replaces the entire table with exactly `records`, in order.
    async fn save(&self, records: &[JobRecord]) -> Result<(), AppError>;
}

#[cfg(test)]
pub mod memory {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory store for handler tests. Counts loads so caching can be observed.
    #[derive(Default)]
    pub struct MemoryJobStore {
        records: Mutex<Vec<JobRecord>>,
        pub loads: AtomicUsize,
    }

    impl MemoryJobStore {
        pub fn new(records: Vec<JobRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                loads: AtomicUsize::new(0),
            }
        }

        pub fn snapshot(&self) -> Vec<JobRecord> {
            self.records.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl JobStore for MemoryJobStore {
        async fn load(&self) -> Result<Vec<JobRecord>, AppError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot())
        }

        async fn save(&self, records: &[JobRecord]) -> Result<(), AppError> {
            let mut guard = self
                .records
                .lock()
                .map_err(|_| AppError::StorageUnavailable("memory store poisoned".into()))?;
            *guard = records.to_vec();
            Ok(())
        }
    }
}
