use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::AppError;
use crate::models::job::JobRecord;
use crate::store::JobStore;

/// Keeps the last loaded or saved record set in memory.
/// A save always goes through to the inner store and then replaces the cached set.
pub struct CachedJobStore<S> {
    inner: S,
    cache: RwLock<Option<Vec<JobRecord>>>,
}

impl<S: JobStore> CachedJobStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(None),
        }
    }
}

#[async_trait]
impl<S: JobStore> JobStore for CachedJobStore<S> {
    async fn load(&self) -> Result<Vec<JobRecord>, AppError> {
        if let Some(records) = self.cache.read().await.as_ref() {
            return Ok(records.clone());
        }

        let mut guard = self.cache.write().await;
        if let Some(records) = guard.as_ref() {
            return Ok(records.clone());
        }
        let records = self.inner.load().await?;
        debug!("Cached {} jobs", records.len());
        *guard = Some(records.clone());
        Ok(records)
    }

    async fn save(&self, records: &[JobRecord]) -> Result<(), AppError> {
        let mut guard = self.cache.write().await;
        match self.inner.save(records).await {
            Ok(()) => {
                *guard = Some(records.to_vec());
                Ok(())
            }
            Err(e) => {
                *guard = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::*;
    use crate::store::memory::MemoryJobStore;

    fn job(id: u64) -> JobRecord {
        JobRecord {
            id,
            category: "Engineering".into(),
            title: "Engineer".into(),
            company: "Acme".into(),
            description: "Builds things".into(),
            salary: "$40000/year".into(),
            post_date: "10/10/2024".into(),
        }
    }

    struct Shared(Arc<MemoryJobStore>);

    #[async_trait]
    impl JobStore for Shared {
        async fn load(&self) -> Result<Vec<JobRecord>, AppError> {
            self.0.load().await
        }
        async fn save(&self, records: &[JobRecord]) -> Result<(), AppError> {
            self.0.save(records).await
        }
    }

    #[tokio::test]
    async fn test_second_load_served_from_memory() {
        let inner = Arc::new(MemoryJobStore::new(vec![job(1)]));
        let store = CachedJobStore::new(Shared(inner.clone()));

        assert_eq!(store.load().await.unwrap().len(), 1);
        assert_eq!(store.load().await.unwrap().len(), 1);
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_save_replaces_cached_set() {
        let inner = Arc::new(MemoryJobStore::new(vec![job(1)]));
        let store = CachedJobStore::new(Shared(inner.clone()));
        store.load().await.unwrap();

        store.save(&[job(1), job(2)]).await.unwrap();
        let ids: Vec<u64> = store.load().await.unwrap().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(inner.snapshot().len(), 2);
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
    }
}
