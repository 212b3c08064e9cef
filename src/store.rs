//! The remote collection the form writes to and the admin view reads from

use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{NewProviderRecord, ProviderRecord, RecordId};
use crate::postgrest::PostgrestClient;
use crate::Supabase;

/// Insert, list and delete against the provider collection
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Persists a new record and returns the id the store assigned
    async fn insert(&self, record: &NewProviderRecord) -> Result<RecordId>;

    /// Every record in the collection, unpaged and unfiltered
    async fn select_all(&self) -> Result<Vec<ProviderRecord>>;

    async fn delete_by_id(&self, id: &RecordId) -> Result<()>;
}

/// [`ProviderStore`] over the hosted PostgREST endpoint
pub struct PostgrestProviderStore {
    table: PostgrestClient,
}

impl PostgrestProviderStore {
    pub fn new(table: PostgrestClient) -> Self {
        Self { table }
    }

    /// Store bound to the table named in the client's options
    pub fn from_client(supabase: &Supabase) -> Self {
        Self::new(supabase.from(&supabase.options.table))
    }
}

#[async_trait]
impl ProviderStore for PostgrestProviderStore {
    async fn insert(&self, record: &NewProviderRecord) -> Result<RecordId> {
        let rows: Vec<ProviderRecord> = self.table.insert(vec![record]).execute().await?;
        let id = rows
            .into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| Error::database("insert returned no rows"))?;
        debug!("inserted provider {}", id);
        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<ProviderRecord>> {
        let rows = self.table.select("*").execute::<ProviderRecord>().await?;
        debug!("fetched {} providers", rows.len());
        Ok(rows)
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<()> {
        self.table.delete().eq("id", id).execute_no_return().await?;
        debug!("deleted provider {}", id);
        Ok(())
    }
}

/// In-process store with sequential integer ids.
///
/// Failures can be switched on to exercise the error paths of the
/// components without a network.
#[derive(Clone, Default)]
pub struct MemoryProviderStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: Mutex<Vec<ProviderRecord>>,
    next_id: AtomicI64,
    failing: AtomicBool,
    calls: Mutex<Vec<StoreCall>>,
}

/// One operation received by a [`MemoryProviderStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert(NewProviderRecord),
    SelectAll,
    Delete(RecordId),
}

impl MemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `rows`; new ids continue after the largest integer id.
    pub fn with_rows(rows: Vec<ProviderRecord>) -> Self {
        let max_id = rows
            .iter()
            .filter_map(|row| match row.id {
                RecordId::Int(id) => Some(id),
                RecordId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            inner: Arc::new(MemoryInner {
                rows: Mutex::new(rows),
                next_id: AtomicI64::new(max_id),
                ..MemoryInner::default()
            }),
        }
    }

    /// Makes every following operation fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn rows(&self) -> Vec<ProviderRecord> {
        self.inner.rows.lock().await.clone()
    }

    /// Operations received so far, in order
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.inner.calls.lock().await.clone()
    }

    async fn record(&self, call: StoreCall) -> Result<()> {
        self.inner.calls.lock().await.push(call);
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(Error::database("memory store is set to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderStore for MemoryProviderStore {
    async fn insert(&self, record: &NewProviderRecord) -> Result<RecordId> {
        self.record(StoreCall::Insert(record.clone())).await?;
        let id = RecordId::Int(self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner
            .rows
            .lock()
            .await
            .push(ProviderRecord::from_new(id.clone(), record.clone()));
        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<ProviderRecord>> {
        self.record(StoreCall::SelectAll).await?;
        Ok(self.rows().await)
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<()> {
        self.record(StoreCall::Delete(id.clone())).await?;
        self.inner.rows.lock().await.retain(|row| &row.id != id);
        Ok(())
    }
}
