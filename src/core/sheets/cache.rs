use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{Collection, DataSource, Row, SheetNames};

/// Freshness window for sheet data.
pub const CACHE_TTL: Duration = Duration::from_secs(180);

/// Read-through cache where every entry expires `ttl` after it was fetched.
/// The lock is held while refreshing, so concurrent readers of a stale key
/// wait for a single fetch instead of racing.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached value while fresh, otherwise whatever `fetch` yields.
    /// Only `Some` is stored; on `None` the key stays stale and the next
    /// read fetches again.
    pub async fn get_or_refresh<F, Fut>(&self, key: K, fetch: F) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some((fetched_at, value)) = entries.get(&key)
            && fetched_at.elapsed() <= self.ttl
        {
            return Some(value.clone());
        }
        let value = fetch().await?;
        entries.insert(key, (Instant::now(), value.clone()));
        Some(value)
    }

    #[cfg(test)]
    pub async fn invalidate_all(&self) {
        self.entries.lock().await.clear();
    }
}

/// The three sheet collections behind one TTL cache.
pub struct DataCache {
    source: Arc<dyn DataSource>,
    sheets: SheetNames,
    entries: TtlCache<Collection, Arc<Vec<Row>>>,
}

impl DataCache {
    pub fn new(source: Arc<dyn DataSource>, sheets: SheetNames, ttl: Duration) -> Self {
        Self {
            source,
            sheets,
            entries: TtlCache::new(ttl),
        }
    }

    /// Rows of `collection`, refetched when older than the TTL. A failed
    /// fetch yields an empty collection that is not cached.
    pub async fn get(&self, collection: Collection) -> Arc<Vec<Row>> {
        let sheet = self.sheets.name_of(collection).to_string();
        let source = self.source.clone();
        self.entries
            .get_or_refresh(collection, || async move {
                match source.fetch_collection(&sheet).await {
                    Ok(rows) => {
                        debug!("Fetched {} rows from sheet '{}'", rows.len(), sheet);
                        Some(Arc::new(rows))
                    }
                    Err(e) => {
                        warn!("Sheet '{}' unavailable, using empty data: {}", sheet, e);
                        None
                    }
                }
            })
            .await
            .unwrap_or_default()
    }

    pub async fn releases(&self) -> Arc<Vec<Row>> {
        self.get(Collection::Releases).await
    }

    pub async fn tasks(&self) -> Arc<Vec<Row>> {
        self.get(Collection::Tasks).await
    }

    pub async fn owners(&self) -> Arc<Vec<Row>> {
        self.get(Collection::Owners).await
    }

    #[cfg(test)]
    pub async fn invalidate_all(&self) {
        self.entries.invalidate_all().await;
    }
}
