// In crates/engine/src/cache.rs

//! TTL caches feeding token discovery.
//!
//! Every key has its own async lock, held across the read-check-fetch-store
//! sequence, so at most one fetch per key is in flight and concurrent callers
//! wait for its result.

use api_client::{CatalogEntry, MarketDataClient, TokenHoldingsApi};
use core_types::TokenHolding;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Values that can be empty.
pub trait CacheValue: Clone {
    fn is_empty(&self) -> bool;
}

impl<T: Clone> CacheValue for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K: Clone, V: Clone> CacheValue for HashMap<K, V> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl<T: CacheValue> CacheValue for Arc<T> {
    fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }
}

/// What to do with an empty fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Store whatever was fetched, empty or not.
    Always,
    /// Never store an empty result; keep serving the previous value instead.
    KeepPrevious,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

type Slot<V> = Arc<Mutex<Option<Entry<V>>>>;

/// A keyed cache whose entries expire `ttl` after they were fetched.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    retention: Retention,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: CacheValue,
{
    pub fn new(ttl: Duration, retention: Retention) -> Self {
        Self {
            ttl,
            retention,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it is younger than the TTL,
    /// otherwise awaits `fetch` and stores its result.
    pub async fn get_or_refresh<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key).or_default().clone()
        };

        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return cached.value.clone();
            }
        }

        let fresh = fetch().await;
        if fresh.is_empty() && self.retention == Retention::KeepPrevious {
            return match entry.as_ref() {
                Some(previous) => previous.value.clone(),
                None => fresh,
            };
        }

        *entry = Some(Entry {
            value: fresh.clone(),
            fetched_at: Instant::now(),
        });
        fresh
    }
}

/// Token holdings per address, refreshed after the TTL (60s by default).
pub struct TokenHoldingsCache {
    api: Arc<dyn TokenHoldingsApi>,
    cache: TtlCache<String, Vec<TokenHolding>>,
}

impl TokenHoldingsCache {
    pub fn new(api: Arc<dyn TokenHoldingsApi>, ttl: Duration) -> Self {
        Self {
            api,
            cache: TtlCache::new(ttl, Retention::Always),
        }
    }

    /// Holdings of `address`. Upstream failures are cached as an empty list.
    pub async fn get(&self, address: &str) -> Vec<TokenHolding> {
        let key = address.trim().to_lowercase();
        self.cache
            .get_or_refresh(key, || async move {
                match self.api.token_holdings(address.trim()).await {
                    Ok(holdings) => {
                        tracing::debug!(address, holdings = holdings.len(), "Fetched token holdings.");
                        holdings
                    }
                    Err(e) => {
                        tracing::warn!(address, error = %e, "Token holdings unavailable.");
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// Amount held of `contract` (compared case-insensitively).
    pub async fn amount_of(&self, address: &str, contract: &str) -> Option<f64> {
        self.get(address)
            .await
            .iter()
            .find(|h| h.contract.eq_ignore_ascii_case(contract))
            .map(|h| h.amount)
    }
}

/// The global contract catalog, refreshed after the TTL (24h by default).
pub struct ContractCatalogCache {
    market: MarketDataClient,
    cache: TtlCache<(), Arc<HashMap<String, CatalogEntry>>>,
}

impl ContractCatalogCache {
    pub fn new(market: MarketDataClient, ttl: Duration) -> Self {
        Self {
            market,
            cache: TtlCache::new(ttl, Retention::KeepPrevious),
        }
    }

    /// The catalog keyed by lower-cased contract. A failed or empty refresh keeps the previous catalog.
    pub async fn get(&self) -> Arc<HashMap<String, CatalogEntry>> {
        self.cache
            .get_or_refresh((), || async move { Arc::new(self.market.fetch_contract_catalog().await) })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn reads_within_ttl_fetch_once() {
        let cache: TtlCache<&str, Vec<u32>> = TtlCache::new(TTL, Retention::Always);
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            vec![1]
        };

        assert_eq!(cache.get_or_refresh("a", fetch).await, vec![1]);
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get_or_refresh("a", fetch).await, vec![1]);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        cache.get_or_refresh("b", fetch).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_refetched() {
        let cache: TtlCache<&str, Vec<u32>> = TtlCache::new(TTL, Retention::Always);
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move { vec![fetches.fetch_add(1, Ordering::SeqCst) as u32] };

        assert_eq!(cache.get_or_refresh("a", fetch).await, vec![0]);
        tokio::time::advance(TTL).await;
        assert_eq!(cache.get_or_refresh("a", fetch).await, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_results_are_stored_when_always_retaining() {
        let cache: TtlCache<&str, Vec<u32>> = TtlCache::new(TTL, Retention::Always);
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        };

        assert!(cache.get_or_refresh("a", fetch).await.is_empty());
        assert!(cache.get_or_refresh("a", fetch).await.is_empty());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_refresh_keeps_previous_value() {
        let cache: TtlCache<(), Vec<u32>> = TtlCache::new(TTL, Retention::KeepPrevious);

        // Nothing stored yet, and an empty result is not stored either.
        assert!(cache.get_or_refresh((), || async { Vec::new() }).await.is_empty());
        assert_eq!(cache.get_or_refresh((), || async { vec![7] }).await, vec![7]);

        tokio::time::advance(TTL * 2).await;
        assert_eq!(cache.get_or_refresh((), || async { Vec::new() }).await, vec![7]);
        // Still stale, so the next read tries again.
        assert_eq!(cache.get_or_refresh((), || async { vec![8] }).await, vec![8]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_readers_share_one_fetch() {
        let cache: TtlCache<&str, Vec<u32>> = TtlCache::new(TTL, Retention::Always);
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            vec![42]
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_refresh("k", fetch),
            cache.get_or_refresh("k", fetch),
            cache.get_or_refresh("k", fetch),
        );

        assert_eq!((a, b, c), (vec![42], vec![42], vec![42]));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
