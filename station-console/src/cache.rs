//! Caching layer for the station collection.
//!
//! The whole table is cached under a key carrying the current generation.
//! Reads go through the cache; writes bypass it and then invalidate it,
//! which bumps the generation so the next read re-fetches from the
//! repository. A fetch already running when the generation moves fills a key
//! nobody reads any more. Concurrent reads while a fetch is pending wait on
//! that fetch instead of issuing their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;

use crate::domain::Station;
use crate::repository::{RepositoryError, StationRepository};

/// The station collection failed to load.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch stations: {0}")]
pub struct FetchError(#[from] pub RepositoryError);

/// Cache key for the station collection at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CollectionKey {
    Stations(u64),
}

/// Cached collection entry.
type CollectionEntry = Arc<Vec<Station>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched collection stays fresh without an invalidation.
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
        }
    }
}

/// What a view gets to render from.
///
/// A failed refresh does not discard the last good collection: both are
/// exposed and the view decides what to show.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Last successfully fetched collection, if any.
    pub stations: Option<CollectionEntry>,
    /// Error from the most recent fetch, if it failed.
    pub error: Option<Arc<FetchError>>,
}

impl QueryState {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The collection, or an empty slice if nothing was ever fetched.
    pub fn stations_or_empty(&self) -> &[Station] {
        self.stations.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Last folded state and the generation its fetch started in.
#[derive(Debug, Default)]
struct Folded {
    generation: u64,
    state: QueryState,
}

/// Station repository with a read-through collection cache.
pub struct StationQueryCache<R> {
    repository: R,
    collections: MokaCache<CollectionKey, CollectionEntry>,
    generation: AtomicU64,
    last: RwLock<Folded>,
}

impl<R: StationRepository> StationQueryCache<R> {
    /// Create a new cache around the given repository.
    pub fn new(repository: R, config: &CacheConfig) -> Self {
        let collections = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(4)
            .build();

        Self {
            repository,
            collections,
            generation: AtomicU64::new(0),
            last: RwLock::new(Folded::default()),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The full collection, newest first.
    ///
    /// Served from cache when present. Otherwise a single repository fetch
    /// is shared by every caller waiting on it. Failures are not cached.
    pub async fn fetch_all(&self) -> Result<CollectionEntry, Arc<FetchError>> {
        self.fetch_at(self.generation()).await
    }

    async fn fetch_at(&self, generation: u64) -> Result<CollectionEntry, Arc<FetchError>> {
        self.collections
            .try_get_with(CollectionKey::Stations(generation), async {
                tracing::debug!("station collection stale, fetching");
                match self.repository.list().await {
                    Ok(stations) => Ok(Arc::new(stations)),
                    Err(e) => {
                        tracing::error!(error = %e, "error fetching stations");
                        Err(FetchError(e))
                    }
                }
            })
            .await
    }

    /// Fetch and fold the result into the last known [`QueryState`].
    ///
    /// A result from an older generation than the one already folded is
    /// dropped, so a slow fetch never replaces a newer collection.
    pub async fn load(&self) -> QueryState {
        let generation = self.generation();
        let result = self.fetch_at(generation).await;

        let mut last = self.last.write().await;
        if generation < last.generation {
            tracing::debug!(generation, current = last.generation, "dropping stale fetch");
            return last.state.clone();
        }
        last.generation = generation;
        match result {
            Ok(stations) => {
                last.state.stations = Some(stations);
                last.state.error = None;
            }
            Err(error) => {
                last.state.error = Some(error);
            }
        }
        last.state.clone()
    }

    /// The last known state, without fetching.
    pub async fn snapshot(&self) -> QueryState {
        self.last.read().await.state.clone()
    }

    /// Mark the collection stale; the next read re-fetches.
    pub async fn invalidate(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(generation = previous + 1, "station collection invalidated");
        self.collections
            .invalidate(&CollectionKey::Stations(previous))
            .await;
    }

    /// Whether a fresh collection is currently cached.
    pub fn is_cached(&self) -> bool {
        self.collections
            .contains_key(&CollectionKey::Stations(self.generation()))
    }

    /// Access the underlying repository for writes that bypass the cache.
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
