//! Dataset Snapshots and Ranking Cache
//!
//! The historical dataset is published as immutable, versioned snapshots.
//! A refresh installs a new `Arc<DatasetSnapshot>`; ranking passes already
//! holding the old one keep a consistent view.
//!
//! Rankings are memoized in a Moka cache keyed by `(version, top_n)`.

use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::ranking::{CityAirQualityRecord, CityRanker, CityReadings};

/// Immutable published copy of the dataset
#[derive(Debug)]
pub struct DatasetSnapshot {
    pub version: u64,
    pub cities: Vec<CityReadings>,
}

impl DatasetSnapshot {
    pub fn reading_count(&self) -> usize {
        self.cities.iter().map(|c| c.readings.len()).sum()
    }
}

/// Holds the current snapshot. The lock only guards the pointer swap.
#[derive(Debug)]
pub struct DatasetStore {
    current: RwLock<Arc<DatasetSnapshot>>,
    next_version: AtomicU64,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DatasetStore {
    pub fn new(cities: Vec<CityReadings>) -> Self {
        Self {
            current: RwLock::new(Arc::new(DatasetSnapshot { version: 0, cities })),
            next_version: AtomicU64::new(1),
        }
    }

    pub fn current(&self) -> Arc<DatasetSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the dataset wholesale; returns the new version
    pub fn publish(&self, cities: Vec<CityReadings>) -> u64 {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(DatasetSnapshot { version, cities });
        tracing::info!(
            "Publishing dataset snapshot v{} ({} cities, {} readings)",
            version,
            snapshot.cities.len(),
            snapshot.reading_count()
        );

        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = snapshot;
        version
    }
}

/// Rankings over the current snapshot, memoized per snapshot version
pub struct RankingService {
    store: Arc<DatasetStore>,
    ranker: CityRanker,
    cache: Cache<(u64, usize), Arc<Vec<CityAirQualityRecord>>>,
}

impl RankingService {
    pub fn new(store: Arc<DatasetStore>, ranker: CityRanker, cache_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(cache_capacity)
            .support_invalidation_closures()
            .build();
        Self { store, ranker, cache }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// Top-N most polluted cities in the current snapshot
    pub fn most_polluted(&self, top_n: usize) -> Arc<Vec<CityAirQualityRecord>> {
        let snapshot = self.store.current();
        let key = (snapshot.version, top_n);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Cache hit for ranking v{} top {}", snapshot.version, top_n);
            return cached;
        }

        self.rank_and_store(&snapshot, top_n)
    }

    fn rank_and_store(&self, snapshot: &DatasetSnapshot, top_n: usize) -> Arc<Vec<CityAirQualityRecord>> {
        let ranked = Arc::new(self.ranker.rank(&snapshot.cities, top_n));
        // A refresh during the pass already invalidated this version
        if self.store.current().version == snapshot.version {
            self.cache.insert((snapshot.version, top_n), Arc::clone(&ranked));
        } else {
            tracing::debug!("Dropping ranking of superseded snapshot v{}", snapshot.version);
        }
        ranked
    }

    /// Publish a new dataset and drop rankings of older snapshots
    pub fn refresh(&self, cities: Vec<CityReadings>) -> u64 {
        let version = self.store.publish(cities);
        if let Err(e) = self.cache.invalidate_entries_if(move |&(v, _), _| v < version) {
            tracing::warn!("Failed to invalidate stale rankings: {}", e);
        }
        version
    }

    #[cfg(test)]
    fn is_cached(&self, version: u64, top_n: usize) -> bool {
        self.cache.contains_key(&(version, top_n))
    }
}
