//! Bounded memoization cache for analysis results.
//!
//! Entries are evicted least-recently-used first once `capacity` is reached.
//! Every entry is indexed under each dataset it was derived from, so replacing
//! a dataset evicts all dependent results, including correlations where the
//! dataset is the second operand.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use bia_common::{
    AnomalyDetection, CorrelationAnalysis, DataPoint, SeasonalityAnalysis, StatisticalSummary,
    TimeSeries, TrendAnalysis,
};
use serde::Serialize;

/// Which analysis produced a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Summary,
    Trend,
    Anomalies,
    Correlation,
    Seasonality,
    Aggregation,
    Forecast,
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnalysisKind::Summary => "summary",
            AnalysisKind::Trend => "trend",
            AnalysisKind::Anomalies => "anomalies",
            AnalysisKind::Correlation => "correlation",
            AnalysisKind::Seasonality => "seasonality",
            AnalysisKind::Aggregation => "aggregation",
            AnalysisKind::Forecast => "forecast",
        };
        write!(f, "{}", s)
    }
}

/// Identity of a memoized result: analysis kind, source datasets, parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: AnalysisKind,
    pub datasets: Vec<String>,
    pub params: String,
}

impl CacheKey {
    pub fn new(kind: AnalysisKind, dataset: &str, params: impl Into<String>) -> Self {
        CacheKey {
            kind,
            datasets: vec![dataset.to_string()],
            params: params.into(),
        }
    }

    pub fn pair(kind: AnalysisKind, first: &str, second: &str) -> Self {
        CacheKey {
            kind,
            datasets: vec![first.to_string(), second.to_string()],
            params: String::new(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.datasets.join("+"))?;
        if !self.params.is_empty() {
            write!(f, ":{}", self.params)?;
        }
        Ok(())
    }
}

/// A shared analysis result.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Summary(Arc<StatisticalSummary>),
    Trend(Arc<TrendAnalysis>),
    Anomalies(Arc<AnomalyDetection>),
    Correlation(Arc<CorrelationAnalysis>),
    Seasonality(Arc<SeasonalityAnalysis>),
    Series(Arc<TimeSeries>),
    Points(Arc<Vec<DataPoint>>),
}

/// Result types that can live in the cache.
pub trait Cacheable: Sized {
    fn into_cached(value: Arc<Self>) -> CachedValue;
    fn from_cached(value: &CachedValue) -> Option<Arc<Self>>;
}

macro_rules! impl_cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_cached(value: Arc<Self>) -> CachedValue {
                CachedValue::$variant(value)
            }

            fn from_cached(value: &CachedValue) -> Option<Arc<Self>> {
                match value {
                    CachedValue::$variant(inner) => Some(Arc::clone(inner)),
                    _ => None,
                }
            }
        }
    };
}

impl_cacheable!(StatisticalSummary, Summary);
impl_cacheable!(TrendAnalysis, Trend);
impl_cacheable!(AnomalyDetection, Anomalies);
impl_cacheable!(CorrelationAnalysis, Correlation);
impl_cacheable!(SeasonalityAnalysis, Seasonality);
impl_cacheable!(TimeSeries, Series);
impl_cacheable!(Vec<DataPoint>, Points);

/// Counters for cache instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
    /// Entries dropped because a source dataset changed.
    pub invalidations: u64,
}

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    last_used: u64,
}

/// LRU cache with a per-dataset dependency index.
#[derive(Debug)]
pub struct AnalysisCache {
    capacity: usize,
    entries: HashMap<CacheKey, Entry>,
    /// Access tick to key, oldest first.
    recency: BTreeMap<u64, CacheKey>,
    dependents: HashMap<String, HashSet<CacheKey>>,
    tick: u64,
    stats: CacheStats,
}

impl AnalysisCache {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        AnalysisCache {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            dependents: HashMap::new(),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Look up a typed result, refreshing its recency on a hit.
    pub fn get<T: Cacheable>(&mut self, key: &CacheKey) -> Option<Arc<T>> {
        let tick = self.next_tick();
        let found = self.entries.get_mut(key).and_then(|entry| {
            let value = T::from_cached(&entry.value)?;
            let previous = std::mem::replace(&mut entry.last_used, tick);
            Some((previous, value))
        });

        match found {
            Some((previous, value)) => {
                self.recency.remove(&previous);
                self.recency.insert(tick, key.clone());
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a result. Returns the keys evicted to make room.
    pub fn insert<T: Cacheable>(&mut self, key: CacheKey, value: Arc<T>) -> Vec<CacheKey> {
        if self.capacity == 0 {
            return Vec::new();
        }

        self.remove_entry(&key);

        let mut evicted = Vec::new();
        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.remove_entry(&oldest);
            self.stats.evictions += 1;
            evicted.push(oldest);
        }

        let tick = self.next_tick();
        for dataset in &key.datasets {
            self.dependents
                .entry(dataset.clone())
                .or_default()
                .insert(key.clone());
        }
        self.recency.insert(tick, key.clone());
        self.entries.insert(
            key,
            Entry {
                value: T::into_cached(value),
                last_used: tick,
            },
        );
        self.stats.insertions += 1;
        evicted
    }

    /// Evict every entry derived from `dataset`. Returns how many were removed.
    pub fn invalidate(&mut self, dataset: &str) -> usize {
        let Some(keys) = self.dependents.remove(dataset) else {
            return 0;
        };
        let mut removed = 0;
        for key in keys {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }
        self.stats.invalidations += removed as u64;
        removed
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.dependents.clear();
    }

    fn remove_entry(&mut self, key: &CacheKey) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        self.recency.remove(&entry.last_used);
        for dataset in &key.datasets {
            if let Some(set) = self.dependents.get_mut(dataset) {
                set.remove(key);
                if set.is_empty() {
                    self.dependents.remove(dataset);
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bia_common::{Interval, Relationship, Significance};

    fn series(n: usize) -> Arc<TimeSeries> {
        let points = (0..n)
            .map(|i| DataPoint::new(i as i64 * 1000, i as f64))
            .collect();
        Arc::new(TimeSeries::new(points, Interval::Hour))
    }

    fn correlation() -> Arc<CorrelationAnalysis> {
        Arc::new(CorrelationAnalysis {
            coefficient: 1.0,
            p_value: 0.0,
            significance: Significance::Strong,
            relationship: Relationship::Positive,
            sample_size: 5,
        })
    }

    #[test]
    fn hit_returns_same_arc() {
        let mut cache = AnalysisCache::new(4);
        let key = CacheKey::new(AnalysisKind::Aggregation, "a", "day:sum");
        let value = series(3);
        cache.insert(key.clone(), Arc::clone(&value));

        let hit: Arc<TimeSeries> = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&hit, &value));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn wrong_type_is_a_miss() {
        let mut cache = AnalysisCache::new(4);
        let key = CacheKey::new(AnalysisKind::Aggregation, "a", "");
        cache.insert(key.clone(), series(2));
        assert!(cache.get::<CorrelationAnalysis>(&key).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = AnalysisCache::new(2);
        let a = CacheKey::new(AnalysisKind::Aggregation, "a", "");
        let b = CacheKey::new(AnalysisKind::Aggregation, "b", "");
        let c = CacheKey::new(AnalysisKind::Aggregation, "c", "");
        cache.insert(a.clone(), series(1));
        cache.insert(b.clone(), series(1));
        // Touch a so b becomes the oldest.
        assert!(cache.get::<TimeSeries>(&a).is_some());

        let evicted = cache.insert(c.clone(), series(1));
        assert_eq!(evicted, vec![b.clone()]);
        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
        assert!(cache.contains(&c));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn reinsert_does_not_evict() {
        let mut cache = AnalysisCache::new(1);
        let a = CacheKey::new(AnalysisKind::Aggregation, "a", "");
        cache.insert(a.clone(), series(1));
        let evicted = cache.insert(a.clone(), series(2));
        assert!(evicted.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidation_reaches_second_operand() {
        let mut cache = AnalysisCache::new(8);
        let pair = CacheKey::pair(AnalysisKind::Correlation, "a", "b");
        let only_a = CacheKey::new(AnalysisKind::Aggregation, "a", "");
        let only_c = CacheKey::new(AnalysisKind::Aggregation, "c", "");
        cache.insert(pair.clone(), correlation());
        cache.insert(only_a.clone(), series(1));
        cache.insert(only_c.clone(), series(1));

        assert_eq!(cache.invalidate("b"), 1);
        assert!(!cache.contains(&pair));
        assert!(cache.contains(&only_a));

        assert_eq!(cache.invalidate("a"), 1);
        assert!(cache.contains(&only_c));
        assert_eq!(cache.stats().invalidations, 2);
        assert_eq!(cache.invalidate("missing"), 0);
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = AnalysisCache::new(0);
        let key = CacheKey::new(AnalysisKind::Aggregation, "a", "");
        cache.insert(key.clone(), series(1));
        assert!(cache.is_empty());
        assert!(cache.get::<TimeSeries>(&key).is_none());
    }

    #[test]
    fn key_display_names_all_parts() {
        let key = CacheKey::pair(AnalysisKind::Correlation, "sales", "traffic");
        assert_eq!(key.to_string(), "correlation:sales+traffic");
        let key = CacheKey::new(AnalysisKind::Forecast, "sales", "linear:10");
        assert_eq!(key.to_string(), "forecast:sales:linear:10");
    }
}
