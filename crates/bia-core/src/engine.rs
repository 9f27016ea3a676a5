//! Stateful analytics engine: named datasets plus memoized analyses.
//!
//! Every analysis returns `None` when the dataset is missing or too short;
//! nothing here fails loudly. Results are shared `Arc`s, so a cache hit hands
//! back the same allocation as the original computation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bia_common::{
    AggregationType, AnomalyDetection, AnomalyMethod, CorrelationAnalysis, DataPoint,
    ForecastMethod, Interval, SeasonalityAnalysis, StatisticalSummary, TimeSeries, TrendAnalysis,
};
use bia_config::AnalyticsConfig;

use crate::analysis;
use crate::cache::{AnalysisCache, AnalysisKind, CacheKey, CacheStats, Cacheable};
use crate::log_event;
use crate::logging::{event_names, LogContext, SkipReason, Stage};

/// One analytics session: a dataset store and its result cache.
#[derive(Debug)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    datasets: HashMap<String, Arc<TimeSeries>>,
    cache: AnalysisCache,
    computations: u64,
    ctx: LogContext,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        AnalyticsEngine::new(AnalyticsConfig::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        let cache = AnalysisCache::new(config.cache.capacity);
        AnalyticsEngine {
            config,
            datasets: HashMap::new(),
            cache,
            computations: 0,
            ctx: LogContext::generate(),
        }
    }

    /// Tag this engine's log events with an existing run id.
    pub fn with_log_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn log_context(&self) -> &LogContext {
        &self.ctx
    }

    // ------------------------------------------------------------------
    // Dataset store
    // ------------------------------------------------------------------

    /// Register `series` under `name`, replacing any previous series and
    /// evicting every cached result derived from it.
    pub fn add_dataset(&mut self, name: impl Into<String>, series: TimeSeries) {
        let name = name.into();
        let evicted = self.cache.invalidate(&name);
        let points = series.len() as u64;
        let replaced = self
            .datasets
            .insert(name.clone(), Arc::new(series))
            .is_some();

        if evicted > 0 {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::CACHE_INVALIDATED,
                Stage::Ingest,
                "cached results invalidated",
                dataset = name.as_str(),
                entries = evicted as u64
            );
        }
        log_event!(
            self.ctx,
            INFO,
            event_names::DATASET_REGISTERED,
            Stage::Ingest,
            "dataset registered",
            dataset = name.as_str(),
            points = points,
            replaced = replaced
        );
    }

    pub fn get_dataset(&self, name: &str) -> Option<Arc<TimeSeries>> {
        self.datasets.get(name).cloned()
    }

    /// Remove a dataset and every cached result derived from it.
    pub fn remove_dataset(&mut self, name: &str) -> Option<Arc<TimeSeries>> {
        let removed = self.datasets.remove(name)?;
        self.cache.invalidate(name);
        log_event!(
            self.ctx,
            INFO,
            event_names::DATASET_REMOVED,
            Stage::Ingest,
            "dataset removed",
            dataset = name
        );
        Some(removed)
    }

    /// Registered dataset names, sorted.
    pub fn dataset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        names.sort();
        names
    }

    // ------------------------------------------------------------------
    // Instrumentation
    // ------------------------------------------------------------------

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of analyses actually computed (cache misses that ran a kernel).
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // ------------------------------------------------------------------
    // Analyses
    // ------------------------------------------------------------------

    /// Descriptive statistics. Needs at least one point.
    pub fn statistical_summary(&mut self, name: &str) -> Option<Arc<StatisticalSummary>> {
        let series = self.dataset_for(AnalysisKind::Summary, name)?;
        self.cached(CacheKey::new(AnalysisKind::Summary, name, ""), |_| {
            analysis::statistical_summary(&series)
        })
    }

    /// Linear trend with a `periods`-step forecast. Needs at least two points.
    pub fn analyze_trend(&mut self, name: &str, periods: usize) -> Option<Arc<TrendAnalysis>> {
        let series = self.dataset_for(AnalysisKind::Trend, name)?;
        let key = CacheKey::new(AnalysisKind::Trend, name, periods.to_string());
        self.cached(key, |config| {
            analysis::analyze_trend(&series, periods, config.thresholds.trend_stable_threshold)
        })
    }

    pub fn detect_anomalies(
        &mut self,
        name: &str,
        method: AnomalyMethod,
    ) -> Option<Arc<AnomalyDetection>> {
        let series = self.dataset_for(AnalysisKind::Anomalies, name)?;
        let key = CacheKey::new(AnalysisKind::Anomalies, name, method.to_string());
        self.cached(key, |config| {
            Some(analysis::detect_anomalies(&series, method, config))
        })
    }

    /// Pearson correlation over timestamp-aligned pairs. A dataset may be
    /// correlated with itself.
    pub fn analyze_correlation(
        &mut self,
        first: &str,
        second: &str,
    ) -> Option<Arc<CorrelationAnalysis>> {
        let left = self.dataset_for(AnalysisKind::Correlation, first)?;
        let right = self.dataset_for(AnalysisKind::Correlation, second)?;
        let key = CacheKey::pair(AnalysisKind::Correlation, first, second);
        self.cached(key, |config| {
            analysis::analyze_correlation(&left, &right, &config.correlation)
        })
    }

    pub fn analyze_seasonality(&mut self, name: &str) -> Option<Arc<SeasonalityAnalysis>> {
        let series = self.dataset_for(AnalysisKind::Seasonality, name)?;
        self.cached(CacheKey::new(AnalysisKind::Seasonality, name, ""), |config| {
            analysis::analyze_seasonality(&series, &config.seasonality, &config.thresholds)
        })
    }

    /// Resample into `interval` buckets reduced by `op`.
    pub fn aggregate_data(
        &mut self,
        name: &str,
        interval: Interval,
        op: AggregationType,
    ) -> Option<Arc<TimeSeries>> {
        let series = self.dataset_for(AnalysisKind::Aggregation, name)?;
        let key = CacheKey::new(AnalysisKind::Aggregation, name, format!("{interval}:{op}"));
        self.cached(key, |_| Some(analysis::aggregate(&series, interval, op)))
    }

    /// Forecast `periods` future points. Needs `forecast.min_points` points.
    ///
    /// `Seasonal` falls back to `Linear` when no seasonality is detected.
    pub fn forecast(
        &mut self,
        name: &str,
        periods: usize,
        method: ForecastMethod,
    ) -> Option<Arc<Vec<DataPoint>>> {
        let series = self.dataset_for(AnalysisKind::Forecast, name)?;
        let key = CacheKey::new(AnalysisKind::Forecast, name, format!("{method}:{periods}"));
        if let Some(hit) = self.lookup::<Vec<DataPoint>>(&key) {
            return Some(hit);
        }

        if series.len() < self.config.forecast.min_points {
            self.skipped(&key, SkipReason::InsufficientData);
            return None;
        }

        let points = match method {
            ForecastMethod::Linear => self.linear_forecast(name, periods),
            ForecastMethod::Exponential => {
                self.computations += 1;
                analysis::exponential_forecast(
                    &series,
                    periods,
                    self.config.forecast.exponential_alpha,
                )
            }
            ForecastMethod::Seasonal => {
                let period = self
                    .analyze_seasonality(name)
                    .filter(|s| s.has_seasonality)
                    .map(|s| s.dominant_period);
                match period.and_then(|p| analysis::seasonal_forecast(&series, periods, p)) {
                    Some(points) => {
                        self.computations += 1;
                        Some(points)
                    }
                    None => self.linear_forecast(name, periods),
                }
            }
        };

        match points {
            Some(points) => Some(self.store(key, points)),
            None => {
                self.skipped(&key, SkipReason::InsufficientData);
                None
            }
        }
    }

    fn linear_forecast(&mut self, name: &str, periods: usize) -> Option<Vec<DataPoint>> {
        self.analyze_trend(name, periods)
            .map(|trend| trend.forecast.clone())
    }

    // ------------------------------------------------------------------
    // Cache plumbing
    // ------------------------------------------------------------------

    fn dataset_for(&self, kind: AnalysisKind, name: &str) -> Option<Arc<TimeSeries>> {
        let series = self.get_dataset(name);
        if series.is_none() {
            log_event!(
                self.ctx,
                INFO,
                event_names::ANALYSIS_SKIPPED,
                Stage::Analyze,
                "analysis skipped",
                analysis = tracing::field::display(kind),
                dataset = name,
                reason = tracing::field::display(SkipReason::DatasetNotFound)
            );
        }
        series
    }

    fn cached<T: Cacheable>(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce(&AnalyticsConfig) -> Option<T>,
    ) -> Option<Arc<T>> {
        if let Some(hit) = self.lookup::<T>(&key) {
            return Some(hit);
        }
        self.computations += 1;
        match compute(&self.config) {
            Some(value) => Some(self.store(key, value)),
            None => {
                self.skipped(&key, SkipReason::InsufficientData);
                None
            }
        }
    }

    fn lookup<T: Cacheable>(&mut self, key: &CacheKey) -> Option<Arc<T>> {
        let hit = self.cache.get::<T>(key);
        if hit.is_some() {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::CACHE_HIT,
                Stage::Analyze,
                "cache hit",
                key = tracing::field::display(key)
            );
        } else {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::CACHE_MISS,
                Stage::Analyze,
                "cache miss",
                key = tracing::field::display(key)
            );
        }
        hit
    }

    fn store<T: Cacheable>(&mut self, key: CacheKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        log_event!(
            self.ctx,
            INFO,
            event_names::ANALYSIS_COMPLETED,
            Stage::Analyze,
            "analysis completed",
            analysis = tracing::field::display(key.kind),
            key = tracing::field::display(&key)
        );
        for evicted in self.cache.insert(key, Arc::clone(&value)) {
            log_event!(
                self.ctx,
                DEBUG,
                event_names::CACHE_EVICTED,
                Stage::Analyze,
                "cache entry evicted",
                key = tracing::field::display(&evicted)
            );
        }
        value
    }

    fn skipped(&self, key: &CacheKey, reason: SkipReason) {
        log_event!(
            self.ctx,
            INFO,
            event_names::ANALYSIS_SKIPPED,
            Stage::Analyze,
            "analysis skipped",
            analysis = tracing::field::display(key.kind),
            key = tracing::field::display(key),
            reason = tracing::field::display(reason)
        );
    }
}

/// Thread-safe handle to one engine.
///
/// Dataset replacement and the matching cache eviction run under a single
/// lock acquisition, so a reader never sees the new series with stale results.
#[derive(Debug, Clone, Default)]
pub struct SharedAnalyticsEngine {
    inner: Arc<Mutex<AnalyticsEngine>>,
}

impl SharedAnalyticsEngine {
    pub fn new(engine: AnalyticsEngine) -> Self {
        SharedAnalyticsEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut AnalyticsEngine) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn add_dataset(&self, name: impl Into<String>, series: TimeSeries) {
        self.with(|engine| engine.add_dataset(name, series));
    }

    pub fn get_dataset(&self, name: &str) -> Option<Arc<TimeSeries>> {
        self.with(|engine| engine.get_dataset(name))
    }

    pub fn statistical_summary(&self, name: &str) -> Option<Arc<StatisticalSummary>> {
        self.with(|engine| engine.statistical_summary(name))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.with(|engine| engine.cache_stats())
    }
}
