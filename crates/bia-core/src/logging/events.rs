//! Structured event vocabulary for logging.
//!
//! Events carry a run id and a stage so JSONL output from one invocation can
//! be correlated.

use serde::{Deserialize, Serialize};

/// Where in an invocation an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Dataset registration and CSV ingestion.
    Ingest,
    /// Analysis computation and cache lookups.
    Analyze,
    /// Writing results.
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Ingest => "ingest",
            Stage::Analyze => "analyze",
            Stage::Output => "output",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Datasets
    pub const DATASET_REGISTERED: &str = "dataset.registered";
    pub const DATASET_REMOVED: &str = "dataset.removed";

    // Cache
    pub const CACHE_HIT: &str = "cache.hit";
    pub const CACHE_MISS: &str = "cache.miss";
    pub const CACHE_EVICTED: &str = "cache.evicted";
    pub const CACHE_INVALIDATED: &str = "cache.invalidated";

    // Analyses
    pub const ANALYSIS_COMPLETED: &str = "analysis.completed";
    pub const ANALYSIS_SKIPPED: &str = "analysis.skipped";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_ERROR: &str = "config.error";
}

/// Why an analysis produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DatasetNotFound,
    InsufficientData,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DatasetNotFound => write!(f, "dataset_not_found"),
            SkipReason::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Correlation ids attached to every event of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }

    /// Context with a fresh run id.
    pub fn generate() -> Self {
        LogContext::new(super::generate_run_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_reason_display() {
        assert_eq!(Stage::Analyze.to_string(), "analyze");
        assert_eq!(SkipReason::InsufficientData.to_string(), "insufficient_data");
        assert_eq!(
            serde_json::to_string(&SkipReason::DatasetNotFound).unwrap(),
            "\"dataset_not_found\""
        );
    }

    #[test]
    fn generated_context_has_run_id() {
        let ctx = LogContext::generate();
        assert!(ctx.run_id.starts_with("run-"));
    }
}
