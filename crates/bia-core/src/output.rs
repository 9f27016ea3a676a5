//! Rendering of analysis results for stdout.
//!
//! JSON formats wrap the result in an envelope carrying the run id and the
//! configuration hash, so a stored result can be traced back to the settings
//! that produced it.

use bia_common::{
    AnomalyDetection, CorrelationAnalysis, DataPoint, OutputFormat, Result, SeasonalityAnalysis,
    StatisticalSummary, TimeSeries, TrendAnalysis,
};
use bia_config::ConfigSnapshot;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Metadata wrapper around one command result.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub command: &'a str,
    pub run_id: &'a str,
    pub generated_at: String,
    pub config_hash: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<&'a str>,
    pub result: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(command: &'a str, run_id: &'a str, config_hash: &'a str, result: &'a T) -> Self {
        Envelope {
            schema_version: OUTPUT_SCHEMA_VERSION,
            command,
            run_id,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            config_hash,
            dataset: None,
            result,
        }
    }

    pub fn with_dataset(mut self, dataset: &'a str) -> Self {
        self.dataset = Some(dataset);
        self
    }
}

/// One-line human rendering used by `--format summary`.
pub trait Summarize {
    fn summary_line(&self) -> String;
}

impl Summarize for StatisticalSummary {
    fn summary_line(&self) -> String {
        format!(
            "n={} mean={:.4} median={:.4} std={:.4} min={} max={} q1={:.4} q3={:.4}",
            self.count,
            self.mean,
            self.median,
            self.std_dev,
            self.min,
            self.max,
            self.quartiles.q1,
            self.quartiles.q3
        )
    }
}

impl Summarize for TrendAnalysis {
    fn summary_line(&self) -> String {
        format!(
            "trend={} slope={:.4} r={:.4} confidence={:.4} forecast_points={}",
            self.trend,
            self.slope,
            self.correlation,
            self.confidence,
            self.forecast.len()
        )
    }
}

impl Summarize for AnomalyDetection {
    fn summary_line(&self) -> String {
        let mut line = format!(
            "method={} threshold={} anomalies={}",
            self.method,
            self.threshold,
            self.anomalies.len()
        );
        for anomaly in &self.anomalies {
            line.push_str(&format!(
                "\n  {} value={} severity={} score={:.3}",
                anomaly.timestamp, anomaly.value, anomaly.severity, anomaly.score
            ));
        }
        line
    }
}

impl Summarize for CorrelationAnalysis {
    fn summary_line(&self) -> String {
        format!(
            "r={:.4} p={:.4e} significance={:?} relationship={:?} pairs={}",
            self.coefficient, self.p_value, self.significance, self.relationship, self.sample_size
        )
        .to_lowercase()
    }
}

impl Summarize for SeasonalityAnalysis {
    fn summary_line(&self) -> String {
        if !self.has_seasonality {
            return "seasonality=none".to_string();
        }
        let labels: Vec<&str> = self.patterns.iter().map(|p| p.period.as_str()).collect();
        format!(
            "seasonality=yes dominant_period={} strength={:.4} patterns={}",
            self.dominant_period,
            self.strength,
            labels.join(",")
        )
    }
}

impl Summarize for TimeSeries {
    fn summary_line(&self) -> String {
        format!(
            "interval={} points={} start={} end={}",
            self.interval,
            self.len(),
            self.start_time,
            self.end_time
        )
    }
}

impl Summarize for Vec<DataPoint> {
    fn summary_line(&self) -> String {
        let values: Vec<String> = self.iter().map(|p| format!("{:.4}", p.value)).collect();
        format!("forecast={} values=[{}]", self.len(), values.join(", "))
    }
}

impl Summarize for ConfigSnapshot {
    fn summary_line(&self) -> String {
        format!(
            "source={} path={} hash={}",
            self.source,
            self.path.as_deref().unwrap_or("-"),
            &self.config_hash[..self.config_hash.len().min(12)]
        )
    }
}

/// Render `envelope` in `format`. The returned string has no trailing newline.
pub fn render<T: Serialize + Summarize>(format: OutputFormat, envelope: &Envelope<'_, T>) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(envelope)?,
        OutputFormat::Jsonl => serde_json::to_string(envelope)?,
        OutputFormat::Summary => envelope.result.summary_line(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bia_common::{Interval, Relationship, Significance};

    fn correlation() -> CorrelationAnalysis {
        CorrelationAnalysis {
            coefficient: 0.95,
            p_value: 0.001,
            significance: Significance::Strong,
            relationship: Relationship::Positive,
            sample_size: 12,
        }
    }

    #[test]
    fn json_envelope_fields() {
        let result = correlation();
        let envelope = Envelope::new("correlate", "run-abc", "deadbeef", &result).with_dataset("a");
        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &envelope).unwrap()).unwrap();
        assert_eq!(json["schema_version"], OUTPUT_SCHEMA_VERSION);
        assert_eq!(json["command"], "correlate");
        assert_eq!(json["run_id"], "run-abc");
        assert_eq!(json["dataset"], "a");
        assert_eq!(json["result"]["significance"], "strong");
        assert_eq!(json["result"]["sample_size"], 12);
    }

    #[test]
    fn jsonl_is_single_line() {
        let result = TimeSeries::new(vec![DataPoint::new(0, 1.0)], Interval::Day);
        let envelope = Envelope::new("aggregate", "run-abc", "h", &result);
        let line = render(OutputFormat::Jsonl, &envelope).unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains("\"dataset\""));
    }

    #[test]
    fn summary_lines() {
        let result = correlation();
        let envelope = Envelope::new("correlate", "run-abc", "h", &result);
        let line = render(OutputFormat::Summary, &envelope).unwrap();
        assert!(line.starts_with("r=0.9500"));
        assert!(line.contains("significance=strong"));

        let forecast = vec![DataPoint::new(0, 1.0), DataPoint::new(1, 2.5)];
        assert_eq!(forecast.summary_line(), "forecast=2 values=[1.0000, 2.5000]");
    }
}
