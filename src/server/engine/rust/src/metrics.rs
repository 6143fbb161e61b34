/* src/server/engine/rust/src/metrics.rs */

//! Observational metrics, owned by the server root and passed down explicitly.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
  pub name: String,
  pub value: f64,
}

impl Metric {
  pub fn new(name: impl Into<String>, value: f64) -> Self {
    Self { name: name.into(), value }
  }

  /// A counter increment of one.
  pub fn count(name: impl Into<String>) -> Self {
    Self::new(name, 1.0)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricStats {
  pub count: u64,
  pub sum: f64,
  pub min: f64,
  pub max: f64,
  pub mean: f64,
}

#[derive(Default)]
pub struct MetricsCollector {
  stats: Mutex<BTreeMap<String, MetricStats>>,
}

impl MetricsCollector {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self, metric: Metric) {
    let mut stats = self.stats.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let entry = stats.entry(metric.name).or_insert_with(|| MetricStats {
      min: f64::INFINITY,
      max: f64::NEG_INFINITY,
      ..MetricStats::default()
    });
    entry.count += 1;
    entry.sum += metric.value;
    entry.min = entry.min.min(metric.value);
    entry.max = entry.max.max(metric.value);
    entry.mean = entry.sum / entry.count as f64;
  }

  /// Snapshot keyed by metric name.
  pub fn summary(&self) -> BTreeMap<String, MetricStats> {
    self.stats.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_summary() {
    assert!(MetricsCollector::new().summary().is_empty());
  }

  #[test]
  fn accumulates_per_name() {
    let metrics = MetricsCollector::new();
    metrics.record(Metric::new("page.render_ms", 4.0));
    metrics.record(Metric::new("page.render_ms", 8.0));
    metrics.record(Metric::count("section.failed"));

    let summary = metrics.summary();
    let render = &summary["page.render_ms"];
    assert_eq!(render.count, 2);
    assert_eq!(render.sum, 12.0);
    assert_eq!(render.min, 4.0);
    assert_eq!(render.max, 8.0);
    assert_eq!(render.mean, 6.0);
    assert_eq!(summary["section.failed"].count, 1);
  }

  #[test]
  fn shared_across_threads() {
    let metrics = std::sync::Arc::new(MetricsCollector::new());
    let handles: Vec<_> = (0..4)
      .map(|_| {
        let m = metrics.clone();
        std::thread::spawn(move || {
          for _ in 0..25 {
            m.record(Metric::count("hits"));
          }
        })
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(metrics.summary()["hits"].count, 100);
  }
}
