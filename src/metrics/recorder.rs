//! Metrics recording implementation using Prometheus.
//!
//! Two instruments, both labeled by endpoint: a monotonic request counter
//! and a latency summary. The summary tracks sample count and cumulative
//! seconds only (no histogram buckets, no quantiles), so it is implemented
//! as a custom collector over per-endpoint atomics rather than the crate's
//! histogram type.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use prometheus::core::{Atomic, AtomicF64, Collector, Desc};
use prometheus::{
    proto, register_counter_vec_with_registry, CounterVec, Encoder, Opts, Registry, TextEncoder,
};

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one request against the given endpoint.
    fn record_request(&self, endpoint: &str);

    /// Records one observed request duration for the given endpoint.
    fn record_latency(&self, endpoint: &str, duration_secs: f64);
}

struct LatencyCell {
    count: AtomicU64,
    sum: AtomicF64,
}

impl Default for LatencyCell {
    fn default() -> Self {
        LatencyCell {
            count: AtomicU64::new(0),
            sum: AtomicF64::new(0.0),
        }
    }
}

struct LatencyInner {
    desc: Desc,
    cells: RwLock<HashMap<String, LatencyCell>>,
}

/// A summary-type latency instrument labeled by endpoint.
///
/// Updates are atomic increments; the registry pulls the current state on
/// every scrape via the `Collector` impl.
#[derive(Clone)]
struct RequestLatency {
    inner: Arc<LatencyInner>,
}

impl RequestLatency {
    fn new() -> Self {
        let desc = Desc::new(
            "request_latency_seconds".to_string(),
            "Request latency".to_string(),
            vec!["endpoint".to_string()],
            HashMap::new(),
        )
        .expect("Failed to build request_latency_seconds descriptor");

        RequestLatency {
            inner: Arc::new(LatencyInner {
                desc,
                cells: RwLock::new(HashMap::new()),
            }),
        }
    }

    fn observe(&self, endpoint: &str, duration_secs: f64) {
        {
            let cells = self
                .inner
                .cells
                .read()
                .expect("latency cell map poisoned");
            if let Some(cell) = cells.get(endpoint) {
                cell.count.fetch_add(1, Ordering::Relaxed);
                cell.sum.inc_by(duration_secs);
                return;
            }
        }

        // First observation for this endpoint.
        let mut cells = self
            .inner
            .cells
            .write()
            .expect("latency cell map poisoned");
        let cell = cells.entry(endpoint.to_string()).or_default();
        cell.count.fetch_add(1, Ordering::Relaxed);
        cell.sum.inc_by(duration_secs);
    }
}

impl Collector for RequestLatency {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.inner.desc]
    }

    fn collect(&self) -> Vec<proto::MetricFamily> {
        let cells = self
            .inner
            .cells
            .read()
            .expect("latency cell map poisoned");
        if cells.is_empty() {
            return Vec::new();
        }

        let mut endpoints: Vec<&String> = cells.keys().collect();
        endpoints.sort();

        let mut family = proto::MetricFamily::new();
        family.set_name(self.inner.desc.fq_name.clone());
        family.set_help(self.inner.desc.help.clone());
        family.set_field_type(proto::MetricType::SUMMARY);

        for endpoint in endpoints {
            let cell = &cells[endpoint];

            let mut label = proto::LabelPair::new();
            label.set_name("endpoint".to_string());
            label.set_value(endpoint.clone());

            let mut summary = proto::Summary::new();
            summary.set_sample_count(cell.count.load(Ordering::Relaxed));
            summary.set_sample_sum(cell.sum.get());

            let mut metric = proto::Metric::new();
            metric.mut_label().push(label);
            metric.set_summary(summary);
            family.mut_metric().push(metric);
        }

        vec![family]
    }
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    request_count: CounterVec,
    request_latency: RequestLatency,
}

impl Metrics {
    /// Creates a new metrics instance with a Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let request_count = register_counter_vec_with_registry!(
            Opts::new("request_count", "API request count"),
            &["endpoint"],
            registry.clone()
        )
        .expect("Failed to register request_count");

        let request_latency = RequestLatency::new();
        registry
            .register(Box::new(request_latency.clone()))
            .expect("Failed to register request_latency_seconds");

        Metrics {
            registry,
            request_count,
            request_latency,
        }
    }

    /// Starts a scoped timer for the given endpoint.
    ///
    /// The observation is recorded when the returned guard drops, so the
    /// handler's full execution is measured on every exit path, including
    /// error returns.
    pub fn request_timer(&self, endpoint: &str) -> RequestTimer {
        RequestTimer {
            metrics: self.clone(),
            endpoint: endpoint.to_string(),
            start: Instant::now(),
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("Failed to encode metrics");
        String::from_utf8(buffer).expect("Metrics encoding produced invalid UTF-8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, endpoint: &str) {
        self.request_count.with_label_values(&[endpoint]).inc();
    }

    fn record_latency(&self, endpoint: &str, duration_secs: f64) {
        self.request_latency.observe(endpoint, duration_secs);
    }
}

/// Drop guard that records one latency observation when it goes out of scope.
pub struct RequestTimer {
    metrics: Metrics,
    endpoint: String,
    start: Instant,
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.metrics
            .record_latency(&self.endpoint, self.start.elapsed().as_secs_f64());
    }
}
