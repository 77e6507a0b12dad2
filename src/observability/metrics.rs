use std::sync::Arc;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Upstream (cbr.ru) metrics
    pub upstream_requests: IntCounter,
    pub upstream_retries: IntCounter,
    pub upstream_failures: IntCounterVec,

    // Gateway metrics
    pub gateway_requests: IntCounterVec,
    pub gateway_duration: HistogramVec,
    pub tokens_issued: IntCounter,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("cbrgateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            upstream_requests: IntCounter::new("upstream_requests_total", "GET attempts against cbr.ru").unwrap(),
            upstream_retries: IntCounter::new("upstream_retries_total", "Connection-failure retries").unwrap(),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Upstream fetch failures by reason"), &["reason"]).unwrap(),

            gateway_requests: IntCounterVec::new(Opts::new("gateway_requests_total", "Gateway requests by operation"), &["operation"]).unwrap(),
            gateway_duration: HistogramVec::new(HistogramOpts::new("gateway_request_duration_seconds", "Gateway request duration").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["operation"]).unwrap(),
            tokens_issued: IntCounter::new("tokens_issued_total", "Bearer tokens issued or refreshed").unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.upstream_requests.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_retries.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_failures.clone())).unwrap();
        reg.register(Box::new(metrics.gateway_requests.clone())).unwrap();
        reg.register(Box::new(metrics.gateway_duration.clone())).unwrap();
        reg.register(Box::new(metrics.tokens_issued.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
