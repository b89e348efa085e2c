use actix_web::{web, HttpResponse, Responder};
use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder};

/// Request-level Prometheus metrics, owned by the server and
/// handed to every handler through `web::Data`. Registered once at startup
/// rather than via global statics, mirroring how the rest of this service
/// threads pooled state through `web::Data` instead of process globals.
pub struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_latency: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let requests_total = IntCounterVec::new(
            prometheus::opts!("bandit_requests_total", "Total HTTP requests served"),
            &["path", "status"],
        )
        .expect("valid metric descriptor");
        let request_latency = HistogramVec::new(
            prometheus::histogram_opts!(
                "bandit_request_duration_seconds",
                "HTTP request latency in seconds"
            ),
            &["path"],
        )
        .expect("valid metric descriptor");
        registry
            .register(Box::new(requests_total.clone()))
            .expect("register requests_total");
        registry
            .register(Box::new(request_latency.clone()))
            .expect("register request_latency");
        Self {
            registry,
            requests_total,
            request_latency,
        }
    }

    pub fn observe(&self, path: &str, status: u16, elapsed_secs: f64) {
        self.requests_total
            .with_label_values(&[path, &status.to_string()])
            .inc();
        self.request_latency
            .with_label_values(&[path])
            .observe(elapsed_secs);
    }

    fn gather(&self) -> Vec<u8> {
        let families = self.registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buf)
            .expect("prometheus text encoding is infallible for well-formed families");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn handler(metrics: web::Data<Metrics>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics.gather())
}
