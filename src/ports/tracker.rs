use async_trait::async_trait;

/// Port to the out-of-core experiment tracker, which logs scalar
/// metrics keyed by step for regret and off-policy-evaluation analyses. The
/// core's only contract with it is that posteriors and `p_best` are readable
/// at any time; emitting a step metric is best-effort and never blocks
/// a request.
#[async_trait]
pub trait MetricEmitter: Send + Sync {
    async fn emit_step(&self, experiment_id: &str, metric: &str, value: f64, step: u64);
}

/// Default emitter when no tracker is configured: drops every metric.
pub struct NoopMetricEmitter;

#[async_trait]
impl MetricEmitter for NoopMetricEmitter {
    async fn emit_step(&self, _experiment_id: &str, _metric: &str, _value: f64, _step: u64) {}
}
