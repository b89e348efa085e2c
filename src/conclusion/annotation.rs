use crate::Probability;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Port to the external annotation sink: a bearer-authenticated HTTP
/// endpoint that records one annotation per experiment conclusion. A
/// non-2xx response or a transport failure is a warning, never a sweep
/// failure.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn emit(
        &self,
        experiment_id: &str,
        threshold: Probability,
        concluded_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct AnnotationBody {
    time: i64,
    tags: Vec<&'static str>,
    text: String,
}

pub struct HttpAnnotationSink {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpAnnotationSink {
    pub fn new(url: String, token: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("build reqwest client");
        Self { client, url, token }
    }
}

#[async_trait]
impl AnnotationSink for HttpAnnotationSink {
    async fn emit(
        &self,
        experiment_id: &str,
        threshold: Probability,
        concluded_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let body = AnnotationBody {
            time: concluded_at.timestamp_millis(),
            tags: vec!["bandit", "experiment-concluded"],
            text: format!(
                "experiment {experiment_id:?} concluded: p_best crossed threshold {threshold:.3}"
            ),
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("annotation sink returned {}", response.status());
        }
        Ok(())
    }
}

/// Used when no annotation sink is configured: logs instead of
/// failing, since a missing annotation never rolls back a conclusion.
pub struct NoopAnnotationSink;

#[async_trait]
impl AnnotationSink for NoopAnnotationSink {
    async fn emit(
        &self,
        experiment_id: &str,
        _threshold: Probability,
        _concluded_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        log::warn!("no annotation sink configured, skipping annotation for {experiment_id:?}");
        Ok(())
    }
}
