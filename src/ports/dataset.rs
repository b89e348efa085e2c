use async_trait::async_trait;

/// Port to bulk dataset object storage, driven by the replay load
/// generator and the offline ingestion job. Neither lives in this core; the
/// trait exists only so call sites can be written against a stable signature
/// without depending on a particular object store client.
#[async_trait]
pub trait DatasetPort: Send + Sync {
    async fn fetch(&self, key: &str) -> anyhow::Result<Vec<u8>>;
    async fn put(&self, key: &str, bytes: Vec<u8>) -> anyhow::Result<()>;
}
