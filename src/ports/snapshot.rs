use crate::registry::{Registry, RegistryError};
use crate::store::{PosteriorStore, StoreError};
use chrono::{DateTime, Utc};

/// One row of the analytic `posterior_snapshots` table: the out-of-core
/// archiver owns the write side (composite PK on `snapshot_at`,
/// `experiment_id`, `arm_id`; `ON CONFLICT DO NOTHING`), this core only
/// produces rows to write.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PosteriorSnapshot {
    pub snapshot_at: DateTime<Utc>,
    pub experiment_id: String,
    pub arm_id: usize,
    pub alpha: u64,
    pub beta: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Read-only facade the snapshot archiver drives: list running experiments,
/// then read their posteriors. The core does not write the analytic table
/// itself.
pub struct SnapshotSource<S, R> {
    store: S,
    registry: R,
}

impl<S, R> SnapshotSource<S, R>
where
    S: PosteriorStore,
    R: Registry,
{
    pub fn new(store: S, registry: R) -> Self {
        Self { store, registry }
    }

    /// Snapshot every currently-running experiment's posteriors at `now`.
    pub async fn snapshot_running(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PosteriorSnapshot>, SnapshotError> {
        let ids = self.registry.list_running().await?;
        let mut rows = Vec::new();
        for experiment_id in ids {
            let n_arms = match self.store.get_n_arms(&experiment_id).await {
                Ok(n) => n,
                Err(StoreError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            let (alphas, betas) = self.store.read_posteriors(&experiment_id, n_arms).await?;
            for (arm_id, (alpha, beta)) in alphas.into_iter().zip(betas).enumerate() {
                rows.push(PosteriorSnapshot {
                    snapshot_at: now,
                    experiment_id: experiment_id.clone(),
                    arm_id,
                    alpha,
                    beta,
                });
            }
        }
        Ok(rows)
    }
}
