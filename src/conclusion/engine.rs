use super::annotation::AnnotationSink;
use crate::posterior::PosteriorEngine;
use crate::registry::Registry;
use crate::store::{PosteriorStore, StoreError};
use crate::{ArmId, Probability};
use chrono::Utc;
use rand::thread_rng;

/// The periodic sweep: for every running experiment, estimate
/// `p_best` and conclude it once the winner crosses `threshold`. Conditional
/// UPDATE in the Registry is the idempotency anchor — two concurrent
/// sweeps cannot both conclude the same experiment.
pub struct ConclusionEngine<S, R, A> {
    store: S,
    registry: R,
    annotation: A,
    threshold: Probability,
    m_stop: usize,
}

impl<S, R, A> ConclusionEngine<S, R, A>
where
    S: PosteriorStore + Clone,
    R: Registry,
    A: AnnotationSink,
{
    pub fn new(store: S, registry: R, annotation: A, threshold: Probability, m_stop: usize) -> Self {
        Self {
            store,
            registry,
            annotation,
            threshold,
            m_stop,
        }
    }

    /// One full sweep. Returns the ids newly concluded this pass. Aborts
    /// early only if the Registry itself is unreachable — per-experiment
    /// State Store failures are logged and isolated.
    pub async fn sweep(&self) -> anyhow::Result<Vec<String>> {
        let running = self.registry.list_running().await?;
        let n_running = running.len();
        let mut concluded = Vec::new();
        for experiment_id in &running {
            match self.sweep_one(experiment_id).await {
                Ok(Some(_)) => concluded.push(experiment_id.clone()),
                Ok(None) => {}
                Err(e) => log::warn!("sweep: experiment {experiment_id:?} failed: {e}"),
            }
        }
        log::info!(
            "sweep complete: n_running={n_running} n_concluded={}",
            concluded.len()
        );
        Ok(concluded)
    }

    async fn sweep_one(&self, experiment_id: &str) -> anyhow::Result<Option<ArmId>> {
        let mut store = self.store.clone();
        let n_arms = match store.get_n_arms(experiment_id).await {
            Ok(n) => n,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let (alphas, betas) = store.read_posteriors(experiment_id, n_arms).await?;
        let mut rng = thread_rng();
        let p_best = PosteriorEngine::p_best_all(&mut rng, &alphas, &betas, self.m_stop);
        let winner = argmax(&p_best);
        let should_conclude = p_best[winner] >= self.threshold;
        log::info!(
            "sweep: experiment={experiment_id:?} p_best={p_best:?} should_conclude={should_conclude}"
        );
        if !should_conclude {
            return Ok(None);
        }
        let now = Utc::now();
        let updated = self
            .registry
            .conclude(experiment_id, winner as i32, now)
            .await?;
        if !updated {
            return Ok(None);
        }
        if let Err(e) = self.annotation.emit(experiment_id, self.threshold, now).await {
            log::warn!("annotation sink failed for {experiment_id:?}: {e}");
        }
        Ok(Some(winner))
    }
}

fn argmax(p: &[Probability]) -> ArmId {
    let mut best = 0;
    for (k, &v) in p.iter().enumerate().skip(1) {
        if v > p[best] {
            best = k;
        }
    }
    best
}
