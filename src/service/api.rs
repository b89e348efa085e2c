use super::error::AppError;
use crate::posterior::PosteriorEngine;
use crate::registry::{Registry, Status};
use crate::store::PosteriorStore;
use crate::{ArmId, Probability};
use chrono::{DateTime, Utc};
use rand::thread_rng;
use std::sync::Arc;
use tokio_postgres::Client;

/// Business logic behind the Inference Service's HTTP surface. Holds
/// only the pooled, cloneable handles to the State Store and Registry — no
/// in-process mutable state, so the whole service is horizontally scalable.
pub struct Api<S, R> {
    store: S,
    registry: R,
    m_hot: usize,
    m_stop: usize,
    enforce_concluded_guard: bool,
}

pub type AppState = Api<redis::aio::ConnectionManager, Arc<Client>>;

impl<S, R> Api<S, R>
where
    S: PosteriorStore + Clone,
    R: Registry,
{
    pub fn new(
        store: S,
        registry: R,
        m_hot: usize,
        m_stop: usize,
        enforce_concluded_guard: bool,
    ) -> Self {
        Self {
            store,
            registry,
            m_hot,
            m_stop,
            enforce_concluded_guard,
        }
    }

    pub async fn create_experiment(&self, experiment_id: &str, n_arms: i32) -> Result<(), AppError> {
        if n_arms < 2 {
            return Err(AppError::InvalidInput("n_arms must be >= 2".to_string()));
        }
        self.registry.create(experiment_id, n_arms).await?;
        self.store.clone().seed(experiment_id, n_arms as usize).await?;
        Ok(())
    }

    pub async fn select(&self, experiment_id: &str) -> Result<(ArmId, Probability), AppError> {
        let mut store = self.store.clone();
        let n_arms = store.get_n_arms(experiment_id).await?;
        let (alphas, betas) = store.read_posteriors(experiment_id, n_arms).await?;
        let mut rng = thread_rng();
        Ok(PosteriorEngine::thompson_sample(
            &mut rng, &alphas, &betas, self.m_hot,
        ))
    }

    pub async fn reward(
        &self,
        experiment_id: &str,
        arm_id: usize,
        reward: f64,
    ) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&reward) {
            return Err(AppError::InvalidInput("reward must be in [0, 1]".to_string()));
        }
        let mut store = self.store.clone();
        let n_arms = store.get_n_arms(experiment_id).await?;
        if arm_id >= n_arms {
            return Err(AppError::InvalidInput(format!(
                "arm_id {arm_id} out of range for {n_arms} arms"
            )));
        }
        if self.enforce_concluded_guard {
            let experiment = self
                .registry
                .get(experiment_id)
                .await?
                .ok_or_else(|| AppError::UnknownExperiment(experiment_id.to_string()))?;
            if experiment.status == Status::Concluded {
                return Err(AppError::InvalidInput(format!(
                    "experiment {experiment_id:?} is concluded"
                )));
            }
        }
        store.apply_reward(experiment_id, arm_id, reward > 0.0).await?;
        Ok(())
    }

    pub async fn p_best(&self, experiment_id: &str) -> Result<Vec<Probability>, AppError> {
        let mut store = self.store.clone();
        let n_arms = store.get_n_arms(experiment_id).await?;
        let (alphas, betas) = store.read_posteriors(experiment_id, n_arms).await?;
        let mut rng = thread_rng();
        Ok(PosteriorEngine::p_best_all(
            &mut rng, &alphas, &betas, self.m_stop,
        ))
    }

    /// Read-only check against the default or caller-supplied threshold.
    /// Does not itself mutate the Registry — only the Conclusion
    /// Engine's sweep concludes an experiment.
    pub async fn conclude_check(
        &self,
        experiment_id: &str,
        threshold: Probability,
    ) -> Result<(bool, Option<ArmId>, DateTime<Utc>), AppError> {
        let checked_at = Utc::now();
        let p_best = self.p_best(experiment_id).await?;
        let winner = argmax(&p_best);
        let should_conclude = p_best[winner] >= threshold;
        Ok((should_conclude, should_conclude.then_some(winner), checked_at))
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
