use super::model::{Experiment, Status};
use super::schema::EXPERIMENTS;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("experiment {0:?} already exists")]
    AlreadyExists(String),
    #[error("registry unavailable: {0}")]
    Unavailable(#[from] tokio_postgres::Error),
}

/// Relational operations over the Experiment Registry. `conclude` is
/// the idempotency anchor of the Conclusion Engine: it is a single
/// conditional `UPDATE`, serializable by Postgres row-level locking, so two
/// concurrent sweeps cannot both observe a successful conclude.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn create(&self, experiment_id: &str, n_arms: i32) -> Result<(), RegistryError>;
    async fn get(&self, experiment_id: &str) -> Result<Option<Experiment>, RegistryError>;
    async fn list_running(&self) -> Result<Vec<String>, RegistryError>;
    async fn conclude(
        &self,
        experiment_id: &str,
        winner_arm: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, RegistryError>;
}

#[async_trait]
impl Registry for Client {
    async fn create(&self, experiment_id: &str, n_arms: i32) -> Result<(), RegistryError> {
        let sql = format!(
            "INSERT INTO {EXPERIMENTS} (experiment_id, n_arms) VALUES ($1, $2) \
             ON CONFLICT (experiment_id) DO NOTHING"
        );
        let affected = self.execute(&sql, &[&experiment_id, &n_arms]).await?;
        if affected == 0 {
            return Err(RegistryError::AlreadyExists(experiment_id.to_string()));
        }
        Ok(())
    }

    async fn get(&self, experiment_id: &str) -> Result<Option<Experiment>, RegistryError> {
        let sql = format!("SELECT * FROM {EXPERIMENTS} WHERE experiment_id = $1");
        let row = self.query_opt(&sql, &[&experiment_id]).await?;
        Ok(row.map(Experiment::from))
    }

    async fn list_running(&self) -> Result<Vec<String>, RegistryError> {
        let sql = format!(
            "SELECT experiment_id FROM {EXPERIMENTS} WHERE status = '{}'",
            Status::Running.as_str()
        );
        let rows = self.query(&sql, &[]).await?;
        Ok(rows.iter().map(|r| r.get("experiment_id")).collect())
    }

    async fn conclude(
        &self,
        experiment_id: &str,
        winner_arm: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, RegistryError> {
        let sql = format!(
            "UPDATE {EXPERIMENTS} SET status = 'concluded', winner_arm = $1, concluded_at = $2 \
             WHERE experiment_id = $3 AND status = 'running'"
        );
        let affected = self
            .execute(&sql, &[&winner_arm, &now, &experiment_id])
            .await?;
        Ok(affected == 1)
    }
}

#[async_trait]
impl Registry for Arc<Client> {
    async fn create(&self, experiment_id: &str, n_arms: i32) -> Result<(), RegistryError> {
        self.as_ref().create(experiment_id, n_arms).await
    }
    async fn get(&self, experiment_id: &str) -> Result<Option<Experiment>, RegistryError> {
        self.as_ref().get(experiment_id).await
    }
    async fn list_running(&self) -> Result<Vec<String>, RegistryError> {
        self.as_ref().list_running().await
    }
    async fn conclude(
        &self,
        experiment_id: &str,
        winner_arm: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, RegistryError> {
        self.as_ref().conclude(experiment_id, winner_arm, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exercises the adapter against a live Postgres instance. Run manually
    /// or in CI with `DB_URL` pointed at a real instance.
    #[tokio::test]
    #[ignore]
    async fn create_then_conclude_is_the_idempotency_anchor() {
        let db_url = std::env::var("DB_URL").expect("DB_URL must be set for this test");
        let client = crate::registry::connect(&db_url).await;

        let experiment_id = format!("test:{}", uuid::Uuid::new_v4());
        client.create(&experiment_id, 2).await.unwrap();

        let duplicate = client.create(&experiment_id, 2).await;
        assert!(matches!(duplicate, Err(RegistryError::AlreadyExists(_))));

        let now = Utc::now();
        assert!(client.conclude(&experiment_id, 1, now).await.unwrap());
        assert!(!client.conclude(&experiment_id, 1, now).await.unwrap());

        let experiment = client.get(&experiment_id).await.unwrap().unwrap();
        assert_eq!(experiment.status, Status::Concluded);
        assert_eq!(experiment.winner_arm, Some(1));
        assert!(!client.list_running().await.unwrap().contains(&experiment_id));
    }
}
