use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateExperimentRequest {
    pub experiment_id: String,
    pub n_arms: i32,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub experiment_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RewardRequest {
    pub experiment_id: String,
    pub arm_id: usize,
    pub reward: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConcludeQuery {
    pub threshold: Option<f64>,
}
