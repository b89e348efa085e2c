use crate::{ArmId, Probability};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreateExperimentResponse {
    pub experiment_id: String,
    pub n_arms: i32,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub arm_id: ArmId,
    pub arm_name: String,
    pub p_best: Probability,
}

#[derive(Debug, Serialize)]
pub struct ConcludeResponse {
    pub should_conclude: bool,
    pub winner_arm_id: Option<ArmId>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PBestResponse {
    pub experiment_id: String,
    pub p_best: Vec<Probability>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
