use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Concluded,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Concluded => "concluded",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Status::Running),
            "concluded" => Ok(Status::Concluded),
            other => Err(format!("unknown experiment status {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Experiment {
    pub experiment_id: String,
    pub n_arms: i32,
    pub status: Status,
    pub winner_arm: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub concluded_at: Option<DateTime<Utc>>,
}

impl From<tokio_postgres::Row> for Experiment {
    fn from(row: tokio_postgres::Row) -> Self {
        let status: String = row.get("status");
        Self {
            experiment_id: row.get("experiment_id"),
            n_arms: row.get("n_arms"),
            status: status.parse().expect("status column violates CHECK constraint"),
            winner_arm: row.get("winner_arm"),
            created_at: row.get("created_at"),
            concluded_at: row.get("concluded_at"),
        }
    }
}
