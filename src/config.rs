//! Environment-driven process configuration.
//!
//! Loaded once at process start. Required variables panic via `expect` on
//! absence, matching this codebase's existing `DB_URL`-from-env convention;
//! optional variables fall back to sensible per-variable defaults.

use crate::{Probability, DEFAULT_ANNOTATION_TIMEOUT_SECS, DEFAULT_SWEEP_INTERVAL_SECS};
use crate::{DEFAULT_THRESHOLD, M_HOT, M_STOP};

#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: String,
    pub store_url: String,
    pub bind_addr: String,
    pub stopping_threshold: Probability,
    pub m_hot: usize,
    pub m_stop: usize,
    pub sweep_interval_secs: u64,
    pub annotation_sink_url: Option<String>,
    pub annotation_sink_token: Option<String>,
    pub annotation_timeout_secs: u64,
    pub enforce_concluded_guard: bool,
}

impl Config {
    /// Read configuration from the environment. Panics if a required
    /// variable is missing.
    pub fn from_env() -> Self {
        Self {
            db_url: std::env::var("DB_URL").expect("DB_URL must be set"),
            store_url: std::env::var("STORE_URL").expect("STORE_URL must be set"),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            stopping_threshold: env_parsed_or("STOPPING_THRESHOLD", DEFAULT_THRESHOLD),
            m_hot: env_parsed_or("M_HOT", M_HOT),
            m_stop: env_parsed_or("M_STOP", M_STOP),
            sweep_interval_secs: env_parsed_or(
                "SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            ),
            annotation_sink_url: std::env::var("ANNOTATION_SINK_URL").ok(),
            annotation_sink_token: std::env::var("ANNOTATION_SINK_TOKEN").ok(),
            annotation_timeout_secs: env_parsed_or(
                "ANNOTATION_TIMEOUT_SECS",
                DEFAULT_ANNOTATION_TIMEOUT_SECS,
            ),
            enforce_concluded_guard: env_parsed_or("ENFORCE_CONCLUDED_GUARD", false),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
