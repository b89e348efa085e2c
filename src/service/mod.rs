//! Inference Service — the HTTP surface over the Posterior Engine,
//! State Store Adapter, and Experiment Registry.

mod api;
mod error;
mod metrics;
mod request;
mod response;
mod server;

pub use api::{Api, AppState};
pub use error::AppError;
pub use metrics::Metrics;
pub use server::{routes, Server};
