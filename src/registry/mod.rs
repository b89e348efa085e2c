//! Experiment Registry — relational metadata store (id, arm count,
//! status, winner, timestamps), backed by Postgres.

mod adapter;
mod connect;
mod model;
mod schema;

pub use adapter::{Registry, RegistryError};
pub use connect::connect;
pub use model::{Experiment, Status};
pub use schema::EXPERIMENTS;
