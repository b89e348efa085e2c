//! External Collaborator Ports — the core's interface to systems whose
//! internals are explicitly out of scope: the experiment tracker, the
//! snapshot archiver, and bulk dataset I/O. Only the boundary is specified
//! here; nothing in this module talks to a real tracker, warehouse, or
//! object store.

mod dataset;
mod snapshot;
mod tracker;

pub use dataset::DatasetPort;
pub use snapshot::{PosteriorSnapshot, SnapshotSource};
pub use tracker::{MetricEmitter, NoopMetricEmitter};
