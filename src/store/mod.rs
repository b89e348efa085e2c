//! State Store Adapter — a key-namespaced view over a Redis-wire-protocol
//! KV store (the reference deployment runs Dragonfly; the adapter speaks plain
//! Redis commands and is agnostic to which server answers them).

mod adapter;
mod connect;
mod keys;

pub use adapter::{PosteriorStore, StoreError};
pub use connect::connect;
