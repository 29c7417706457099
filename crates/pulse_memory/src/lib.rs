//! # Pulse Memory
//!
//! Persistence and orchestration for Pulse: a local JSON-document store,
//! an optional remote row store, and the [`ScoreCoordinator`] that wires
//! the pure `pulse_core` pipeline to both.

pub mod coordinator;
pub mod remote;
pub mod store;

pub use coordinator::{ChatResponse, ScoreCoordinator};
pub use remote::{RemoteStore, StoreError};
pub use store::{FileStore, MemoryStore};
