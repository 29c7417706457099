//! # Pulse Gateway
//!
//! Thin HTTP boundary over the scoring coordinator. No algorithmic
//! content: handlers validate input, call [`pulse_memory::ScoreCoordinator`]
//! and map outcomes to status codes.

mod server;
mod types;

pub use server::GatewayServer;
pub use types::{ErrorBody, QueuedBody, ScoreRequest};
