//! # Pulse Core
//!
//! The deterministic heart of Pulse: a text-to-score pipeline plus
//! rolling-window trend analytics over per-user score history.
//!
//! ## Pipeline
//!
//! 1. [`tone`]: weighted keyword counting maps a message to one
//!    [`ToneCategory`]
//! 2. [`stability`]: punctuation/caps/repetition density maps the same
//!    message to a 0–100 stability score
//! 3. [`score`]: tone base + stability adjustment + hash-derived jitter,
//!    clamped into \[100, 600\]
//! 4. [`range`]: the bounded score lands in one of five named bands
//! 5. [`trend`]: recency-weighted average, volatility, slope and streak
//!    over the most recent history window
//!
//! Everything in this crate is pure: no I/O, no clocks, no ambient state.
//! The only nondeterminism is the chat-buffer threshold draw in [`chat`],
//! which takes the RNG as an argument so tests can pin it.

pub mod chat;
pub mod config;
pub mod memory;
pub mod range;
pub mod reflect;
pub mod score;
pub mod stability;
pub mod summary;
pub mod tone;
pub mod trend;

pub use chat::{ChatOutcome, ChatState, MESSAGE_SEPARATOR};
pub use config::{EngineConfig, PulseConfig, RemoteConfig, StorageConfig};
pub use memory::{HistoryEntry, UserMemory};
pub use range::{assign_range, RangeInfo};
pub use score::{calculate_qscore, SCORE_MAX, SCORE_MIN};
pub use summary::{Streak, Summary};
pub use tone::ToneCategory;
pub use trend::StreakDirection;
