//! Chat buffering state machine.
//!
//! Individual chat messages are too small to score on their own, so they
//! accumulate per user until a randomized threshold is reached; the buffer
//! is then joined into one synthetic message, handed to the scoring
//! pipeline, and the state resets with a freshly drawn threshold. The
//! randomized threshold keeps the scoring cadence from being predictable
//! message-by-message.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Separator used when joining buffered messages (and answer lists) into
/// one synthetic message.
pub const MESSAGE_SEPARATOR: &str = " | ";

/// Per-user chat buffer state. Persists between requests as part of
/// [`crate::UserMemory`]; all fields default so blobs written before this
/// field existed still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatState {
    /// Messages absorbed since the last reset.
    pub count: u32,
    /// Randomized flush threshold. Zero (or anything outside the configured
    /// range) marks an uninitialized state and forces a redraw.
    pub threshold: u32,
    /// Raw messages awaiting a scoring pass.
    pub buffer: Vec<String>,
}

/// Result of absorbing one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Message buffered; no scoring performed yet.
    Queued { count: u32, threshold: u32 },
    /// Threshold reached: `combined` is the joined buffer, ready for the
    /// full scoring pipeline. The state has already been reset.
    Flush { combined: String },
}

impl ChatState {
    /// Absorb one trimmed, non-empty chat message.
    ///
    /// The RNG is a parameter so tests can pin the threshold draw; a
    /// threshold already inside `thresholds` is never redrawn, which also
    /// means a persisted in-range threshold survives process restarts.
    pub fn absorb<R: Rng>(
        &mut self,
        message: &str,
        thresholds: RangeInclusive<u32>,
        rng: &mut R,
    ) -> ChatOutcome {
        if !thresholds.contains(&self.threshold) {
            self.threshold = rng.gen_range(thresholds.clone());
        }

        self.buffer.push(message.trim().to_string());
        self.count += 1;

        if self.count < self.threshold {
            return ChatOutcome::Queued {
                count: self.count,
                threshold: self.threshold,
            };
        }

        let combined = join_messages(self.buffer.iter().map(String::as_str));
        self.count = 0;
        self.threshold = rng.gen_range(thresholds);
        self.buffer.clear();
        ChatOutcome::Flush { combined }
    }
}

/// Join message fragments with [`MESSAGE_SEPARATOR`], dropping blanks.
pub fn join_messages<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_state(threshold: u32) -> ChatState {
        ChatState {
            count: 0,
            threshold,
            buffer: Vec::new(),
        }
    }

    #[test]
    fn test_queues_until_threshold() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = fixed_state(15);

        for i in 1..15 {
            let outcome = state.absorb(&format!("message {i}"), 15..=20, &mut rng);
            assert_eq!(
                outcome,
                ChatOutcome::Queued {
                    count: i,
                    threshold: 15
                }
            );
        }
        assert_eq!(state.buffer.len(), 14);
    }

    #[test]
    fn test_flush_at_threshold_resets_state() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = fixed_state(15);

        for i in 1..15 {
            state.absorb(&format!("message {i}"), 15..=20, &mut rng);
        }
        let outcome = state.absorb("message 15", 15..=20, &mut rng);

        match outcome {
            ChatOutcome::Flush { combined } => {
                assert!(combined.starts_with("message 1 | message 2"));
                assert!(combined.ends_with("message 15"));
            }
            other => panic!("expected flush, got {other:?}"),
        }
        assert_eq!(state.count, 0);
        assert!(state.buffer.is_empty());
        assert!((15..=20).contains(&state.threshold));
    }

    #[test]
    fn test_uninitialized_threshold_is_redrawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = ChatState::default();
        assert_eq!(state.threshold, 0);

        let outcome = state.absorb("hello", 15..=20, &mut rng);
        match outcome {
            ChatOutcome::Queued { count, threshold } => {
                assert_eq!(count, 1);
                assert!((15..=20).contains(&threshold));
            }
            other => panic!("expected queued, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_threshold_is_redrawn() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = fixed_state(999);

        state.absorb("hello", 15..=20, &mut rng);
        assert!((15..=20).contains(&state.threshold));
    }

    #[test]
    fn test_in_range_threshold_is_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = fixed_state(18);

        state.absorb("hello", 15..=20, &mut rng);
        assert_eq!(state.threshold, 18);
    }

    #[test]
    fn test_join_drops_blank_fragments() {
        assert_eq!(join_messages(["a", "  ", "b", ""]), "a | b");
        assert_eq!(join_messages(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_absorb_trims_message() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = fixed_state(15);
        state.absorb("  padded  ", 15..=20, &mut rng);
        assert_eq!(state.buffer[0], "padded");
    }
}
