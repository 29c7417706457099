//! Score synthesis: tone base + stability adjustment + deterministic jitter.

use crate::stability;
use crate::tone::{self, ToneCategory};
use sha2::{Digest, Sha256};

/// Lower bound of the score space.
pub const SCORE_MIN: i64 = 100;
/// Upper bound of the score space.
pub const SCORE_MAX: i64 = 600;

fn base_for(tone: ToneCategory) -> i64 {
    match tone {
        ToneCategory::Anxious => 150,
        ToneCategory::Neutral => 250,
        ToneCategory::Positive => 350,
        ToneCategory::HighEnergy => 400,
    }
}

/// Deterministic jitter in \[-15, +15\] derived from the message bytes.
///
/// The first four digest bytes are read as a big-endian u32 and reduced
/// modulo 31. Any stable, well-distributed digest works here; this is not a
/// security boundary. Stable across runs and platforms, which keeps
/// re-scoring of replayed chat buffers idempotent.
pub fn deterministic_jitter(message: &str) -> i64 {
    let digest = Sha256::digest(message.as_bytes());
    let v = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (v % 31) as i64 - 15
}

/// Synthesize the bounded qscore for a message.
///
/// Byte-for-byte deterministic: identical text always yields the identical
/// score.
pub fn calculate_qscore(message: &str) -> i64 {
    let tone = tone::classify(message);
    let stability = stability::estimate(message);
    let adjusted = base_for(tone) + (stability - 50).div_euclid(2) + deterministic_jitter(message);
    adjusted.clamp(SCORE_MIN, SCORE_MAX)
}
