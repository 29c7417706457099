//! Keyword-weighted tone classification.
//!
//! Each tone category carries a fixed table of weighted keywords. A message
//! is classified by counting whole-word occurrences against the lower-cased
//! text, then adding punctuation and capitalization boosts computed from the
//! original string. No NLU beyond the tables; in production this could be
//! swapped for an ML model without touching the rest of the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse emotional classification of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToneCategory {
    Anxious,
    Neutral,
    Positive,
    HighEnergy,
}

impl ToneCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneCategory::Anxious => "anxious",
            ToneCategory::Neutral => "neutral",
            ToneCategory::Positive => "positive",
            ToneCategory::HighEnergy => "high-energy",
        }
    }

    /// Parse the wire name back into a category. Returns `None` for anything
    /// outside the four known names (e.g. rows written by an older schema).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "anxious" => Some(ToneCategory::Anxious),
            "neutral" => Some(ToneCategory::Neutral),
            "positive" => Some(ToneCategory::Positive),
            "high-energy" => Some(ToneCategory::HighEnergy),
            _ => None,
        }
    }
}

impl fmt::Display for ToneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ANXIOUS_WEIGHTS: &[(&str, i64)] = &[
    ("angry", 2),
    ("mad", 2),
    ("frustrated", 3),
    ("lost", 2),
    ("hate", 2),
    ("sad", 2),
    ("anxious", 3),
    ("scared", 3),
    ("panic", 3),
    ("fear", 2),
    ("stressed", 3),
];

const POSITIVE_WEIGHTS: &[(&str, i64)] = &[
    ("happy", 2),
    ("grateful", 2),
    ("confident", 3),
    ("calm", 3),
    ("peaceful", 3),
    ("good", 1),
    ("winning", 2),
    ("profit", 2),
    ("composed", 2),
    ("focused", 1),
];

const HIGH_ENERGY_WEIGHTS: &[(&str, i64)] = &[
    ("excited", 3),
    ("pumped", 3),
    ("ready", 2),
    ("motivated", 2),
    ("amped", 3),
    ("hyped", 3),
    ("wired", 2),
];

const NEUTRAL_WEIGHTS: &[(&str, i64)] = &[
    ("nervous", 1),
    ("unsure", 1),
    ("maybe", 1),
    ("confused", 2),
    ("ok", 1),
    ("fine", 1),
];

/// Category evaluation order. Ties are broken by the first strict maximum
/// encountered in this order, so it must stay a fixed list rather than a
/// map iteration.
const CATEGORY_ORDER: [(ToneCategory, &[(&str, i64)]); 4] = [
    (ToneCategory::Anxious, ANXIOUS_WEIGHTS),
    (ToneCategory::Positive, POSITIVE_WEIGHTS),
    (ToneCategory::HighEnergy, HIGH_ENERGY_WEIGHTS),
    (ToneCategory::Neutral, NEUTRAL_WEIGHTS),
];

// Word-character runs; underscore counts as a word character so "ok_x"
// does not contain the word "ok".
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9_]+").expect("word pattern is valid"));

fn token_counts(lowered: &str) -> HashMap<&str, i64> {
    let mut counts = HashMap::new();
    for m in WORD_RE.find_iter(lowered) {
        *counts.entry(m.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Classify a message into one [`ToneCategory`].
///
/// Keyword matching runs against the lower-cased text; the exclamation and
/// capitalization boosts are counted on the original string. A message with
/// no signal at all is `Neutral`.
pub fn classify(message: &str) -> ToneCategory {
    let lowered = message.to_lowercase();
    let counts = token_counts(&lowered);

    let mut totals = [0i64; 4];
    for (i, (_, weights)) in CATEGORY_ORDER.iter().enumerate() {
        for &(keyword, weight) in *weights {
            if let Some(n) = counts.get(keyword) {
                totals[i] += weight * n;
            }
        }
    }

    let exclam = message.chars().filter(|&c| c == '!').count() as i64;
    let caps = count_uppercase(message);
    // Heavy exclamation reads as anxiety; sustained caps as hype.
    totals[0] += exclam / 2;
    totals[2] += (caps - 8).max(0) / 5;

    if totals.iter().all(|&t| t == 0) {
        return ToneCategory::Neutral;
    }

    let mut best = 0;
    for i in 1..CATEGORY_ORDER.len() {
        if totals[i] > totals[best] {
            best = i;
        }
    }
    CATEGORY_ORDER[best].0
}

/// Count upper-case letters (alphabetic code points only).
pub(crate) fn count_uppercase(message: &str) -> i64 {
    message
        .chars()
        .filter(|c| c.is_alphabetic() && c.is_uppercase())
        .count() as i64
}
