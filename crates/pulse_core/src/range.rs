//! Static score-range table and lookup.

use serde::{Deserialize, Serialize};

/// One band of the score space.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRange {
    pub name: &'static str,
    pub low: i64,
    pub high: i64,
    pub archetype: &'static str,
    pub element: &'static str,
    pub motto: &'static str,
}

/// The five bands partition \[100, 600\] with no gaps or overlaps; the last
/// band's upper bound is inclusive of 600.
pub const RANGES: [ScoreRange; 5] = [
    ScoreRange {
        name: "Storm",
        low: 100,
        high: 199,
        archetype: "The Reactor",
        element: "Fire",
        motto: "Emotion first, logic later.",
    },
    ScoreRange {
        name: "Ground",
        low: 200,
        high: 299,
        archetype: "The Builder",
        element: "Earth",
        motto: "Steady hands make heavy bags.",
    },
    ScoreRange {
        name: "Flow",
        low: 300,
        high: 399,
        archetype: "The Surfer",
        element: "Water",
        motto: "Don't fight the wave — ride it.",
    },
    ScoreRange {
        name: "Gold",
        low: 400,
        high: 499,
        archetype: "The Strategist",
        element: "Air",
        motto: "Silence wins faster.",
    },
    ScoreRange {
        name: "Sun",
        low: 500,
        high: 600,
        archetype: "The Oracle",
        element: "Light",
        motto: "Peace is the ultimate edge.",
    },
];

/// Range fields as they appear on the wire and in persisted summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeInfo {
    pub name: String,
    pub archetype: String,
    pub element: String,
    pub motto: String,
}

impl From<&ScoreRange> for RangeInfo {
    fn from(r: &ScoreRange) -> Self {
        Self {
            name: r.name.to_string(),
            archetype: r.archetype.to_string(),
            element: r.element.to_string(),
            motto: r.motto.to_string(),
        }
    }
}

/// Look up the band containing `qscore`.
///
/// Scores produced by the synthesizer always land in \[100, 600\], so the
/// "Unknown" fallback is unreachable in normal operation.
pub fn assign_range(qscore: i64) -> RangeInfo {
    for range in &RANGES {
        if range.low <= qscore && qscore <= range.high {
            return range.into();
        }
    }
    RangeInfo {
        name: "Unknown".to_string(),
        archetype: "-".to_string(),
        element: "-".to_string(),
        motto: "-".to_string(),
    }
}
